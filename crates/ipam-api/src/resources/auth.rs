use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::client::HttpClient;
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::models::{
    ChangePassword, LoginResponse, MessageResponse, Registration, UpdateProfile, User, UserRole,
};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Authentication endpoints (`/auth/*`).
///
/// This client only talks to the server; storing the returned token is the
/// session manager's job.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ApiResponse<LoginResponse>, Error> {
        let body = Credentials {
            email,
            password: password.expose_secret(),
        };
        self.http.post("/auth/login", &body).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: SecretString,
        role: Option<UserRole>,
    ) -> Result<ApiResponse<LoginResponse>, Error> {
        let body = Registration {
            username: username.to_owned(),
            email: email.to_owned(),
            password,
            role,
        };
        self.http.post("/auth/register", &body).await
    }

    /// The account behind the current bearer token.
    pub async fn me(&self) -> Result<ApiResponse<User>, Error> {
        self.http.get("/auth/me").await
    }

    pub async fn update_profile(&self, body: &UpdateProfile) -> Result<ApiResponse<User>, Error> {
        self.http.put("/auth/me", body).await
    }

    pub async fn change_password(
        &self,
        body: &ChangePassword,
    ) -> Result<ApiResponse<MessageResponse>, Error> {
        self.http.put("/auth/password", body).await
    }
}
