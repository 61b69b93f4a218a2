use crate::client::{HttpClient, segment};
use crate::envelope::ApiResponse;
use crate::error::Error;
use crate::models::{CreateUser, MessageResponse, UpdateUser, User};

/// User administration (`/users`). The server only allows admins here.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: HttpClient,
}

impl UserClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<User>>, Error> {
        self.http.get("/users").await
    }

    pub async fn get(&self, id: &str) -> Result<ApiResponse<User>, Error> {
        self.http.get(&format!("/users/{}", segment(id))).await
    }

    pub async fn create(&self, body: &CreateUser) -> Result<ApiResponse<User>, Error> {
        self.http.post("/users", body).await
    }

    pub async fn update(&self, id: &str, body: &UpdateUser) -> Result<ApiResponse<User>, Error> {
        self.http.put(&format!("/users/{}", segment(id)), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<MessageResponse>, Error> {
        self.http.delete(&format!("/users/{}", segment(id))).await
    }
}
