use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use super::{expose_optional_secret, expose_secret, secret_from_string};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserRole {
    Admin,
    User,
    Readonly,
}

/// An account — from `/auth/me` and `/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// `POST /auth/login` and `POST /auth/register` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(deserialize_with = "secret_from_string")]
    pub token: SecretString,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Body for `POST /users` (admin).
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Body for `PUT /users/{id}` (admin).
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional_secret"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
    }
}

/// Body for `PUT /auth/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Body for `PUT /auth/password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[serde(serialize_with = "expose_secret")]
    pub current_password: SecretString,
    #[serde(serialize_with = "expose_secret")]
    pub new_password: SecretString,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;

    #[test]
    fn login_response_keeps_token_secret() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "user": { "id": "u-1", "username": "ada", "email": "ada@example.net", "role": "admin" },
            "token": "jwt.abc.def"
        }))
        .unwrap();
        assert!(resp.user.is_admin());
        assert_eq!(resp.token.expose_secret(), "jwt.abc.def");
        assert!(!format!("{resp:?}").contains("jwt.abc.def"));
    }

    #[test]
    fn password_bodies_expose_only_on_the_wire() {
        let body = ChangePassword {
            current_password: SecretString::from("old-pass"),
            new_password: SecretString::from("new-pass"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "currentPassword": "old-pass", "newPassword": "new-pass" })
        );
        assert!(!format!("{body:?}").contains("old-pass"));
    }

    #[test]
    fn update_user_skips_unset_password() {
        let body = UpdateUser {
            role: Some(UserRole::Readonly),
            ..UpdateUser::default()
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "role": "readonly" }));

        let body = UpdateUser {
            password: Some(SecretString::from("s3cret")),
            ..UpdateUser::default()
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "password": "s3cret" }));
    }

    #[test]
    fn registration_omits_missing_role() {
        let body = Registration {
            username: "ada".into(),
            email: "ada@example.net".into(),
            password: SecretString::from("pw"),
            role: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "username": "ada", "email": "ada@example.net", "password": "pw" })
        );
    }
}
