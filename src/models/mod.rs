// marley-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub mod project;
pub mod team;
pub mod video;

pub use project::*;
pub use team::*;
pub use video::*;

// User models for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

// Minimal public view of a user, returned by member listings and search
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        let display_name = user
            .email
            .split('@')
            .next()
            .unwrap_or(&user.email)
            .to_string();
        UserInfo {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name,
        }
    }
}

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

// Error taxonomy shared by every route. Authorization and not-found
// failures are decided inside the route and returned as one of these,
// never thrown past the service boundary.
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error: {}", _0)]
    Internal(String),
    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),
    #[display(fmt = "Unauthorized")]
    Unauthorized,
    #[display(fmt = "Not Found: {}", _0)]
    NotFound(String),
    #[display(fmt = "Forbidden: {}", _0)]
    Forbidden(String),
    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Internal(message) => {
                HttpResponse::InternalServerError().json(json!({ "error": message }))
            }
            ServiceError::BadRequest(message) => {
                HttpResponse::BadRequest().json(json!({ "error": message }))
            }
            ServiceError::Unauthorized => {
                HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }))
            }
            ServiceError::NotFound(message) => {
                HttpResponse::NotFound().json(json!({ "error": message }))
            }
            ServiceError::Forbidden(message) => {
                HttpResponse::Forbidden().json(json!({ "error": message }))
            }
            ServiceError::Conflict(message) => {
                HttpResponse::Conflict().json(json!({ "error": message }))
            }
        }
    }
}
