// marley-service/src/utils/mod.rs
use crate::models::{Claims, ServiceError, User};
use actix_web::{HttpMessage, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::env;
use std::fs;
use std::path::Path;

pub mod note_storage;
pub mod permissions;
pub mod project_storage;
pub mod signed_urls;
pub mod team_storage;
pub mod video_storage;
pub mod video_urls;

pub use auth_middleware::Authentication;

// Extract the authenticated user id placed in request extensions by the
// Authentication middleware
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone())
        .ok_or(ServiceError::Unauthorized)
}

// JWT utility functions
pub mod jwt {
    use super::*;

    // Get JWT secret from environment or use default
    fn get_jwt_secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| "marley_super_secret_key".to_string())
    }

    // Generate a new JWT token for a user
    pub fn generate_token(user: &User) -> Result<String, ServiceError> {
        let secret = get_jwt_secret();
        let expiration = (Utc::now() + Duration::days(7)).timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|e| ServiceError::Internal(format!("Failed to sign token: {}", e)))
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str) -> Result<Claims, ServiceError> {
        let secret = get_jwt_secret();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::Unauthorized);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash)
            .map_err(|e| ServiceError::Internal(format!("Failed to verify password: {}", e)))
    }
}

// File system layout for the JSON row store and the object store
pub mod fs_utils {
    use super::*;
    use std::io;

    pub fn storage_root() -> String {
        env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string())
    }

    pub fn table_dir(table: &str) -> String {
        format!("{}/{}", storage_root(), table)
    }

    pub fn object_path(bucket: &str, path: &str) -> String {
        format!("{}/objects/{}/{}", storage_root(), bucket, path)
    }

    // Create the directory tree the service writes into
    pub fn ensure_storage_layout() -> io::Result<()> {
        for table in [
            "users",
            "teams",
            "members",
            "projects",
            "videos",
            "video_notes",
            "project_notes",
            "objects/videos",
            "objects/screenshots",
        ] {
            fs::create_dir_all(table_dir(table))?;
        }
        Ok(())
    }

    // Shared row-store helpers: one JSON document per row, directory scans
    // stand in for table scans.

    pub fn write_row<T: serde::Serialize>(table: &str, id: &str, row: &T) -> Result<(), ServiceError> {
        let dir = table_dir(table);
        fs::create_dir_all(&dir)
            .map_err(|e| ServiceError::Internal(format!("Failed to create {}: {}", dir, e)))?;

        let json = serde_json::to_string_pretty(row)
            .map_err(|e| ServiceError::Internal(format!("Failed to serialize row: {}", e)))?;

        fs::write(format!("{}/{}.json", dir, id), json)
            .map_err(|e| ServiceError::Internal(format!("Failed to write row: {}", e)))
    }

    pub fn read_row<T: serde::de::DeserializeOwned>(
        table: &str,
        id: &str,
    ) -> Result<Option<T>, ServiceError> {
        let path_str = format!("{}/{}.json", table_dir(table), id);
        let path = Path::new(&path_str);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ServiceError::Internal(format!("Failed to read row: {}", e)))?;

        let row = serde_json::from_str(&content)
            .map_err(|e| ServiceError::Internal(format!("Failed to parse row: {}", e)))?;

        Ok(Some(row))
    }

    pub fn delete_row(table: &str, id: &str) -> Result<bool, ServiceError> {
        let path_str = format!("{}/{}.json", table_dir(table), id);
        let path = Path::new(&path_str);

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)
            .map_err(|e| ServiceError::Internal(format!("Failed to delete row: {}", e)))?;
        Ok(true)
    }

    pub fn scan_rows<T: serde::de::DeserializeOwned>(table: &str) -> Result<Vec<T>, ServiceError> {
        let dir_str = table_dir(table);
        let dir = Path::new(&dir_str);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for entry in fs::read_dir(dir)
            .map_err(|e| ServiceError::Internal(format!("Failed to read {}: {}", dir_str, e)))?
        {
            let entry = entry
                .map_err(|e| ServiceError::Internal(format!("Failed to read entry: {}", e)))?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)
                    .map_err(|e| ServiceError::Internal(format!("Failed to read row: {}", e)))?;

                match serde_json::from_str(&content) {
                    Ok(row) => rows.push(row),
                    Err(e) => {
                        log::warn!("Skipping unparseable row {:?}: {}", path, e);
                        continue;
                    }
                }
            }
        }

        Ok(rows)
    }
}

// User storage utilities
pub mod user_storage {
    use super::*;

    const USERS_TABLE: &str = "users";

    // Save a user to storage
    pub fn save_user(user: &User) -> Result<(), ServiceError> {
        fs_utils::write_row(USERS_TABLE, &user.id, user)
    }

    // Find a user by email
    pub fn find_user_by_email(email: &str) -> Result<Option<User>, ServiceError> {
        let users: Vec<User> = fs_utils::scan_rows(USERS_TABLE)?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    // Find a user by ID
    pub fn find_user_by_id(id: &str) -> Result<Option<User>, ServiceError> {
        fs_utils::read_row(USERS_TABLE, id)
    }

    // Substring search over user emails, for the invite dialog
    pub fn search_users(query: &str, limit: usize) -> Result<Vec<User>, ServiceError> {
        let needle = query.to_lowercase();
        let users: Vec<User> = fs_utils::scan_rows(USERS_TABLE)?;
        Ok(users
            .into_iter()
            .filter(|user| user.email.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::*;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
    use actix_web::http::header;
    use actix_web::{error::ErrorUnauthorized, Error};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            // Get Authorization header
            let auth_header = req.headers().get(header::AUTHORIZATION);

            if let Some(auth_header) = auth_header {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Ok(token) = jwt::extract_token_from_header(auth_str) {
                        if let Ok(claims) = jwt::decode_token(&token) {
                            // Add the claims to the request extensions
                            req.extensions_mut().insert(claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move { fut.await });
                        }
                    }
                }
            }

            Box::pin(async move { Err(ErrorUnauthorized("Unauthorized")) })
        }
    }
}
