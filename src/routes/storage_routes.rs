// marley-service/src/routes/storage_routes.rs
//
// The object store behind the signed URLs. Upload PUTs and video
// playback GETs are authorized by the token minted by the resource
// routes, not by a JWT, so these live outside the auth middleware.
use crate::models::ServiceError;
use crate::utils::fs_utils;
use crate::utils::signed_urls::{self, Purpose};
use actix_web::{get, put, web, HttpResponse};
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;

const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Deserialize)]
struct TokenQuery {
    token: String,
    expires: i64,
}

fn validate_object_path(bucket: &str, path: &str) -> Result<(), ServiceError> {
    if !matches!(bucket, "videos" | "screenshots") {
        return Err(ServiceError::NotFound("No such bucket".to_string()));
    }
    if path.is_empty() || path.split('/').any(|segment| segment.is_empty() || segment == ".." || segment == ".") {
        return Err(ServiceError::BadRequest("Invalid object path".to_string()));
    }
    Ok(())
}

// Receive uploaded bytes. The metadata row is created by a later call,
// so an aborted transfer leaves nothing behind but an orphan file.
#[put("/storage/{bucket}/{path:.*}")]
async fn put_object(
    path: web::Path<(String, String)>,
    query: web::Query<TokenQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let (bucket, object_path) = path.into_inner();

    validate_object_path(&bucket, &object_path)?;
    signed_urls::verify(Purpose::Upload, &bucket, &object_path, &query.token, query.expires)?;

    if body.len() > MAX_UPLOAD_BYTES {
        return Err(ServiceError::BadRequest("File too large".to_string()));
    }

    let target = fs_utils::object_path(&bucket, &object_path);
    if let Some(parent) = Path::new(&target).parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ServiceError::Internal(format!("Failed to create object dir: {}", e)))?;
    }

    fs::write(&target, &body)
        .map_err(|e| ServiceError::Internal(format!("Failed to store object: {}", e)))?;

    info!("✅ Stored object {}/{} ({} bytes)", bucket, object_path, body.len());

    Ok(HttpResponse::Ok().json(json!({
        "bucket": bucket,
        "path": object_path,
        "size": body.len()
    })))
}

#[derive(Deserialize)]
struct ReadTokenQuery {
    token: Option<String>,
    expires: Option<i64>,
}

// Serve stored bytes. Screenshots are public; video objects require a
// read token from the playback-url route.
#[get("/storage/{bucket}/{path:.*}")]
async fn get_object(
    path: web::Path<(String, String)>,
    query: web::Query<ReadTokenQuery>,
) -> Result<HttpResponse, ServiceError> {
    let (bucket, object_path) = path.into_inner();

    validate_object_path(&bucket, &object_path)?;

    if bucket != "screenshots" {
        match (&query.token, query.expires) {
            (Some(token), Some(expires)) => {
                signed_urls::verify(Purpose::Read, &bucket, &object_path, token, expires)?;
            }
            _ => {
                return Err(ServiceError::Forbidden(
                    "A signed playback URL is required".to_string(),
                ))
            }
        }
    }

    let target = fs_utils::object_path(&bucket, &object_path);
    let bytes = match fs::read(&target) {
        Ok(bytes) => bytes,
        Err(_) => return Err(ServiceError::NotFound("Object not found".to_string())),
    };

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(bytes))
}

// Register all storage routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(put_object).service(get_object);
}
