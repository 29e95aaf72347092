// marley-service/src/routes/screenshot_routes.rs
use crate::models::ServiceError;
use crate::utils::permissions::{self, Capability};
use crate::utils::signed_urls::{self, Purpose};
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

const SCREENSHOT_BUCKET: &str = "screenshots";
const SIGNED_URL_TTL_SECS: i64 = 3600;

#[derive(Deserialize)]
struct ScreenshotRequest {
    timestamp: f64,
}

// Issue a signed upload URL for a frame capture on a video
#[post("/videos/{video_id}/screenshots/upload-url")]
async fn get_screenshot_upload_url(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<ScreenshotRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    if !permissions::check_video(&video_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot take screenshots of video: {}", user_id, video_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can take screenshots".to_string(),
        ));
    }

    let storage_path = format!("{}/{}-{}.png", video_id, data.timestamp as u64, Uuid::new_v4());
    let signed = signed_urls::sign(Purpose::Upload, SCREENSHOT_BUCKET, &storage_path, SIGNED_URL_TTL_SECS);

    info!("✅ Issued screenshot upload URL for: {}", storage_path);

    Ok(HttpResponse::Ok().json(json!({
        "path": signed.path,
        "signed_url": signed.url,
        "token": signed.token,
        "expires": signed.expires
    })))
}

#[derive(Deserialize)]
struct PublicUrlQuery {
    path: String,
}

// Screenshots are served publicly once uploaded
#[get("/screenshots/public-url")]
async fn get_screenshot_public_url(
    req: HttpRequest,
    query: web::Query<PublicUrlQuery>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let url = signed_urls::public_url(SCREENSHOT_BUCKET, &query.path);

    Ok(HttpResponse::Ok().json(json!({ "url": url })))
}

// Register all screenshot routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_screenshot_upload_url)
        .service(get_screenshot_public_url);
}
