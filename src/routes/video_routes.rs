// marley-service/src/routes/video_routes.rs
use crate::models::{
    CreateLinkedVideoRequest, CreateUploadVideoRequest, ServiceError, UpdateVideoRequest,
    UploadUrlRequest, Video, VideoSourceType,
};
use crate::utils::permissions::{self, Capability};
use crate::utils::signed_urls::{self, Purpose};
use crate::utils::{get_user_id_from_request, note_storage, video_storage, video_urls};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use uuid::Uuid;

const VIDEO_BUCKET: &str = "videos";
const SIGNED_URL_TTL_SECS: i64 = 3600;

// List a project's videos, newest first
#[get("/projects/{project_id}/videos")]
async fn get_videos(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("📋 Fetching videos for project: {}", project_id);

    if !permissions::check_project(&project_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let videos = video_storage::get_videos_for_project(&project_id)?;

    info!("✅ Found {} videos", videos.len());

    Ok(HttpResponse::Ok().json(videos))
}

// Get a single video
#[get("/videos/{video_id}")]
async fn get_video(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    if !permissions::check_video(&video_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let video = match video_storage::find_video_by_id(&video_id)? {
        Some(video) => video,
        None => return Err(ServiceError::NotFound("Video not found".to_string())),
    };

    Ok(HttpResponse::Ok().json(video))
}

// Issue a signed upload URL for a new video file
#[post("/projects/{project_id}/videos/upload-url")]
async fn get_upload_url(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UploadUrlRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    if !permissions::check_project(&project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot upload to project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can upload videos".to_string(),
        ));
    }

    let extension = data
        .file_name
        .rsplit('.')
        .next()
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or_else(|| ServiceError::BadRequest("Unsupported file name".to_string()))?;

    if !data.content_type.starts_with("video/") {
        return Err(ServiceError::BadRequest(format!(
            "Unsupported content type: {}",
            data.content_type
        )));
    }

    let storage_path = format!("{}/{}.{}", project_id, Uuid::new_v4(), extension);
    let signed = signed_urls::sign(Purpose::Upload, VIDEO_BUCKET, &storage_path, SIGNED_URL_TTL_SECS);

    info!("✅ Issued upload URL for: {}", storage_path);

    Ok(HttpResponse::Ok().json(json!({
        "path": signed.path,
        "signed_url": signed.url,
        "token": signed.token,
        "expires": signed.expires
    })))
}

// Create the metadata row for an uploaded video. The bytes must already
// be in the object store: a cancelled or failed transfer leaves no row.
#[post("/projects/{project_id}/videos/upload")]
async fn create_video_from_upload(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<CreateUploadVideoRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("🎬 Registering uploaded video in project: {}", project_id);

    if !permissions::check_project(&project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot upload to project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can upload videos".to_string(),
        ));
    }

    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Video title cannot be empty".to_string()));
    }

    if !data.storage_path.starts_with(&format!("{}/", project_id)) {
        return Err(ServiceError::BadRequest("Storage path does not belong to this project".to_string()));
    }

    if !video_storage::stored_object_exists(&data.storage_path) {
        return Err(ServiceError::BadRequest(
            "Uploaded file not found; complete the upload before registering the video".to_string(),
        ));
    }

    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4().to_string(),
        project_id,
        title: data.title.trim().to_string(),
        description: data.description.clone(),
        source_type: VideoSourceType::Upload,
        storage_path: Some(data.storage_path.clone()),
        storage_url: Some(signed_urls::public_url(VIDEO_BUCKET, &data.storage_path)),
        external_url: None,
        external_id: None,
        duration_seconds: data.duration_seconds,
        thumbnail_url: None,
        file_size_bytes: data.file_size_bytes,
        mime_type: data.mime_type.clone(),
        created_by: user_id,
        created_at: now,
        updated_at: now,
    };

    video_storage::save_video(&video)?;

    info!("✅ Video created: {}", video.id);

    Ok(HttpResponse::Ok().json(video))
}

// Add a linked video (YouTube, Vimeo or a plain external URL)
#[post("/projects/{project_id}/videos/link")]
async fn create_video_from_url(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<CreateLinkedVideoRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let project_id = path.into_inner();

    info!("🔗 Linking video in project: {}", project_id);

    if !permissions::check_project(&project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot add videos to project: {}", user_id, project_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can add videos".to_string(),
        ));
    }

    if data.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("Video title cannot be empty".to_string()));
    }

    if !video_urls::is_valid_video_url(&data.url) {
        return Err(ServiceError::BadRequest(format!(
            "Unsupported video URL: {}",
            data.url
        )));
    }

    let parsed = video_urls::parse_video_url(&data.url);

    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4().to_string(),
        project_id,
        title: data.title.trim().to_string(),
        description: data.description.clone(),
        source_type: parsed.source_type,
        storage_path: None,
        storage_url: None,
        external_url: Some(data.url.clone()),
        external_id: parsed.external_id,
        duration_seconds: None,
        thumbnail_url: parsed.thumbnail_url,
        file_size_bytes: None,
        mime_type: None,
        created_by: user_id,
        created_at: now,
        updated_at: now,
    };

    video_storage::save_video(&video)?;

    info!("✅ Video linked: {} ({:?})", video.id, video.source_type);

    Ok(HttpResponse::Ok().json(video))
}

// Update title/description
#[put("/videos/{video_id}")]
async fn update_video(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    info!("🔄 Updating video: {}", video_id);

    let mut video = match video_storage::find_video_by_id(&video_id)? {
        Some(video) => video,
        None => return Err(ServiceError::NotFound("Video not found".to_string())),
    };

    if !permissions::check_project(&video.project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot edit video: {}", user_id, video_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can edit videos".to_string(),
        ));
    }

    if let Some(title) = &data.title {
        if title.trim().is_empty() {
            return Err(ServiceError::BadRequest("Video title cannot be empty".to_string()));
        }
        video.title = title.trim().to_string();
    }
    if let Some(description) = &data.description {
        video.description = Some(description.clone());
    }
    video.updated_at = Utc::now();

    video_storage::save_video(&video)?;

    Ok(HttpResponse::Ok().json(video))
}

// Delete a video; an uploaded video's stored file goes with it
#[delete("/videos/{video_id}")]
async fn delete_video(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    info!("🗑️ Deleting video: {}", video_id);

    let video = match video_storage::find_video_by_id(&video_id)? {
        Some(video) => video,
        None => return Err(ServiceError::NotFound("Video not found".to_string())),
    };

    if !permissions::check_project(&video.project_id, &user_id, Capability::Edit)? {
        error!("❌ User: {} cannot delete video: {}", user_id, video_id);
        return Err(ServiceError::Forbidden(
            "Only owners and directors can delete videos".to_string(),
        ));
    }

    note_storage::delete_notes_for_video(&video_id)?;
    video_storage::delete_video(&video)?;

    info!("✅ Video deleted: {}", video_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Video deleted successfully",
        "video_id": video_id
    })))
}

// Resolve a playback URL: signed for uploads, passthrough for links
#[get("/videos/{video_id}/playback-url")]
async fn get_playback_url(req: HttpRequest, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let video_id = path.into_inner();

    if !permissions::check_video(&video_id, &user_id, Capability::View)? {
        return Err(ServiceError::Forbidden("Access denied".to_string()));
    }

    let video = match video_storage::find_video_by_id(&video_id)? {
        Some(video) => video,
        None => return Err(ServiceError::NotFound("Video not found".to_string())),
    };

    if video.source_type != VideoSourceType::Upload {
        return Ok(HttpResponse::Ok().json(json!({ "url": video.external_url })));
    }

    let storage_path = video
        .storage_path
        .ok_or_else(|| ServiceError::NotFound("Video file not found".to_string()))?;

    let signed = signed_urls::sign(Purpose::Read, VIDEO_BUCKET, &storage_path, SIGNED_URL_TTL_SECS);

    Ok(HttpResponse::Ok().json(json!({ "url": signed.url, "expires": signed.expires })))
}

// Register all video routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_videos)
        .service(get_video)
        .service(get_upload_url)
        .service(create_video_from_upload)
        .service(create_video_from_url)
        .service(update_video)
        .service(delete_video)
        .service(get_playback_url);
}
