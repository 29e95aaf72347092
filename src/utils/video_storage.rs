// marley-service/src/utils/video_storage.rs
use crate::models::{ServiceError, Video, VideoSourceType};
use crate::utils::fs_utils;
use log::{info, warn};
use std::fs;
use std::path::Path;

const VIDEOS_TABLE: &str = "videos";
const VIDEO_BUCKET: &str = "videos";

pub fn save_video(video: &Video) -> Result<(), ServiceError> {
    fs_utils::write_row(VIDEOS_TABLE, &video.id, video)
}

pub fn find_video_by_id(video_id: &str) -> Result<Option<Video>, ServiceError> {
    fs_utils::read_row(VIDEOS_TABLE, video_id)
}

// Newest first
pub fn get_videos_for_project(project_id: &str) -> Result<Vec<Video>, ServiceError> {
    let mut videos: Vec<Video> = fs_utils::scan_rows(VIDEOS_TABLE)?
        .into_iter()
        .filter(|video: &Video| video.project_id == project_id)
        .collect();
    videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(videos)
}

// Remove the video row and, for uploads, the stored file alongside it
pub fn delete_video(video: &Video) -> Result<bool, ServiceError> {
    if video.source_type == VideoSourceType::Upload {
        if let Some(storage_path) = &video.storage_path {
            delete_stored_object(storage_path);
        }
    }

    fs_utils::delete_row(VIDEOS_TABLE, &video.id)
}

// Check whether the uploaded bytes actually landed in the object store
pub fn stored_object_exists(storage_path: &str) -> bool {
    Path::new(&fs_utils::object_path(VIDEO_BUCKET, storage_path)).exists()
}

fn delete_stored_object(storage_path: &str) {
    let path_str = fs_utils::object_path(VIDEO_BUCKET, storage_path);
    let path = Path::new(&path_str);
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            // The row delete still proceeds; the orphaned file is logged
            warn!("Failed to remove stored video {}: {}", storage_path, e);
        } else {
            info!("Removed stored video file: {}", storage_path);
        }
    }
}
