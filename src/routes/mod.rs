// src/routes/mod.rs
pub mod auth_routes;
pub mod member_routes;
pub mod project_note_routes;
pub mod project_routes;
pub mod screenshot_routes;
pub mod storage_routes;
pub mod team_routes;
pub mod video_note_routes;
pub mod video_routes;
