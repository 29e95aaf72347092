// marley-service/src/tests/upload_tests.rs
//
// The two-phase upload: a signed URL, a byte transfer, then the metadata
// row. The row only ever exists once the bytes do.
use actix_web::test;
use serde_json::Value;

// Owner plus a fresh project; evaluates to (token, team_id, project_id)
macro_rules! owner_with_project {
    ($app:expr) => {{
        let (token, _, _) = signup!($app);
        let team_id = create_team!($app, token, "Uploads");
        let project_id = create_project!($app, token, team_id, "Footage");
        (token, team_id, project_id)
    }};
}

// Request a signed upload slot; evaluates to the response JSON
macro_rules! upload_slot {
    ($app:expr, $token:expr, $project_id:expr) => {{
        let req = authed!(post, format!("/projects/{}/videos/upload-url", $project_id), $token)
            .set_json(serde_json::json!({
                "file_name": "run-through.mp4",
                "content_type": "video/mp4"
            }))
            .to_request();
        let slot: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        slot
    }};
}

#[actix_rt::test]
async fn upload_flow_end_to_end() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let slot = upload_slot!(app, token, project_id);
    let path = slot["path"].as_str().unwrap().to_string();
    let upload_token = slot["token"].as_str().unwrap();
    let expires = slot["expires"].as_i64().unwrap();
    assert!(path.starts_with(&format!("{}/", project_id)));

    let payload: &[u8] = b"fake mp4 bytes";
    let req = test::TestRequest::put()
        .uri(&format!("/storage/videos/{}?token={}&expires={}", path, upload_token, expires))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = authed!(post, format!("/projects/{}/videos/upload", project_id), token)
        .set_json(serde_json::json!({
            "title": "Full run",
            "storage_path": path,
            "mime_type": "video/mp4"
        }))
        .to_request();
    let video: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(video["source_type"], "upload");
    let video_id = video["id"].as_str().unwrap().to_string();

    // Playback resolves to a signed URL on the same object
    let req = authed!(get, format!("/videos/{}/playback-url", video_id), token).to_request();
    let playback: Value = test::call_and_read_body_json(&app, req).await;
    let url = playback["url"].as_str().unwrap();
    let relative = format!("/storage/{}", url.split("/storage/").nth(1).unwrap());

    let req = test::TestRequest::get().uri(&relative).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let bytes = test::read_body(resp).await;
    assert_eq!(bytes.as_ref(), payload);

    // Deleting the video takes the stored file with it
    let req = authed!(delete, format!("/videos/{}", video_id), token).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::get().uri(&relative).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn registering_before_the_bytes_arrive_is_rejected() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let slot = upload_slot!(app, token, project_id);
    let path = slot["path"].as_str().unwrap();

    // No PUT happened, so the metadata row must not be created
    let req = authed!(post, format!("/projects/{}/videos/upload", project_id), token)
        .set_json(serde_json::json!({ "title": "Ghost", "storage_path": path }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Uploaded file not found; complete the upload before registering the video"
    );

    let req = authed!(get, format!("/projects/{}/videos", project_id), token).to_request();
    let videos: Value = test::call_and_read_body_json(&app, req).await;
    assert!(videos.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn dancer_cannot_request_upload_slots() {
    let app = test_app!();
    let (owner_token, team_id, project_id) = owner_with_project!(app);
    let (dancer_token, dancer_id, _) = signup!(app);
    invite_user!(app, owner_token, team_id, dancer_id, "dancer");

    let req = authed!(post, format!("/projects/{}/videos/upload-url", project_id), dancer_token)
        .set_json(serde_json::json!({ "file_name": "clip.mp4", "content_type": "video/mp4" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only owners and directors can upload videos");
}

#[actix_rt::test]
async fn video_objects_require_a_read_token() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let slot = upload_slot!(app, token, project_id);
    let path = slot["path"].as_str().unwrap().to_string();
    let upload_token = slot["token"].as_str().unwrap();
    let expires = slot["expires"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/storage/videos/{}?token={}&expires={}", path, upload_token, expires))
        .set_payload(&b"bytes"[..])
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    // Bare read, no token
    let req = test::TestRequest::get()
        .uri(&format!("/storage/videos/{}", path))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // An upload token is not a read token
    let req = test::TestRequest::get()
        .uri(&format!("/storage/videos/{}?token={}&expires={}", path, upload_token, expires))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn youtube_links_are_parsed_on_create() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    let req = authed!(post, format!("/projects/{}/videos/link", project_id), token)
        .set_json(serde_json::json!({ "title": "Reference", "url": url }))
        .to_request();
    let video: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(video["source_type"], "youtube");
    assert_eq!(video["external_id"], "dQw4w9WgXcQ");
    assert!(video["thumbnail_url"]
        .as_str()
        .unwrap()
        .contains("maxresdefault"));

    // Linked playback is a passthrough, no signing involved
    let video_id = video["id"].as_str().unwrap();
    let req = authed!(get, format!("/videos/{}/playback-url", video_id), token).to_request();
    let playback: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(playback["url"], url);
}

#[actix_rt::test]
async fn unsupported_video_urls_are_rejected() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let req = authed!(post, format!("/projects/{}/videos/link", project_id), token)
        .set_json(serde_json::json!({ "title": "Nope", "url": "ftp://tape.archive/reel1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn screenshot_objects_are_public_once_stored() {
    let app = test_app!();
    let (token, _, project_id) = owner_with_project!(app);

    let req = authed!(post, format!("/projects/{}/videos/link", project_id), token)
        .set_json(serde_json::json!({
            "title": "Marked up",
            "url": "https://youtu.be/dQw4w9WgXcQ"
        }))
        .to_request();
    let video: Value = test::call_and_read_body_json(&app, req).await;
    let video_id = video["id"].as_str().unwrap();

    let req = authed!(post, format!("/videos/{}/screenshots/upload-url", video_id), token)
        .set_json(serde_json::json!({ "timestamp": 12.75 }))
        .to_request();
    let slot: Value = test::call_and_read_body_json(&app, req).await;
    let path = slot["path"].as_str().unwrap().to_string();
    let upload_token = slot["token"].as_str().unwrap();
    let expires = slot["expires"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/storage/screenshots/{}?token={}&expires={}", path, upload_token, expires))
        .set_payload(&b"png bytes"[..])
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    // Screenshots are served without any token
    let req = test::TestRequest::get()
        .uri(&format!("/storage/screenshots/{}", path))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
