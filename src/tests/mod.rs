// marley-service/src/tests/mod.rs
//
// Integration tests drive the real routes through actix's test service,
// with uuid-unique users and teams so runs never collide in the shared
// row store.

// Build the same app the server runs, minus CORS
macro_rules! test_app {
    () => {{
        crate::utils::fs_utils::ensure_storage_layout().unwrap();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(crate::routes::auth_routes::init_routes)
                .configure(crate::routes::storage_routes::init_routes)
                .service(
                    actix_web::web::scope("")
                        .wrap(crate::utils::Authentication)
                        .configure(crate::routes::auth_routes::init_protected_routes)
                        .configure(crate::routes::team_routes::init_routes)
                        .configure(crate::routes::member_routes::init_routes)
                        .configure(crate::routes::project_routes::init_routes)
                        .configure(crate::routes::project_note_routes::init_routes)
                        .configure(crate::routes::video_routes::init_routes)
                        .configure(crate::routes::video_note_routes::init_routes)
                        .configure(crate::routes::screenshot_routes::init_routes),
                ),
        )
        .await
    }};
}

const TEST_PASSWORD: &str = "rehearsal-password";

// Register a user with the given email and log them in; evaluates to
// (token, user_id)
macro_rules! signup_as {
    ($app:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/auth/register")
            .set_json(serde_json::json!({ "email": $email, "password": crate::tests::TEST_PASSWORD }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert!(resp.status().is_success(), "registration should succeed");

        let req = actix_web::test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({ "email": $email, "password": crate::tests::TEST_PASSWORD }))
            .to_request();
        let body: serde_json::Value =
            actix_web::test::call_and_read_body_json(&$app, req).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user_id"].as_str().unwrap().to_string(),
        )
    }};
}

// Register a fresh user with a unique address; evaluates to
// (token, user_id, email)
macro_rules! signup {
    ($app:expr) => {{
        let email = format!("{}@example.com", uuid::Uuid::new_v4());
        let (token, user_id) = signup_as!($app, email);
        (token, user_id, email)
    }};
}

// Build an authenticated TestRequest
macro_rules! authed {
    ($method:ident, $uri:expr, $token:expr) => {
        actix_web::test::TestRequest::$method()
            .uri(&$uri.to_string())
            .insert_header(("Authorization", format!("Bearer {}", $token)))
    };
}

// Create a team and evaluate to its id
macro_rules! create_team {
    ($app:expr, $token:expr, $name:expr) => {{
        let req = authed!(post, "/teams", $token)
            .set_json(serde_json::json!({ "name": $name }))
            .to_request();
        let body: serde_json::Value =
            actix_web::test::call_and_read_body_json(&$app, req).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

// Create a project and evaluate to its id
macro_rules! create_project {
    ($app:expr, $token:expr, $team_id:expr, $name:expr) => {{
        let req = authed!(post, format!("/teams/{}/projects", $team_id), $token)
            .set_json(serde_json::json!({ "name": $name }))
            .to_request();
        let body: serde_json::Value =
            actix_web::test::call_and_read_body_json(&$app, req).await;
        body["id"].as_str().unwrap().to_string()
    }};
}

// Invite an existing user into a team with a role
macro_rules! invite_user {
    ($app:expr, $token:expr, $team_id:expr, $user_id:expr, $role:expr) => {{
        let req = authed!(post, format!("/teams/{}/members/invite-user", $team_id), $token)
            .set_json(serde_json::json!({ "user_id": $user_id, "role": $role }))
            .to_request();
        actix_web::test::call_service(&$app, req).await
    }};
}

mod permission_tests;
mod upload_tests;
