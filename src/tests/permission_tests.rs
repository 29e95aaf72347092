// marley-service/src/tests/permission_tests.rs
//
// The role/capability table as observed through the routes: owners hold
// everything, directors hold edit, dancers hold view only.
use actix_web::test;
use serde_json::Value;

#[actix_rt::test]
async fn create_team_makes_creator_owner_with_full_permissions() {
    let app = test_app!();
    let (token, user_id, _) = signup!(app);

    let team_id = create_team!(app, token, "Spring Showcase");

    let req = authed!(get, format!("/teams/{}/members", team_id), token).to_request();
    let members: Value = test::call_and_read_body_json(&app, req).await;

    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["role"], "owner");
    assert_eq!(members[0]["user_id"], user_id.as_str());
    assert_eq!(members[0]["permissions"]["can_edit"], true);
    assert_eq!(members[0]["permissions"]["can_delete"], true);
    assert_eq!(members[0]["permissions"]["can_upload"], true);

    let req = authed!(get, format!("/teams/{}/members/me", team_id), token).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "owner");
}

#[actix_rt::test]
async fn director_creates_projects_dancer_cannot() {
    let app = test_app!();
    let (owner_token, _, _) = signup!(app);
    let (director_token, director_id, _) = signup!(app);
    let (dancer_token, dancer_id, _) = signup!(app);

    let team_id = create_team!(app, owner_token, "Company A");
    assert!(invite_user!(app, owner_token, team_id, director_id, "director")
        .status()
        .is_success());
    assert!(invite_user!(app, owner_token, team_id, dancer_id, "dancer")
        .status()
        .is_success());

    let req = authed!(post, format!("/teams/{}/projects", team_id), director_token)
        .set_json(serde_json::json!({ "name": "Act One" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = authed!(post, format!("/teams/{}/projects", team_id), dancer_token)
        .set_json(serde_json::json!({ "name": "Act Two" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only owners and directors can create projects");
}

#[actix_rt::test]
async fn only_owner_deletes_projects() {
    let app = test_app!();
    let (owner_token, _, _) = signup!(app);
    let (director_token, director_id, _) = signup!(app);

    let team_id = create_team!(app, owner_token, "Company B");
    invite_user!(app, owner_token, team_id, director_id, "director");

    let project_id = create_project!(app, owner_token, team_id, "Recital");

    let req = authed!(delete, format!("/projects/{}", project_id), director_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only owners can delete projects");

    let req = authed!(delete, format!("/projects/{}", project_id), owner_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_rt::test]
async fn only_owner_renames_or_deletes_team() {
    let app = test_app!();
    let (owner_token, _, _) = signup!(app);
    let (director_token, director_id, _) = signup!(app);

    let team_id = create_team!(app, owner_token, "Company C");
    invite_user!(app, owner_token, team_id, director_id, "director");

    let req = authed!(put, format!("/teams/{}", team_id), director_token)
        .set_json(serde_json::json!({ "name": "Renamed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only owners can update a team");

    let req = authed!(delete, format!("/teams/{}", team_id), director_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Only owners can delete a team");
}

#[actix_rt::test]
async fn non_member_is_denied() {
    let app = test_app!();
    let (owner_token, _, _) = signup!(app);
    let (stranger_token, _, _) = signup!(app);

    let team_id = create_team!(app, owner_token, "Closed Company");
    let project_id = create_project!(app, owner_token, team_id, "Private");

    let req = authed!(get, format!("/teams/{}", team_id), stranger_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = authed!(get, format!("/projects/{}", project_id), stranger_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn removed_member_loses_access_immediately() {
    let app = test_app!();
    let (owner_token, _, _) = signup!(app);
    let (dancer_token, dancer_id, _) = signup!(app);

    let team_id = create_team!(app, owner_token, "Revolving Door");
    invite_user!(app, owner_token, team_id, dancer_id, "dancer");

    let req = authed!(get, format!("/teams/{}", team_id), dancer_token).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed!(get, format!("/teams/{}/members", team_id), owner_token).to_request();
    let members: Value = test::call_and_read_body_json(&app, req).await;
    let member_id = members
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["user_id"] == dancer_id.as_str())
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let req = authed!(delete, format!("/teams/{}/members/{}", team_id, member_id), owner_token)
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed!(get, format!("/teams/{}", team_id), dancer_token).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn requests_without_token_are_rejected() {
    let app = test_app!();

    // The middleware rejects with an error, so the call itself fails
    let req = test::TestRequest::get().uri("/teams").to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.as_response_error().status_code(), 401);

    let req = test::TestRequest::get()
        .uri("/teams")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.as_response_error().status_code(), 401);
}
