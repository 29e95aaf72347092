// Third-party dependencies
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::info;
use std::env;

use marley_service::routes::{
    auth_routes, member_routes, project_note_routes, project_routes, screenshot_routes,
    storage_routes, team_routes, video_note_routes, video_routes,
};
use marley_service::utils::{fs_utils, Authentication};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:9090".to_string());

    fs_utils::ensure_storage_layout()?;

    info!("🚀 marley-service listening on {}", address);

    HttpServer::new(|| {
        App::new()
            .wrap(Cors::permissive())
            // Registration, login and token-authorized object transfer
            // sit outside the JWT middleware
            .configure(auth_routes::init_routes)
            .configure(storage_routes::init_routes)
            .service(
                web::scope("")
                    .wrap(Authentication)
                    .configure(auth_routes::init_protected_routes)
                    .configure(team_routes::init_routes)
                    .configure(member_routes::init_routes)
                    .configure(project_routes::init_routes)
                    .configure(project_note_routes::init_routes)
                    .configure(video_routes::init_routes)
                    .configure(video_note_routes::init_routes)
                    .configure(screenshot_routes::init_routes),
            )
    })
    .bind(address)?
    .run()
    .await
}
