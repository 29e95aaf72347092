// marley-service/src/routes/auth_routes.rs
use crate::models::{Claims, LoginResponse, ServiceError, User, UserCredentials};
use crate::utils::{jwt, password, team_storage, user_storage};
use actix_web::{get, post, web, HttpMessage, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{debug, error, info};
use serde_json::json;
use uuid::Uuid;

// Register a new user
#[post("/auth/register")]
async fn register(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("📝 Register request for email: {}", credentials.email);

    if credentials.email.trim().is_empty() || !credentials.email.contains('@') {
        return Err(ServiceError::BadRequest("Invalid email address".to_string()));
    }
    if credentials.password.len() < 8 {
        return Err(ServiceError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Check if the email already exists
    if user_storage::find_user_by_email(&credentials.email)?.is_some() {
        error!("❌ Email already registered: {}", credentials.email);
        return Err(ServiceError::BadRequest("Email already registered".to_string()));
    }

    // Create a new user
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: credentials.email.clone(),
        password_hash: password::hash_password(&credentials.password)?,
        created_at: Utc::now(),
    };

    user_storage::save_user(&user)?;

    // Any pending email invites for this address become active memberships
    let claimed = team_storage::claim_pending_invites(&user.email, &user.id)?;

    info!("✅ User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User registered successfully",
        "user_id": user.id,
        "claimed_invites": claimed
    })))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(credentials: web::Json<UserCredentials>) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login request for email: {}", credentials.email);

    // Find the user by email
    let user = match user_storage::find_user_by_email(&credentials.email)? {
        Some(user) => user,
        None => {
            error!("❌ User not found: {}", credentials.email);
            return Err(ServiceError::Unauthorized);
        }
    };

    // Verify password
    if !password::verify_password(&credentials.password, &user.password_hash)? {
        error!("❌ Invalid password for user: {}", credentials.email);
        return Err(ServiceError::Unauthorized);
    }

    // Generate JWT token
    let token = jwt::generate_token(&user)?;

    info!("✅ User logged in successfully: {}", user.id);

    let response = LoginResponse {
        token: token.clone(),
        user_id: user.id,
        email: user.email,
    };

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(response))
}

// Get current user info (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    debug!("👤 Get user info request");

    let claims = match req.extensions().get::<Claims>() {
        Some(claims) => claims.clone(),
        None => {
            error!("❌ Unauthorized access to /auth/me");
            return Err(ServiceError::Unauthorized);
        }
    };

    if let Some(user) = user_storage::find_user_by_id(&claims.sub)? {
        info!("✅ Found user: {}", user.id);
        return Ok(HttpResponse::Ok().json(json!({
            "user_id": user.id,
            "email": user.email,
            "created_at": user.created_at
        })));
    }

    Err(ServiceError::Unauthorized)
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

// /auth/me sits behind the authentication middleware
pub fn init_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me);
}
