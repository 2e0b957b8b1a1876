use crate::{
    auth::{
        hash_password, verify_password, AuthConfig, AuthResponse, AuthenticatedUser, LoginRequest,
        RegisterRequest,
    },
    error::AppError,
    models::NewUser,
    store::UserStore,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
///
/// ## Responses:
/// - `201 Created`: `AuthResponse` with the token and the new user's id.
/// - `400 Bad Request`: malformed body or email already registered.
/// - `422 Unprocessable Entity`: username, email or password rejected by validation.
#[post("/register")]
pub async fn register(
    users: web::Data<dyn UserStore>,
    auth: web::Data<AuthConfig>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if users.find_by_email(&register_data.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password, auth.bcrypt_cost)?;
    let register_data = register_data.into_inner();
    let user = users
        .insert(NewUser {
            username: register_data.username,
            email: register_data.email,
            password_hash,
        })
        .await?;
    log::info!("registered user {}", user.id);

    let token = auth.tokens.issue(&user)?;
    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token. Unknown email and
/// wrong password both answer `401 Invalid credentials`.
#[post("/login")]
pub async fn login(
    users: web::Data<dyn UserStore>,
    auth: web::Data<AuthConfig>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = users.find_by_email(&login_data.email).await?;
    match user {
        Some(user) if verify_password(&login_data.password, &user.password_hash)? => {
            let token = auth.tokens.issue(&user)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                token,
                user_id: user.id,
            }))
        }
        _ => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}

/// Current user
///
/// Returns the profile of the user the bearer token belongs to. Mounted behind
/// `AuthMiddleware`, so it only runs for a valid token.
pub async fn current_user(
    users: web::Data<dyn UserStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;
    Ok(HttpResponse::Ok().json(user))
}
