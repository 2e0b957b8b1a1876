pub mod contacts;
pub mod health;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Mounts the API under the scope it is configured in (`/api` in `main`).
///
/// `/users/register` and `/users/login` are open; `/users/current` and every
/// `/contacts` route run behind `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/users")
                .service(users::register)
                .service(users::login)
                .service(
                    web::resource("/current")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::current_user)),
                ),
        )
        .service(
            web::scope("/contacts")
                .wrap(AuthMiddleware)
                .service(contacts::get_contacts)
                .service(contacts::create_contact)
                .service(contacts::get_contact)
                .service(contacts::update_contact)
                .service(contacts::delete_contact),
        );
}

/// Malformed or incomplete JSON bodies become `{"error": ...}` 400 responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}
