#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};

use contactbook::auth::{AuthConfig, AuthResponse, TokenIssuer};
use contactbook::routes::{self, health};
use contactbook::store::Stores;

pub const TEST_SECRET: &str = "integration_test_secret";

/// Lowest cost bcrypt accepts, keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn auth_config() -> web::Data<AuthConfig> {
    web::Data::new(AuthConfig::new(
        TokenIssuer::new(TEST_SECRET, 3600),
        TEST_BCRYPT_COST,
    ))
}

/// The full application as `main` builds it, backed by in-memory stores.
pub async fn test_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let stores = Stores::in_memory();
    test::init_service(
        App::new()
            .app_data(auth_config())
            .app_data(web::Data::from(stores.contacts))
            .app_data(web::Data::from(stores.users))
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

/// Sends `req` and returns the status and JSON body, whether the app answered
/// with a response or with an error (middleware rejections surface as errors
/// in the test harness).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body()).await.unwrap_or_default();
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register_user<S, B>(app: &S, username: &str, email: &str) -> AuthResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": "Password123!"
        }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    serde_json::from_value(body).expect("Failed to parse registration response")
}
