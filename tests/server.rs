mod common;

use actix_web::{web, App, HttpServer};
use serde_json::json;
use std::net::TcpListener;

use contactbook::routes::{self, health};
use contactbook::store::Stores;

/// Runs the app on a real socket so the rejection is observed exactly as a
/// client sees it.
#[test_log::test(actix_rt::test)]
async fn test_current_without_token_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let stores = Stores::in_memory();
    let contacts = web::Data::from(stores.contacts);
    let users = web::Data::from(stores.users);
    let auth = common::auth_config();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(auth.clone())
            .app_data(contacts.clone())
            .app_data(users.clone())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    let server_task = actix_rt::spawn(server);

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .get(format!("{}/api/users/current", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("error body is JSON");
    assert_eq!(body["error"], "Missing token");

    // The open routes dispatch without a token
    let resp = client
        .post(format!("{}/api/users/register", base))
        .json(&json!({
            "username": "http_user",
            "email": "http@example.com",
            "password": "Password123!"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    handle.stop(false).await;
    let _ = server_task.await;
}
