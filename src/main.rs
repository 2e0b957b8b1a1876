use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::io;

use contactbook::auth::{AuthConfig, TokenIssuer};
use contactbook::config::Config;
use contactbook::routes::{self, health};
use contactbook::store::Stores;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let stores = Stores::connect(&config).await.map_err(|e| {
        log::error!("failed to open storage: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    let auth = web::Data::new(AuthConfig::new(
        TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_seconds),
        config.bcrypt_cost,
    ));
    let contacts = web::Data::from(stores.contacts);
    let users = web::Data::from(stores.users);

    log::info!("Starting contactbook server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(auth.clone())
            .app_data(contacts.clone())
            .app_data(users.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
