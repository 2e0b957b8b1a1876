#![doc = "The `contactbook` library crate."]
#![doc = ""]
#![doc = "Domain models, stores, authentication, routing and error handling for the"]
#![doc = "contactbook service. The binary (`main.rs`) wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
