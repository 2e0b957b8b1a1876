//! Persistence handles for contacts and users.
//!
//! The handles are built once in `main` and handed to the handlers through
//! `web::Data<dyn ContactStore>` / `web::Data<dyn UserStore>`. Two backends
//! exist: PostgreSQL via `sqlx` and an in-memory one used by the tests and by
//! `STORAGE_BACKEND=memory`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{Contact, ContactChanges, ContactDraft, NewUser, User};

pub use memory::{MemoryContactStore, MemoryUserStore};
pub use postgres::{PgContactStore, PgUserStore};

/// Contact operations. Every lookup is scoped to the owning user; a contact
/// owned by someone else behaves exactly like a missing one.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Contacts of `owner`, newest first.
    async fn list(&self, owner: Uuid) -> Result<Vec<Contact>, AppError>;

    async fn insert(&self, draft: ContactDraft) -> Result<Contact, AppError>;

    async fn find(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError>;

    /// Applies `changes` and advances `updated_at`. `None` if not found.
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, AppError>;

    /// Removes the contact and returns it. `None` if not found.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `AppError::BadRequest` when the email is already taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

/// The store handles shared by every worker.
#[derive(Clone)]
pub struct Stores {
    pub contacts: Arc<dyn ContactStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            contacts: Arc::new(MemoryContactStore::new()),
            users: Arc::new(MemoryUserStore::new()),
        }
    }

    /// Opens the configured backend. For PostgreSQL this connects the pool and
    /// runs the migrations.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage {
            StorageBackend::Memory => {
                log::warn!("using in-memory storage, data is lost on shutdown");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    AppError::InternalServerError("DATABASE_URL must be set".into())
                })?;
                let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
                postgres::migrate(&pool).await?;
                log::info!("connected to PostgreSQL and applied migrations");
                Ok(Self {
                    contacts: Arc::new(PgContactStore::new(pool.clone())),
                    users: Arc::new(PgUserStore::new(pool)),
                })
            }
        }
    }
}
