use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ContactStore, UserStore};
use crate::error::AppError;
use crate::models::{Contact, ContactChanges, ContactDraft, NewUser, User};

const CONTACT_COLUMNS: &str = "id, user_id, name, email, phone, created_at, updated_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// Runs the embedded migrations under `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<Contact>, AppError> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE user_id = $1 ORDER BY created_at DESC, id ASC",
            CONTACT_COLUMNS
        );
        let contacts = sqlx::query_as::<_, Contact>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(contacts)
    }

    async fn insert(&self, draft: ContactDraft) -> Result<Contact, AppError> {
        let contact = Contact::new(draft);
        let sql = format!(
            "INSERT INTO contacts ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = CONTACT_COLUMNS
        );
        let saved = sqlx::query_as::<_, Contact>(&sql)
            .bind(contact.id)
            .bind(contact.user_id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.created_at)
            .bind(contact.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn find(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE id = $1 AND user_id = $2",
            CONTACT_COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, AppError> {
        // updated_at must move forward even when NOW() (transaction start) has not.
        let sql = format!(
            "UPDATE contacts
             SET name = COALESCE($1, name),
                 email = COALESCE($2, email),
                 phone = COALESCE($3, phone),
                 updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $4 AND user_id = $5
             RETURNING {}",
            CONTACT_COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.phone)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            "DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING {}",
            CONTACT_COLUMNS
        );
        let contact = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User::new(new_user);
        let sql = format!(
            "INSERT INTO users ({cols}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {cols}",
            cols = USER_COLUMNS
        );
        // A concurrent registration with the same email surfaces as a unique
        // violation, which AppError maps to BadRequest.
        let saved = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
