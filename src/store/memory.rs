use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, UserStore};
use crate::error::AppError;
use crate::models::{Contact, ContactChanges, ContactDraft, NewUser, User};

/// Contacts kept in a process-local map.
#[derive(Default)]
pub struct MemoryContactStore {
    contacts: RwLock<HashMap<Uuid, Contact>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<Contact>, AppError> {
        let contacts = self.contacts.read().await;
        let mut owned: Vec<Contact> = contacts
            .values()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(owned)
    }

    async fn insert(&self, draft: ContactDraft) -> Result<Contact, AppError> {
        let contact = Contact::new(draft);
        self.contacts
            .write()
            .await
            .insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn find(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(&id).filter(|c| c.user_id == owner).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ContactChanges,
    ) -> Result<Option<Contact>, AppError> {
        let mut contacts = self.contacts.write().await;
        match contacts.get_mut(&id).filter(|c| c.user_id == owner) {
            Some(contact) => {
                changes.apply(contact, Utc::now());
                Ok(Some(contact.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<Option<Contact>, AppError> {
        let mut contacts = self.contacts.write().await;
        let owned = contacts.get(&id).map_or(false, |c| c.user_id == owner);
        if !owned {
            return Ok(None);
        }
        Ok(contacts.remove(&id))
    }
}

/// Users kept in a process-local map, unique by email.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::BadRequest("Email already registered".into()));
        }
        let user = User::new(new_user);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}
