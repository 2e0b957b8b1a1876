use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ContactChanges, ContactInput},
    store::{ContactStore, UserStore},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

fn not_found() -> AppError {
    AppError::NotFound("Contact not found".into())
}

/// Lists the authenticated user's contacts, newest first.
#[get("")]
pub async fn get_contacts(
    contacts: web::Data<dyn ContactStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let list = contacts.list(claims.sub).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Creates a contact owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the stored contact.
/// - `401 Unauthorized`: the token's user no longer exists.
/// - `422 Unprocessable Entity`: one entry per missing or empty field, e.g.
///   `{"field": "name", "message": "please add contact name"}`.
#[post("")]
pub async fn create_contact(
    contacts: web::Data<dyn ContactStore>,
    users: web::Data<dyn UserStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
    input: web::Json<ContactInput>,
) -> Result<impl Responder, AppError> {
    let draft = input.into_inner().into_draft(claims.sub)?;
    // A signed token can outlive its user; the owner must still exist.
    if users.find_by_id(claims.sub).await?.is_none() {
        return Err(AppError::Unauthorized("User no longer exists".into()));
    }
    let contact = contacts.insert(draft).await?;
    log::debug!("user {} created contact {}", claims.sub, contact.id);
    Ok(HttpResponse::Created().json(contact))
}

/// Fetches one contact. Contacts of other users answer 404.
#[get("/{id}")]
pub async fn get_contact(
    contacts: web::Data<dyn ContactStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
    contact_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let contact = contacts
        .find(contact_id.into_inner(), claims.sub)
        .await?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(contact))
}

/// Updates the supplied fields of a contact and advances `updatedAt`.
#[put("/{id}")]
pub async fn update_contact(
    contacts: web::Data<dyn ContactStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
    contact_id: web::Path<Uuid>,
    changes: web::Json<ContactChanges>,
) -> Result<impl Responder, AppError> {
    let changes = changes.into_inner().checked()?;
    let contact = contacts
        .update(contact_id.into_inner(), claims.sub, changes)
        .await?
        .ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(contact))
}

/// Deletes a contact and returns what was removed.
#[delete("/{id}")]
pub async fn delete_contact(
    contacts: web::Data<dyn ContactStore>,
    AuthenticatedUser(claims): AuthenticatedUser,
    contact_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let contact = contacts
        .delete(contact_id.into_inner(), claims.sub)
        .await?
        .ok_or_else(not_found)?;
    log::debug!("user {} deleted contact {}", claims.sub, contact.id);
    Ok(HttpResponse::Ok().json(contact))
}
