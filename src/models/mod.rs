pub mod contact;
pub mod user;

pub use contact::{Contact, ContactChanges, ContactDraft, ContactInput};
pub use user::{NewUser, User};
