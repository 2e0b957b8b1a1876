use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::FieldError;

pub const MISSING_NAME: &str = "please add contact name";
pub const MISSING_EMAIL: &str = "please add contact email";
pub const MISSING_PHONE: &str = "please add contact phone";

/// Field order used when reporting errors, matching the JSON shape.
const FIELD_ORDER: [&str; 3] = ["name", "email", "phone"];

/// A contact as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The user owning this contact.
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Candidate contact as received from a client.
///
/// Every field is optional at the type level so that a missing field produces
/// the field-specific message instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(
        required(message = "please add contact name"),
        length(min = 1, message = "please add contact name")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "please add contact email"),
        length(min = 1, message = "please add contact email")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "please add contact phone"),
        length(min = 1, message = "please add contact phone")
    )]
    pub phone: Option<String>,
}

/// A validated contact that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInput {
    /// Checks the required fields and binds the record to its owner.
    ///
    /// Returns every failing field at once, in `name`, `email`, `phone` order.
    pub fn into_draft(self, owner: Uuid) -> Result<ContactDraft, Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))?;

        // validate() has rejected every None by now
        Ok(ContactDraft {
            user_id: owner,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
        })
    }
}

/// Partial update of a contact. Absent fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct ContactChanges {
    #[validate(length(min = 1, message = "please add contact name"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "please add contact email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "please add contact phone"))]
    pub phone: Option<String>,
}

impl ContactChanges {
    /// Rejects fields that are present but empty.
    pub fn checked(self) -> Result<Self, Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))?;
        Ok(self)
    }

    /// Applies the changes to `contact` and moves `updated_at` forward.
    ///
    /// `updated_at` always ends up strictly later than before, even when the
    /// clock has not advanced past the previous value.
    pub fn apply(self, contact: &mut Contact, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        let floor = contact.updated_at + chrono::Duration::microseconds(1);
        contact.updated_at = now.max(floor);
    }
}

impl Contact {
    pub fn new(draft: ContactDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            created_at: now,
            updated_at: now,
        }
    }
}

fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    FIELD_ORDER
        .iter()
        .filter_map(|field| {
            let first = by_field.get(field)?.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid {}", field));
            Some(FieldError::new(*field, message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> ContactInput {
        ContactInput {
            name: name.map(String::from),
            email: email.map(String::from),
            phone: phone.map(String::from),
        }
    }

    #[test_log::test]
    fn test_complete_input_becomes_draft() {
        let owner = Uuid::new_v4();
        let draft = input(Some("A"), Some("a@x.com"), Some("123"))
            .into_draft(owner)
            .unwrap();

        assert_eq!(
            draft,
            ContactDraft {
                user_id: owner,
                name: "A".into(),
                email: "a@x.com".into(),
                phone: "123".into(),
            }
        );
    }

    #[test_log::test]
    fn test_each_missing_field_reports_its_message() {
        let owner = Uuid::new_v4();
        let cases = [
            (input(None, Some("a@x.com"), Some("123")), "name", MISSING_NAME),
            (input(Some("A"), None, Some("123")), "email", MISSING_EMAIL),
            (input(Some("A"), Some("a@x.com"), None), "phone", MISSING_PHONE),
            (input(Some(""), Some("a@x.com"), Some("123")), "name", MISSING_NAME),
            (input(Some("A"), Some("a@x.com"), Some("")), "phone", MISSING_PHONE),
        ];

        for (candidate, field, message) in cases {
            let errors = candidate.into_draft(owner).unwrap_err();
            assert_eq!(errors, vec![FieldError::new(field, message)]);
        }
    }

    #[test]
    fn test_all_missing_fields_reported_in_order() {
        let errors = ContactInput::default()
            .into_draft(Uuid::new_v4())
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "phone"]);
        assert_eq!(errors[1].message, MISSING_EMAIL);
    }

    #[test]
    fn test_email_format_is_not_checked() {
        assert!(input(Some("A"), Some("not an email"), Some("x"))
            .into_draft(Uuid::new_v4())
            .is_ok());
    }

    #[test]
    fn test_new_contact_has_equal_timestamps() {
        let contact = Contact::new(ContactDraft {
            user_id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
        });
        assert_eq!(contact.created_at, contact.updated_at);
    }

    #[test]
    fn test_changes_reject_empty_values() {
        let changes = ContactChanges {
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            changes.checked().unwrap_err(),
            vec![FieldError::new("email", MISSING_EMAIL)]
        );
    }

    #[test]
    fn test_apply_advances_updated_at_only() {
        let mut contact = Contact::new(ContactDraft {
            user_id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
        });
        let created = contact.created_at;
        let stale_clock = contact.updated_at;

        ContactChanges {
            phone: Some("456".into()),
            ..Default::default()
        }
        .apply(&mut contact, stale_clock);

        assert_eq!(contact.phone, "456");
        assert_eq!(contact.name, "A");
        assert_eq!(contact.created_at, created);
        assert!(contact.updated_at > created);
    }

    #[test]
    fn test_serialized_shape_uses_document_field_names() {
        let contact = Contact::new(ContactDraft {
            user_id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
        });
        let json = serde_json::to_value(&contact).unwrap();
        for key in ["_id", "user_id", "name", "email", "phone", "createdAt", "updatedAt"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
