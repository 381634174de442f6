use chrono::{DateTime, Utc};

use crate::document::{Document, DocumentId, FieldValue, Fields};
use crate::error::{BazaarError, BazaarResult};
use crate::traits::UserId;

/// Field names of a listing document in the store.
pub mod fields {
    pub const NAME: &str = "name";
    pub const SERVICE_TYPE: &str = "serviceType";
    pub const DESCRIPTION: &str = "description";
    pub const LOCATION: &str = "location";
    pub const CONTACT: &str = "contact";
    pub const OWNER_ID: &str = "ownerId";
    pub const CREATED_AT: &str = "createdAt";
}

/// A service offering published on the board.
///
/// Records are immutable once created; the board never edits or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Store-assigned id, unique across the mirror
    pub id: DocumentId,

    /// Provider or business name
    pub name: String,

    /// Free-form category label
    pub service_type: String,

    pub description: String,

    /// Free-form area or neighbourhood label
    pub location: String,

    /// Free-form contact information
    pub contact: String,

    /// Identity of the creator
    pub owner_id: String,

    /// Unix timestamp assigned by the store; `None` while still pending
    pub created_at: Option<u64>,
}

impl Listing {
    /// Decode a stored document, keeping its store-assigned id.
    ///
    /// Missing text fields decode as empty strings; a field holding a value
    /// of the wrong type is rejected.
    pub fn from_document(doc: &Document) -> BazaarResult<Self> {
        let text = |field: &str| -> BazaarResult<String> {
            match doc.get(field) {
                None | Some(FieldValue::Null) => Ok(String::new()),
                Some(FieldValue::String(s)) => Ok(s.clone()),
                Some(other) => Err(BazaarError::Serialization(format!(
                    "document {}: field '{field}' is not text ({other:?})",
                    doc.id
                ))),
            }
        };

        let created_at = match doc.get(fields::CREATED_AT) {
            Some(FieldValue::Timestamp(t)) => Some(*t),
            Some(FieldValue::Integer(t)) => u64::try_from(*t).ok(),
            _ => None,
        };

        Ok(Self {
            id: doc.id.clone(),
            name: text(fields::NAME)?,
            service_type: text(fields::SERVICE_TYPE)?,
            description: text(fields::DESCRIPTION)?,
            location: text(fields::LOCATION)?,
            contact: text(fields::CONTACT)?,
            owner_id: text(fields::OWNER_ID)?,
            created_at,
        })
    }

    /// Creation date as `YYYY-MM-DD`, once the store has assigned it.
    pub fn listed_on(&self) -> Option<String> {
        let secs = i64::try_from(self.created_at?).ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// The five user-entered fields of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    ServiceType,
    Description,
    Location,
    Contact,
}

impl FormField {
    /// All fields, in form order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::ServiceType,
        Self::Description,
        Self::Location,
        Self::Contact,
    ];

    /// Store field name.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => fields::NAME,
            Self::ServiceType => fields::SERVICE_TYPE,
            Self::Description => fields::DESCRIPTION,
            Self::Location => fields::LOCATION,
            Self::Contact => fields::CONTACT,
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::ServiceType => "Service type",
            Self::Description => "Description",
            Self::Location => "Location",
            Self::Contact => "Contact",
        }
    }
}

/// Input buffers of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingForm {
    pub name: String,
    pub service_type: String,
    pub description: String,
    pub location: String,
    pub contact: String,
}

impl ListingForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::ServiceType => &self.service_type,
            FormField::Description => &self.description,
            FormField::Location => &self.location,
            FormField::Contact => &self.contact,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::ServiceType => &mut self.service_type,
            FormField::Description => &mut self.description,
            FormField::Location => &mut self.location,
            FormField::Contact => &mut self.contact,
        };
        *slot = value.into();
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Reset every buffer to empty.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fields that are empty or hold only whitespace.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// Check that every field is filled in.
    pub fn validate(&self) -> BazaarResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        let labels = missing
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");
        Err(BazaarError::Validation(format!(
            "please fill in all fields (missing: {labels})"
        )))
    }

    /// Document fields for a new listing owned by `owner`.
    ///
    /// Values are stored exactly as entered; the creation time is left for
    /// the store to assign.
    pub fn to_fields(&self, owner: &UserId) -> Fields {
        let mut out: Fields = FormField::ALL
            .into_iter()
            .map(|f| (f.key().to_string(), FieldValue::from(self.get(f))))
            .collect();
        out.insert(
            fields::OWNER_ID.to_string(),
            FieldValue::from(owner.as_str()),
        );
        out.insert(fields::CREATED_AT.to_string(), FieldValue::ServerTimestamp);
        out
    }
}
