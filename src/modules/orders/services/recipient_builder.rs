use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AppError, Result};
use crate::modules::orders::models::{Recipient, RecipientData};

/// Lookup seam for recipient resolution, implemented by the order repository
#[async_trait]
pub trait RecipientLookup: Send + Sync {
    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Option<Recipient>>;
    async fn find_by_email(&self, email_address: &str) -> Result<Option<Recipient>>;
}

/// Find-or-build resolution for fulfillment recipients.
///
/// No merge or update-in-place: an existing recipient is returned untouched,
/// and a new one is returned unsaved for the caller to persist.
pub struct RecipientBuilder {
    lookup: Arc<dyn RecipientLookup>,
}

impl RecipientBuilder {
    pub fn new(lookup: Arc<dyn RecipientLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve recipient data to an existing row, or build a new unsaved
    /// recipient after validating the individual contact fields.
    pub async fn load(&self, data: RecipientData) -> Result<Recipient> {
        let existing = if let Some(customer_id) = data.customer_id {
            self.lookup.find_by_customer_id(customer_id).await?
        } else if let Some(email) = data.email_address.as_deref() {
            self.lookup.find_by_email(email).await?
        } else {
            None
        };

        if let Some(recipient) = existing {
            return Ok(recipient);
        }

        Self::validate(&data)?;

        Ok(Recipient {
            id: None,
            fulfillment_id: None,
            customer_id: data.customer_id,
            display_name: data.display_name,
            email_address: data.email_address,
            phone_number: data.phone_number,
            address: data.address,
            created_at: None,
            updated_at: None,
        })
    }

    /// Without a customer id, every individual contact field must be present
    pub fn validate(data: &RecipientData) -> Result<()> {
        if data.customer_id.is_some() {
            return Ok(());
        }

        let missing = if data.display_name.as_deref().unwrap_or("").trim().is_empty() {
            Some("display_name")
        } else if data.email_address.as_deref().unwrap_or("").trim().is_empty() {
            Some("email_address")
        } else if data.phone_number.as_deref().unwrap_or("").trim().is_empty() {
            Some("phone_number")
        } else if data.address.as_ref().is_none_or(|a| a.is_empty()) {
            Some("address")
        } else {
            None
        };

        if let Some(field) = missing {
            return Err(AppError::validation(format!(
                "Recipient is missing required field: {}",
                field
            )));
        }

        Ok(())
    }
}
