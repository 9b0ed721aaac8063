// Recipient resolution: find an existing recipient by customer id or
// email, or validate and build a new unsaved one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use squarebridge::core::Result;
use squarebridge::orders::models::{Address, Recipient, RecipientData};
use squarebridge::orders::services::{RecipientBuilder, RecipientLookup};

/// In-memory lookup standing in for the recipients table
#[derive(Default)]
struct InMemoryLookup {
    by_customer: HashMap<i64, Recipient>,
    by_email: HashMap<String, Recipient>,
}

#[async_trait]
impl RecipientLookup for InMemoryLookup {
    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Option<Recipient>> {
        Ok(self.by_customer.get(&customer_id).cloned())
    }

    async fn find_by_email(&self, email_address: &str) -> Result<Option<Recipient>> {
        Ok(self.by_email.get(email_address).cloned())
    }
}

fn saved_recipient(id: i64, email: &str) -> Recipient {
    Recipient {
        id: Some(id),
        fulfillment_id: None,
        customer_id: Some(42),
        display_name: Some("Ada Lovelace".to_string()),
        email_address: Some(email.to_string()),
        phone_number: Some("+1-555-0100".to_string()),
        address: None,
        created_at: None,
        updated_at: None,
    }
}

fn complete_data() -> RecipientData {
    RecipientData {
        customer_id: None,
        display_name: Some("Ada Lovelace".to_string()),
        email_address: Some("ada@example.com".to_string()),
        phone_number: Some("+1-555-0100".to_string()),
        address: Some(Address {
            address_line_1: Some("10 Analytical Way".to_string()),
            locality: Some("London".to_string()),
            postal_code: Some("EC1A 1AA".to_string()),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn test_load_finds_existing_by_customer_id() {
    let mut lookup = InMemoryLookup::default();
    lookup.by_customer.insert(42, saved_recipient(7, "ada@example.com"));

    let builder = RecipientBuilder::new(Arc::new(lookup));
    let data = RecipientData {
        customer_id: Some(42),
        ..Default::default()
    };

    let recipient = builder.load(data).await.unwrap();
    assert_eq!(recipient.id, Some(7));
    assert!(recipient.is_saved());
}

#[tokio::test]
async fn test_load_falls_back_to_email_lookup() {
    let mut lookup = InMemoryLookup::default();
    lookup
        .by_email
        .insert("ada@example.com".to_string(), saved_recipient(9, "ada@example.com"));

    let builder = RecipientBuilder::new(Arc::new(lookup));
    let data = RecipientData {
        email_address: Some("ada@example.com".to_string()),
        ..Default::default()
    };

    let recipient = builder.load(data).await.unwrap();
    assert_eq!(recipient.id, Some(9));
}

/// With no match and no customer id, all individual contact fields must be
/// present; the error names the first missing one
#[tokio::test]
async fn test_load_validates_missing_contact_fields() {
    let builder = RecipientBuilder::new(Arc::new(InMemoryLookup::default()));

    let mut data = complete_data();
    data.display_name = None;
    let err = builder.load(data).await.unwrap_err();
    assert!(err.to_string().contains("display_name"));

    let mut data = complete_data();
    data.email_address = None;
    let err = builder.load(data).await.unwrap_err();
    assert!(err.to_string().contains("email_address"));

    let mut data = complete_data();
    data.phone_number = None;
    let err = builder.load(data).await.unwrap_err();
    assert!(err.to_string().contains("phone_number"));

    let mut data = complete_data();
    data.address = None;
    let err = builder.load(data).await.unwrap_err();
    assert!(err.to_string().contains("address"));
}

/// An empty address counts as missing
#[tokio::test]
async fn test_empty_address_counts_as_missing() {
    let builder = RecipientBuilder::new(Arc::new(InMemoryLookup::default()));

    let mut data = complete_data();
    data.address = Some(Address::default());

    let err = builder.load(data).await.unwrap_err();
    assert!(err.to_string().contains("address"));
}

/// With every field present, load builds a new recipient and leaves saving
/// to the caller
#[tokio::test]
async fn test_load_builds_new_unsaved_recipient() {
    let builder = RecipientBuilder::new(Arc::new(InMemoryLookup::default()));

    let recipient = builder.load(complete_data()).await.unwrap();

    assert!(!recipient.is_saved());
    assert_eq!(recipient.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(recipient.email_address.as_deref(), Some("ada@example.com"));
    assert_eq!(recipient.phone_number.as_deref(), Some("+1-555-0100"));
    assert!(recipient.address.is_some());
}

/// A customer id alone is enough to build a new recipient; the contact
/// field validation only applies without one
#[tokio::test]
async fn test_customer_id_bypasses_contact_validation() {
    let builder = RecipientBuilder::new(Arc::new(InMemoryLookup::default()));

    let data = RecipientData {
        customer_id: Some(99),
        ..Default::default()
    };

    let recipient = builder.load(data).await.unwrap();
    assert!(!recipient.is_saved());
    assert_eq!(recipient.customer_id, Some(99));
}
