pub mod models;
pub mod repositories;
pub mod services;

pub use models::{WebhookEvent, WebhookEventStatus};
pub use services::verify_signature;
