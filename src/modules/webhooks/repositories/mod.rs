pub mod webhook_repository;

pub use webhook_repository::WebhookRepository;
