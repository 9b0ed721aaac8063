use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::config::SquareConfig;
use crate::core::{AppError, Result};

use super::models::{
    CreateInvoiceRequest, InvoiceResponse, PublishInvoiceRequest, SquareInvoice, UpdateInvoiceRequest,
};

/// HTTP client for the Square Invoices API.
///
/// Authentication and transport only; no retry or backoff. A failed call
/// surfaces as an error to the caller, and any retry policy belongs to the
/// embedding application.
pub struct SquareClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl SquareClient {
    pub fn new(config: &SquareConfig) -> Self {
        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<SquareInvoice> {
        let url = format!("{}/v2/invoices", self.base_url);
        debug!(url = %url, "Creating Square invoice");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        self.parse_invoice_response(response).await
    }

    pub async fn update_invoice(
        &self,
        invoice_id: &str,
        request: &UpdateInvoiceRequest,
    ) -> Result<SquareInvoice> {
        let url = format!("{}/v2/invoices/{}", self.base_url, invoice_id);
        debug!(url = %url, "Updating Square invoice");

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        self.parse_invoice_response(response).await
    }

    pub async fn publish_invoice(
        &self,
        invoice_id: &str,
        request: &PublishInvoiceRequest,
    ) -> Result<SquareInvoice> {
        let url = format!("{}/v2/invoices/{}/publish", self.base_url, invoice_id);
        debug!(url = %url, "Publishing Square invoice");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        self.parse_invoice_response(response).await
    }

    pub async fn get_invoice(&self, invoice_id: &str) -> Result<SquareInvoice> {
        let url = format!("{}/v2/invoices/{}", self.base_url, invoice_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        self.parse_invoice_response(response).await
    }

    async fn parse_invoice_response(&self, response: reqwest::Response) -> Result<SquareInvoice> {
        let status = response.status();

        if status.is_success() {
            let body: InvoiceResponse = response.json().await?;
            return body
                .invoice
                .ok_or_else(|| AppError::api(status.as_u16(), None, "Response has no invoice"));
        }

        // Error path: pull Square's first error entry out of the body
        let body = response.text().await.unwrap_or_default();
        let parsed: InvoiceResponse = serde_json::from_str(&body).unwrap_or_default();
        let first = parsed.errors.first();

        let code = first.and_then(|e| e.code.clone());
        let detail = first
            .and_then(|e| e.detail.clone())
            .unwrap_or_else(|| body.clone());

        error!(status = %status, code = ?code, "Square API request failed");

        // Square reports a stale invoice version as a conflict; translate it
        // into the local invalid-version error kind
        if status == StatusCode::CONFLICT
            || code.as_deref() == Some("VERSION_MISMATCH")
            || code.as_deref() == Some("CONFLICT")
        {
            return Err(AppError::invalid_version(format!(
                "Version mismatch: {}",
                detail
            )));
        }

        Err(AppError::api(status.as_u16(), code, detail))
    }
}
