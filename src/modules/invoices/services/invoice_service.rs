use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::invoices::models::{Invoice, InvoiceAggregate};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::square::models::SquareInvoice;
use crate::modules::square::SquareClient;

use super::invoice_builder::InvoiceBuilder;

/// Orchestrates invoice calls against Square and keeps local state in sync.
///
/// Every method is a single outbound call with no retry; failures propagate
/// to the caller.
pub struct InvoiceService {
    client: Arc<SquareClient>,
    repository: Arc<InvoiceRepository>,
}

impl InvoiceService {
    pub fn new(client: Arc<SquareClient>, repository: Arc<InvoiceRepository>) -> Self {
        Self { client, repository }
    }

    /// Create or update the invoice at Square, then sync the response onto
    /// the local record.
    ///
    /// Routes by `payment_service_id`: absent means the invoice has never
    /// been pushed and takes the create path; present requires a local
    /// version and takes the update path.
    pub async fn save_invoice(&self, aggregate: &mut InvoiceAggregate) -> Result<Invoice> {
        aggregate.invoice.ensure_mutable()?;

        let square_invoice = match aggregate.invoice.payment_service_id.clone() {
            None => {
                let request = InvoiceBuilder::build_create_invoice_request(aggregate)?;
                info!(order_id = aggregate.invoice.order_id, "Creating invoice at Square");
                self.client.create_invoice(&request).await?
            }
            Some(square_id) => {
                let version = aggregate.invoice.payment_service_version.ok_or_else(|| {
                    AppError::invalid_version("Cannot update invoice: version is missing")
                })?;

                let request = InvoiceBuilder::build_update_invoice_request(aggregate, version)?;
                info!(invoice_id = %square_id, version, "Updating invoice at Square");
                self.client.update_invoice(&square_id, &request).await?
            }
        };

        self.sync_and_store(&mut aggregate.invoice, &square_invoice)
            .await?;

        Ok(aggregate.invoice.clone())
    }

    /// Publish a draft invoice, advancing local status and version from the
    /// response.
    pub async fn publish_invoice(&self, invoice: &mut Invoice) -> Result<Invoice> {
        invoice.ensure_publishable()?;

        let square_id = invoice.payment_service_id.clone().ok_or_else(|| {
            AppError::missing_property("Cannot publish invoice without a Square invoice ID")
        })?;

        let version = invoice.payment_service_version.ok_or_else(|| {
            AppError::invalid_version("Cannot publish invoice: version is missing")
        })?;

        let request = InvoiceBuilder::build_publish_invoice_request(version);
        info!(invoice_id = %square_id, version, "Publishing invoice at Square");
        let square_invoice = self.client.publish_invoice(&square_id, &request).await?;

        self.sync_and_store(invoice, &square_invoice).await?;

        Ok(invoice.clone())
    }

    /// Retrieve an invoice from Square by its Square id
    pub async fn get_invoice(&self, square_invoice_id: &str) -> Result<SquareInvoice> {
        self.client.get_invoice(square_invoice_id).await
    }

    async fn sync_and_store(&self, invoice: &mut Invoice, square: &SquareInvoice) -> Result<()> {
        InvoiceBuilder::sync_from_square_response(invoice, square)?;

        if let Some(id) = invoice.id {
            self.repository.update(invoice).await?;

            if let Some(attachments) = &square.attachments {
                self.repository.replace_attachments(id, attachments).await?;
            }
        }

        Ok(())
    }
}
