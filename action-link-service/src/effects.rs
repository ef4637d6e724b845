use action_link_api::{target_id, ActionType, ApiError};
use action_link_db::kv::KeyValueStore;
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::invoice::InvoiceModel;
use action_link_db::models::quote::QuoteModel;
use action_link_db::repository::{InvoiceRepository, QuoteRepository, TargetUpdate};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::ReadThroughCache;
use crate::service::downstream;

/// Resolves the tenant-side change each action type makes to its target record.
///
/// Lookups go through the read-through cache. The change itself is written by
/// `ConsumeUse` together with the spent use and only applies to a `sent` record,
/// so a stale cached copy can at worst let a doomed request reach that write.
pub struct ActionEffects {
    quotes: Arc<dyn QuoteRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    quote_cache: ReadThroughCache<QuoteModel>,
    invoice_cache: ReadThroughCache<InvoiceModel>,
}

impl ActionEffects {
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        kv: Arc<dyn KeyValueStore>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            quotes,
            invoices,
            quote_cache: ReadThroughCache::new(kv.clone(), "quote", cache_ttl),
            invoice_cache: ReadThroughCache::new(kv, "invoice", cache_ttl),
        }
    }

    /// Checks that the link's action can be applied to its target on behalf of `email`.
    ///
    /// A cached copy that shows the target as unavailable is reloaded before the
    /// request is refused.
    pub async fn prepare(
        &self,
        link: &ActionLinkModel,
        email: &str,
    ) -> Result<TargetUpdate, ApiError> {
        match link.action_type {
            ActionType::Other => Ok(TargetUpdate::None),
            ActionType::Quote => {
                let quote_id = require_target(link)?;
                let mut quote = self.load_quote(link.tenant_id, quote_id).await?;
                if !quote.as_ref().is_some_and(QuoteModel::is_acceptable) {
                    self.quote_cache.invalidate(quote_id).await;
                    quote = self.load_quote(link.tenant_id, quote_id).await?;
                }

                let quote = quote
                    .ok_or_else(|| ApiError::TargetUnavailable("quote not found".to_string()))?;
                if !quote.is_acceptable() {
                    return Err(quote_unavailable());
                }
                Ok(TargetUpdate::AcceptQuote {
                    quote_id,
                    accepted_by_email: email.to_string(),
                })
            }
            ActionType::Invoice => {
                let invoice_id = require_target(link)?;
                let mut invoice = self.load_invoice(link.tenant_id, invoice_id).await?;
                if !invoice.as_ref().is_some_and(InvoiceModel::is_confirmable) {
                    self.invoice_cache.invalidate(invoice_id).await;
                    invoice = self.load_invoice(link.tenant_id, invoice_id).await?;
                }

                let invoice = invoice
                    .ok_or_else(|| ApiError::TargetUnavailable("invoice not found".to_string()))?;
                if !invoice.is_confirmable() {
                    return Err(invoice_unavailable());
                }
                Ok(TargetUpdate::ConfirmInvoice {
                    invoice_id,
                    confirmed_by_email: email.to_string(),
                })
            }
        }
    }

    /// Drops the cached copy of a target after a write was attempted on it.
    pub async fn invalidate(&self, target: &TargetUpdate) {
        match target {
            TargetUpdate::None => {}
            TargetUpdate::AcceptQuote { quote_id, .. } => {
                self.quote_cache.invalidate(*quote_id).await
            }
            TargetUpdate::ConfirmInvoice { invoice_id, .. } => {
                self.invoice_cache.invalidate(*invoice_id).await
            }
        }
    }

    async fn load_quote(
        &self,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<QuoteModel>, ApiError> {
        let quotes = self.quotes.clone();
        let quote = self
            .quote_cache
            .get_or_load(quote_id, || async move { quotes.load_quote(tenant_id, quote_id).await })
            .await
            .map_err(downstream("load quote"))?;
        Ok(quote.filter(|quote| quote.tenant_id == tenant_id))
    }

    async fn load_invoice(
        &self,
        tenant_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<InvoiceModel>, ApiError> {
        let invoices = self.invoices.clone();
        let invoice = self
            .invoice_cache
            .get_or_load(invoice_id, || async move {
                invoices.load_invoice(tenant_id, invoice_id).await
            })
            .await
            .map_err(downstream("load invoice"))?;
        Ok(invoice.filter(|invoice| invoice.tenant_id == tenant_id))
    }
}

/// The error for a target that refused its change.
pub fn target_unavailable(target: &TargetUpdate) -> ApiError {
    match target {
        TargetUpdate::ConfirmInvoice { .. } => invoice_unavailable(),
        _ => quote_unavailable(),
    }
}

fn quote_unavailable() -> ApiError {
    ApiError::TargetUnavailable("quote is not awaiting acceptance".to_string())
}

fn invoice_unavailable() -> ApiError {
    ApiError::TargetUnavailable("invoice is not awaiting confirmation".to_string())
}

fn require_target(link: &ActionLinkModel) -> Result<Uuid, ApiError> {
    target_id(&link.metadata)
        .ok_or_else(|| ApiError::TargetUnavailable("link has no target record".to_string()))
}
