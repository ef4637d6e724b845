use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::action_link::ActionLinkModel;
use crate::models::audit::AuditLogModel;

/// Change to the link's target record, written together with the spent use.
///
/// The target is scoped to the link's tenant and only changes while it is `sent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetUpdate {
    None,
    AcceptQuote {
        quote_id: Uuid,
        accepted_by_email: String,
    },
    ConfirmInvoice {
        invoice_id: Uuid,
        confirmed_by_email: String,
    },
}

/// Result of spending one use of an action link
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeOutcome {
    /// The use was spent and the target updated; carries the link after the change
    Consumed(ActionLinkModel),
    /// The link is no longer usable; carries it as currently stored
    Rejected(ActionLinkModel),
    /// The link was usable but the target is missing or no longer `sent`; nothing was written
    TargetUnavailable,
    /// No link with that ID exists
    NotFound,
}

/// Atomically spends one use of an action link
///
/// The increment only happens if, at write time, the link is active, unexpired and
/// has `use_count < max_uses`, and the target update applies. Two concurrent calls on
/// a link with one remaining use yield exactly one `Consumed`. The consume audit entry
/// and the target update are written in the same transaction as the increment.
///
/// # Example
/// ```ignore
/// match repo.consume_use(link.id, Utc::now(), audit, &target).await? {
///     ConsumeOutcome::Consumed(link) => { /* report success */ }
///     ConsumeOutcome::Rejected(current) => { /* report why via check_usable */ }
///     ConsumeOutcome::TargetUnavailable => { /* the quote or invoice moved on */ }
///     ConsumeOutcome::NotFound => { /* invalid link */ }
/// }
/// ```
#[async_trait]
pub trait ConsumeUse: Send + Sync {
    async fn consume_use(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        target: &TargetUpdate,
    ) -> Result<ConsumeOutcome, Box<dyn std::error::Error + Send + Sync>>;
}
