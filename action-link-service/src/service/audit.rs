use action_link_api::{ApiError, ApiResult, AuditEntryView, AuditTrailQuery, AuditTrailResponse};
use action_link_db::models::audit::AuditLogModel;
use action_link_db::repository::{LoadAudits, PageRequest};
use uuid::Uuid;

use super::{downstream, ActionLinkService};

const MAX_AUDIT_PAGE: usize = 200;
/// Largest offset PostgreSQL accepts (`OFFSET` is a bigint).
const MAX_AUDIT_OFFSET: usize = i64::MAX as usize;

impl ActionLinkService {
    /// Returns one page of a link's audit trail, oldest first.
    ///
    /// `chain_valid` covers the returned entries only. The first page is also
    /// checked against the genesis entry.
    #[tracing::instrument(skip(self))]
    pub async fn audit_trail(
        &self,
        user_id: Uuid,
        link_id: Uuid,
        query: AuditTrailQuery,
    ) -> ApiResult<AuditTrailResponse> {
        let link = self.load_for_member(link_id, user_id).await?;

        let defaults = PageRequest::default();
        let offset = query.offset.unwrap_or(defaults.offset);
        if offset > MAX_AUDIT_OFFSET {
            return Err(ApiError::ValidationError("offset is out of range".to_string()));
        }
        let page = PageRequest::new(query.limit.unwrap_or(defaults.limit), offset)
            .clamped(MAX_AUDIT_PAGE);

        let page = self
            .links
            .load_audits(link.id, page)
            .await
            .map_err(downstream("load audit trail"))?;

        let chain_valid = AuditLogModel::verify_chain(&page.items, page.is_first_page());
        if !chain_valid {
            tracing::error!(%link_id, offset = page.offset, "Audit chain verification failed");
        }

        let page = page.map(AuditEntryView::from);
        Ok(AuditTrailResponse {
            items: page.items,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
            chain_valid,
        })
    }
}
