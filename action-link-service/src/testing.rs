//! In-memory collaborators for service and HTTP tests.

use action_link_api::{
    ActionLinkStatus, ActionType, ConsumeActionLinkRequest, IssueActionLinkRequest,
    IssueActionLinkResponse, RequestMetadata, VerifyActionLinkRequest, TARGET_ID_KEY,
};
use action_link_db::kv::{KeyValueStore, MokaKeyValueStore, WindowCount};
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::models::invoice::{InvoiceModel, InvoiceStatus};
use action_link_db::models::quote::{QuoteModel, QuoteStatus};
use action_link_db::repository::{
    ConsumeOutcome, ConsumeUse, Create, FindByTokenHash, InvoiceRepository, Load, LoadAudits, Page,
    PageRequest, QuoteRepository, RecordVerification, Revoke, TargetUpdate,
    TenantMembershipRepository, TransitionOutcome,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::captcha::{CaptchaError, CaptchaVerifier};
use crate::config::ServiceSettings;
use crate::service::{ActionLinkService, ServiceDependencies};

type StoreResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Default)]
struct MemoryState {
    links: HashMap<Uuid, ActionLinkModel>,
    audits: Vec<AuditLogModel>,
    members: HashSet<(Uuid, Uuid)>,
    quotes: HashMap<Uuid, QuoteModel>,
    invoices: HashMap<Uuid, InvoiceModel>,
}

/// Repository double holding every table behind one lock, so each call is atomic
/// the way a database transaction is.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub async fn link(&self, id: Uuid) -> Option<ActionLinkModel> {
        self.state.lock().await.links.get(&id).cloned()
    }

    /// Audit entries for one link in insertion order.
    pub async fn audits_for(&self, entity_id: Uuid) -> Vec<AuditLogModel> {
        self.state
            .lock()
            .await
            .audits
            .iter()
            .filter(|audit| audit.entity_id == entity_id)
            .cloned()
            .collect()
    }

    /// Edits a stored link directly, bypassing the audit chain.
    pub async fn update_link(&self, id: Uuid, edit: impl FnOnce(&mut ActionLinkModel)) {
        if let Some(link) = self.state.lock().await.links.get_mut(&id) {
            edit(link);
        }
    }

    /// Replaces the details of a stored audit entry without resealing it.
    pub async fn tamper_audit(&self, audit_id: Uuid, details: serde_json::Value) {
        let mut state = self.state.lock().await;
        if let Some(audit) = state.audits.iter_mut().find(|audit| audit.id == audit_id) {
            audit.details = details;
        }
    }

    pub async fn add_member(&self, tenant_id: Uuid, user_id: Uuid) {
        self.state.lock().await.members.insert((tenant_id, user_id));
    }

    pub async fn add_quote(&self, tenant_id: Uuid, status: QuoteStatus) -> Uuid {
        let quote = QuoteModel {
            id: Uuid::new_v4(),
            tenant_id,
            status,
            accepted_at: None,
            accepted_by_email: None,
            updated_at: Utc::now(),
        };
        let id = quote.id;
        self.state.lock().await.quotes.insert(id, quote);
        id
    }

    pub async fn add_invoice(&self, tenant_id: Uuid, status: InvoiceStatus) -> Uuid {
        let invoice = InvoiceModel {
            id: Uuid::new_v4(),
            tenant_id,
            status,
            confirmed_at: None,
            confirmed_by_email: None,
            updated_at: Utc::now(),
        };
        let id = invoice.id;
        self.state.lock().await.invoices.insert(id, invoice);
        id
    }

    /// Changes a quote's status the way another part of the product would.
    pub async fn set_quote_status(&self, id: Uuid, status: QuoteStatus) {
        if let Some(quote) = self.state.lock().await.quotes.get_mut(&id) {
            quote.status = status;
            quote.updated_at = Utc::now();
        }
    }

    pub async fn quote(&self, id: Uuid) -> Option<QuoteModel> {
        self.state.lock().await.quotes.get(&id).cloned()
    }

    pub async fn invoice(&self, id: Uuid) -> Option<InvoiceModel> {
        self.state.lock().await.invoices.get(&id).cloned()
    }

    async fn transition(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        precondition: fn(&ActionLinkModel, DateTime<Utc>) -> bool,
        apply: fn(&mut ActionLinkModel, DateTime<Utc>),
    ) -> StoreResult<TransitionOutcome<ActionLinkModel>> {
        let mut state = self.state.lock().await;
        let Some(current) = state.links.get(&id).cloned() else {
            return Ok(TransitionOutcome::NotFound);
        };
        if !precondition(&current, now) {
            return Ok(TransitionOutcome::Rejected(current));
        }

        let audit = audit.chained_after(&current)?;
        let mut updated = current;
        apply(&mut updated, now);
        updated.attach_audit(&audit);

        state.links.insert(id, updated.clone());
        state.audits.push(audit);
        Ok(TransitionOutcome::Applied(updated))
    }
}

#[async_trait]
impl Create<ActionLinkModel> for MemoryStore {
    async fn create(
        &self,
        mut item: ActionLinkModel,
        audit: AuditLogModel,
    ) -> StoreResult<ActionLinkModel> {
        let mut state = self.state.lock().await;
        if state.links.contains_key(&item.id)
            || state.links.values().any(|link| link.token_hash == item.token_hash)
        {
            return Err("duplicate action link".into());
        }

        let audit = audit.chained_after(&item)?;
        item.attach_audit(&audit);
        state.links.insert(item.id, item.clone());
        state.audits.push(audit);
        Ok(item)
    }
}

#[async_trait]
impl Load<ActionLinkModel> for MemoryStore {
    async fn load(&self, id: Uuid) -> StoreResult<Option<ActionLinkModel>> {
        Ok(self.link(id).await)
    }
}

#[async_trait]
impl FindByTokenHash for MemoryStore {
    async fn find_by_token_hash(&self, token_hash: &str) -> StoreResult<Option<ActionLinkModel>> {
        let state = self.state.lock().await;
        Ok(state
            .links
            .values()
            .find(|link| link.token_hash.as_str() == token_hash)
            .cloned())
    }
}

#[async_trait]
impl RecordVerification for MemoryStore {
    async fn record_verification(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
    ) -> StoreResult<TransitionOutcome<ActionLinkModel>> {
        self.transition(
            id,
            now,
            audit,
            |link, now| link.check_usable(now).is_ok(),
            ActionLinkModel::apply_verification,
        )
        .await
    }
}

#[async_trait]
impl ConsumeUse for MemoryStore {
    async fn consume_use(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
        target: &TargetUpdate,
    ) -> StoreResult<ConsumeOutcome> {
        let mut state = self.state.lock().await;
        let Some(current) = state.links.get(&id).cloned() else {
            return Ok(ConsumeOutcome::NotFound);
        };
        if current.check_usable(now).is_err() {
            return Ok(ConsumeOutcome::Rejected(current));
        }

        match target {
            TargetUpdate::None => {}
            TargetUpdate::AcceptQuote {
                quote_id,
                accepted_by_email,
            } => match state.quotes.get_mut(quote_id) {
                Some(quote) if quote.tenant_id == current.tenant_id && quote.is_acceptable() => {
                    quote.status = QuoteStatus::Accepted;
                    quote.accepted_at = Some(now);
                    quote.accepted_by_email = Some(
                        HeaplessString::try_from(accepted_by_email.as_str())
                            .map_err(|_| "email too long")?,
                    );
                    quote.updated_at = now;
                }
                _ => return Ok(ConsumeOutcome::TargetUnavailable),
            },
            TargetUpdate::ConfirmInvoice {
                invoice_id,
                confirmed_by_email,
            } => match state.invoices.get_mut(invoice_id) {
                Some(invoice)
                    if invoice.tenant_id == current.tenant_id && invoice.is_confirmable() =>
                {
                    invoice.status = InvoiceStatus::Confirmed;
                    invoice.confirmed_at = Some(now);
                    invoice.confirmed_by_email = Some(
                        HeaplessString::try_from(confirmed_by_email.as_str())
                            .map_err(|_| "email too long")?,
                    );
                    invoice.updated_at = now;
                }
                _ => return Ok(ConsumeOutcome::TargetUnavailable),
            },
        }

        let audit = audit.chained_after(&current)?;
        let mut updated = current;
        updated.apply_use(now);
        updated.attach_audit(&audit);

        state.links.insert(id, updated.clone());
        state.audits.push(audit);
        Ok(ConsumeOutcome::Consumed(updated))
    }
}

#[async_trait]
impl Revoke for MemoryStore {
    async fn revoke(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
        audit: AuditLogModel,
    ) -> StoreResult<TransitionOutcome<ActionLinkModel>> {
        self.transition(
            id,
            now,
            audit,
            |link, _| link.status == ActionLinkStatus::Active,
            ActionLinkModel::apply_revocation,
        )
        .await
    }
}

#[async_trait]
impl LoadAudits for MemoryStore {
    async fn load_audits(
        &self,
        entity_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<AuditLogModel>> {
        let all = self.audits_for(entity_id).await;
        let total = all.len();
        let items = all.into_iter().skip(page.offset).take(page.limit).collect();
        Ok(Page::new(items, total, page.limit, page.offset))
    }
}

#[async_trait]
impl TenantMembershipRepository for MemoryStore {
    async fn is_member(&self, tenant_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        Ok(self.state.lock().await.members.contains(&(tenant_id, user_id)))
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn load_quote(&self, tenant_id: Uuid, id: Uuid) -> StoreResult<Option<QuoteModel>> {
        Ok(self.quote(id).await.filter(|quote| quote.tenant_id == tenant_id))
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn load_invoice(&self, tenant_id: Uuid, id: Uuid) -> StoreResult<Option<InvoiceModel>> {
        Ok(self.invoice(id).await.filter(|invoice| invoice.tenant_id == tenant_id))
    }
}

/// Key-value store whose every operation fails, for fail-open/fail-closed checks.
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err("store unavailable".into())
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> StoreResult<()> {
        Err("store unavailable".into())
    }

    async fn set_if_absent(&self, _key: &str, _value: String, _ttl: Duration) -> StoreResult<bool> {
        Err("store unavailable".into())
    }

    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Err("store unavailable".into())
    }

    async fn increment(&self, _key: &str, _window: Duration) -> StoreResult<WindowCount> {
        Err("store unavailable".into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaBehavior {
    Accept,
    Reject,
    Unavailable,
}

pub struct FakeCaptcha {
    behavior: CaptchaBehavior,
    calls: AtomicUsize,
}

impl FakeCaptcha {
    pub fn new(behavior: CaptchaBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptchaVerifier for FakeCaptcha {
    async fn verify(
        &self,
        _response: &str,
        _remote_ip: Option<&str>,
    ) -> Result<bool, CaptchaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            CaptchaBehavior::Accept => Ok(true),
            CaptchaBehavior::Reject => Ok(false),
            CaptchaBehavior::Unavailable => Err(CaptchaError::UnexpectedStatus(503)),
        }
    }
}

/// A service wired to in-memory collaborators.
pub struct TestHarness {
    pub service: Arc<ActionLinkService>,
    pub store: Arc<MemoryStore>,
    pub captcha: Arc<FakeCaptcha>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(CaptchaBehavior::Accept, ServiceSettings::default())
    }

    pub fn with_captcha(behavior: CaptchaBehavior) -> Self {
        Self::build(behavior, ServiceSettings::default())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        Self::build(CaptchaBehavior::Accept, settings)
    }

    fn build(behavior: CaptchaBehavior, settings: ServiceSettings) -> Self {
        let store = Arc::new(MemoryStore::default());
        let captcha = Arc::new(FakeCaptcha::new(behavior));
        let deps = ServiceDependencies {
            links: store.clone(),
            memberships: store.clone(),
            quotes: store.clone(),
            invoices: store.clone(),
            kv: Arc::new(MokaKeyValueStore::default()),
            captcha: captcha.clone(),
        };
        Self {
            service: Arc::new(ActionLinkService::new(deps, settings)),
            store,
            captcha,
        }
    }

    /// Registers a fresh user as member of a fresh tenant.
    pub async fn member(&self) -> (Uuid, Uuid) {
        let tenant_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        self.store.add_member(tenant_id, user_id).await;
        (tenant_id, user_id)
    }

    /// Issues a link for a new member and returns the raw token with the response.
    pub async fn issue_link(
        &self,
        action_type: ActionType,
        email: &str,
        max_uses: u32,
    ) -> (IssueActionLinkResponse, String) {
        let (tenant_id, user_id) = self.member().await;
        self.issue_link_for(tenant_id, user_id, action_type, None, email, max_uses)
            .await
    }

    pub async fn issue_link_for(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        action_type: ActionType,
        target_id: Option<Uuid>,
        email: &str,
        max_uses: u32,
    ) -> (IssueActionLinkResponse, String) {
        let mut request = issue_request(tenant_id, action_type, email);
        request.max_uses = Some(max_uses);
        if let Some(target_id) = target_id {
            request.metadata = Some(json!({ TARGET_ID_KEY: target_id.to_string() }));
        }

        let response = self
            .service
            .issue(user_id, request, &RequestMetadata::default())
            .await
            .expect("issue test link");
        let token = response
            .link
            .rsplit('/')
            .next()
            .expect("token in link")
            .to_string();
        (response, token)
    }
}

pub fn issue_request(
    tenant_id: Uuid,
    action_type: ActionType,
    email: &str,
) -> IssueActionLinkRequest {
    IssueActionLinkRequest {
        tenant_id,
        action_type,
        email: email.to_string(),
        metadata: None,
        expires_in_minutes: None,
        max_uses: None,
    }
}

pub fn verify_request(token: &str, email: &str) -> VerifyActionLinkRequest {
    VerifyActionLinkRequest {
        token: token.to_string(),
        email: email.to_string(),
        captcha_token: "test-captcha".to_string(),
    }
}

pub fn consume_request(token: &str, email: &str) -> ConsumeActionLinkRequest {
    ConsumeActionLinkRequest {
        token: token.to_string(),
        email: email.to_string(),
        payload: Some(json!({ "note": "approved" })),
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
