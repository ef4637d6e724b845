use action_link_api::{ActionLinkStatus, ActionType, AuditAction, RequestMetadata};
use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::models::audit::AuditLogModel;
use action_link_db::utils::hash_token;
use chrono::{Duration, SubsecRound, Utc};
use heapless::String as HeaplessString;
use uuid::Uuid;

pub fn create_test_link(max_uses: i32) -> ActionLinkModel {
    let now = Utc::now().trunc_subsecs(6);
    ActionLinkModel {
        id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        token_hash: hash_token(&Uuid::new_v4().to_string()),
        email: HeaplessString::try_from("customer@example.com").unwrap(),
        action_type: ActionType::Other,
        metadata: serde_json::json!({ "note": "test" }),
        expires_at: now + Duration::minutes(60),
        max_uses,
        use_count: 0,
        status: ActionLinkStatus::Active,
        created_by_user_id: Uuid::new_v4(),
        created_at: now,
        last_verified_at: None,
        consumed_at: None,
        revoked_at: None,
        last_audit_log_id: None,
        last_audit_hash: 0,
    }
}

pub fn create_test_audit(link: &ActionLinkModel, action: AuditAction) -> AuditLogModel {
    AuditLogModel::for_action_link(link.tenant_id, link.id, action, serde_json::json!({}))
        .with_email_actor(link.email.as_str())
        .with_request_metadata(&RequestMetadata {
            ip_address: Some("198.51.100.7".to_string()),
            user_agent: Some("test-agent".to_string()),
        })
}
