use async_trait::async_trait;

use crate::models::action_link::ActionLinkModel;

/// Lookup of an action link by the digest of its raw token
#[async_trait]
pub trait FindByTokenHash: Send + Sync {
    /// # Returns
    /// * `Ok(Some(ActionLinkModel))` - The link, whatever its status or expiry
    /// * `Ok(None)` - If no link has this token hash
    /// * `Err` - An error if the query could not be executed
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<ActionLinkModel>, Box<dyn std::error::Error + Send + Sync>>;
}
