use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::repository::find_by_token_hash::FindByTokenHash;
use async_trait::async_trait;
use std::error::Error;

use super::repo_impl::ActionLinkRepositoryImpl;
use crate::utils::TryFromRow;

impl ActionLinkRepositoryImpl {
    pub(super) async fn find_by_token_hash_impl(
        repo: &ActionLinkRepositoryImpl,
        token_hash: &str,
    ) -> Result<Option<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM action_link WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&*repo.pool)
            .await?;

        row.map(|row| ActionLinkModel::try_from_row(&row)).transpose()
    }
}

#[async_trait]
impl FindByTokenHash for ActionLinkRepositoryImpl {
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        Self::find_by_token_hash_impl(self, token_hash).await
    }
}
