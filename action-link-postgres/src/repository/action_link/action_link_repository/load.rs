use action_link_db::models::action_link::ActionLinkModel;
use action_link_db::repository::load::Load;
use async_trait::async_trait;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::ActionLinkRepositoryImpl;
use crate::utils::TryFromRow;

#[async_trait]
impl Load<ActionLinkModel> for ActionLinkRepositoryImpl {
    async fn load(
        &self,
        id: Uuid,
    ) -> Result<Option<ActionLinkModel>, Box<dyn Error + Send + Sync>> {
        let row = sqlx::query("SELECT * FROM action_link WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(ActionLinkModel::try_from_row(&row)?)),
            None => Ok(None),
        }
    }
}
