use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::proposals::{
    ProposalEntity, ProposalSummaryEntity, WriteProposalEntity,
};

#[async_trait]
#[automock]
pub trait ProposalRepository {
    /// Newest first.
    async fn list(&self) -> Result<Vec<ProposalSummaryEntity>>;
    async fn find_by_id(&self, proposal_id: i64) -> Result<Option<ProposalEntity>>;
    async fn create(&self, write_proposal_entity: WriteProposalEntity) -> Result<i64>;
    /// Returns `false` when no proposal has `proposal_id`.
    async fn update(
        &self,
        proposal_id: i64,
        write_proposal_entity: WriteProposalEntity,
    ) -> Result<bool>;
    async fn delete(&self, proposal_id: i64) -> Result<()>;
}
