use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{
    entities::proposals::WriteProposalEntity,
    repositories::proposals::ProposalRepository,
    value_objects::{
        pricing::DEFAULT_USERS_COUNT,
        proposals::{
            CreatedProposalModel, ProposalDocumentModel, ProposalDraftModel, ProposalModel,
            ProposalSummaryModel, UpsertProposalModel,
        },
    },
};

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("proposal {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ProposalError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProposalError::NotFound(_) => StatusCode::NOT_FOUND,
            ProposalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ProposalError>;

pub struct ProposalUseCase<R>
where
    R: ProposalRepository + Send + Sync + 'static,
{
    proposal_repo: Arc<R>,
}

impl<R> ProposalUseCase<R>
where
    R: ProposalRepository + Send + Sync + 'static,
{
    pub fn new(proposal_repo: Arc<R>) -> Self {
        Self { proposal_repo }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<ProposalSummaryModel>> {
        let rows = self.proposal_repo.list().await?;
        debug!(count = rows.len(), "proposals: listed");

        Ok(rows.into_iter().map(ProposalSummaryModel::from).collect())
    }

    pub async fn find_by_id(&self, proposal_id: i64) -> UseCaseResult<ProposalModel> {
        self.proposal_repo
            .find_by_id(proposal_id)
            .await?
            .map(ProposalModel::from)
            .ok_or(ProposalError::NotFound(proposal_id))
    }

    pub fn draft(&self) -> ProposalDraftModel {
        ProposalDraftModel::for_today()
    }

    pub async fn create(
        &self,
        upsert_proposal_model: UpsertProposalModel,
    ) -> UseCaseResult<CreatedProposalModel> {
        let write_proposal_entity = to_write_entity(upsert_proposal_model);
        let users_count = write_proposal_entity.users_count;

        let id = self.proposal_repo.create(write_proposal_entity).await?;
        info!(proposal_id = id, ?users_count, "proposals: created");

        Ok(CreatedProposalModel { id })
    }

    pub async fn update(
        &self,
        proposal_id: i64,
        upsert_proposal_model: UpsertProposalModel,
    ) -> UseCaseResult<()> {
        let write_proposal_entity = to_write_entity(upsert_proposal_model);

        if !self
            .proposal_repo
            .update(proposal_id, write_proposal_entity)
            .await?
        {
            return Err(ProposalError::NotFound(proposal_id));
        }
        info!(proposal_id, "proposals: updated");

        Ok(())
    }

    pub async fn delete(&self, proposal_id: i64) -> UseCaseResult<()> {
        self.proposal_repo.delete(proposal_id).await?;
        info!(proposal_id, "proposals: deleted");

        Ok(())
    }

    pub async fn document(&self, proposal_id: i64) -> UseCaseResult<ProposalDocumentModel> {
        let proposal = self.find_by_id(proposal_id).await?;

        Ok(ProposalDocumentModel::from(proposal))
    }
}

/// Applies the user-count default and derives the pricing columns.
fn to_write_entity(model: UpsertProposalModel) -> WriteProposalEntity {
    WriteProposalEntity::new(
        model.company_name,
        model.person_name,
        model.plan_name,
        model.date,
        model.users_count.unwrap_or(DEFAULT_USERS_COUNT),
    )
}
