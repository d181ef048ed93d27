use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infrastructure::sqlite::{schema::proposals, sqlite_connection::SqlitePoolSquad};
use domain::{
    entities::proposals::{ProposalEntity, ProposalSummaryEntity, WriteProposalEntity},
    repositories::proposals::ProposalRepository,
};

pub struct ProposalSqlite {
    db_pool: Arc<SqlitePoolSquad>,
}

impl ProposalSqlite {
    pub fn new(db_pool: Arc<SqlitePoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProposalRepository for ProposalSqlite {
    async fn list(&self) -> Result<Vec<ProposalSummaryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Timestamps can collide; the later id is the later insert.
        let rows = proposals::table
            .select(ProposalSummaryEntity::as_select())
            .order((proposals::created_at.desc(), proposals::id.desc()))
            .load::<ProposalSummaryEntity>(&mut conn)?;

        Ok(rows)
    }

    async fn find_by_id(&self, proposal_id: i64) -> Result<Option<ProposalEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = proposals::table
            .find(proposal_id)
            .select(ProposalEntity::as_select())
            .first::<ProposalEntity>(&mut conn)
            .optional()?;

        Ok(row)
    }

    async fn create(&self, write_proposal_entity: WriteProposalEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let proposal_id = insert_into(proposals::table)
            .values(&write_proposal_entity)
            .returning(proposals::id)
            .get_result::<i64>(&mut conn)?;

        Ok(proposal_id)
    }

    async fn update(
        &self,
        proposal_id: i64,
        write_proposal_entity: WriteProposalEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(proposals::table.find(proposal_id))
            .set(&write_proposal_entity)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn delete(&self, proposal_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(proposals::table.find(proposal_id)).execute(&mut conn)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::{
        schema_manager::ensure_schema,
        sqlite_connection::{ConnectionOptions, establish_in_memory},
    };

    fn repository() -> ProposalSqlite {
        let db_pool = establish_in_memory(&ConnectionOptions::default()).unwrap();
        ensure_schema(&db_pool).unwrap();
        ProposalSqlite::new(Arc::new(db_pool))
    }

    fn write_entity(company_name: &str, users_count: i64) -> WriteProposalEntity {
        WriteProposalEntity::new(
            company_name.to_string(),
            "Jo".to_string(),
            "Pro".to_string(),
            "01 January 2024".to_string(),
            users_count,
        )
    }

    #[tokio::test]
    async fn create_then_find_returns_stored_fields() {
        let repository = repository();

        let proposal_id = repository.create(write_entity("Acme", 5)).await.unwrap();
        let proposal = repository.find_by_id(proposal_id).await.unwrap().unwrap();

        assert_eq!(proposal.id, proposal_id);
        assert_eq!(proposal.company_name, "Acme");
        assert_eq!(proposal.person_name, "Jo");
        assert_eq!(proposal.plan_name, "Pro");
        assert_eq!(proposal.date, "01 January 2024");
        assert_eq!(proposal.users_count, Some(5));
        assert_eq!(proposal.amount, "₹10,000");
        assert_eq!(proposal.discounted_annual_pricing.as_deref(), Some("₹2,000 x 5"));
        assert_eq!(proposal.annual_price_per_user.as_deref(), Some("₹3,000"));
        assert_eq!(proposal.annual_discount_percent.as_deref(), Some("33.33%"));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repository = repository();

        assert!(repository.find_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repository = repository();

        let a = repository.create(write_entity("A", 1)).await.unwrap();
        let b = repository.create(write_entity("B", 2)).await.unwrap();
        let c = repository.create(write_entity("C", 3)).await.unwrap();

        let ids: Vec<i64> = repository
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|summary| summary.id)
            .collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[tokio::test]
    async fn list_projects_summary_fields() {
        let repository = repository();
        let proposal_id = repository.create(write_entity("Acme", 2)).await.unwrap();
        let stored = repository.find_by_id(proposal_id).await.unwrap().unwrap();

        let summaries = repository.list().await.unwrap();

        assert_eq!(
            summaries,
            vec![ProposalSummaryEntity {
                id: proposal_id,
                company_name: "Acme".to_string(),
                plan_name: "Pro".to_string(),
                amount: "₹4,000".to_string(),
                date: "01 January 2024".to_string(),
                created_at: stored.created_at,
            }]
        );
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_identity() {
        let repository = repository();
        let proposal_id = repository.create(write_entity("Acme", 5)).await.unwrap();
        let before = repository.find_by_id(proposal_id).await.unwrap().unwrap();

        let updated = repository
            .update(proposal_id, write_entity("Acme Corp", 50))
            .await
            .unwrap();
        let after = repository.find_by_id(proposal_id).await.unwrap().unwrap();

        assert!(updated);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.company_name, "Acme Corp");
        assert_eq!(after.users_count, Some(50));
        assert_eq!(after.amount, "₹1,00,000");
    }

    #[tokio::test]
    async fn update_missing_touches_nothing() {
        let repository = repository();
        let proposal_id = repository.create(write_entity("Acme", 5)).await.unwrap();
        let before = repository.list().await.unwrap();

        let updated = repository
            .update(proposal_id + 1, write_entity("Ghost", 1))
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(repository.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_row_and_ignores_missing() {
        let repository = repository();
        let kept = repository.create(write_entity("Kept", 1)).await.unwrap();
        let removed = repository.create(write_entity("Removed", 1)).await.unwrap();

        repository.delete(removed).await.unwrap();
        repository.delete(removed).await.unwrap();
        repository.delete(9_999).await.unwrap();

        assert!(repository.find_by_id(removed).await.unwrap().is_none());
        assert!(repository.find_by_id(kept).await.unwrap().is_some());
        assert_eq!(repository.list().await.unwrap().len(), 1);
    }
}
