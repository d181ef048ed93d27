use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::{
    domain::value_objects::pricing::PricingBreakdown,
    infrastructure::sqlite::schema::proposals,
};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = proposals)]
pub struct ProposalEntity {
    pub id: i64,
    pub company_name: String,
    pub person_name: String,
    pub plan_name: String,
    pub date: String,
    pub amount: String,
    pub users_count: Option<i64>,
    pub annual_price_per_user: Option<String>,
    pub annual_discount_percent: Option<String>,
    pub discounted_annual_pricing: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Listing projection; the remaining columns are only loaded for a single proposal.
#[derive(Debug, Clone, PartialEq, Selectable, Queryable)]
#[diesel(table_name = proposals)]
pub struct ProposalSummaryEntity {
    pub id: i64,
    pub company_name: String,
    pub plan_name: String,
    pub amount: String,
    pub date: String,
    pub created_at: NaiveDateTime,
}

/// Every column a caller may write. `id` and `created_at` are owned by storage.
#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = proposals)]
#[diesel(treat_none_as_null = true)]
pub struct WriteProposalEntity {
    pub company_name: String,
    pub person_name: String,
    pub plan_name: String,
    pub date: String,
    pub amount: String,
    pub users_count: Option<i64>,
    pub annual_price_per_user: Option<String>,
    pub annual_discount_percent: Option<String>,
    pub discounted_annual_pricing: Option<String>,
}

impl WriteProposalEntity {
    pub fn new(
        company_name: String,
        person_name: String,
        plan_name: String,
        date: String,
        users_count: i64,
    ) -> Self {
        let pricing = PricingBreakdown::for_users(Some(users_count));

        Self {
            company_name,
            person_name,
            plan_name,
            date,
            amount: pricing.amount,
            users_count: Some(users_count),
            annual_price_per_user: Some(pricing.annual_price_per_user),
            annual_discount_percent: Some(pricing.annual_discount_percent),
            discounted_annual_pricing: Some(pricing.discounted_annual_pricing),
        }
    }
}
