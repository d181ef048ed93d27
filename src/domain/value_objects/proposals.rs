use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{
    entities::proposals::{ProposalEntity, ProposalSummaryEntity},
    value_objects::pricing::{DEFAULT_USERS_COUNT, PricingBreakdown, coerce_users_count},
};

pub const DEFAULT_PLAN_NAME: &str = "Pro";
const DRAFT_DATE_FORMAT: &str = "%d %B %Y";

/// Body of a create or full-replacement update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProposalModel {
    pub company_name: String,
    pub person_name: String,
    pub plan_name: String,
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_users_count")]
    pub users_count: Option<i64>,
}

fn deserialize_users_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(coerce_users_count(&raw))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalModel {
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

impl From<ProposalEntity> for ProposalModel {
    fn from(value: ProposalEntity) -> Self {
        Self {
            id: value.id,
            company_name: value.company_name,
            person_name: value.person_name,
            plan_name: value.plan_name,
            date: value.date,
            amount: value.amount,
            users_count: value.users_count,
            annual_price_per_user: value.annual_price_per_user,
            annual_discount_percent: value.annual_discount_percent,
            discounted_annual_pricing: value.discounted_annual_pricing,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummaryModel {
    pub id: i64,
    pub company_name: String,
    pub plan_name: String,
    pub amount: String,
    pub date: String,
    pub created_at: NaiveDateTime,
}

impl From<ProposalSummaryEntity> for ProposalSummaryModel {
    fn from(value: ProposalSummaryEntity) -> Self {
        Self {
            id: value.id,
            company_name: value.company_name,
            plan_name: value.plan_name,
            amount: value.amount,
            date: value.date,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedProposalModel {
    pub id: i64,
}

/// Pre-filled values for a proposal that has not been saved yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraftModel {
    pub company_name: String,
    pub person_name: String,
    pub plan_name: String,
    pub date: String,
    pub amount: String,
    pub users_count: i64,
    pub annual_price_per_user: String,
    pub annual_discount_percent: String,
    pub discounted_annual_pricing: String,
}

impl ProposalDraftModel {
    pub fn new(date: String) -> Self {
        let pricing = PricingBreakdown::for_users(Some(DEFAULT_USERS_COUNT));

        Self {
            company_name: String::new(),
            person_name: String::new(),
            plan_name: DEFAULT_PLAN_NAME.to_string(),
            date,
            amount: pricing.amount,
            users_count: DEFAULT_USERS_COUNT,
            annual_price_per_user: pricing.annual_price_per_user,
            annual_discount_percent: pricing.annual_discount_percent,
            discounted_annual_pricing: pricing.discounted_annual_pricing,
        }
    }

    pub fn for_today() -> Self {
        Self::new(Local::now().format(DRAFT_DATE_FORMAT).to_string())
    }
}

/// Everything the document renderer needs for one proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDocumentModel {
    pub file_name: String,
    pub proposal: ProposalModel,
}

impl From<ProposalModel> for ProposalDocumentModel {
    fn from(proposal: ProposalModel) -> Self {
        Self {
            file_name: document_file_name(&proposal.company_name),
            proposal,
        }
    }
}

/// `Acme & Sons Ltd.` becomes `acme-sons-ltd-proposal.pdf`.
pub fn document_file_name(company_name: &str) -> String {
    let mut slug = String::with_capacity(company_name.len());
    for ch in company_name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "proposal" } else { slug };
    format!("{slug}-proposal.pdf")
}
