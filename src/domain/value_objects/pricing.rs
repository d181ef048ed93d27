//! Per-user pricing for proposals.
//!
//! Every derived pricing field of a proposal is produced here from the user
//! count alone. The discount percentage is display text and is not computed
//! from the two unit prices.

use serde_json::Value;

pub const LIST_PRICE_PER_USER: u64 = 3_000;
pub const DISCOUNTED_PRICE_PER_USER: u64 = 2_000;
pub const DEFAULT_USERS_COUNT: i64 = 3;

pub const ANNUAL_PRICE_PER_USER_DISPLAY: &str = "₹3,000";
pub const ANNUAL_DISCOUNT_PERCENT_DISPLAY: &str = "33.33%";
const DISCOUNTED_PRICE_PER_USER_DISPLAY: &str = "₹2,000";

const RUPEE: char = '₹';

/// The four derived fields stored alongside every proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingBreakdown {
    pub amount: String,
    pub annual_price_per_user: String,
    pub annual_discount_percent: String,
    pub discounted_annual_pricing: String,
}

impl PricingBreakdown {
    /// Prices `users_count` users. Missing and negative counts price as zero users.
    pub fn for_users(users_count: Option<i64>) -> Self {
        let effective_count = effective_count(users_count);
        let total = u128::from(effective_count) * u128::from(DISCOUNTED_PRICE_PER_USER);

        Self {
            amount: format_inr(total),
            annual_price_per_user: ANNUAL_PRICE_PER_USER_DISPLAY.to_string(),
            annual_discount_percent: ANNUAL_DISCOUNT_PERCENT_DISPLAY.to_string(),
            discounted_annual_pricing: format!(
                "{DISCOUNTED_PRICE_PER_USER_DISPLAY} x {effective_count}"
            ),
        }
    }
}

fn effective_count(users_count: Option<i64>) -> u64 {
    users_count
        .and_then(|count| u64::try_from(count).ok())
        .unwrap_or(0)
}

/// Formats a whole rupee value with Indian digit grouping: the last three
/// digits form one group and every group above it has two digits
/// (`100000` becomes `₹1,00,000`).
pub fn format_inr(value: u128) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return format!("{RUPEE}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::with_capacity(head.len() / 2 + 1);
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{RUPEE}{},{tail}", groups.join(","))
}

/// Interprets a raw user count as submitted by a client.
///
/// `None` means the count was not supplied at all (absent, `null` or blank
/// text). Anything else that is not a non-negative number becomes `Some(0)`.
/// Fractional values are truncated toward zero.
pub fn coerce_users_count(raw: &Value) -> Option<i64> {
    match raw {
        Value::Null => None,
        Value::Number(number) => Some(
            number
                .as_i64()
                .or_else(|| number.as_f64().map(truncate_to_count))
                .map_or(0, |count| count.max(0)),
        ),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let count = text
                .parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(truncate_to_count))
                .unwrap_or(0);
            Some(count.max(0))
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Some(0),
    }
}

fn truncate_to_count(value: f64) -> i64 {
    if value.is_finite() && value > 0.0 {
        // `as` saturates at i64::MAX for very large values.
        value.trunc() as i64
    } else {
        0
    }
}
