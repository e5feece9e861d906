//! Budget plans and the billable items they fund.

use serde::{Deserialize, Serialize};

/// Funding plan header for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSettings {
    pub id: i64,
    pub is_active: bool,
    pub client_id: i64,
}

/// A billable line in a client's funding plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: i64,
    pub budget_settings_id: i64,
    pub client_id: i64,
    pub item_code: String,
    #[serde(default)]
    pub description: String,
    /// Remaining units on the plan.
    pub quantity: f64,
    pub unit_price: f64,
}
