use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

pub type UserName = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Participant {
    pub name: UserName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// How an expense is divided among its beneficiaries.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitRule {
    /// Evenly, with leftover cents going to the first beneficiaries listed.
    Equal,
    /// Caller-supplied amounts, parallel to the beneficiary list. Their sum
    /// must match the expense amount to within one cent.
    Custom { shares: Vec<Money> },
}

impl Default for SplitRule {
    fn default() -> Self {
        SplitRule::Equal
    }
}

/// An expense as submitted by a client, before the store stamps it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub payer: UserName,
    pub beneficiaries: Vec<UserName>,
    #[serde(default)]
    pub split: SplitRule,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub description: String,
    pub amount: Money,
    pub payer: UserName,
    pub beneficiaries: Vec<UserName>,
    pub split: SplitRule,
}

/// One bill-splitting session: a roster of participants and their expenses.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        EventSummary {
            id: event.id.clone(),
            name: event.name.clone(),
            created: event.created,
        }
    }
}

/// A participant's net position. Positive means the group owes them money,
/// negative means they owe the group.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PersonalBalance {
    pub name: UserName,
    pub balance: Money,
}

/// One settlement instruction: `debtor` pays `creditor` `amount`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transfer {
    pub debtor: UserName,
    pub creditor: UserName,
    pub amount: Money,
}
