// Bank Account Manager - Sorting
// Order the account table by balance or name, or pick the max/min balance

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Account;
use crate::error::{BankError, Result};

// ============================================================================
// CRITERION & ORDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Balance,
    Name,
    MaxBalance,
    MinBalance,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Balance => "Balance",
            SortCriterion::Name => "Name",
            SortCriterion::MaxBalance => "Maximum balance",
            SortCriterion::MinBalance => "Minimum balance",
        }
    }

    /// Max/min pick a single account and ignore the order
    pub fn is_extreme(&self) -> bool {
        matches!(self, SortCriterion::MaxBalance | SortCriterion::MinBalance)
    }

    /// Numeric menu code used by the web page (1-4)
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(SortCriterion::Balance),
            2 => Some(SortCriterion::Name),
            3 => Some(SortCriterion::MaxBalance),
            4 => Some(SortCriterion::MinBalance),
            _ => None,
        }
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return SortCriterion::from_code(code)
                .ok_or_else(|| format!("Invalid sorting criterion: {}", s));
        }
        match s.to_lowercase().as_str() {
            "balance" => Ok(SortCriterion::Balance),
            "name" => Ok(SortCriterion::Name),
            "max" | "max_balance" => Ok(SortCriterion::MaxBalance),
            "min" | "min_balance" => Ok(SortCriterion::MinBalance),
            _ => Err(format!("Invalid sorting criterion: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn short(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Asc",
            SortOrder::Descending => "Desc",
        }
    }

    /// Code 1 is ascending; any other code is descending
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Ok(SortOrder::from_code(code));
        }
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Invalid sorting order: {}", s)),
        }
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// A criterion or order as sent by a client: `1` or `"1"` or `"balance"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Code(i64),
    Text(String),
}

impl TryFrom<Selector> for SortCriterion {
    type Error = String;

    fn try_from(value: Selector) -> std::result::Result<Self, Self::Error> {
        match value {
            Selector::Code(code) => SortCriterion::from_code(code)
                .ok_or_else(|| format!("Invalid sorting criterion: {}", code)),
            Selector::Text(text) => text.parse(),
        }
    }
}

impl TryFrom<Selector> for SortOrder {
    type Error = String;

    fn try_from(value: Selector) -> std::result::Result<Self, Self::Error> {
        match value {
            Selector::Code(code) => Ok(SortOrder::from_code(code)),
            Selector::Text(text) => text.parse(),
        }
    }
}

/// What to sort by. The default is balance, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SortRequest {
    #[serde(deserialize_with = "de_criterion", default = "default_criterion")]
    pub criterion: SortCriterion,
    #[serde(deserialize_with = "de_order", default = "default_order")]
    pub order: SortOrder,
}

impl Default for SortRequest {
    fn default() -> Self {
        SortRequest {
            criterion: default_criterion(),
            order: default_order(),
        }
    }
}

fn default_criterion() -> SortCriterion {
    SortCriterion::Balance
}

fn default_order() -> SortOrder {
    SortOrder::Descending
}

fn de_criterion<'de, D>(deserializer: D) -> std::result::Result<SortCriterion, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let selector = Selector::deserialize(deserializer)?;
    SortCriterion::try_from(selector).map_err(serde::de::Error::custom)
}

fn de_order<'de, D>(deserializer: D) -> std::result::Result<SortOrder, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let selector = Selector::deserialize(deserializer)?;
    SortOrder::try_from(selector).map_err(serde::de::Error::custom)
}

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SortOutcome {
    Sorted(Vec<Account>),
    Extreme(Account),
}

impl SortOutcome {
    pub fn accounts(&self) -> Vec<Account> {
        match self {
            SortOutcome::Sorted(accounts) => accounts.clone(),
            SortOutcome::Extreme(account) => vec![account.clone()],
        }
    }
}

impl SortRequest {
    /// Message shown to the user after sorting
    pub fn describe(&self) -> String {
        match self.criterion {
            SortCriterion::MaxBalance | SortCriterion::MinBalance => {
                format!("{} account found", self.criterion.as_str())
            }
            _ => format!("Sorted by {} ({})", self.criterion.as_str(), self.order.short()),
        }
    }
}

impl fmt::Display for SortRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.criterion.is_extreme() {
            write!(f, "{}", self.criterion.as_str())
        } else {
            write!(f, "{} {}", self.criterion.as_str(), self.order.short())
        }
    }
}

// ============================================================================
// ALGORITHMS
// ============================================================================

/// Apply a sort request to accounts given in slot order.
///
/// Sorting is stable, so equal keys keep slot order. For max/min the first
/// account in slot order wins a tie.
pub fn sort_accounts(mut accounts: Vec<Account>, request: SortRequest) -> Result<SortOutcome> {
    if accounts.is_empty() {
        return Err(BankError::NoAccounts);
    }

    let outcome = match request.criterion {
        SortCriterion::Balance => {
            accounts.sort_by(|a, b| request.order.apply(a.balance.total_cmp(&b.balance)));
            SortOutcome::Sorted(accounts)
        }
        SortCriterion::Name => {
            accounts.sort_by(|a, b| request.order.apply(compare_names(a, b)));
            SortOutcome::Sorted(accounts)
        }
        SortCriterion::MaxBalance => {
            SortOutcome::Extreme(pick(accounts, |c, best| c > best).ok_or(BankError::NoAccounts)?)
        }
        SortCriterion::MinBalance => {
            SortOutcome::Extreme(pick(accounts, |c, best| c < best).ok_or(BankError::NoAccounts)?)
        }
    };

    Ok(outcome)
}

/// Last name, then first name, bytewise
fn compare_names(a: &Account, b: &Account) -> Ordering {
    a.last_name
        .cmp(&b.last_name)
        .then_with(|| a.first_name.cmp(&b.first_name))
}

/// Keep the first account, replace it only on a strict improvement
fn pick(accounts: Vec<Account>, better: impl Fn(f64, f64) -> bool) -> Option<Account> {
    accounts.into_iter().reduce(|best, candidate| {
        if better(candidate.balance, best.balance) {
            candidate
        } else {
            best
        }
    })
}
