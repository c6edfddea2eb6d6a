//! Report generation business logic.
//!
//! Pure aggregation over the current collections. Nothing is cached: every
//! screen recomputes its figures from the store on each render.

use crate::entities::{Profile, Role, Transaction, TransactionKind};
use chrono::{Datelike, FixedOffset, NaiveDate};

/// A calendar month, compared in a fixed display offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    /// Calendar year
    pub year: i32,
    /// Month of year, 1 through 12
    pub month: u32,
    /// Offset used to decide which local month a timestamp falls in
    pub offset: FixedOffset,
}

impl MonthPeriod {
    /// Returns `None` when `month` is outside 1..=12.
    #[must_use]
    pub fn new(year: i32, month: u32, offset: FixedOffset) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self {
            year,
            month,
            offset,
        })
    }

    /// Whether `transaction` was created inside this calendar month
    #[must_use]
    pub fn contains(&self, transaction: &Transaction) -> bool {
        let local = transaction.created_at.with_timezone(&self.offset);
        local.year() == self.year && local.month() == self.month
    }

    /// Label such as `January 2026`
    #[must_use]
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).map_or_else(
            || format!("{:04}-{:02}", self.year, self.month),
            |date| date.format("%B %Y").to_string(),
        )
    }
}

/// Sum of every profile's balance
#[must_use]
pub fn total_fund_liquidity(profiles: &[Profile]) -> f64 {
    profiles.iter().map(|p| p.balance).sum()
}

/// Sum of the absolute values of negative balances; zero when nobody owes
#[must_use]
pub fn total_due(profiles: &[Profile]) -> f64 {
    profiles
        .iter()
        .filter(|p| p.balance < 0.0)
        .map(|p| p.balance.abs())
        .sum()
}

/// Number of profiles with the employee role
#[must_use]
pub fn active_personnel_count(profiles: &[Profile]) -> usize {
    profiles.iter().filter(|p| p.role == Role::Employee).count()
}

/// Employees with a negative balance, in collection order
#[must_use]
pub fn debtor_list(profiles: &[Profile]) -> Vec<&Profile> {
    profiles.iter().filter(|p| p.is_debtor()).collect()
}

/// Every employee, in collection order
#[must_use]
pub fn member_pool(profiles: &[Profile]) -> Vec<&Profile> {
    profiles.iter().filter(|p| p.role == Role::Employee).collect()
}

/// Sum of `kind` amounts for `profile_id` inside `period`.
#[must_use]
pub fn monthly_total(
    transactions: &[Transaction],
    profile_id: &str,
    kind: TransactionKind,
    period: &MonthPeriod,
) -> f64 {
    transactions
        .iter()
        .filter(|t| t.profile_id == profile_id && t.kind == kind && period.contains(t))
        .map(|t| t.amount)
        .sum()
}

/// Transactions for one profile, in store order (most recent first)
#[must_use]
pub fn history_for<'a>(transactions: &'a [Transaction], profile_id: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| t.profile_id == profile_id)
        .collect()
}

/// Headline figures on the administrator dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct FundSummary {
    /// Sum of all balances
    pub total_liquidity: f64,
    /// Total owed by debtors
    pub total_due: f64,
    /// Number of employees
    pub active_personnel: usize,
    /// Number of employees in debt
    pub debtor_count: usize,
}

#[must_use]
pub fn fund_summary(profiles: &[Profile]) -> FundSummary {
    FundSummary {
        total_liquidity: total_fund_liquidity(profiles),
        total_due: total_due(profiles),
        active_personnel: active_personnel_count(profiles),
        debtor_count: debtor_list(profiles).len(),
    }
}

/// One member's activity for a month.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementRow {
    /// Member id
    pub profile_id: String,
    /// Member display name
    pub full_name: String,
    /// Deposits inside the period
    pub deposits: f64,
    /// Withdrawals inside the period
    pub withdrawals: f64,
    /// Balance at the time of the report
    pub balance: f64,
}

/// Builds one row per employee for `period`.
#[must_use]
pub fn monthly_statement(
    profiles: &[Profile],
    transactions: &[Transaction],
    period: &MonthPeriod,
) -> Vec<StatementRow> {
    member_pool(profiles)
        .into_iter()
        .map(|p| StatementRow {
            profile_id: p.id.clone(),
            full_name: p.full_name.clone(),
            deposits: monthly_total(transactions, &p.id, TransactionKind::Deposit, period),
            withdrawals: monthly_total(transactions, &p.id, TransactionKind::Withdrawal, period),
            balance: p.balance,
        })
        .collect()
}
