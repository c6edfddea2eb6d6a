//! Text rendering of the console screens.
//!
//! Every function takes the current collections and recomputes what it shows;
//! nothing here keeps state between renders.

use crate::{
    core::report::{self, MonthPeriod},
    entities::{Profile, ROOT_ADMIN_ID, Transaction, TransactionKind},
};
use chrono::FixedOffset;

const RECENT_LIMIT: usize = 10;

/// Formats dollars with thousands separators, e.g. `-$1,250.50`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents}")
}

fn signed_amount(transaction: &Transaction) -> String {
    match transaction.kind {
        TransactionKind::Deposit => format!("+{}", format_money(transaction.amount)),
        TransactionKind::Withdrawal => format!("-{}", format_money(transaction.amount)),
    }
}

fn transaction_line(
    transaction: &Transaction,
    owner: Option<&Profile>,
    offset: FixedOffset,
) -> String {
    let owner = owner.map_or("(unknown member)", |p| p.full_name.as_str());
    format!(
        "{:<10} {:<22} {:>14}  {:<24} {}",
        transaction.id,
        owner,
        signed_amount(transaction),
        transaction.description,
        transaction
            .created_at
            .with_timezone(&offset)
            .format("%d %b %Y")
    )
}

/// Administrator dashboard with the headline fund figures.
#[must_use]
pub fn admin_dashboard(profiles: &[Profile]) -> Vec<String> {
    let summary = report::fund_summary(profiles);
    vec![
        format!("Total Fund Liquidity : {}", format_money(summary.total_liquidity)),
        format!("Total Due            : {}", format_money(summary.total_due)),
        format!("Active Personnel     : {}", summary.active_personnel),
        format!("Members In Debt      : {}", summary.debtor_count),
        "Commands: due, pool, history <id>, deposit <id> [amount], withdraw <id> [amount]"
            .to_string(),
    ]
}

/// Member dashboard with own balance and recent activity.
#[must_use]
pub fn employee_dashboard(
    profile: &Profile,
    transactions: &[Transaction],
    offset: FixedOffset,
) -> Vec<String> {
    let mut lines = vec![
        format!("Welcome, {}", profile.full_name),
        format!("Your Balance: {}", format_money(profile.balance)),
    ];
    if profile.balance < 0.0 {
        lines.push(format!("Amount owed to the fund: {}", format_money(profile.balance.abs())));
    }
    lines.push("Recent Activity:".to_string());
    lines.extend(history(profile, transactions, offset).into_iter().skip(1).take(RECENT_LIMIT));
    lines
}

/// Employee roster with balances and the selected month's movements.
#[must_use]
pub fn employee_status(
    profiles: &[Profile],
    transactions: &[Transaction],
    period: &MonthPeriod,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<10} {:<22} {:>14} {:>14} {:>14}  {}",
        "ID",
        "Name",
        "Balance",
        "Deposits",
        "Withdrawals",
        "Status"
    )];
    for profile in report::member_pool(profiles) {
        let deposits =
            report::monthly_total(transactions, &profile.id, TransactionKind::Deposit, period);
        let withdrawals =
            report::monthly_total(transactions, &profile.id, TransactionKind::Withdrawal, period);
        let status = if profile.is_debtor() { "DUE" } else { "CLEAR" };
        lines.push(format!(
            "{:<10} {:<22} {:>14} {:>14} {:>14}  {status}",
            profile.id,
            profile.full_name,
            format_money(profile.balance),
            format_money(deposits),
            format_money(withdrawals),
        ));
    }
    lines.push(format!("Period: {}", period.label()));
    lines
}

/// Monthly statement for every employee.
#[must_use]
pub fn monthly_statement(
    profiles: &[Profile],
    transactions: &[Transaction],
    period: &MonthPeriod,
) -> Vec<String> {
    let rows = report::monthly_statement(profiles, transactions, period);
    let mut lines = vec![format!("Statement for {}", period.label())];
    if rows.is_empty() {
        lines.push("No members registered.".to_string());
        return lines;
    }

    let (mut total_in, mut total_out) = (0.0, 0.0);
    for row in &rows {
        total_in += row.deposits;
        total_out += row.withdrawals;
        lines.push(format!(
            "{:<10} {:<22} in {:>12}  out {:>12}  balance {:>12}",
            row.profile_id,
            row.full_name,
            format_money(row.deposits),
            format_money(row.withdrawals),
            format_money(row.balance),
        ));
    }
    lines.push(format!(
        "Totals: in {}  out {}",
        format_money(total_in),
        format_money(total_out)
    ));
    lines
}

/// Transaction feed, most recent first. Dangling profile references render as unknown.
#[must_use]
pub fn activities<'a>(
    profiles: &[Profile],
    transactions: impl IntoIterator<Item = &'a Transaction>,
    offset: FixedOffset,
) -> Vec<String> {
    let lines: Vec<String> = transactions
        .into_iter()
        .map(|t| {
            let owner = profiles.iter().find(|p| p.id == t.profile_id);
            transaction_line(t, owner, offset)
        })
        .collect();
    if lines.is_empty() {
        vec!["No activity recorded.".to_string()]
    } else {
        lines
    }
}

/// One member's history with a heading line.
#[must_use]
pub fn history(
    profile: &Profile,
    transactions: &[Transaction],
    offset: FixedOffset,
) -> Vec<String> {
    let mut lines = vec![format!(
        "History for {} ({}) - balance {}",
        profile.full_name,
        profile.id,
        format_money(profile.balance)
    )];
    let own = report::history_for(transactions, &profile.id);
    if own.is_empty() {
        lines.push("No activity recorded.".to_string());
    } else {
        lines.extend(own.into_iter().map(|t| transaction_line(t, Some(profile), offset)));
    }
    lines
}

/// Profile registry for the administrator.
#[must_use]
pub fn user_management(profiles: &[Profile]) -> Vec<String> {
    let mut lines = Vec::with_capacity(profiles.len() + 2);
    for (index, profile) in profiles.iter().enumerate() {
        let mut line = format!(
            "{:>2}. {:<10} {:<22} {:<26} {:<9} {:>14}",
            index + 1,
            profile.id,
            profile.full_name,
            profile.email,
            profile.role.to_string(),
            format_money(profile.balance)
        );
        if profile.id == ROOT_ADMIN_ID {
            line.push_str("  [protected]");
        }
        lines.push(line);
    }
    lines.push(
        "Commands: register name=..; email=..; pin=..[; id=..][; balance=..], \
         edit <id> key=value;.., delete <id>"
            .to_string(),
    );
    lines
}

/// Employees who owe the fund.
#[must_use]
pub fn due_list(profiles: &[Profile]) -> Vec<String> {
    let debtors = report::debtor_list(profiles);
    let mut lines = vec![format!(
        "Due List - {} member(s) owe {}",
        debtors.len(),
        format_money(report::total_due(profiles))
    )];
    lines.extend(debtors.into_iter().map(|p| {
        format!(
            "{:<10} {:<22} owes {}",
            p.id,
            p.full_name,
            format_money(p.balance.abs())
        )
    }));
    lines
}

/// Every employee with balance.
#[must_use]
pub fn member_pool(profiles: &[Profile]) -> Vec<String> {
    let pool = report::member_pool(profiles);
    let mut lines = vec![format!("Member Pool - {} active", pool.len())];
    lines.extend(pool.into_iter().map(|p| {
        format!(
            "{:<10} {:<22} {:<26} {:>14}",
            p.id,
            p.full_name,
            p.email,
            format_money(p.balance)
        )
    }));
    lines
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{dated_transaction, demo_profiles, gmt6};

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(4200.0), "$4,200.00");
        assert_eq!(format_money(-500.0), "-$500.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(999.999), "$1,000.00");
    }

    #[test]
    fn test_admin_dashboard_figures() {
        let lines = admin_dashboard(&demo_profiles());
        assert!(lines[0].ends_with("$5,800.00"));
        assert!(lines[1].ends_with("$500.00"));
        assert!(lines[2].ends_with('3'));
        assert!(lines[3].ends_with('1'));
    }

    #[test]
    fn test_activities_render_unknown_members() {
        let profiles = demo_profiles();
        let transactions = vec![dated_transaction(
            "t9",
            "EMP-404",
            10.0,
            TransactionKind::Deposit,
            2026,
            1,
            3,
        )];
        let lines = activities(&profiles, &transactions, gmt6());
        assert!(lines[0].contains("(unknown member)"));
        assert!(lines[0].contains("+$10.00"));
        assert!(lines[0].contains("03 Jan 2026"));
    }

    #[test]
    fn test_due_list_names_debtors() {
        let lines = due_list(&demo_profiles());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1 member(s) owe $500.00"));
        assert!(lines[1].contains("Elena Vance"));
    }

    #[test]
    fn test_user_management_marks_root_admin() {
        let lines = user_management(&demo_profiles());
        assert!(lines[0].contains("@admin"));
        assert!(lines[0].ends_with("[protected]"));
        assert!(!lines[1].contains("[protected]"));
    }

    #[test]
    fn test_monthly_statement_shows_current_balance() {
        let period = MonthPeriod::new(2026, 1, gmt6()).unwrap();
        let transactions = vec![dated_transaction(
            "t1",
            "EMP-003",
            500.0,
            TransactionKind::Withdrawal,
            2026,
            1,
            25,
        )];
        let lines = monthly_statement(&demo_profiles(), &transactions, &period);
        let elena = lines.iter().find(|l| l.starts_with("EMP-003")).unwrap();
        assert!(elena.contains("out      $500.00"));
        assert!(elena.ends_with("balance     -$500.00"));
    }
}
