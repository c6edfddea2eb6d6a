//! Line commands understood by the console once a session is open.
//!
//! Member forms use `key=value` pairs separated by `;` so names may contain
//! spaces: `register name=Dana Scully; email=dana@createever.com; pin=4444`.

use crate::{
    console::Tab,
    core::member::MemberForm,
    entities::TransactionKind,
    errors::{Error, Result},
};

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the command list
    Help,
    /// Re-render the current tab
    Show,
    /// Switch tab
    Open(Tab),
    /// Start a deposit or withdrawal, optionally with the amount
    Transact {
        /// Deposit or withdrawal
        kind: TransactionKind,
        /// Target profile id
        profile_id: String,
        /// Amount typed inline
        amount: Option<String>,
    },
    /// Show one member's transactions
    History(String),
    /// Show employees in debt
    DueList,
    /// Show every employee
    MemberPool,
    /// Select the statement month
    Month {
        /// 1 through 12
        month: u32,
        /// Keeps the current year when absent
        year: Option<i32>,
    },
    /// Register a new member
    Register(MemberForm),
    /// Edit an existing member; absent fields keep their values
    Edit {
        /// Profile being edited
        profile_id: String,
        /// Fields supplied on the command line
        fields: Vec<(String, String)>,
    },
    /// Ask to delete a member
    Delete(String),
    /// Confirm the pending deletion or transaction
    Confirm,
    /// Abort the pending deletion or transaction
    Cancel,
    /// End the session
    Logout,
    /// Leave the console
    Quit,
}

fn required_arg(rest: &str, usage: &'static str) -> Result<String> {
    let arg = rest.split_whitespace().next().unwrap_or_default();
    if arg.is_empty() {
        Err(Error::MissingField { field: usage })
    } else {
        Ok(arg.to_string())
    }
}

/// Splits `key=value; key=value` into trimmed pairs.
pub fn parse_fields(input: &str) -> Result<Vec<(String, String)>> {
    input
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.split_once('=')
                .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
                .ok_or_else(|| Error::UnknownCommand {
                    input: part.to_string(),
                })
        })
        .collect()
}

/// Applies parsed fields onto a member form.
pub fn apply_fields(form: &mut MemberForm, fields: &[(String, String)]) -> Result<()> {
    for (key, value) in fields {
        match key.as_str() {
            "id" => form.id = Some(value.clone()),
            "name" | "full_name" => form.full_name.clone_from(value),
            "email" => form.email.clone_from(value),
            "pin" => form.pin.clone_from(value),
            "balance" => form.balance = Some(value.clone()),
            _ => {
                return Err(Error::UnknownCommand {
                    input: format!("{key}={value}"),
                });
            }
        }
    }
    Ok(())
}

/// Parses one input line.
pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "show" | "" => Command::Show,
        "tab" | "open" => Command::Open(Tab::parse(rest).ok_or_else(|| Error::UnknownCommand {
            input: line.to_string(),
        })?),
        "deposit" | "withdraw" => {
            let kind = if word.eq_ignore_ascii_case("deposit") {
                TransactionKind::Deposit
            } else {
                TransactionKind::Withdrawal
            };
            let mut args = rest.split_whitespace();
            let profile_id = args
                .next()
                .ok_or(Error::MissingField { field: "member id" })?
                .to_string();
            Command::Transact {
                kind,
                profile_id,
                amount: args.next().map(ToString::to_string),
            }
        }
        "history" => Command::History(required_arg(rest, "member id")?),
        "due" => Command::DueList,
        "pool" | "members" => Command::MemberPool,
        "month" => {
            let mut args = rest.split_whitespace();
            let month = args
                .next()
                .and_then(|m| m.parse().ok())
                .ok_or(Error::MissingField { field: "month" })?;
            let year = match args.next() {
                Some(raw) => Some(raw.parse().map_err(|_| Error::UnknownCommand {
                    input: line.to_string(),
                })?),
                None => None,
            };
            Command::Month { month, year }
        }
        "register" => {
            let mut form = MemberForm::default();
            apply_fields(&mut form, &parse_fields(rest)?)?;
            Command::Register(form)
        }
        "edit" => {
            let (profile_id, fields) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if profile_id.is_empty() {
                return Err(Error::MissingField { field: "member id" });
            }
            Command::Edit {
                profile_id: profile_id.to_string(),
                fields: parse_fields(fields)?,
            }
        }
        "delete" => Command::Delete(required_arg(rest, "member id")?),
        "confirm" | "yes" | "y" => Command::Confirm,
        "cancel" | "no" | "n" => Command::Cancel,
        "logout" => Command::Logout,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(Error::UnknownCommand {
                input: line.to_string(),
            });
        }
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_transaction_commands() {
        assert_eq!(
            parse("deposit EMP-001 250").unwrap(),
            Command::Transact {
                kind: TransactionKind::Deposit,
                profile_id: "EMP-001".to_string(),
                amount: Some("250".to_string()),
            }
        );
        assert_eq!(
            parse("WITHDRAW EMP-002").unwrap(),
            Command::Transact {
                kind: TransactionKind::Withdrawal,
                profile_id: "EMP-002".to_string(),
                amount: None,
            }
        );
        assert!(matches!(parse("deposit"), Err(Error::MissingField { .. })));
    }

    #[test]
    fn test_parse_register_with_spaces_in_name() {
        let Command::Register(form) =
            parse("register name=Dana Scully; email=dana@createever.com; pin=4444; balance=10")
                .unwrap()
        else {
            panic!("expected register");
        };
        assert_eq!(form.full_name, "Dana Scully");
        assert_eq!(form.email, "dana@createever.com");
        assert_eq!(form.pin, "4444");
        assert_eq!(form.balance.as_deref(), Some("10"));
        assert!(form.id.is_none());
    }

    #[test]
    fn test_parse_edit_fields() {
        assert_eq!(
            parse("edit EMP-002 name=Marcus Bell Jr.").unwrap(),
            Command::Edit {
                profile_id: "EMP-002".to_string(),
                fields: vec![("name".to_string(), "Marcus Bell Jr.".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_month_and_tabs() {
        assert_eq!(
            parse("month 2 2026").unwrap(),
            Command::Month {
                month: 2,
                year: Some(2026)
            }
        );
        assert_eq!(
            parse("tab all data").unwrap(),
            Command::Open(Tab::AllData)
        );
        assert!(parse("month").is_err());
    }

    #[test]
    fn test_unknown_input_is_reported() {
        assert!(matches!(
            parse("launch rockets"),
            Err(Error::UnknownCommand { .. })
        ));
        assert!(matches!(
            parse("register name"),
            Err(Error::UnknownCommand { .. })
        ));
        assert!(matches!(
            parse("register colour=blue"),
            Err(Error::UnknownCommand { .. })
        ));
    }
}
