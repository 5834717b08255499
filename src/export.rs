// Bank Account Manager - Export
// Fixed-width accounts.txt, CSV export, and the console table

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::entities::account::validate_account_number;
use crate::entities::Account;
use crate::error::Result;

pub const TEXT_EXPORT_FILE: &str = "accounts.txt";
pub const CSV_EXPORT_FILE: &str = "accounts.csv";

// ============================================================================
// FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Csv,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => TEXT_EXPORT_FILE,
            ExportFormat::Csv => CSV_EXPORT_FILE,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

/// Result of a completed export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: String,
    pub format: ExportFormat,
    pub count: usize,
    pub exported_at: DateTime<Utc>,
}

// ============================================================================
// RENDERING
// ============================================================================

/// Left-align to a width counted in bytes, like printf's `%-Ns`.
///
/// `{:<N}` counts chars, which drifts on multi-byte names.
fn pad_bytes(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(s.len()));
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(s.len())));
    out
}

/// accounts.txt contents: a header line then one fixed-width row per account
pub fn render_text(accounts: &[Account]) -> String {
    let mut out = format!(
        "{:<6}{:<16}{:<11}{:>10}\n",
        "Acct", "Last Name", "First Name", "Balance"
    );
    for a in accounts {
        let _ = writeln!(
            out,
            "{:<6}{}{}{:>10.2}",
            a.acct_num,
            pad_bytes(&a.last_name, 16),
            pad_bytes(&a.first_name, 11),
            a.balance
        );
    }
    out
}

/// Console listing used by the command-line tool
pub fn render_table(accounts: &[Account]) -> String {
    let mut out = format!(
        "{:<6}{:<16}{:<11}{:<15}\n",
        "Acct", "Last Name", "First Name", "Balance"
    );
    out.push_str(&"=".repeat(52));
    out.push('\n');
    for a in accounts {
        let _ = writeln!(
            out,
            "{:<6}{}{}{:<15.2}",
            a.acct_num,
            pad_bytes(&a.last_name, 16),
            pad_bytes(&a.first_name, 11),
            a.balance
        );
    }
    out
}

pub fn write_text(path: &Path, accounts: &[Account]) -> Result<()> {
    std::fs::write(path, render_text(accounts))?;
    Ok(())
}

pub fn write_csv(path: &Path, accounts: &[Account]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for account in accounts {
        writer.serialize(account)?;
    }
    writer.flush()?;
    Ok(())
}

// ============================================================================
// TEXT EXPORT READER (fallback listing)
// ============================================================================

/// Parse a previously written accounts.txt.
///
/// Lenient: the header, blank lines, rule lines and anything that does not
/// look like `acct last first balance` are skipped.
pub fn read_text_export(path: &Path) -> Result<Vec<Account>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_text_export(&content))
}

pub fn parse_text_export(content: &str) -> Vec<Account> {
    content
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-') && !line.starts_with('='))
        .filter_map(|line| match parse_row(line) {
            Some(account) => Some(account),
            None => {
                warn!("Skipping unreadable export line: {:?}", line);
                None
            }
        })
        .collect()
}

fn parse_row(line: &str) -> Option<Account> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let acct_num = parts[0].parse::<i64>().ok()?;
    let acct_num = validate_account_number(acct_num).ok()?;
    let balance = parts[3].parse::<f64>().ok().filter(|b| b.is_finite())?;

    Some(Account {
        acct_num,
        last_name: parts[1].to_string(),
        first_name: parts[2].to_string(),
        balance,
    })
}
