// 💳 Account Entity - one occupied slot of the account table
//
// The account number is both the identity and the slot index:
// account N lives in slot N-1 of credit.dat.
//
// Invariants:
// - acct_num in 1..=100
// - names are single printable words that fit their on-disk field
// - balance is finite and inside the valid-record window

use serde::{Deserialize, Serialize};

use crate::error::{BankError, Result};
use crate::record::{Record, FIRST_NAME_LEN, LAST_NAME_LEN};

// ============================================================================
// LIMITS
// ============================================================================

pub const MIN_ACCOUNT: u32 = 1;
pub const MAX_ACCOUNT: u32 = 100;

/// Number of slots in the data file
pub const SLOT_COUNT: usize = MAX_ACCOUNT as usize;

/// Records with balances outside this window are treated as corrupt
pub const MIN_BALANCE: f64 = -1_000_000.0;
pub const MAX_BALANCE: f64 = 10_000_000.0;

pub const MAX_LAST_NAME: usize = LAST_NAME_LEN - 1;
pub const MAX_FIRST_NAME: usize = FIRST_NAME_LEN - 1;

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account number (1-100), doubles as slot index
    pub acct_num: u32,
    pub last_name: String,
    pub first_name: String,
    /// Positive = money owed by the customer
    pub balance: f64,
}

impl Account {
    /// Validated view of a raw record.
    ///
    /// Returns `None` for empty slots and for records that fail the
    /// corruption filter (bad number, out-of-window balance, blank names).
    pub fn from_record(record: &Record) -> Option<Account> {
        if record.is_blank() || validate_account_number(i64::from(record.acct_num)).is_err() {
            return None;
        }
        if !balance_in_window(record.balance) {
            return None;
        }

        let last_name = record.last_name();
        let first_name = record.first_name();
        if last_name.is_empty() || first_name.is_empty() {
            return None;
        }

        Some(Account {
            acct_num: record.acct_num,
            last_name,
            first_name,
            balance: record.balance,
        })
    }

    /// Like [`Account::from_record`], but also rejects a record whose
    /// number does not belong to the slot it was read from.
    pub fn from_slot(slot: usize, record: &Record) -> Option<Account> {
        Account::from_record(record).filter(|a| a.slot() == slot)
    }

    pub fn to_record(&self) -> Record {
        Record::new(self.acct_num, &self.last_name, &self.first_name, self.balance)
    }

    /// Slot index in the data file
    pub fn slot(&self) -> usize {
        slot_index(self.acct_num)
    }

}

// ============================================================================
// NEW ACCOUNT REQUEST
// ============================================================================

/// Unvalidated input for creating an account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAccount {
    pub account_num: i64,
    pub last_name: String,
    pub first_name: String,
    pub balance: f64,
}

impl NewAccount {
    /// Check every field and produce the account to store
    pub fn validate(&self) -> Result<Account> {
        let acct_num = validate_account_number(self.account_num)?;

        let last_name = self.last_name.trim();
        let first_name = self.first_name.trim();
        if last_name.is_empty() || first_name.is_empty() {
            return Err(BankError::MissingName);
        }
        validate_name("Last name", last_name, MAX_LAST_NAME)?;
        validate_name("First name", first_name, MAX_FIRST_NAME)?;

        let balance = validate_balance(self.balance)?;

        Ok(Account {
            acct_num,
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            balance,
        })
    }
}

// ============================================================================
// VALIDATION HELPERS
// ============================================================================

pub fn validate_account_number(num: i64) -> Result<u32> {
    if num < i64::from(MIN_ACCOUNT) || num > i64::from(MAX_ACCOUNT) {
        return Err(BankError::InvalidAccountNumber(num));
    }
    Ok(num as u32)
}

/// Zero-based slot for a validated account number
pub fn slot_index(acct_num: u32) -> usize {
    (acct_num - MIN_ACCOUNT) as usize
}

pub fn balance_in_window(balance: f64) -> bool {
    balance.is_finite() && (MIN_BALANCE..=MAX_BALANCE).contains(&balance)
}

pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(BankError::InvalidAmount);
    }
    Ok(amount)
}

pub fn validate_balance(balance: f64) -> Result<f64> {
    let balance = validate_amount(balance)?;
    if !balance_in_window(balance) {
        return Err(BankError::BalanceOutOfRange(balance));
    }
    Ok(balance)
}

fn validate_name(field: &'static str, name: &str, max: usize) -> Result<()> {
    if name.len() > max {
        return Err(BankError::NameTooLong { field, max });
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(BankError::InvalidName { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn new_account(num: i64, last: &str, first: &str, balance: f64) -> NewAccount {
        NewAccount {
            account_num: num,
            last_name: last.to_string(),
            first_name: first.to_string(),
            balance,
        }
    }

    #[test]
    fn test_validate_trims_names() {
        let account = new_account(12, "  Jones ", " Mary", 99.95).validate().unwrap();

        assert_eq!(account.acct_num, 12);
        assert_eq!(account.last_name, "Jones");
        assert_eq!(account.first_name, "Mary");
        assert_eq!(account.slot(), 11);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(101)]
    fn test_account_number_out_of_range(#[case] num: i64) {
        let err = new_account(num, "Doe", "Jane", 0.0).validate().unwrap_err();
        assert!(matches!(err, BankError::InvalidAccountNumber(n) if n == num));
    }

    #[rstest]
    #[case("", "Jane")]
    #[case("Doe", "   ")]
    fn test_names_required(#[case] last: &str, #[case] first: &str) {
        let err = new_account(1, last, first, 0.0).validate().unwrap_err();
        assert!(matches!(err, BankError::MissingName));
    }

    #[test]
    fn test_name_length_limits() {
        assert!(new_account(1, "Abcdefghijklmn", "Abcdefghi", 0.0).validate().is_ok());

        let err = new_account(1, "Abcdefghijklmno", "Jo", 0.0).validate().unwrap_err();
        assert!(matches!(err, BankError::NameTooLong { max: 14, .. }));

        let err = new_account(1, "Doe", "Abcdefghij", 0.0).validate().unwrap_err();
        assert!(matches!(err, BankError::NameTooLong { max: 9, .. }));
    }

    #[test]
    fn test_name_with_space_rejected() {
        let err = new_account(1, "Van Dyke", "Dick", 0.0).validate().unwrap_err();
        assert!(matches!(err, BankError::InvalidName { field: "Last name" }));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-1_000_000.01)]
    #[case(10_000_000.5)]
    fn test_balance_rejected(#[case] balance: f64) {
        assert!(new_account(1, "Doe", "Jane", balance).validate().is_err());
    }

    #[test]
    fn test_from_record_filters_corruption() {
        assert!(Account::from_record(&Record::blank()).is_none());
        assert!(Account::from_record(&Record::new(150, "Doe", "Jane", 1.0)).is_none());
        assert!(Account::from_record(&Record::new(5, "Doe", "Jane", 5.0e9)).is_none());
        assert!(Account::from_record(&Record::new(5, "Doe", "Jane", f64::NAN)).is_none());
        assert!(Account::from_record(&Record::new(5, "", "Jane", 1.0)).is_none());

        let account = Account::from_record(&Record::new(5, "Doe", "Jane", -12.5)).unwrap();
        assert_eq!(account.acct_num, 5);
        assert_eq!(account.balance, -12.5);
    }

    #[test]
    fn test_from_slot_rejects_misplaced_record() {
        let record = Record::new(5, "Ghost", "Rec", 1.0);
        assert!(Account::from_slot(0, &record).is_none());
        assert_eq!(Account::from_slot(4, &record).unwrap().acct_num, 5);
    }

    #[test]
    fn test_record_conversion_preserves_account() {
        let account = new_account(64, "Okafor", "Chidi", 1500.25).validate().unwrap();
        let back = Account::from_record(&account.to_record()).unwrap();
        assert_eq!(back, account);
    }
}
