// Bank Account Manager - Account Service
// Business rules over the record store: the operations behind every endpoint

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::entities::account::{
    slot_index, validate_account_number, validate_amount, validate_balance, SLOT_COUNT,
};
use crate::entities::{Account, NewAccount};
use crate::error::{BankError, Result};
use crate::export::{self, ExportFormat, ExportSummary};
use crate::sorting::{sort_accounts, SortOutcome, SortRequest};
use crate::store::CreditFile;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Balance change applied by [`AccountService::update_account`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceUpdate {
    pub before: Account,
    pub after: Account,
    pub transaction: f64,
}

/// Health of the data file
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub data_file: String,
    pub exists: bool,
    pub slots_on_disk: usize,
    pub slot_capacity: usize,
    pub active_accounts: usize,
    pub checked_at: DateTime<Utc>,
}

// ============================================================================
// SERVICE
// ============================================================================

/// Owns the data file and the export directory.
///
/// Not thread-safe on its own; the web server wraps it in a mutex.
#[derive(Debug)]
pub struct AccountService {
    store: CreditFile,
    export_dir: PathBuf,
}

impl AccountService {
    pub fn new(store: CreditFile, export_dir: impl Into<PathBuf>) -> Self {
        AccountService {
            store,
            export_dir: export_dir.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Valid accounts in slot order.
    ///
    /// If the data file holds none but a text export exists, the export is
    /// read instead so the page is not empty after a data file reset.
    pub fn list_accounts(&mut self) -> Result<Vec<Account>> {
        let accounts = self.stored_accounts()?;
        if !accounts.is_empty() {
            return Ok(accounts);
        }

        let text_path = self.export_dir.join(export::TEXT_EXPORT_FILE);
        if !text_path.exists() {
            return Ok(accounts);
        }

        info!("No accounts in data file, reading {}", text_path.display());
        match export::read_text_export(&text_path) {
            Ok(fallback) => {
                info!("Found {} accounts in text export", fallback.len());
                Ok(fallback)
            }
            Err(e) => {
                warn!("Could not read {}: {}", text_path.display(), e);
                Ok(accounts)
            }
        }
    }

    pub fn get_account(&mut self, account_num: i64) -> Result<Account> {
        let acct_num = validate_account_number(account_num)?;
        self.load(acct_num)?.ok_or(BankError::AccountNotFound(acct_num))
    }

    pub fn add_account(&mut self, new: &NewAccount) -> Result<Account> {
        let account = new.validate()?;

        let existing = self.store.read_slot(account.slot())?;
        if !existing.is_blank() {
            return Err(BankError::AccountExists(account.acct_num));
        }

        self.store.write_slot(account.slot(), &account.to_record())?;
        info!("Added account #{}", account.acct_num);
        Ok(account)
    }

    /// Apply a charge (positive) or payment (negative)
    pub fn update_account(&mut self, account_num: i64, transaction: f64) -> Result<BalanceUpdate> {
        let acct_num = validate_account_number(account_num)?;
        let transaction = validate_amount(transaction)?;

        let before = self.load(acct_num)?.ok_or(BankError::AccountNotFound(acct_num))?;
        let mut after = before.clone();
        after.balance = validate_balance(before.balance + transaction)?;

        self.store.write_slot(after.slot(), &after.to_record())?;
        info!(
            "Updated account #{}: {:.2} -> {:.2}",
            acct_num, before.balance, after.balance
        );

        Ok(BalanceUpdate {
            before,
            after,
            transaction,
        })
    }

    pub fn delete_account(&mut self, account_num: i64) -> Result<Account> {
        let acct_num = validate_account_number(account_num)?;
        let slot = slot_index(acct_num);

        let record = self.store.read_slot(slot)?;
        if record.is_blank() {
            return Err(BankError::AccountNotFound(acct_num));
        }

        self.store.clear_slot(slot)?;
        info!("Deleted account #{}", acct_num);

        // A corrupt record is still removed; report what could be read
        Ok(Account::from_slot(slot, &record).unwrap_or_else(|| Account {
            acct_num,
            last_name: record.last_name(),
            first_name: record.first_name(),
            balance: record.balance,
        }))
    }

    /// Write every valid account to the export directory
    pub fn export(&mut self, format: ExportFormat) -> Result<ExportSummary> {
        let accounts = self.stored_accounts()?;
        let path = self.export_dir.join(format.file_name());

        match format {
            ExportFormat::Text => export::write_text(&path, &accounts)?,
            ExportFormat::Csv => export::write_csv(&path, &accounts)?,
        }
        info!("Exported {} accounts to {}", accounts.len(), path.display());

        Ok(ExportSummary {
            path: path.display().to_string(),
            format,
            count: accounts.len(),
            exported_at: Utc::now(),
        })
    }

    pub fn sort(&mut self, request: SortRequest) -> Result<SortOutcome> {
        let accounts = self.stored_accounts()?;
        info!("Sorting {} accounts: {}", accounts.len(), request);
        sort_accounts(accounts, request)
    }

    pub fn status(&mut self) -> Result<StoreStatus> {
        let slots_on_disk = self.store.slots_on_disk()?;
        let active_accounts = self.stored_accounts()?.len();

        Ok(StoreStatus {
            data_file: self.store.path().display().to_string(),
            exists: self.store.path().exists(),
            slots_on_disk,
            slot_capacity: SLOT_COUNT,
            active_accounts,
            checked_at: Utc::now(),
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn load(&mut self, acct_num: u32) -> Result<Option<Account>> {
        let slot = slot_index(acct_num);
        let record = self.store.read_slot(slot)?;
        Ok(Account::from_slot(slot, &record))
    }

    fn stored_accounts(&mut self) -> Result<Vec<Account>> {
        let records = self.store.scan()?;
        let total = records.iter().filter(|r| !r.is_blank()).count();
        let accounts: Vec<Account> = records
            .iter()
            .enumerate()
            .filter_map(|(slot, record)| Account::from_slot(slot, record))
            .collect();

        if accounts.len() < total {
            warn!(
                "Filtered {} corrupt records from {}",
                total - accounts.len(),
                self.store.path().display()
            );
        }
        Ok(accounts)
    }
}
