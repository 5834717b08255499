// Bank Account Manager - Configuration
// Command-line flags with environment fallbacks, shared by both binaries

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::service::AccountService;
use crate::store::CreditFile;

pub const DEFAULT_DATA_FILE: &str = "credit.dat";
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// Where the account table and its exports live
#[derive(Args, Debug, Clone)]
pub struct StorageConfig {
    /// Path to the 100-slot binary data file
    #[arg(long, env = "BANK_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Directory that receives accounts.txt / accounts.csv
    #[arg(long, env = "BANK_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Fail instead of creating a missing data file
    #[arg(long, env = "BANK_NO_CREATE")]
    pub no_create: bool,
}

impl StorageConfig {
    /// Open the data file (creating it unless `no_create`) and build the service
    pub fn open_service(&self) -> Result<AccountService> {
        let store = if self.no_create {
            CreditFile::open(&self.data_file)?
        } else {
            CreditFile::open_or_create(&self.data_file)?
        };
        Ok(AccountService::new(store, self.export_dir.clone()))
    }
}

/// Web server settings
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "BANK_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Directory served under /static
    #[arg(long, env = "BANK_STATIC_DIR", default_value = "web")]
    pub static_dir: PathBuf,
}
