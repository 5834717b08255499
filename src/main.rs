// Bank Account Manager - Command Line
// Manage the credit.dat account table without the web server

use std::path::PathBuf;

use anyhow::{Context, Result};
use bank_manager::export::render_table;
use bank_manager::{
    AccountService, CreditFile, ExportFormat, NewAccount, SortCriterion, SortOrder, SortOutcome,
    SortRequest, StorageConfig,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bank-manager", version, about = "Manage the 100-slot bank account table")]
struct Cli {
    #[command(flatten)]
    storage: StorageConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a data file of 100 blank records
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Account(AccountCommand),
}

/// Commands that operate on an open data file
#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// List all accounts
    List,
    /// Show one account
    Show { account: i64 },
    /// Add a new account
    Add {
        account: i64,
        last_name: String,
        first_name: String,
        #[arg(allow_negative_numbers = true)]
        balance: f64,
    },
    /// Apply a charge (+) or payment (-)
    Update {
        account: i64,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Delete an account
    Delete { account: i64 },
    /// Write accounts.txt or accounts.csv
    Export {
        #[arg(long, default_value = "text")]
        format: ExportFormat,
        /// Override the export directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Sort accounts or show the max/min balance
    Sort {
        #[arg(long, default_value = "balance")]
        by: SortCriterion,
        #[arg(long, default_value = "desc")]
        order: SortOrder,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut storage = cli.storage;

    match cli.command {
        Command::Init { force } => run_init(&storage, force),
        Command::Account(command) => {
            if let AccountCommand::Export { dir: Some(dir), .. } = &command {
                storage.export_dir = dir.clone();
            }
            let mut service = storage
                .open_service()
                .with_context(|| format!("Failed to open {}", storage.data_file.display()))?;
            run_command(&mut service, command)
        }
    }
}

fn run_init(storage: &StorageConfig, force: bool) -> Result<()> {
    if storage.data_file.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            storage.data_file.display()
        );
    }
    CreditFile::create(&storage.data_file)
        .with_context(|| format!("Failed to create {}", storage.data_file.display()))?;
    println!("✓ Created {} with 100 blank records", storage.data_file.display());
    Ok(())
}

fn run_command(service: &mut AccountService, command: AccountCommand) -> Result<()> {
    match command {
        AccountCommand::List => {
            let accounts = service.list_accounts()?;
            print!("{}", render_table(&accounts));
            println!("\n{} accounts", accounts.len());
        }
        AccountCommand::Show { account } => {
            let account = service.get_account(account)?;
            print!("{}", render_table(&[account]));
        }
        AccountCommand::Add {
            account,
            last_name,
            first_name,
            balance,
        } => {
            let added = service.add_account(&NewAccount {
                account_num: account,
                last_name,
                first_name,
                balance,
            })?;
            println!("✓ Account #{} added", added.acct_num);
        }
        AccountCommand::Update { account, amount } => {
            let update = service.update_account(account, amount)?;
            print!("{}", render_table(&[update.before, update.after]));
        }
        AccountCommand::Delete { account } => {
            let deleted = service.delete_account(account)?;
            println!("✓ Account #{} deleted", deleted.acct_num);
        }
        AccountCommand::Export { format, .. } => {
            let summary = service.export(format)?;
            println!("✓ Exported {} accounts to {}", summary.count, summary.path);
        }
        AccountCommand::Sort { by, order } => {
            let request = SortRequest {
                criterion: by,
                order,
            };
            let outcome = service.sort(request)?;
            println!("{}\n", request.describe());
            match outcome {
                SortOutcome::Sorted(accounts) => print!("{}", render_table(&accounts)),
                SortOutcome::Extreme(account) => print!("{}", render_table(&[account])),
            }
        }
    }
    Ok(())
}
