pub mod demo;
pub mod download;
pub mod init;
pub mod periods;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fiscus", about = "Account Download reporting over a federal spending warehouse.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the warehouse database.
    Init {
        /// Path for fiscus data (default: platform data dir)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Load a small sample warehouse to explore the download files.
    Demo,
    /// Run an account download (File A, B, or C).
    Download {
        /// account_balances | object_class_program_activity | award_financial
        #[arg(long = "account-type")]
        account_type: String,
        /// treasury_account | federal_account
        #[arg(long = "account-level", default_value = "treasury_account")]
        account_level: String,
        /// Fiscal year
        #[arg(long)]
        fy: Option<i32>,
        /// Fiscal quarter (1-4)
        #[arg(long)]
        quarter: Option<u8>,
        /// Fiscal period (1-12)
        #[arg(long)]
        period: Option<u8>,
        /// Funding toptier agency id
        #[arg(long)]
        agency: Option<i64>,
        /// Federal account id
        #[arg(long = "federal-account")]
        federal_account: Option<i64>,
        /// Budget function code
        #[arg(long = "budget-function")]
        budget_function: Option<String>,
        /// Budget subfunction code
        #[arg(long = "budget-subfunction")]
        budget_subfunction: Option<String>,
        /// Disaster emergency fund codes (comma-separated)
        #[arg(long = "def-codes", value_delimiter = ',')]
        def_codes: Vec<String>,
        /// Output format: csv | json
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<String>,
        /// Page size; omit to return everything
        #[arg(long)]
        limit: Option<usize>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort order: asc | desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// List submission periods recorded for a fiscal year.
    Periods {
        /// Fiscal year
        #[arg(long)]
        fy: i32,
    },
}
