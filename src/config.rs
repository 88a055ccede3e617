use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal budget and spending tracker",
    long_about = "fintrack records transactions against monthly category budgets \
                  and reports budget usage and spending trends."
)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "FINTRACK_DB", default_value = "finance_tracker.db")]
    pub db: PathBuf,

    /// Directory holding categories.csv and transactions.csv seed files
    #[arg(long, env = "FINTRACK_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Log level for the fintrack target when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "fintrack",
            "--db",
            "/tmp/budget.db",
            "--data-dir",
            "/tmp/seed",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/budget.db"));
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/seed"));
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["fintrack", "--verbose"]).is_err());
    }
}
