use clap::Parser;
use std::path::PathBuf;

/// Monthly report picker for the terminal
#[derive(Parser, Debug)]
#[command(name = "mesdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Override config directory path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (TRACE level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of months offered in the period list (overrides settings.toml)
    #[arg(long, value_name = "N")]
    pub months: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mesdoc"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert!(cli.months.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli =
            Cli::try_parse_from(["mesdoc", "--config", "/tmp/cfg", "-v", "--months", "12"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cfg")));
        assert!(cli.verbose);
        assert_eq!(cli.months, Some(12));
    }

    #[test]
    fn test_rejects_non_numeric_months() {
        assert!(Cli::try_parse_from(["mesdoc", "--months", "many"]).is_err());
    }
}
