use clap::{Parser, Subcommand, ValueEnum};

use crate::store::ResultFilter;

#[derive(Parser)]
#[command(name = "logsift")]
#[command(about = "Scan manufacturing test logs for flagged units", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Scan a directory of log files")]
    Scan {
        #[arg(help = "Directory containing the log files")]
        dir: String,
        #[arg(short = 'F', long, default_value = "human")]
        format: OutputFormat,
        #[arg(short, long, help = "Write output to a file instead of stdout")]
        out: Option<String>,
        #[arg(short, long, default_value = "all", help = "Restrict displayed/exported rows")]
        filter: ResultFilter,
        #[arg(long, help = "Also report qualifying files without the invalidity marker")]
        include_valid: bool,
        #[arg(short, long, help = "Suppress the live progress line")]
        quiet: bool,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Subcommand)]
pub enum ConfigActions {
    #[command(about = "Show the current rule configuration")]
    Show,
    #[command(about = "Set a rule value")]
    Set {
        #[arg(short, long)]
        key: String,
        #[arg(short, long)]
        value: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
