use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use fxdash::core::CommissionKind;
use fxdash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CommissionArg {
    Percentage,
    Fixed,
}

impl From<CommissionArg> for CommissionKind {
    fn from(arg: CommissionArg) -> CommissionKind {
        match arg {
            CommissionArg::Percentage => CommissionKind::Percentage,
            CommissionArg::Fixed => CommissionKind::Fixed,
        }
    }
}

impl From<Commands> for fxdash::AppCommand {
    fn from(cmd: Commands) -> fxdash::AppCommand {
        match cmd {
            Commands::Currencies => fxdash::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                commission_type,
                commission,
            } => fxdash::AppCommand::Convert {
                amount,
                from,
                to,
                commission_type: commission_type.map(Into::into),
                commission,
            },
            Commands::Rates { base, limit } => fxdash::AppCommand::Rates { base, limit },
            Commands::Dashboard => fxdash::AppCommand::Dashboard,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List tracked currencies with their latest rates
    Currencies,
    /// Convert an amount, optionally simulating a transfer commission
    Convert {
        /// Amount in the source currency
        amount: String,
        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,
        /// Destination currency code
        #[arg(short, long)]
        to: Option<String>,
        /// How the commission is charged
        #[arg(long, value_enum)]
        commission_type: Option<CommissionArg>,
        /// Commission value, a percentage or a fee in the source currency
        #[arg(long)]
        commission: Option<String>,
    },
    /// Show rates relative to a base currency
    Rates {
        /// Base currency code
        #[arg(short, long)]
        base: Option<String>,
        /// Maximum number of rates to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Start the interactive dashboard
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxdash::cli::setup::setup(),
        Some(cmd) => fxdash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
