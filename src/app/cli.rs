use crate::app::commands::{
    run_compatible, run_donation_check, run_inventory_report, CompatibleArgs, DonationArgs,
    InventoryReportArgs,
};
use crate::app::server;
use crate::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Blood Bank Eligibility",
    about = "Run the blood bank eligibility service or evaluate checks from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Screen a donor health profile against the donation policy
    Donation(DonationArgs),
    /// List donor blood types compatible with a recipient and their stock
    Compatible(CompatibleArgs),
    /// Inventory dashboards built from CSV snapshots
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum InventoryCommand {
    /// Print the triage-ordered inventory report
    Report(InventoryReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Donation(args) => run_donation_check(args),
        Command::Compatible(args) => run_compatible(args),
        Command::Inventory {
            command: InventoryCommand::Report(args),
        } => run_inventory_report(args),
    }
}
