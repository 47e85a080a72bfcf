use crate::demo::{run_demo, run_register, run_status, DemoArgs, RegisterArgs, StatusArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use harvest_quota::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Harvest Quota",
    about = "Run the crop registration quota service or evaluate registrations from the command line",
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
    /// Evaluate a single registration against freshly seeded stores
    Register(RegisterArgs),
    /// Show the capacity bucket a planting would harvest into
    Status(StatusArgs),
    /// Fill one harvest bucket and print each decision along the way
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Capacity limits CSV (crop_name,harvest_month,max_farmers)
    #[arg(long)]
    pub(crate) limits_csv: Option<PathBuf>,
    /// Override the capacity used when no limit is stored
    #[arg(long)]
    pub(crate) default_max_farmers: Option<u32>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Register(args) => run_register(args).await,
        Command::Status(args) => run_status(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
