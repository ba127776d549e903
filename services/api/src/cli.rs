use crate::seed::{run_init_db, run_seed, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use club_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Club Intake",
    about = "Serve and administer the club website's contact and recruitment forms",
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
    /// Connect to MongoDB and create the collections' indexes
    InitDb,
    /// Insert sample contact messages and applications
    Seed(SeedArgs),
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
        Command::InitDb => run_init_db().await,
        Command::Seed(args) => run_seed(args).await,
    }
}
