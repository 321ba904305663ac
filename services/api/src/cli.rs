use crate::demo::{run_preview, run_rating, PreviewArgs, RatingArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_profiler::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Risk Profiler",
    about = "Run the attitude-to-risk questionnaire service from the command line",
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
    /// Compile the report template with canned answers and write the HTML
    /// to a file for inspection in a browser
    Preview(PreviewArgs),
    /// Derive a risk rating for a canned answer profile and print it
    Rating(RatingArgs),
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
        Command::Preview(args) => run_preview(args),
        Command::Rating(args) => run_rating(args),
    }
}
