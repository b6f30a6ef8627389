//! Attesta CLI — Command-line client for the identity commitment registry.
//!
//! Subcommands: init, start, status, register, verify, revoke, check,
//! add-verifier, remove-verifier, verifiers, events.

mod commands;

use clap::{Parser, Subcommand};

/// Attesta — identity commitment registry.
#[derive(Parser, Debug)]
#[command(name = "attesta", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new Attesta node configuration.
    Init(commands::init::InitArgs),
    /// Start the Attesta node.
    Start(commands::start::StartArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Register an identity commitment.
    Register(commands::register::RegisterArgs),
    /// Verify a registered commitment.
    Verify(commands::verify::VerifyArgs),
    /// Revoke a registered or verified commitment.
    Revoke(commands::revoke::RevokeArgs),
    /// Check the status of a commitment.
    Check(commands::check::CheckArgs),
    /// Grant the verifier capability to a principal (owner only).
    AddVerifier(commands::add_verifier::AddVerifierArgs),
    /// Withdraw the verifier capability from a principal (owner only).
    RemoveVerifier(commands::remove_verifier::RemoveVerifierArgs),
    /// List the current verifier set.
    Verifiers(commands::verifiers::VerifiersArgs),
    /// Fetch the audit event feed.
    Events(commands::events::EventsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Start(args) => commands::start::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Register(args) => commands::register::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Check(args) => commands::check::run(args).await,
        Commands::AddVerifier(args) => commands::add_verifier::run(args).await,
        Commands::RemoveVerifier(args) => commands::remove_verifier::run(args).await,
        Commands::Verifiers(args) => commands::verifiers::run(args).await,
        Commands::Events(args) => commands::events::run(args).await,
    }
}
