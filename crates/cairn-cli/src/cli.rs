use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cairn",
    about = "Cairn: content metadata registry with pin coordination",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the integrity hash of an identifier
    Digest(DigestArgs),
    /// Check an identifier against a claimed integrity hash
    VerifyDigest(VerifyDigestArgs),
    /// Publish a file to an in-memory instance and show the receipt
    Publish(PublishArgs),
    /// Run the reference scenarios against in-memory backends
    Demo,
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct DigestArgs {
    pub identifier: String,
}

#[derive(Args)]
pub struct VerifyDigestArgs {
    pub identifier: String,
    pub hash: String,
}

#[derive(Args)]
pub struct PublishArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long)]
    pub media_ref: Option<String>,
}
