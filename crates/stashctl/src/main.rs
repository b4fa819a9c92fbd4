//! stashctl - read, write and inspect a stashline chain

mod chain;
mod origin;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stashline::{namespace, KeyTransform};
use tracing::info;

use crate::chain::Chain;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Redis URL of the shared tier, e.g. redis://127.0.0.1:6379
    #[arg(short, long)]
    redis: Option<String>,

    /// Namespace of keys in the shared tier
    #[arg(short, long, default_value = "stash")]
    namespace: String,

    /// Expiry of entries written to the shared tier (seconds)
    #[arg(short, long, default_value_t = 60)]
    ttl: u64,

    /// Directory used as the origin tier, one file per key
    #[arg(short, long)]
    origin_dir: Option<PathBuf>,

    /// Expiry of entries in the in-process tier (seconds), none by default
    #[arg(long)]
    local_ttl: Option<u64>,

    /// Capacity of the in-process tier (number of items)
    #[arg(long, default_value_t = 10000)]
    local_capacity: usize,

    /// Fail when redis is unreachable instead of falling through
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read keys through the chain, promoting hits into faster tiers
    Get {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Write a value into every writable tier
    Set { key: String, value: String },
    /// Print the physical key the shared tier uses for each key
    Key {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Key { keys } => {
            let transform = namespace(args.namespace.as_str());
            for key in keys {
                println!("{}", transform.derive(key.as_str()));
            }
        }
        Command::Get { keys } => {
            let chain = Chain::build(&args).await?;
            for key in keys {
                let value = chain
                    .get(key)
                    .await
                    .with_context(|| format!("Failed to read {}", key))?;
                match value {
                    Some(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
                    None => println!("(nil)"),
                }
            }
            let stats = chain.local().stats();
            info!(
                tiers = ?chain.tiers(),
                hits = stats.hits(),
                misses = stats.misses(),
                "local tier"
            );
        }
        Command::Set { key, value } => {
            let chain = Chain::build(&args).await?;
            chain
                .set(key, value.clone().into_bytes())
                .await
                .with_context(|| format!("Failed to write {}", key))?;
            println!("OK");
        }
    }

    Ok(())
}
