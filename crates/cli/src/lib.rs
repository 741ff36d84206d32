use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use fieldkv_store::{
    Budget, FileChunkStore, KeyValueStore, Medium, RefetchCheck, StoreOptions,
};
use std::path::PathBuf;

use crate::config::{ConflictCheck, Overrides, Settings};

mod config;
mod validate;

#[derive(Parser)]
#[command(name = "fieldkv")]
#[command(about = "Key/value store kept in the text fields of remote records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database to use
    #[arg(long, global = true, default_value = "0")]
    db: String,

    /// Config file (overrides FIELDKV_CONFIG and ./fieldkv.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the collections (overrides FIELDKV_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Record shape: rules|labels
    #[arg(long, global = true)]
    medium: Option<Medium>,

    /// Do not report storage usage
    #[arg(long, global = true)]
    no_info: bool,

    /// Fail instead of starting empty when stored data cannot be decoded
    #[arg(long, global = true)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initializes a new database
    #[command(alias = "i")]
    Init,

    /// Sets a key
    #[command(alias = "s")]
    Set(SetArgs),

    /// Get a value from given key
    #[command(alias = "g")]
    Get(GetArgs),

    /// List all keys
    #[command(alias = "l")]
    List,
}

#[derive(Args)]
struct SetArgs {
    key: String,
    value: String,
}

#[derive(Args)]
struct GetArgs {
    key: String,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(cli).await
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings = config::resolve(&Overrides {
        config: cli.config.clone(),
        data_dir: cli.data_dir.clone(),
        medium: cli.medium,
        no_info: cli.no_info,
        strict: cli.strict,
    })?;
    let kv = open_store(&settings, &cli.db)?;

    match cli.command {
        Commands::Init => {
            kv.init()
                .await
                .with_context(|| format!("Failed to initialize database {}", kv.name()))?;
        }
        Commands::Set(args) => {
            validate::validate_entry(&args.key, &args.value)?;
            kv.set(&args.key, &args.value)
                .await
                .with_context(|| format!("Error updating db {}", kv.name()))?;
        }
        Commands::Get(args) => {
            let value = kv
                .get(&args.key)
                .await
                .with_context(|| format!("Error retrieving database {}", kv.name()))?;
            println!("{}", value.unwrap_or_default());
        }
        Commands::List => {
            let keys = kv
                .list()
                .await
                .with_context(|| format!("Error retrieving database {}", kv.name()))?;
            println!("{}", keys.join("\n"));
        }
    }
    Ok(())
}

fn open_store(settings: &Settings, db: &str) -> Result<KeyValueStore<FileChunkStore>> {
    let budget = Budget::default();
    let remote = FileChunkStore::new(&settings.data_dir, budget);
    let options = StoreOptions {
        medium: settings.medium,
        budget,
        decode_policy: settings.decode_policy,
        report_capacity: !settings.no_info,
        ..StoreOptions::default()
    };

    let name = settings.collection_name(db);
    log::debug!(
        "Opening {} ({} medium) under {}",
        name,
        settings.medium,
        settings.data_dir.display()
    );
    let kv = KeyValueStore::new(remote, name, options).context("Invalid store configuration")?;

    Ok(match settings.conflict_check {
        ConflictCheck::None => kv,
        ConflictCheck::Refetch => kv.with_conflict_hook(RefetchCheck),
    })
}
