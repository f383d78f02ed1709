//! Schemaforge CLI - Command-line interface for the schema persistence engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use schemaforge::config;
use schemaforge::persist;
use schemaforge::snapshot;
use schemaforge::storage::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "schemaforge")]
#[command(version = "0.1.0")]
#[command(about = "Schema-driven persistence engine - dual-sink schema materialization")]
#[command(long_about = r#"
Schemaforge materializes a table/column schema into an embedded SQLite store
and an order-preserving JSON snapshot at the same time, and runs an HTTP
endpoint that accepts uploaded XML documents and reports whether they parse.

Example usage:
  schemaforge persist --schema schema.json --database out.db --snapshot out.json
  schemaforge inspect --database out.db
  schemaforge serve --port 7878
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default schemaforge.toml in the current directory
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Materialize a schema into the store and the JSON snapshot
    Persist {
        /// Path to the schema definition (JSON, same format as the snapshot)
        #[arg(short = 'S', long)]
        schema: PathBuf,

        /// Path to the SQLite store file (defaults from config)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the JSON snapshot (defaults from config)
        #[arg(short = 'j', long)]
        snapshot: Option<PathBuf>,
    },

    /// List the tables present in a store file
    Inspect {
        /// Path to the SQLite store file
        #[arg(short, long, default_value = "schemaforge.db")]
        database: PathBuf,
    },

    /// Run the XML document ingestion endpoint
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7878")]
        port: u16,

        /// Scratch directory for uploaded files (defaults from config)
        #[arg(short, long)]
        uploads: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let loaded = config::load_config(None)?.unwrap_or_default();

    match cli.command {
        Commands::Init { force } => {
            let path = config::default_config_path();
            config::write_config(&path, &config::SchemaforgeConfig::default(), force)?;
            println!("✅ Wrote {}", path.display());
        }

        Commands::Persist { schema, database, snapshot: snapshot_path } => {
            let database = database
                .or(loaded.database.map(PathBuf::from))
                .unwrap_or_else(config::default_database_path);
            let snapshot_path = snapshot_path
                .or(loaded.snapshot.map(PathBuf::from))
                .unwrap_or_else(config::default_snapshot_path);

            let model = snapshot::read(&schema)?;
            println!("🚀 Persisting {} tables", model.table_count());
            println!("🗄️  Store: {:?}", database);
            println!("📄 Snapshot: {:?}", snapshot_path);

            config::ensure_parent_dir(&database)?;
            config::ensure_parent_dir(&snapshot_path)?;

            let outcome = persist::persist(model, &database, &snapshot_path).await;
            match &outcome.store {
                Ok(()) => println!("✅ Store materialized"),
                Err(e) => println!("❌ Store failed: {}", e),
            }
            match &outcome.snapshot {
                Ok(()) => println!("✅ Snapshot written"),
                Err(e) => println!("❌ Snapshot failed: {}", e),
            }

            if !outcome.is_success() {
                anyhow::bail!("persistence finished with failures");
            }
        }

        Commands::Inspect { database } => {
            let store = SqliteStore::open(&database)?;
            let names = store.table_names()?;

            println!("📊 {} ({} tables)", database.display(), names.len());
            for name in names {
                println!("- {}", name);
            }
        }

        Commands::Serve { port, uploads } => {
            let uploads = uploads
                .or(loaded.uploads.map(PathBuf::from))
                .unwrap_or_else(config::default_upload_dir);

            schemaforge::server::start_server(port, uploads).await?;
        }
    }

    Ok(())
}
