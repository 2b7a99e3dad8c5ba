//! bookmarks-init CLI - prepare the database and secrets for the bookmarks service

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use bookmarks_init::output::OutputFormat;
use bookmarks_init::secret::{self, SECRET_KEY_NAME};
use bookmarks_init::storage::{self, SchemaStore, LATEST_VERSION};
use bookmarks_init::ui::{self, Icons};
use bookmarks_init::{Error, Initializer, SetupConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookmarks-init")]
#[command(version)]
#[command(about = "Setup utility for the bookmarks service")]
#[command(long_about = r#"
Prepares a bookmarks deployment:
  • Creates the SQLite schema (idempotent, versioned)
  • Generates the session-signing SECRET_KEY

The database location comes from --database, BOOKMARKS_DATABASE_PATH
(read from the environment or .env), or bookmarks.toml.

Example usage:
  bookmarks-init
  bookmarks-init status --format json
  bookmarks-init secret
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress informational output (errors and warnings still go to stderr)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Dotenv file to load settings from and store secrets in
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// Optional TOML configuration file
    #[arg(long, global = true, default_value = "bookmarks.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema if needed and report its version (default)
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Print the stored schema version without modifying anything
    Version {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show schema version, missing objects and row counts
    Status {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate a new session-signing secret and save it to the env file
    Secret {
        /// Key to store the secret under
        #[arg(short, long, default_value = SECRET_KEY_NAME)]
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    let Cli {
        verbose,
        quiet,
        env_file,
        config,
        command,
    } = Cli::parse();

    bookmarks_init::output::set_quiet(quiet);

    // Initialize logging
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match command.unwrap_or(Commands::Init { database: None }) {
        Commands::Init { database } => {
            let setup = resolve_setup(database, &env_file, &config)?;
            let initializer = Initializer::new(setup);

            let report = initializer.run()?;
            if report.created {
                ui::header("Creating database");
            }
            if report.is_newer_than_supported() {
                ui::warn(&format!(
                    "Schema version {} is newer than this tool supports ({})",
                    report.version, LATEST_VERSION
                ));
            }
            for version in &report.applied {
                ui::status(Icons::WRENCH, "Upgraded to", &version.to_string());
            }
            ui::success(&format!("Database is at version {}", report.version));
        }

        Commands::Version { database } => {
            let setup = resolve_setup(database, &env_file, &config)?;
            match storage::get_version(&setup.database_path)? {
                Some(version) => println!("Database is at version {}", version),
                None => {
                    ui::warn(&format!(
                        "{} is not initialized (run `bookmarks-init init`)",
                        setup.database_path.display()
                    ));
                    std::process::exit(2);
                }
            }
        }

        Commands::Status { database, format } => {
            let setup = resolve_setup(database, &env_file, &config)?;
            let path = &setup.database_path;

            let (version, missing, stats) = if path.exists() {
                let store = SchemaStore::open_read_only(path)?;
                (store.version()?, store.missing_objects()?, Some(store.stats()?))
            } else {
                (None, storage::schema::v1_object_names(), None)
            };

            if format.is_human() {
                ui::header(&format!("Bookmarks database ({})", path.display()));
                let version_text = version
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "not initialized".to_string());
                ui::status(Icons::INFO, "Version", &version_text);
                ui::status(Icons::INFO, "Latest known", &LATEST_VERSION.to_string());
                if missing.is_empty() {
                    ui::success("All schema objects present");
                } else {
                    ui::warn(&format!("Missing: {}", missing.join(", ")));
                }
                if let Some(stats) = stats {
                    ui::status(Icons::STATS, "Rows", "");
                    for count in &stats.tables {
                        ui::summary_row(&count.table, &count.rows.to_string());
                    }
                }
            } else {
                let data = serde_json::json!({
                    "database": path,
                    "version": version,
                    "latest": LATEST_VERSION,
                    "missing": missing,
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
        }

        Commands::Secret { key } => {
            secret::rotate_secret(&env_file, &key)?;
            ui::status(
                Icons::KEY,
                "Secret",
                &format!("Generated new {} and saved to {}", key, env_file.display()),
            );
        }
    }

    Ok(())
}

/// Build the setup configuration, exiting with status 1 when no database
/// location is configured anywhere
fn resolve_setup(
    database: Option<PathBuf>,
    env_file: &Path,
    config: &Path,
) -> anyhow::Result<SetupConfig> {
    match SetupConfig::from_sources(database, env_file, Some(config)) {
        Ok(setup) => Ok(setup),
        Err(Error::ConfigMissing(hint)) => {
            ui::error("Database path is not configured");
            ui::hint(&hint);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
