use std::str::FromStr;

use clap::{Parser, ValueEnum};
use masjid_backend::config::db::{DbOwner, DbProfile};
use masjid_backend::infra::db::connect_db;
use migration::{migrate, MigrationCommand};
use tracing::info;

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Masjid backend database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: String,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,masjid_backend=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let command = match MigrationCommand::from_str(&args.command) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let profile = match args.env {
        Env::Prod => DbProfile::Prod,
        Env::Test => DbProfile::Test,
    };

    // Schema changes always run with the owner role.
    let db = match connect_db(profile, DbOwner::Owner).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Could not connect to database: {e}");
            std::process::exit(1);
        }
    };

    let result = migrate(&db, command).await;
    if let Err(e) = db.close().await {
        eprintln!("warning: failed to close connection: {e}");
    }
    if let Err(e) = result {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
    info!(?command, "migration finished");
}
