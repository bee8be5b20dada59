//! mlq - load MovieLens CSVs into SQLite and run named SQL queries.

use movielens_query::cli::{Cli, Command};
use movielens_query::config::Config;
use movielens_query::db::{DatabaseClient, SqliteClient};
use movielens_query::error::Result;
use movielens_query::ingest;
use movielens_query::logging;
use movielens_query::query::{load_named_queries, NamedQuery};
use tracing::{error, info};

fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run() {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);

    // Every step is awaited in order; a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute(&cli.command, &config))
}

async fn execute(command: &Command, config: &Config) -> Result<()> {
    match command {
        Command::List => {
            for name in load_named_queries(&config.queries.file)?.keys() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Load { .. } => {
            let client = SqliteClient::connect(&config.database.path).await?;
            let summary = ingest::load_all(client.pool(), &config.data.dir).await?;
            for (table, rows) in &summary.tables {
                println!("{table}: {rows} rows");
            }
            if config.data.with_users {
                let users = ingest::create_users_table(client.pool(), config.data.seed).await?;
                println!("users: {users} rows");
            }
            println!(
                "Loaded all data into SQLite: {}",
                config.database.path.display()
            );
            client.close().await
        }
        Command::Users { .. } => {
            let client = SqliteClient::connect(&config.database.path).await?;
            let users = ingest::create_users_table(client.pool(), config.data.seed).await?;
            println!("Created users table with {users} sample users");
            client.close().await
        }
        Command::Run {
            name, description, ..
        } => {
            let client = SqliteClient::connect(&config.database.path).await?;
            let mut query = NamedQuery::new(&config.queries.file, name);
            if let Some(description) = description {
                query = query.with_description(description);
            }
            let outcome = query.run_and_print(&client, config.queries.max_rows).await;
            client.close().await?;
            outcome
        }
    }
}
