//! Command-line argument parsing for movielens-query.
//!
//! Uses clap derive. Flags given here take precedence over the config file.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Load MovieLens CSVs into SQLite and run named SQL queries.
#[derive(Parser, Debug)]
#[command(name = "mlq")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "MLQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(short = 'd', long, value_name = "PATH", env = "MLQ_DATABASE")]
    pub database: Option<PathBuf>,

    /// File containing `-- QUERY: <name>` blocks (overrides config)
    #[arg(short = 'q', long, value_name = "PATH")]
    pub queries: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Recreate the MovieLens tables and load the CSV files
    Load {
        /// Directory with movies.csv, ratings.csv, links.csv and tags.csv
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Also generate the synthetic users table
        #[arg(long)]
        with_users: bool,

        /// Seed for user generation
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
    },

    /// Recreate the synthetic users table from the ratings table
    Users {
        /// Seed for user generation
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
    },

    /// Run one named query and print the result table
    Run {
        /// Query name as written after `-- QUERY:`
        #[arg(value_name = "NAME")]
        name: String,

        /// Line printed above the table
        #[arg(short = 'D', long, value_name = "TEXT")]
        description: Option<String>,

        /// Maximum number of rows to print
        #[arg(short = 'n', long, value_name = "N")]
        max_rows: Option<usize>,
    },

    /// List the query names defined in the query file
    List,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies flags that override config values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if let Some(queries) = &self.queries {
            config.queries.file = queries.clone();
        }
        match &self.command {
            Command::Load {
                data_dir,
                with_users,
                seed,
            } => {
                if let Some(dir) = data_dir {
                    config.data.dir = dir.clone();
                }
                config.data.with_users |= *with_users;
                if let Some(seed) = seed {
                    config.data.seed = *seed;
                }
            }
            Command::Users { seed: Some(seed) } => config.data.seed = *seed,
            Command::Run {
                max_rows: Some(max_rows),
                ..
            } => config.queries.max_rows = *max_rows,
            _ => {}
        }
    }
}
