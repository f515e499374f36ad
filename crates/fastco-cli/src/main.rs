//! FASTCO CLI: schema inspection and database migrations.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fastco_core::{EntityKind, SchemaRegistry};
use fastco_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fastco")]
#[command(about = "FASTCO entity schema tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending schema migrations to a SurrealDB instance
    Migrate(DbArgs),

    /// Print the entity schema as JSON
    Schema {
        /// Describe a single entity kind (e.g. `SaaSProduct`)
        #[arg(long)]
        kind: Option<String>,
    },

    /// Print the storage DDL
    Ddl,
}

#[derive(Args)]
struct DbArgs {
    /// WebSocket address of the SurrealDB server
    #[arg(long, env = "FASTCO_DB_URL")]
    url: Option<String>,

    #[arg(long, env = "FASTCO_DB_NAMESPACE")]
    namespace: Option<String>,

    #[arg(long, env = "FASTCO_DB_DATABASE")]
    database: Option<String>,

    #[arg(long, env = "FASTCO_DB_USER")]
    username: Option<String>,

    #[arg(long, env = "FASTCO_DB_PASS", hide_env_values = true)]
    password: Option<String>,
}

impl DbArgs {
    fn into_config(self) -> DbConfig {
        let defaults = DbConfig::default();
        DbConfig {
            url: self.url.unwrap_or(defaults.url),
            namespace: self.namespace.unwrap_or(defaults.namespace),
            database: self.database.unwrap_or(defaults.database),
            username: self.username.unwrap_or(defaults.username),
            password: self.password.unwrap_or(defaults.password),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fastco=info".parse()?))
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate(args) => {
            let config = args.into_config();
            let manager = DbManager::connect(&config)
                .await
                .with_context(|| format!("failed to connect to SurrealDB at {}", config.url))?;
            manager.migrate().await.context("migration failed")?;
            tracing::info!("Schema is up to date");
        }
        Command::Schema { kind: None } => {
            let document = SchemaRegistry::document();
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Schema { kind: Some(name) } => {
            let kind: EntityKind = name.parse()?;
            let descriptor = SchemaRegistry::describe(kind);
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Command::Ddl => {
            println!("{}", fastco_db::schema_v1());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn db_flag_is_parsed() {
        let cli = Cli::try_parse_from(["fastco", "migrate", "--namespace", "staging"]).unwrap();
        let Command::Migrate(args) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(args.into_config().namespace, "staging");
    }

    #[test]
    fn unset_db_args_fall_back_to_defaults() {
        // Built directly so FASTCO_DB_* in the environment cannot leak in.
        let args = DbArgs {
            url: None,
            namespace: Some("staging".into()),
            database: None,
            username: None,
            password: None,
        };
        let config = args.into_config();
        let defaults = DbConfig::default();
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.url, defaults.url);
        assert_eq!(config.database, defaults.database);
        assert_eq!(config.username, defaults.username);
    }
}
