use clap::{Parser, Subcommand};

mod db;
mod token;
mod user;

/// Default pool size for one-shot admin commands.
const CLI_MAX_CONNECTIONS: u32 = 2;

#[derive(Debug, Parser)]
#[command(name = "feast-app", about = "Feast admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Token(token::TokenCommand),
    User(user::UserCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::User(command) => user::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool, String> {
    feast_app::database::connect(database_url, CLI_MAX_CONNECTIONS)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
