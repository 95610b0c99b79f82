use clap::{Parser, Subcommand};
use sqlx::PgPool;

use cartwheel_app::database;

mod db;
mod product;
mod user;

#[derive(Debug, Parser)]
#[command(name = "cartwheel-app", about = "Cartwheel CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Product(product::ProductCommand),
    User(user::UserCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::User(command) => user::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
