use clap::{Args, Subcommand};

mod create;
mod show;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product to the catalogue
    Create(create::CreateProductArgs),
    /// Print a live product
    Show(show::ShowProductArgs),
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create::run(args).await,
        ProductSubcommand::Show(args) => show::run(args).await,
    }
}
