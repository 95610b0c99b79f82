use cartwheel_app::{
    database::Db,
    domain::products::{PgProductsService, ProductsService, models::ProductUuid},
};
use clap::Args;
use uuid::Uuid;

use crate::cli::connect;

#[derive(Debug, Args)]
pub(crate) struct ShowProductArgs {
    /// Product UUID
    #[arg(long)]
    product_uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ShowProductArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    let product = PgProductsService::new(Db::new(pool))
        .get_product(ProductUuid::from_uuid(args.product_uuid))
        .await
        .map_err(|error| format!("failed to load product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_name: {}", product.name);
    println!("price: {}", product.price);
    println!("created_at: {}", product.created_at);

    Ok(())
}
