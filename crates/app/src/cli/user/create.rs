use cartwheel_app::{
    database::Db,
    domain::users::{PgUsersService, UsersService, data::NewUser, models::UserUuid},
};
use clap::Args;
use uuid::Uuid;

use crate::cli::connect;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// User display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    let issued = PgUsersService::new(Db::new(pool))
        .create_user(NewUser {
            uuid: args
                .user_uuid
                .map_or_else(UserUuid::new, UserUuid::from_uuid),
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", issued.user.uuid);
    println!("user_name: {}", issued.user.name);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
