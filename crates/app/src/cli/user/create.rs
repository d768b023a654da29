use clap::Args;
use feast_app::{
    auth::{AuthService, PgAuthService},
    database::Db,
    domain::users::{
        PgUsersService, UsersService,
        data::NewUser,
        models::{UserRole, UserUuid},
    },
};

use crate::cli::token::create::print_issued_token;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Email address, unique across users
    #[arg(long)]
    email: String,

    /// Phone number containing 10 digits
    #[arg(long)]
    phone: String,

    /// Optional delivery address
    #[arg(long)]
    address: Option<String>,

    /// One of `customer`, `restaurant_owner` or `admin`
    #[arg(long, default_value = "customer")]
    role: UserRole,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    let users = PgUsersService::new(Db::new(pool.clone()));
    let auth = PgAuthService::new(pool);

    let user = users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            role: args.role,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    let issued = auth
        .issue_api_token(user.uuid)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("user_email: {}", user.email);
    println!("user_role: {}", user.role);

    print_issued_token(&issued);

    Ok(())
}
