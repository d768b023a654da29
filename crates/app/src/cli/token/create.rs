use clap::{ArgGroup, Args};
use feast_app::{
    auth::{AuthService, IssuedApiToken, PgAuthService},
    database::Db,
    domain::users::{PgUsersService, UsersService, models::UserUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("owner").required(true).args(["user_uuid", "email"])))]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// UUID of the user that should own the token
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// Email of the user that should own the token
    #[arg(long)]
    email: Option<String>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;

    let owner = match (args.user_uuid, args.email) {
        (Some(uuid), _) => UserUuid::from(uuid),
        (None, Some(email)) => {
            PgUsersService::new(Db::new(pool.clone()))
                .find_user_by_email(&email)
                .await
                .map_err(|error| format!("failed to find user {email}: {error}"))?
                .uuid
        }
        (None, None) => return Err("either --user-uuid or --email is required".to_owned()),
    };

    let issued = PgAuthService::new(pool)
        .issue_api_token(owner)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    print_issued_token(&issued);

    Ok(())
}

pub(crate) fn print_issued_token(issued: &IssuedApiToken) {
    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_created_at: {}", issued.metadata.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");
}
