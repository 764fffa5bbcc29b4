use clap::Args;
use mercado_app::{
    database::{self, Db},
    domain::users::{
        PgUsersService, UsersService, UsersServiceError,
        data::NewUser,
        records::{Role, UserUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateAdminArgs {
    /// Admin login email
    #[arg(long)]
    email: String,

    /// Admin password (at least 8 characters)
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value = "Admin")]
    first_name: String,

    #[arg(long, default_value = "Mercado")]
    last_name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateAdminArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));

    let has_admin = service
        .has_admin()
        .await
        .map_err(|error| format!("failed to check for existing admins: {error}"))?;

    if has_admin {
        return Err("an admin account already exists; refusing to create another".to_string());
    }

    let admin = service
        .register(NewUser {
            uuid: UserUuid::new(),
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            age: None,
            password: args.password,
            role: Role::Admin,
        })
        .await
        .map_err(|error| match error {
            UsersServiceError::Validation(violations) => format!("invalid admin: {violations}"),
            UsersServiceError::AlreadyExists => "a user with that email already exists".to_string(),
            other => format!("failed to create admin: {other}"),
        })?;

    println!("user_uuid: {}", admin.uuid);
    println!("email: {}", admin.email);
    println!("role: {}", admin.role);

    Ok(())
}
