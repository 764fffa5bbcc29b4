use std::sync::Arc;

use clap::{Args, Subcommand};
use mercado_app::{
    auth::{OpenBaoClient, OpenBaoConfig},
    database::{self, Db},
    domain::password_resets::{LogResetNotifier, PasswordResetsService, PgPasswordResetsService},
};

#[derive(Debug, Args)]
pub(crate) struct ResetsCommand {
    #[command(subcommand)]
    command: ResetsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ResetsSubcommand {
    /// Delete used and expired password reset tokens
    Purge(PurgeArgs),
}

#[derive(Debug, Args)]
pub(crate) struct PurgeArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// OpenBao server address
    #[arg(long, env = "OPENBAO_ADDR")]
    openbao_addr: String,

    /// OpenBao authentication token
    #[arg(long, env = "OPENBAO_TOKEN", hide_env_values = true)]
    openbao_token: String,

    /// OpenBao Transit key name
    #[arg(long, env = "OPENBAO_TRANSIT_KEY")]
    openbao_transit_key: String,
}

pub(crate) async fn run(command: ResetsCommand) -> Result<(), String> {
    match command.command {
        ResetsSubcommand::Purge(args) => purge(args).await,
    }
}

async fn purge(args: PurgeArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let verifier = OpenBaoClient::new(OpenBaoConfig {
        addr: args.openbao_addr,
        token: args.openbao_token,
        transit_key: args.openbao_transit_key,
    });

    let service =
        PgPasswordResetsService::new(Db::new(pool), Arc::new(verifier), Arc::new(LogResetNotifier));

    let purged = service
        .purge_expired()
        .await
        .map_err(|error| format!("failed to purge password resets: {error}"))?;

    println!("purged: {purged}");

    Ok(())
}
