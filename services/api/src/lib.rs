mod cli;
mod infra;
mod routes;
mod seed;
mod server;

use club_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
