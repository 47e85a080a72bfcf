mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use harvest_quota::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
