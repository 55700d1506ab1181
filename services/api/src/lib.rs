mod cli;
mod infra;
mod predict;
mod render;
mod routes;
mod server;
mod views;

use placement_advisor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
