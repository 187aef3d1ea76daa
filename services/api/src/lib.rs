mod cli;
mod infra;
mod report;
mod routes;
mod server;

use critique_grader::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
