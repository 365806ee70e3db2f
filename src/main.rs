use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use tenant_service_template::cli::{self, Cli};
use tenant_service_template::infra::observability::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_format);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Application error");
            ExitCode::FAILURE
        }
    }
}
