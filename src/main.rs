use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match laccom_launcher::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
