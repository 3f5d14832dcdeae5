use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    medilens_lib::init_tracing();

    match medilens_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
