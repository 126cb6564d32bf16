use clap::Parser;
use taskify_core::cli::commands::Cli;
use taskify_core::cli::handlers;
use taskify_core::TaskifyError;
use tracing_subscriber::EnvFilter;

/// Log filter variable; defaults to `warn`
const LOG_ENV: &str = "TASKIFY_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match handlers::dispatch(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<TaskifyError>() {
            Some(err) => {
                eprintln!("error: {}", err.notice().message);
                err.exit_code()
            }
            None => {
                eprintln!("error: {:#}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
