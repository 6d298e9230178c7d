use std::process::ExitCode;

use clap::Parser;

use xpends_rs::{
    cli::{Args, print_error, run},
    logging::setup_logging,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.debug_log.as_deref()) {
        print_error(error);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!("Command failed: {error:?}");
            print_error(error);
            ExitCode::FAILURE
        }
    }
}
