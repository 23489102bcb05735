mod board;
mod error;
mod filter;
mod github;
mod options;
mod page;
mod selection;
mod server;
#[cfg(test)]
mod stub;

use std::process::ExitCode;

use clap::Parser;

use crate::options::Options;

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let options = Options::parse();
    log::info!("config = {:?}", options);

    match server::serve(&options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
