use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use nucls2crops::{rename_slides, RenameArgs};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = RenameArgs::parse();

    if !args.source_dir.is_dir() {
        error!(
            "The specified source_dir does not exist: {}",
            args.source_dir.display()
        );
        return ExitCode::FAILURE;
    }

    info!("Starting the rename process...");

    match rename_slides(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to rename images: {}", e);
            ExitCode::FAILURE
        }
    }
}
