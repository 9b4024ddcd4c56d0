use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use nucls2crops::{process_dataset, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting the organize process...");

    match process_dataset(&args) {
        Ok(summary) => {
            info!(
                "Wrote {} object detection and {} semantic segmentation crops.",
                summary.counts.task_total(nucls2crops::Task::ObjectDetection),
                summary.counts.task_total(nucls2crops::Task::SemanticSegmentation)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to organize dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
