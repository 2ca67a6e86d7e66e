mod ui;

use clap::Parser;
use crate::ui::cli;
use connprof_core::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    // Library chatter stays out of the way of the prompts unless RUST_LOG asks for it.
    init_logging("warn");
    let args = cli::Args::parse();
    if let Err(e) = cli::run_cli(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
