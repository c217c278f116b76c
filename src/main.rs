use clap::Parser;
use eztood::cli::commands::Cli;
use eztood::cli::handlers;
use eztood::io::{log, paths};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI (logs go to a file; it owns the terminal)
            let data_dir = paths::data_dir(cli.data_dir.as_deref());
            if let Err(e) = eztood::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            log::init_stderr_logging();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
