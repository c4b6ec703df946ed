use clap::Parser;
use epistle_bin::{cli::Cli, commands};
use epistle_log::LogConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let log_guard = match epistle_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
        console: !cli.command.owns_terminal(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    let result = commands::run(cli.command).await;

    // Flush the log file before exiting.
    drop(log_guard);

    if let Err(e) = result {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
