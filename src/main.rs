mod app;
mod config;
mod headless;
mod journal;
mod logging;
mod notify;
mod tasks;
mod ui;

use std::env;
use std::process::ExitCode;

use config::AppConfig;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Check command-line arguments
    let args: Vec<String> = env::args().skip(1).collect();

    let debug_mode = args.iter().any(|a| a == "--debug");
    logging::init(debug_mode);

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Positional arguments only; flags were handled above
    let rest: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--debug")
        .collect();

    let result = match rest.as_slice() {
        ["--submit", text @ ..] if !text.is_empty() => {
            headless::submit(&config, &text.join(" ")).await
        }
        ["--entries", filters @ ..] => match headless::parse_query(filters) {
            Ok(query) => headless::list(&config, &query).await,
            Err(e) => Err(e),
        },
        ["--delete", id] => headless::delete(&config, id).await,
        ["--ping"] => headless::ping(&config).await,
        [] => app::run(config),
        _ => {
            eprintln!(
                "Usage: checkin [--debug] [--submit <text> | --entries [--from DATE] [--to DATE] [search] | --delete <id> | --ping]"
            );
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
