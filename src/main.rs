use clap::Parser;

use usdt_watcher::bot::TelegramNotifier;
use usdt_watcher::cli::Cli;
use usdt_watcher::commands;

#[tokio::main]
async fn main() {
    // .env may carry RUST_LOG, so load it before the logger
    let env_file = dotenvy::dotenv().ok();
    pretty_env_logger::init();
    if let Some(path) = env_file {
        log::debug!("Loaded environment file={}", path.display());
    }
    log::info!("Application started version={}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    let notifier = match TelegramNotifier::new(&cli.tg_bot_token, &cli.tg_chat_id) {
        Ok(notifier) => notifier,
        Err(e) => {
            log::error!("Failed to set up Telegram client: {}", e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = commands::run(&cli, &notifier).await {
        log::error!("Check failed: {}", e);
        commands::report_failure(&notifier, &e).await;
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
