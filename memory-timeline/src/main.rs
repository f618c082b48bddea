use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod clock;
mod config;
mod console;
mod controller;
mod http;
mod integrations;
mod render;
mod timeline;
mod view;


use clock::ElapsedClock;
use config::Config;
use controller::TimelineController;
use integrations::MemoryClient;
use timeline::AppEvent;
use view::ConsoleView;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let client = match http::build_client(config.http_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Using memory backend at {}", config.base_url);
    let backend = Arc::new(MemoryClient::new(&config.base_url, client));
    let controller = TimelineController::spawn(backend, Arc::new(ConsoleView::new()));
    controller.dispatch(AppEvent::LoadRequested);

    let ticks = controller.handle();
    let clock = ElapsedClock::start(
        config.together_since,
        Duration::from_secs(1),
        || chrono::Local::now().naive_local(),
        move |live| ticks.dispatch(AppEvent::Tick(live)),
    );

    tokio::select! {
        _ = console::run(controller.handle()) => {}
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted");
        }
    }

    clock.stop().await;
    controller.shutdown().await;
}
