use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod config;
mod contact;
mod handler;
mod http;
mod logger;
mod server;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config::Config::resolve_path(std::env::args().nth(1));
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker threads follow server.workers, defaulting to the CPU count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;
    logger::log_server_start(&addr, &cfg);

    let grace = Duration::from_secs(cfg.performance.write_timeout);
    let state = Arc::new(config::AppState::new(cfg)?);
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::signal::SignalHandler::new());
    server::signal::start_signal_handler(Arc::clone(&signals))?;

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            server::start_server_loop(
                listener,
                state,
                Arc::clone(&active_connections),
                Arc::clone(&signals.shutdown),
            )
            .await;

            let remaining = server::drain_connections(&active_connections, grace).await;
            if remaining > 0 {
                logger::log_warning(&format!(
                    "Shutting down with {remaining} connection(s) still open"
                ));
            }
        })
        .await;

    Ok(())
}
