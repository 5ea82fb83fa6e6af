use std::net::SocketAddr;

use handler::Handler;
use handler::logging::init_logging;
use handler::routes::routes;
use util::config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level(), config::log_to_stdout());

    let handler = Handler::default();
    tracing::info!(policy = %handler.policy(), env = %config::env(), "Handler configured");

    let app = routes(handler);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port()).parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Starting {} on http://{}", config::project_name(), addr);
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
