use todo_board::{AppState, Config, HttpTodoApi, Session, router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let api = HttpTodoApi::new(config.api_url.clone());
    info!(api = %api.base_url(), "loading todos");

    let session = match Session::load(api.clone()).await {
        Ok(session) => session,
        Err(err) => {
            error!("failed to load todos: {err}");
            Session::new(api, Vec::new())
        }
    };

    let app = router(AppState::new(session));
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
