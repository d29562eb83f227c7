use order_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    order_server::common::init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )?;

    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        "Starting order server"
    );

    let state = ServerState::initialize(&config).await;
    Server::new(state).run().await
}
