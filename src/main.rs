//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kitchen_ops::{config::{AppState, Config}, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Inicializa o logger (RUST_LOG controla o nível)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(&config);
    if config.seed_demo_data {
        tracing::info!("🌱 Dados de demonstração carregados");
    }

    let app = create_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
