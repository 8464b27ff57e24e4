use razorpay_sessions::config::AppConfig;
use razorpay_sessions::http::routes::router;
use razorpay_sessions::{build_gateway, build_state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let gateway = build_gateway(&cfg)?;
    if !gateway.has_credentials() {
        tracing::warn!("processor credentials are not configured; readiness will fail");
    }
    tracing::info!(
        processor = gateway.name(),
        default_currency = %cfg.default_currency,
        webhook_auth = cfg.webhook_secret.is_some(),
        "starting session adapter"
    );

    let state = build_state(&cfg, gateway);
    let app = router(state, cfg.webhook_secret.clone());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
