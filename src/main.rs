use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;
use ziora::api::{self, app_state::AppState};
use ziora::clients::{OpenRouterClient, RazorpayGateway};
use ziora::config::loader::ConfigLoader;
use ziora::models::catalog::ModelCatalog;
use ziora::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing, metrics_middleware,
};
use ziora::security::access_gate::AccessGate;
use ziora::security::auth::{JwtAuth, JwtTokenGenerator};
use ziora::security::password::PasswordHasher;
use ziora::security::rate_limit::RateLimiter;
use ziora::services::{create_account_service, create_chat_service, create_payment_service};
use ziora::storage::StorageFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    init_tracing(&config.logging.level, config.logging.structured)?;
    info!(environment = %config.environment, "Starting Ziora...");

    let (storage, repos) = StorageFactory::create(&config.database).await?;
    info!(backend = storage.kind(), "Storage initialized");

    let catalog = Arc::new(ModelCatalog::new(config.chat.catalog.clone())?);
    info!(models = catalog.len(), "Model catalog loaded");
    let gate = Arc::new(AccessGate::new(catalog));

    let metrics = Arc::new(AppMetrics::default());
    let completion = Arc::new(OpenRouterClient::new(&config.upstream)?);
    let gateway = Arc::new(RazorpayGateway::new(&config.payment)?);

    let account_service = create_account_service(
        repos.accounts.clone(),
        PasswordHasher::new(config.security.bcrypt_cost),
        JwtTokenGenerator::from_config(&config.security),
    );
    let chat_service = create_chat_service(
        repos.conversations.clone(),
        repos.accounts.clone(),
        gate.clone(),
        completion,
        metrics.clone(),
    );
    let payment_service = create_payment_service(
        repos.payments.clone(),
        repos.orders.clone(),
        repos.accounts.clone(),
        gateway,
        metrics.clone(),
    );
    info!("Services initialized");

    let app_state = AppState::new(
        account_service,
        chat_service,
        payment_service,
        gate,
        Box::new(JwtAuth::from_config(&config.security)),
        RateLimiter::from_config(&config.security),
        metrics.clone(),
    );

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION"),
        metrics.clone(),
        storage,
    ));
    let api_router =
        api::initialize_api(app_state, &config.security.cors_allowed_origins).await?;
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(axum::middleware::from_fn_with_state(metrics, metrics_middleware));
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
