use crate::cli::ServeArgs;
use crate::infra::{AppState, CatalogHandle, InMemoryDocumentStore};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risk_profiler::config::{AppConfig, CatalogSource, StorageBackend};
use risk_profiler::error::AppError;
use risk_profiler::questionnaire::provider::ProviderClient;
use risk_profiler::questionnaire::{catalog, catalog_views};
use risk_profiler::report::renderer::ChromiumRenderer;
use risk_profiler::report::store::{DocumentStore, S3DocumentStore};
use risk_profiler::report::ReportGenerator;
use risk_profiler::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog_handle = match &config.catalog {
        CatalogSource::Builtin => CatalogHandle::Builtin,
        CatalogSource::Provider {
            base_url,
            access_token,
            questionnaire_name,
        } => CatalogHandle::Provider(Arc::new(ProviderClient::new(
            base_url.clone(),
            access_token.clone(),
            questionnaire_name.clone(),
        )?)),
    };

    let store: Arc<dyn DocumentStore> = match &config.generation.storage {
        StorageBackend::InMemory => Arc::new(InMemoryDocumentStore::default()),
        StorageBackend::S3 { bucket } => Arc::new(
            S3DocumentStore::connect(
                bucket.clone(),
                config.generation.url_ttl,
                config.generation.storage_connect_timeout,
                config.generation.storage_operation_timeout,
            )
            .await,
        ),
    };

    let renderer = Arc::new(ChromiumRenderer::new(
        config.generation.chromium_path.clone(),
        config.generation.render_timeout,
    ));

    // The report always embeds the built-in catalog, matching the original
    // generation path; the provider feeds the interactive questionnaire.
    let generator = Arc::new(ReportGenerator::new(
        renderer,
        store,
        catalog_views(catalog::builtin()),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog_handle,
        generator,
    };

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "risk profiler service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
