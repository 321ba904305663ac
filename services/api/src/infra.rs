use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use risk_profiler::error::AppError;
use risk_profiler::questionnaire::provider::ProviderClient;
use risk_profiler::questionnaire::QuestionView;
use risk_profiler::report::store::{DocumentStore, StoreError};
use risk_profiler::report::ReportGenerator;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: CatalogHandle,
    pub(crate) generator: Arc<ReportGenerator>,
}

/// The configured question-catalog source. Built once at startup from
/// `CatalogSource`; handlers never consult the environment.
#[derive(Clone)]
pub(crate) enum CatalogHandle {
    Builtin,
    Provider(Arc<ProviderClient>),
}

impl CatalogHandle {
    pub(crate) async fn questions(&self) -> Result<Vec<QuestionView>, AppError> {
        match self {
            CatalogHandle::Builtin => Ok(risk_profiler::questionnaire::catalog_views(
                risk_profiler::questionnaire::catalog::builtin(),
            )),
            CatalogHandle::Provider(client) => client
                .fetch_questionnaire()
                .await
                .map_err(AppError::Provider),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredObject {
    pub(crate) bytes: Vec<u8>,
    pub(crate) content_type: String,
}

/// Process-local document store for local runs and tests. Retrieval URLs
/// are synthetic `memory://` references; nothing expires.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDocumentStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl InMemoryDocumentStore {
    pub(crate) fn objects(&self) -> HashMap<String, StoredObject> {
        self.objects.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut guard = self.objects.lock().expect("store mutex poisoned");
        guard.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presign_get(&self, key: &str) -> Result<String, StoreError> {
        Ok(format!("memory://reports/{key}"))
    }
}
