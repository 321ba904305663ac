//! Report generation pipeline.
//!
//! One invocation: compile markup, snapshot it for debugging, render the
//! PDF, persist it, presign a retrieval URL. All-or-nothing per request and
//! no built-in retries; internal faults are logged here and collapsed to a
//! single generic error before they cross the service boundary.

pub mod renderer;
pub mod store;
pub mod template;

use crate::questionnaire::{AnswerSelection, QuestionView};
use chrono::Local;
use renderer::{PdfRenderer, RenderError};
use std::fmt;
use std::sync::Arc;
use store::{DocumentStore, StoreError};
use template::TemplateParams;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Inputs for one generation request. `display_date` is injectable for
/// deterministic output; it defaults to today in dd/mm/yyyy form.
#[derive(Debug, Clone)]
pub struct GenerateReportRequest {
    pub risk_rating: String,
    pub answers: Vec<AnswerSelection>,
    pub display_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// Time-limited signed retrieval reference for the stored PDF.
    pub url: String,
}

/// The only generation failure callers ever see. Detail stays in the
/// server-side logs.
#[derive(Debug)]
pub struct GenerationError;

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to generate PDF. Please try again later.")
    }
}

impl std::error::Error for GenerationError {}

#[derive(Debug, Error)]
enum GenerationFault {
    #[error("failed to serialize report payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ReportGenerator {
    renderer: Arc<dyn PdfRenderer>,
    store: Arc<dyn DocumentStore>,
    questions: Vec<QuestionView>,
}

impl ReportGenerator {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        store: Arc<dyn DocumentStore>,
        questions: Vec<QuestionView>,
    ) -> Self {
        Self {
            renderer,
            store,
            questions,
        }
    }

    pub async fn generate(
        &self,
        request: GenerateReportRequest,
    ) -> Result<GeneratedReport, GenerationError> {
        match self.try_generate(request).await {
            Ok(report) => Ok(report),
            Err(fault) => {
                error!(error = %fault, "report generation failed");
                Err(GenerationError)
            }
        }
    }

    async fn try_generate(
        &self,
        request: GenerateReportRequest,
    ) -> Result<GeneratedReport, GenerationFault> {
        // Fresh key per call; reuse would silently overwrite.
        let key = Uuid::new_v4();

        let questions_json = serde_json::to_string(&self.questions)?;
        let answers_json = serde_json::to_string(&request.answers)?;

        let params = TemplateParams {
            risk_rating: request.risk_rating,
            questions_json: template::html_encode(&questions_json),
            answers_json: template::html_encode(&answers_json),
            date: request
                .display_date
                .unwrap_or_else(|| Local::now().format("%d/%m/%Y").to_string()),
        };
        let html = template::compile(&params);

        // Debug snapshot first, then the rendered document.
        self.store
            .put(
                &format!("{key}_debug.html"),
                html.clone().into_bytes(),
                mime::TEXT_HTML_UTF_8.as_ref(),
            )
            .await?;

        let pdf = self.renderer.render(&html).await?;

        let pdf_key = format!("{key}.pdf");
        self.store
            .put(&pdf_key, pdf, mime::APPLICATION_PDF.as_ref())
            .await?;

        let url = self.store.presign_get(&pdf_key).await?;
        info!(%pdf_key, "report generated");

        Ok(GeneratedReport { url })
    }
}
