//! Client for the upstream risk-questionnaire provider.
//!
//! The provider owns the real scoring model; this service only fetches the
//! questionnaire data and remaps it to the presentation shape. The endpoint
//! and credential are constructor parameters so the transport choice is
//! visible at the call site rather than inferred from ambient environment.

use super::{AnswerOptionView, QuestionView};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

const QUESTIONNAIRE_PATH: &str = "/riskQuestionnaire/1.0.0/riskProfiler/getQuestionnaireData";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}")]
    UpstreamStatus { status: StatusCode, body: String },
}

/// Wire shape returned by the provider. Identifiers are numeric here and
/// become strings in the presentation remap.
#[derive(Debug, Deserialize)]
pub struct ProviderQuestion {
    #[serde(rename = "questionId")]
    pub question_id: u32,
    #[serde(rename = "questionText")]
    pub question_text: String,
    pub responses: Vec<ProviderResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderResponse {
    #[serde(rename = "responseId")]
    pub response_id: u32,
    #[serde(rename = "responseText")]
    pub response_text: String,
}

pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    questionnaire_name: String,
}

impl ProviderClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        questionnaire_name: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            access_token: access_token.into(),
            questionnaire_name: questionnaire_name.into(),
        })
    }

    pub async fn fetch_questionnaire(&self) -> Result<Vec<QuestionView>, ProviderError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), QUESTIONNAIRE_PATH);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "questionnaireName": self.questionnaire_name }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "questionnaire fetch rejected by provider");
            return Err(ProviderError::UpstreamStatus { status, body });
        }

        let questions: Vec<ProviderQuestion> = response.json().await?;
        Ok(remap(questions))
    }
}

/// Numeric provider identifiers become string identifiers here; this is the
/// normalization boundary for the presentation layer.
pub fn remap(questions: Vec<ProviderQuestion>) -> Vec<QuestionView> {
    questions
        .into_iter()
        .map(|question| QuestionView {
            id: question.question_id.to_string(),
            text: question.question_text,
            answers: question
                .responses
                .into_iter()
                .map(|response| AnswerOptionView {
                    id: response.response_id.to_string(),
                    text: response.response_text,
                })
                .collect(),
        })
        .collect()
}
