//! Utterance handler
//!
//! The assistant touches the store synchronously and may wait on the
//! user's lock, so each utterance runs on the blocking pool.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::{AppError, AppState};
use moneylytics_core::{Choice, ChoiceSet, OutboundMessage, Utterance};

/// Reply body: the outbound message plus the options of its choice set
#[derive(Debug, Serialize)]
pub struct UtteranceResponse {
    pub text: String,
    pub choices: Option<ChoiceSet>,
    pub options: Vec<Choice>,
}

impl From<OutboundMessage> for UtteranceResponse {
    fn from(message: OutboundMessage) -> Self {
        let options = message
            .choices
            .map(|set| set.options())
            .unwrap_or_default();
        Self {
            text: message.text,
            choices: message.choices,
            options,
        }
    }
}

/// POST /api/utterances - Handle one inbound message
pub async fn post_utterance(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<UtteranceResponse>, AppError> {
    let utterance: Utterance =
        serde_json::from_slice(&body).map_err(|_| AppError::bad_request("Invalid JSON"))?;
    debug!(user_id = utterance.user_id, "Utterance received");

    let reply = tokio::task::spawn_blocking(move || state.assistant.handle_utterance(&utterance))
        .await?;

    Ok(Json(reply.into()))
}
