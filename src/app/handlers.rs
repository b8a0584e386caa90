use crate::app::error::{ApiFailure, INCOMPLETE_DATA};
use crate::app::AppState;
use crate::core::{BetOutcome, BetRequest};
use crate::domain::model::CHEQUE_VALUE_CREDITS;
use crate::utils::error::BetError;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetPayload {
    pub account_id: Option<String>,
    pub numbers: Option<Vec<i64>>,
    pub stars: Option<Vec<i64>>,
}

/// POST /api/bet
pub async fn place_bet(
    State(state): State<AppState>,
    payload: Result<Json<BetPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!("❌ Malformed bet request: {}", rejection.body_text());
            return ApiFailure::validation(format!(
                "Malformed request body: {}",
                rejection.body_text()
            ))
            .into_response();
        }
    };

    let (Some(account_id), Some(numbers), Some(stars)) =
        (payload.account_id, payload.numbers, payload.stars)
    else {
        return ApiFailure::validation(INCOMPLETE_DATA).into_response();
    };

    let request = BetRequest::new(account_id, numbers, stars);
    let account_id = request.account_id.clone();
    let orchestrator = state.orchestrator.clone();

    // 在獨立 task 中執行，panic 會轉為 500 而不是中斷連線
    match tokio::spawn(async move { orchestrator.place_bet(request).await }).await {
        Ok(outcome) => outcome_response(&account_id, outcome),
        Err(join_error) => {
            let error = BetError::internal(join_error.to_string());
            tracing::error!("🚨 Bet orchestration crashed: {}", error);
            ApiFailure::internal(error.user_friendly_message(), error.to_string()).into_response()
        }
    }
}

fn outcome_response(account_id: &str, outcome: BetOutcome) -> Response {
    match outcome {
        BetOutcome::Success {
            selection,
            credential,
            detail,
        } => Json(json!({
            "success": true,
            "message": "Bet registered successfully!",
            "details": {
                "accountId": account_id,
                "key": selection.canonical_key(),
                "credential": credential.into_inner(),
                "cost": format!("{} credits", CHEQUE_VALUE_CREDITS),
                "registration": detail,
            }
        }))
        .into_response(),
        BetOutcome::Failure {
            stage,
            error,
            credential,
        } => ApiFailure::for_stage(stage, error.user_friendly_message())
            .with_credential(credential.map(|c| c.into_inner()))
            .into_response(),
    }
}

/// GET /api/results
pub async fn results(State(state): State<AppState>) -> Response {
    match state.orchestrator.results().await {
        Ok(results) => Json(json!({
            "success": true,
            "results": results,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to fetch results: {}", e);
            ApiFailure::internal("Failed to fetch results.", e.to_string()).into_response()
        }
    }
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Response {
    Json(json!({
        "status": "ok",
        "server": "EuroMillions Betting System",
        "grpcServer": state.grpc_server,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
    .into_response()
}
