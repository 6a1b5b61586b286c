use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::LedgerError;
use crate::core::format::time_ago;
use crate::core::models::activity::{ActivityItem, ActivityKind};
use crate::core::splits::Share;

// Query strings
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ViewerQuery {
    /// Used to link pending invites to the account
    pub email: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
    pub email: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Only entries recorded under this action, e.g. `INTEGRITY_WARNING`
    pub action: Option<String>,
}

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct WeightEntry {
    pub member_id: String,
    #[schema(value_type = String, example = "2")]
    pub weight: Decimal,
}

#[derive(Deserialize, ToSchema)]
pub struct SplitPreviewRequest {
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub payer_id: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    /// Proportional split. Takes precedence over `participant_ids`
    pub weights: Option<Vec<WeightEntry>>,
}

// Response structs
#[derive(Serialize, ToSchema)]
pub struct SplitPreviewResponse {
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub shares: Vec<Share>,
}

#[derive(Serialize, ToSchema)]
pub struct ActivityItemResponse {
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub group_name: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    /// Relative age, e.g. `5 min atrás`
    pub when: String,
}

impl ActivityItemResponse {
    pub fn from_item(item: ActivityItem, now: DateTime<Utc>) -> Self {
        ActivityItemResponse {
            when: time_ago(item.created_at, now),
            id: item.id,
            kind: item.kind,
            description: item.description,
            group_name: item.group_name,
            created_at: item.created_at,
        }
    }
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            LedgerError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::MissingField { .. }
            | LedgerError::MalformedField { .. }
            | LedgerError::InvalidWeights
            | LedgerError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            LedgerError::StorageError(_)
            | LedgerError::LoggingError(_)
            | LedgerError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let error = match self.0 {
            LedgerError::InvalidInput(field, detail) => {
                format!("Invalid input for {}: {}", field, detail.description)
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
