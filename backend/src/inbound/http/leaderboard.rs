//! Leaderboard HTTP handler.
//!
//! ```text
//! GET /api/v1/leaderboard?limit=10
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{LeaderboardEntry, LeaderboardLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardParams {
    /// Number of rows; unparsable values fall back to 10, others clamp to 0..=100.
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryBody {
    pub student_id: i64,
    pub name: String,
    pub total_received: i64,
    pub recognitions_received_count: i64,
    pub endorsements_received_total: i64,
}

impl From<LeaderboardEntry> for LeaderboardEntryBody {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            student_id: entry.account_id.get(),
            name: entry.name.to_string(),
            total_received: entry.total_received,
            recognitions_received_count: entry.recognitions_received,
            endorsements_received_total: entry.endorsements_received,
        }
    }
}

/// Leaderboard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponseBody {
    pub leaderboard: Vec<LeaderboardEntryBody>,
}

/// Rank students by credits received; ties go to the older account.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponseBody),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["leaderboard"],
    operation_id = "getLeaderboard"
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
    params: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<LeaderboardResponseBody>> {
    let limit = LeaderboardLimit::from_query(params.limit.as_deref());
    let entries = state.ledger_query.leaderboard(limit).await?;
    Ok(web::Json(LeaderboardResponseBody {
        leaderboard: entries.into_iter().map(LeaderboardEntryBody::from).collect(),
    }))
}
