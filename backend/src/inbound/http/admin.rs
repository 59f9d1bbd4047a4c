//! Administrative ledger maintenance.
//!
//! ```text
//! POST /api/v1/admin/reset-all
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Outcome of the reset sweep.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetAllResponseBody {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "monthly reset applied where needed")]
    pub message: String,
    /// Accounts whose balances changed.
    pub accounts_reset: usize,
}

/// Apply the monthly reset to every account that is due.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reset-all",
    responses(
        (status = 200, description = "Reset applied where needed", body = ResetAllResponseBody),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "resetAll"
)]
#[post("/admin/reset-all")]
pub async fn reset_all(state: web::Data<HttpState>) -> ApiResult<web::Json<ResetAllResponseBody>> {
    let summary = state.ledger.force_reset_all().await?;
    Ok(web::Json(ResetAllResponseBody {
        status: "ok".to_owned(),
        message: "monthly reset applied where needed".to_owned(),
        accounts_reset: summary.accounts_reset,
    }))
}
