//! Student account HTTP handlers.
//!
//! ```text
//! POST /api/v1/students
//! GET /api/v1/students/{id}
//! POST /api/v1/students/{id}/redeem
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{CreateAccountRequest, RedeemRequest};
use crate::domain::{Account, Redemption};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_required_integer, require};

/// Request payload for registering a student.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequestBody {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

/// Request payload for redeeming credits.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequestBody {
    /// Integer, or a string holding one.
    #[schema(value_type = Option<Object>, example = 40)]
    pub credits: Option<Value>,
}

/// Student account as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
    pub id: i64,
    pub name: String,
    pub sendable_balance: i64,
    pub monthly_sent: i64,
    pub redeemable_balance: i64,
    pub total_received: i64,
    #[schema(format = "date")]
    pub last_reset: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Account> for StudentBody {
    fn from(account: Account) -> Self {
        Self {
            id: account.id().get(),
            name: account.name().to_string(),
            sendable_balance: account.sendable_balance(),
            monthly_sent: account.monthly_sent(),
            redeemable_balance: account.redeemable_balance(),
            total_received: account.total_received(),
            last_reset: account.last_reset().map(|date| date.to_string()),
            created_at: account.created_at().to_rfc3339(),
        }
    }
}

/// Envelope wrapping a single student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentEnvelope {
    pub student: StudentBody,
}

/// Voucher redemption as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionBody {
    pub id: i64,
    pub student_id: i64,
    pub credits: i64,
    pub voucher_value: i64,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Redemption> for RedemptionBody {
    fn from(redemption: Redemption) -> Self {
        Self {
            id: redemption.id.get(),
            student_id: redemption.account_id.get(),
            credits: redemption.credits.get(),
            voucher_value: redemption.voucher_value,
            created_at: redemption.created_at.to_rfc3339(),
        }
    }
}

/// Envelope wrapping a single redemption.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedemptionEnvelope {
    pub redemption: RedemptionBody,
}

/// Register a student seeded with the monthly allotment.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentRequestBody,
    responses(
        (status = 201, description = "Student registered", body = StudentEnvelope),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "createStudent"
)]
#[post("/students")]
pub async fn create_student(
    state: web::Data<HttpState>,
    payload: web::Json<CreateStudentRequestBody>,
) -> ApiResult<HttpResponse> {
    let name = require(payload.into_inner().name, FieldName::new("name"))?;
    let account = state
        .ledger
        .create_account(CreateAccountRequest { name })
        .await?;
    Ok(HttpResponse::Created().json(StudentEnvelope {
        student: account.into(),
    }))
}

/// Fetch a student, applying a due monthly reset first.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student", body = StudentEnvelope),
        (status = 404, description = "Unknown student", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudent"
)]
#[get("/students/{id}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<StudentEnvelope>> {
    let account = state.ledger_query.get_account(path.into_inner()).await?;
    Ok(web::Json(StudentEnvelope {
        student: account.into(),
    }))
}

/// Convert redeemable credits into a voucher.
#[utoipa::path(
    post,
    path = "/api/v1/students/{id}/redeem",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = RedeemRequestBody,
    responses(
        (status = 201, description = "Voucher issued", body = RedemptionEnvelope),
        (status = 400, description = "Invalid credits or insufficient redeemable balance", body = ErrorSchema),
        (status = 404, description = "Unknown student", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "redeemCredits"
)]
#[post("/students/{id}/redeem")]
pub async fn redeem_credits(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<RedeemRequestBody>,
) -> ApiResult<HttpResponse> {
    let credits = parse_required_integer(payload.into_inner().credits, FieldName::new("credits"))?;
    let redemption = state
        .ledger
        .redeem(RedeemRequest {
            account_id: path.into_inner(),
            credits,
        })
        .await?;
    Ok(HttpResponse::Created().json(RedemptionEnvelope {
        redemption: redemption.into(),
    }))
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
