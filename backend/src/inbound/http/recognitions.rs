//! Recognition HTTP handlers.
//!
//! ```text
//! POST /api/v1/recognitions
//! GET /api/v1/recognitions/{id}
//! POST /api/v1/recognitions/{id}/endorse
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{EndorseRequest, TransferRequest};
use crate::domain::{Endorsement, EndorsementReceipt, Transfer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_required_integer, require};

/// Request payload for sending recognition credits.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecognitionRequestBody {
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
    /// Integer, or a string holding one.
    #[schema(value_type = Option<Object>, example = 40)]
    pub amount: Option<Value>,
    #[schema(example = "Thanks for the pairing session")]
    pub message: Option<String>,
}

/// Request payload for endorsing a recognition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndorseRequestBody {
    pub endorser_id: Option<i64>,
}

/// Recognition as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionBody {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub amount: i64,
    pub message: Option<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
    pub endorsement_count: i64,
}

impl From<Transfer> for RecognitionBody {
    fn from(transfer: Transfer) -> Self {
        Self {
            id: transfer.id.get(),
            sender_id: transfer.sender_id.get(),
            receiver_id: transfer.receiver_id.get(),
            amount: transfer.amount.get(),
            message: transfer.note,
            created_at: transfer.created_at.to_rfc3339(),
            endorsement_count: transfer.endorsement_count,
        }
    }
}

/// Envelope wrapping a single recognition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecognitionEnvelope {
    pub recognition: RecognitionBody,
}

/// Endorsement as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementBody {
    pub id: i64,
    pub recognition_id: i64,
    pub endorser_id: i64,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<Endorsement> for EndorsementBody {
    fn from(endorsement: Endorsement) -> Self {
        Self {
            id: endorsement.id.get(),
            recognition_id: endorsement.transfer_id.get(),
            endorser_id: endorsement.endorser_id.get(),
            created_at: endorsement.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for a new endorsement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementResponseBody {
    pub endorsement: EndorsementBody,
    pub new_endorsement_count: i64,
}

impl From<EndorsementReceipt> for EndorsementResponseBody {
    fn from(receipt: EndorsementReceipt) -> Self {
        Self {
            endorsement: receipt.endorsement.into(),
            new_endorsement_count: receipt.endorsement_count,
        }
    }
}

fn parse_transfer_request(payload: CreateRecognitionRequestBody) -> ApiResult<TransferRequest> {
    let sender_id = require(payload.sender_id, FieldName::new("senderId"))?;
    let receiver_id = require(payload.receiver_id, FieldName::new("receiverId"))?;
    let amount = parse_required_integer(payload.amount, FieldName::new("amount"))?;
    Ok(TransferRequest {
        sender_id,
        receiver_id,
        amount,
        note: payload.message,
    })
}

/// Send credits from one student to another.
#[utoipa::path(
    post,
    path = "/api/v1/recognitions",
    request_body = CreateRecognitionRequestBody,
    responses(
        (status = 201, description = "Recognition recorded", body = RecognitionEnvelope),
        (status = 400, description = "Invalid request, insufficient balance or monthly limit exceeded", body = ErrorSchema),
        (status = 404, description = "Unknown sender or receiver", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recognitions"],
    operation_id = "createRecognition"
)]
#[post("/recognitions")]
pub async fn create_recognition(
    state: web::Data<HttpState>,
    payload: web::Json<CreateRecognitionRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_transfer_request(payload.into_inner())?;
    let transfer = state.ledger.transfer(request).await?;
    Ok(HttpResponse::Created().json(RecognitionEnvelope {
        recognition: transfer.into(),
    }))
}

/// Fetch a recognition with its endorsement count.
#[utoipa::path(
    get,
    path = "/api/v1/recognitions/{id}",
    params(("id" = i64, Path, description = "Recognition identifier")),
    responses(
        (status = 200, description = "Recognition", body = RecognitionEnvelope),
        (status = 404, description = "Unknown recognition", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recognitions"],
    operation_id = "getRecognition"
)]
#[get("/recognitions/{id}")]
pub async fn get_recognition(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecognitionEnvelope>> {
    let transfer = state.ledger_query.get_transfer(path.into_inner()).await?;
    Ok(web::Json(RecognitionEnvelope {
        recognition: transfer.into(),
    }))
}

/// Endorse a recognition; each student may endorse a recognition once.
#[utoipa::path(
    post,
    path = "/api/v1/recognitions/{id}/endorse",
    params(("id" = i64, Path, description = "Recognition identifier")),
    request_body = EndorseRequestBody,
    responses(
        (status = 201, description = "Endorsement recorded", body = EndorsementResponseBody),
        (status = 400, description = "Missing endorser or duplicate endorsement", body = ErrorSchema),
        (status = 404, description = "Unknown recognition or endorser", body = ErrorSchema),
        (status = 503, description = "Ledger store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["recognitions"],
    operation_id = "endorseRecognition"
)]
#[post("/recognitions/{id}/endorse")]
pub async fn endorse_recognition(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<EndorseRequestBody>,
) -> ApiResult<HttpResponse> {
    let endorser_id = require(payload.into_inner().endorser_id, FieldName::new("endorserId"))?;
    let receipt = state
        .ledger
        .endorse(EndorseRequest {
            transfer_id: path.into_inner(),
            endorser_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(EndorsementResponseBody::from(receipt)))
}

#[cfg(test)]
#[path = "recognitions_tests.rs"]
mod tests;
