//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every ledger endpoint, the health probes, and the
//! schema wrappers for the domain error payload. Swagger UI serves it in
//! debug builds and `openapi-dump` writes it out for external tooling.

use crate::inbound::http::admin::ResetAllResponseBody;
use crate::inbound::http::leaderboard::{LeaderboardEntryBody, LeaderboardResponseBody};
use crate::inbound::http::recognitions::{
    CreateRecognitionRequestBody, EndorseRequestBody, EndorsementBody, EndorsementResponseBody,
    RecognitionBody, RecognitionEnvelope,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::students::{
    CreateStudentRequestBody, RedeemRequestBody, RedemptionBody, RedemptionEnvelope, StudentBody,
    StudentEnvelope,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kudos ledger API",
        description = "Peer recognition credits: monthly allotments, transfers, endorsements and voucher redemption."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::create_student,
        crate::inbound::http::students::get_student,
        crate::inbound::http::students::redeem_credits,
        crate::inbound::http::recognitions::create_recognition,
        crate::inbound::http::recognitions::get_recognition,
        crate::inbound::http::recognitions::endorse_recognition,
        crate::inbound::http::leaderboard::leaderboard,
        crate::inbound::http::admin::reset_all,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateStudentRequestBody,
        StudentBody,
        StudentEnvelope,
        RedeemRequestBody,
        RedemptionBody,
        RedemptionEnvelope,
        CreateRecognitionRequestBody,
        RecognitionBody,
        RecognitionEnvelope,
        EndorseRequestBody,
        EndorsementBody,
        EndorsementResponseBody,
        LeaderboardEntryBody,
        LeaderboardResponseBody,
        ResetAllResponseBody,
    )),
    tags(
        (name = "students", description = "Student accounts and voucher redemption"),
        (name = "recognitions", description = "Credit transfers and endorsements"),
        (name = "leaderboard", description = "Ranking by credits received"),
        (name = "admin", description = "Ledger maintenance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
