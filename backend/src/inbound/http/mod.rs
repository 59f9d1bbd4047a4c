//! HTTP inbound adapter exposing the ledger REST endpoints.

pub mod admin;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod recognitions;
pub mod schemas;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every ledger endpoint on a scope or app.
///
/// Mount it under `/api/v1`; the probes in [`health`] are registered
/// separately at the root. Extractor failures (bad JSON, wrong content type,
/// malformed query or path) are answered with the domain error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(validation::path_error_handler))
        .service(students::create_student)
        .service(students::get_student)
        .service(students::redeem_credits)
        .service(recognitions::create_recognition)
        .service(recognitions::get_recognition)
        .service(recognitions::endorse_recognition)
        .service(leaderboard::leaderboard)
        .service(admin::reset_all);
}
