//! HTTP request handlers for the payroll API.
//!
//! Every handler tags its logs with a fresh correlation id and maps engine
//! errors through [`ApiErrorResponse`].

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{PayrollPeriod, SigningBonusEdit, TerminationBenefitEdit};

use super::request::{
    FinanceActionRequest, FinanceReasonRequest, InitiatePayrollRequest, ManagerActionRequest,
    ManagerReasonRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(initiate_handler).get(list_runs_handler))
        .route("/runs/:run_id", get(get_run_handler))
        .route("/runs/:run_id/details", get(details_handler))
        .route("/runs/:run_id/payslips", get(payslips_handler))
        .route("/runs/:run_id/payslips/:employee_id", get(payslip_handler))
        .route("/runs/:run_id/review", post(review_handler))
        .route("/runs/:run_id/manager-approval", post(manager_approve_handler))
        .route("/runs/:run_id/manager-rejection", post(manager_reject_handler))
        .route("/runs/:run_id/finance-approval", post(finance_approve_handler))
        .route("/runs/:run_id/finance-rejection", post(finance_reject_handler))
        .route("/runs/:run_id/lock", post(lock_handler))
        .route("/runs/:run_id/unlock", post(unlock_handler))
        .route("/runs/:run_id/execute", post(execute_handler))
        .route("/signing-bonuses/:id", patch(edit_bonus_handler))
        .route("/signing-bonuses/:id/approve", post(approve_bonus_handler))
        .route("/signing-bonuses/:id/reject", post(reject_bonus_handler))
        .route("/termination-benefits/:id", patch(edit_benefit_handler))
        .route(
            "/termination-benefits/:id/approve",
            post(approve_benefit_handler),
        )
        .route("/termination-benefits/:id/reject", post(reject_benefit_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Renders an engine result, logging failures under the correlation id.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            json_response(status, body)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            error_response(err.into())
        }
    }
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(error_response(ApiErrorResponse::bad_request(error)))
        }
    }
}

/// Parses and validates a body in one step.
macro_rules! body_or_return {
    ($payload:expr, $correlation_id:expr) => {
        match parse_body($payload, $correlation_id) {
            Ok(body) => match body.validate() {
                Ok(()) => body,
                Err(error) => {
                    return error_response(ApiErrorResponse::bad_request(error));
                }
            },
            Err(response) => return response,
        }
    };
}

/// POST /runs
async fn initiate_handler(
    State(state): State<AppState>,
    payload: Result<Json<InitiatePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    info!(
        correlation_id = %correlation_id,
        period = %request.period,
        unit_id = %request.unit_id,
        "Initiating payroll run"
    );

    // Initiation computes the whole unit synchronously; keep it off the
    // async workers.
    let engine = state.shared_engine();
    let joined = tokio::task::spawn_blocking(move || {
        let period = PayrollPeriod::from_str(&request.period)?;
        engine.initiate_payroll(period, &request.unit_id, &request.specialist_id)
    })
    .await;

    match joined {
        Ok(result) => respond(correlation_id, "initiate", StatusCode::CREATED, result),
        Err(err) => {
            error!(
                correlation_id = %correlation_id,
                error = %err,
                "Initiation task did not complete"
            );
            error_response(ApiErrorResponse::internal(ApiError::new(
                "INTERNAL_ERROR",
                "Payroll initiation did not complete",
            )))
        }
    }
}

/// GET /runs
async fn list_runs_handler(State(state): State<AppState>) -> Response {
    respond(
        Uuid::new_v4(),
        "list_runs",
        StatusCode::OK,
        state.engine().list_runs(),
    )
}

/// GET /runs/:run_id
async fn get_run_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    respond(
        Uuid::new_v4(),
        "get_run",
        StatusCode::OK,
        state.engine().get_run(run_id),
    )
}

/// GET /runs/:run_id/details
async fn details_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    respond(
        Uuid::new_v4(),
        "get_draft_details",
        StatusCode::OK,
        state.engine().get_draft_details(run_id),
    )
}

/// GET /runs/:run_id/payslips
async fn payslips_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    respond(
        Uuid::new_v4(),
        "get_payslips",
        StatusCode::OK,
        state.engine().get_payslips(run_id),
    )
}

/// GET /runs/:run_id/payslips/:employee_id
async fn payslip_handler(
    State(state): State<AppState>,
    Path((run_id, employee_id)): Path<(Uuid, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.engine().get_payslip(run_id, &employee_id) {
        Ok(Some(payslip)) => json_response(StatusCode::OK, payslip),
        Ok(None) => {
            warn!(
                correlation_id = %correlation_id,
                run_id = %run_id,
                employee_id = %employee_id,
                "Payslip not found"
            );
            json_response(
                StatusCode::NOT_FOUND,
                ApiError::new(
                    "PAYSLIP_NOT_FOUND",
                    format!("No payslip for employee '{}' in run {}", employee_id, run_id),
                ),
            )
        }
        Err(err) => respond::<()>(correlation_id, "get_payslip", StatusCode::OK, Err(err)),
    }
}

/// POST /runs/:run_id/review
async fn review_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    respond(
        Uuid::new_v4(),
        "review",
        StatusCode::OK,
        state.engine().review_payroll(run_id),
    )
}

/// POST /runs/:run_id/manager-approval
async fn manager_approve_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ManagerActionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "manager_approve",
        StatusCode::OK,
        state.engine().approve_by_manager(run_id, &request.manager_id),
    )
}

/// POST /runs/:run_id/manager-rejection
async fn manager_reject_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ManagerReasonRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "manager_reject",
        StatusCode::OK,
        state
            .engine()
            .reject_by_manager(run_id, &request.manager_id, &request.reason),
    )
}

/// POST /runs/:run_id/finance-approval
async fn finance_approve_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<FinanceActionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "finance_approve",
        StatusCode::OK,
        state.engine().approve_by_finance(run_id, &request.staff_id),
    )
}

/// POST /runs/:run_id/finance-rejection
async fn finance_reject_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<FinanceReasonRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "finance_reject",
        StatusCode::OK,
        state
            .engine()
            .reject_by_finance(run_id, &request.staff_id, &request.reason),
    )
}

/// POST /runs/:run_id/lock
async fn lock_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ManagerActionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "lock",
        StatusCode::OK,
        state.engine().lock_payroll(run_id, &request.manager_id),
    )
}

/// POST /runs/:run_id/unlock
async fn unlock_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ManagerReasonRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = body_or_return!(payload, correlation_id);
    respond(
        correlation_id,
        "unlock",
        StatusCode::OK,
        state
            .engine()
            .unlock_payroll(run_id, &request.manager_id, &request.reason),
    )
}

/// POST /runs/:run_id/execute
async fn execute_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    respond(
        Uuid::new_v4(),
        "execute",
        StatusCode::OK,
        state.engine().execute_payroll(run_id),
    )
}

/// PATCH /signing-bonuses/:id
async fn edit_bonus_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SigningBonusEdit>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let edit = match parse_body(payload, correlation_id) {
        Ok(edit) => edit,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "edit_signing_bonus",
        StatusCode::OK,
        state.engine().edit_signing_bonus(&id, edit),
    )
}

/// POST /signing-bonuses/:id/approve
async fn approve_bonus_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(
        Uuid::new_v4(),
        "approve_signing_bonus",
        StatusCode::OK,
        state.engine().approve_signing_bonus(&id),
    )
}

/// POST /signing-bonuses/:id/reject
async fn reject_bonus_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(
        Uuid::new_v4(),
        "reject_signing_bonus",
        StatusCode::OK,
        state.engine().reject_signing_bonus(&id),
    )
}

/// PATCH /termination-benefits/:id
async fn edit_benefit_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TerminationBenefitEdit>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let edit = match parse_body(payload, correlation_id) {
        Ok(edit) => edit,
        Err(response) => return response,
    };
    respond(
        correlation_id,
        "edit_termination_benefit",
        StatusCode::OK,
        state.engine().edit_termination_benefit(&id, edit),
    )
}

/// POST /termination-benefits/:id/approve
async fn approve_benefit_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(
        Uuid::new_v4(),
        "approve_termination_benefit",
        StatusCode::OK,
        state.engine().approve_termination_benefit(&id),
    )
}

/// POST /termination-benefits/:id/reject
async fn reject_benefit_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    respond(
        Uuid::new_v4(),
        "reject_termination_benefit",
        StatusCode::OK,
        state.engine().reject_termination_benefit(&id),
    )
}
