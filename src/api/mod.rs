//! HTTP API for the payroll engine.
//!
//! Exposes run initiation, the approval lifecycle, run and payslip reads,
//! and the one-off payment administration as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    FinanceActionRequest, FinanceReasonRequest, InitiatePayrollRequest, ManagerActionRequest,
    ManagerReasonRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
