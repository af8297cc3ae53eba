use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::{calculation::CalculationError, lifecycle::TransitionError, roster::RosterError, ufv::UfvError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("database error")]
    Database(#[from] DbErr),
}

impl From<UfvError> for ApiError {
    fn from(e: UfvError) -> Self {
        ApiError::Calculation(CalculationError::Ufv(e))
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        if let ApiError::Database(e) = self {
            error!(error = %e, "database failure");
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Transition(TransitionError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Transition(_) => StatusCode::BAD_REQUEST,
            ApiError::Calculation(CalculationError::MissingDate(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Calculation(CalculationError::InvalidEmployerType(_)) => StatusCode::BAD_REQUEST,
            ApiError::Calculation(CalculationError::Ufv(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Roster(RosterError::InvalidPeriod { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Roster(RosterError::NoData { .. }) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError as _;
    use chrono::NaiveDate;

    use crate::entity::sea_orm_active_enums::PayrollStatus;

    use super::*;

    #[test]
    fn test_status_codes() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(ApiError::from(UfvError::NotFound(date)).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::from(CalculationError::MissingDate("fecha_pago")).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::from(TransitionError::InvalidReviewStatus(5)).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(TransitionError::InvalidTransition { action: "correct", from: PayrollStatus::Pending }).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::Validation("bad".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_message_names_failed_precondition() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(ApiError::from(UfvError::NotFound(date)).to_string(), "no UFV data for date 2024-05-01");
        assert_eq!(
            ApiError::from(CalculationError::MissingDate("fecha_pago")).to_string(),
            "calculation preconditions not met: `fecha_pago` is not set"
        );
    }
}
