use actix_web::web;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::{calculation::Calculator, consts, error::ApiError, workers::WorkerRow};

mod planillas;
mod adicionales;
mod pagos;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/planillas")
            .configure(planillas::config))
        .service(web::scope("/planillas-adicionales")
            .configure(adicionales::config))
        .service(web::scope("/pagos-aportes")
            .configure(pagos::config));
}

/// `?page=&limit=`, pages start at 1
#[derive(Debug, Default, Deserialize)]
struct Pagination {
    page: Option<u64>,
    limit: Option<u64>,
}

impl Pagination {
    fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    fn limit(&self) -> u64 {
        self.limit.unwrap_or(consts::DEFAULT_PAGE_SIZE).clamp(1, consts::MAX_PAGE_SIZE)
    }

    fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Page<T> {
    page: u64,
    limit: u64,
    items: Vec<T>,
}

impl<T> Page<T> {
    fn new(pagination: &Pagination, items: Vec<T>) -> Self {
        Self {
            page: pagination.page(),
            limit: pagination.limit(),
            items,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SubmitRequest {
    /// Defaults to the time of the request
    fecha_declarada: Option<DateTime<FixedOffset>>,
}

impl SubmitRequest {
    /// An empty body means "declare now"; anything else must parse.
    fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("invalid `fecha_declarada`: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    estado: i16,
    observaciones: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CorrectRequest {
    trabajadores: Vec<WorkerRow>,
}

/// Current time in the fund's timezone, used for audit columns
fn fund_now(calculator: &Calculator) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(calculator.timezone())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use actix_web::web;
    use chrono::TimeZone as _;

    use crate::{
        calculation::{tests::bolivia, Calculator},
        locks::PayrollLocks,
        report::DisplayLocale,
        ufv::tests::StaticUfv,
    };

    use super::*;

    pub(crate) fn calculator() -> web::Data<Calculator> {
        web::Data::new(Calculator::new(bolivia(), Arc::new(StaticUfv::flat(2.5))))
    }

    pub(crate) fn locks() -> web::Data<PayrollLocks> {
        web::Data::new(PayrollLocks::new())
    }

    pub(crate) fn locale() -> web::Data<DisplayLocale> {
        web::Data::new(DisplayLocale::EsBo)
    }

    #[test]
    fn test_pagination_bounds() {
        let default = Pagination::default();
        assert_eq!((default.page(), default.limit(), default.offset()), (1, consts::DEFAULT_PAGE_SIZE, 0));

        let third = Pagination { page: Some(3), limit: Some(10) };
        assert_eq!(third.offset(), 20);

        let silly = Pagination { page: Some(0), limit: Some(100_000) };
        assert_eq!((silly.page(), silly.limit()), (1, consts::MAX_PAGE_SIZE));
    }

    #[test]
    fn test_submit_request_body() {
        assert!(SubmitRequest::from_body(b"").unwrap().fecha_declarada.is_none());
        assert!(SubmitRequest::from_body(b"{}").unwrap().fecha_declarada.is_none());

        let declared = SubmitRequest::from_body(br#"{"fecha_declarada":"2024-04-30T10:00:00-04:00"}"#).unwrap();
        assert_eq!(declared.fecha_declarada, Some(bolivia().with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap()));

        let Err(ApiError::Validation(message)) = SubmitRequest::from_body(br#"{"fecha_declarada":"2024-13-45 garbage"}"#) else {
            panic!("malformed date must be rejected");
        };
        assert!(message.contains("fecha_declarada"));
    }
}
