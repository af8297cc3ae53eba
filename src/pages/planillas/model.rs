use chrono::NaiveDate;
use serde::Deserialize;

use crate::workers::WorkerRow;

#[derive(Debug, Deserialize)]
pub(super) struct CreatePayroll {
    pub(super) com_nro: Option<i32>,
    pub(super) cod_patronal: String,
    pub(super) empresa: String,
    /// `AP` or `AV`
    pub(super) tipo_empresa: String,
    pub(super) gestion: i32,
    pub(super) mes: u32,
    pub(super) trabajadores: Vec<WorkerRow>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PreliminaryQuery {
    /// Hypothetical payment day in fund time
    pub(super) fecha_pago: NaiveDate,
}
