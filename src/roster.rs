use std::{collections::HashMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{entity::planilla_aporte_detalle, utils};

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("invalid period {gestion}-{mes}")]
    InvalidPeriod { gestion: i32, mes: u32 },

    #[error("no payroll data for employer `{cod_patronal}` in period {period}")]
    NoData { cod_patronal: String, period: Period },
}

/// Contribution month ("gestión" + "mes")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub gestion: i32,
    pub mes: u32,
}

impl Period {
    pub fn new(gestion: i32, mes: u32) -> Result<Self, RosterError> {
        if utils::first_day_of_month(gestion, mes).is_none() {
            return Err(RosterError::InvalidPeriod { gestion, mes });
        }

        Ok(Self { gestion, mes })
    }

    /// Resolves the period compared against `current`.
    ///
    /// A December previous month always belongs to the year before the
    /// current gestión.
    pub fn previous_of(current: Period, mes_anterior: u32) -> Result<Self, RosterError> {
        let gestion = if mes_anterior == 12 { current.gestion - 1 } else { current.gestion };

        Period::new(gestion, mes_anterior)
    }

    pub fn first_day(&self) -> NaiveDate {
        // Validated in `Period::new`
        utils::first_day_of_month(self.gestion, self.mes).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.gestion, self.mes)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bajas {
    /// In the previous roster, missing from the current one
    pub no_encontradas: Vec<planilla_aporte_detalle::Model>,
    /// In both rosters, retired during the current month (current-period record)
    pub por_retiro: Vec<planilla_aporte_detalle::Model>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterDiff {
    pub periodo_anterior: Option<Period>,
    pub periodo_actual: Option<Period>,
    pub altas: Vec<planilla_aporte_detalle::Model>,
    pub bajas: Bajas,
}

/// Compares two rosters of the same employer by identity document.
///
/// `current_month` is any date inside the current period. Rows keep the
/// order they were given in. A worker may end up in both baja lists when the
/// data is inconsistent, this is reported as is.
pub fn compare(
    current: &[planilla_aporte_detalle::Model],
    previous: &[planilla_aporte_detalle::Model],
    current_month: NaiveDate,
) -> RosterDiff {
    let (window_start, window_end) = utils::month_window(current_month);

    let current_by_ci = index_by_ci(current);
    let previous_by_ci = index_by_ci(previous);

    let altas = current.iter()
        .filter(|row| !previous_by_ci.contains_key(row.ci.trim()))
        .cloned()
        .collect();

    let mut bajas = Bajas::default();

    for row in previous {
        match current_by_ci.get(row.ci.trim()) {
            None => bajas.no_encontradas.push(row.clone()),
            Some(current_row) => {
                let retired_this_month = current_row.fecha_retiro
                    .is_some_and(|retiro| window_start <= retiro && retiro < window_end);

                if retired_this_month {
                    bajas.por_retiro.push((*current_row).clone());
                }
            },
        }
    }

    RosterDiff {
        periodo_anterior: None,
        periodo_actual: None,
        altas,
        bajas,
    }
}

/// Last row wins when a CI is repeated inside one roster
fn index_by_ci(rows: &[planilla_aporte_detalle::Model]) -> HashMap<&str, &planilla_aporte_detalle::Model> {
    rows.iter()
        .map(|row| (row.ci.trim(), row))
        .collect()
}
