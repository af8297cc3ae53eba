use chrono::NaiveDate;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::entity::{planilla_adicional_detalle, planilla_aporte_detalle};

/// One worker line of an uploaded or corrected payroll.
///
/// Rows are validated before they reach the store; `salario` is derived here
/// and stored, later edits of the components must go through a new row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRow {
    pub nro: i32,
    pub ci: String,
    pub apellido_paterno: String,
    #[serde(default)]
    pub apellido_materno: String,
    pub nombres: String,
    pub sexo: String,
    pub cargo: String,
    pub fecha_nac: NaiveDate,
    pub fecha_ingreso: NaiveDate,
    #[serde(default)]
    pub fecha_retiro: Option<NaiveDate>,
    pub dias_pagados: i32,
    pub haber_basico: f64,
    #[serde(default)]
    pub bono_antiguedad: f64,
    #[serde(default)]
    pub monto_horas_extra: f64,
    #[serde(default)]
    pub monto_horas_extra_nocturnas: f64,
    #[serde(default)]
    pub otros_bonos_pagos: f64,
    pub regional: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub total_importe: f64,
    pub total_trabaj: i32,
}

impl WorkerRow {
    pub fn salario(&self) -> f64 {
        self.haber_basico
            + self.bono_antiguedad
            + self.monto_horas_extra
            + self.monto_horas_extra_nocturnas
            + self.otros_bonos_pagos
    }

    pub fn validate(&self) -> Result<(), String> {
        let fail = |reason: &str| Err(format!("row {} (CI `{}`): {reason}", self.nro, self.ci));

        if self.ci.trim().is_empty() {
            return fail("identity document is required");
        }
        if self.nombres.trim().is_empty() || self.apellido_paterno.trim().is_empty() {
            return fail("names are required");
        }
        if !matches!(self.sexo.trim(), "M" | "F") {
            return fail("sex must be `M` or `F`");
        }
        if !(0..=31).contains(&self.dias_pagados) {
            return fail("paid days must be between 0 and 31");
        }

        let components = [
            self.haber_basico,
            self.bono_antiguedad,
            self.monto_horas_extra,
            self.monto_horas_extra_nocturnas,
            self.otros_bonos_pagos,
        ];
        if components.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return fail("pay components must be non-negative amounts");
        }

        if self.fecha_retiro.is_some_and(|retiro| retiro < self.fecha_ingreso) {
            return fail("termination date is before hire date");
        }

        Ok(())
    }

    pub fn into_aporte_detalle(self, id_planilla_aportes: i32) -> planilla_aporte_detalle::ActiveModel {
        let salario = self.salario();

        planilla_aporte_detalle::ActiveModel {
            id_planilla_aportes_detalles: NotSet,
            id_planilla_aportes: Set(id_planilla_aportes),
            nro: Set(self.nro),
            ci: Set(self.ci.trim().to_owned()),
            apellido_paterno: Set(self.apellido_paterno),
            apellido_materno: Set(self.apellido_materno),
            nombres: Set(self.nombres),
            sexo: Set(self.sexo.trim().to_owned()),
            cargo: Set(self.cargo),
            fecha_nac: Set(self.fecha_nac),
            fecha_ingreso: Set(self.fecha_ingreso),
            fecha_retiro: Set(self.fecha_retiro),
            dias_pagados: Set(self.dias_pagados),
            haber_basico: Set(self.haber_basico),
            bono_antiguedad: Set(self.bono_antiguedad),
            monto_horas_extra: Set(self.monto_horas_extra),
            monto_horas_extra_nocturnas: Set(self.monto_horas_extra_nocturnas),
            otros_bonos_pagos: Set(self.otros_bonos_pagos),
            salario: Set(salario),
            regional: Set(self.regional),
        }
    }

    pub fn into_adicional_detalle(self, id_planilla_adicional: i32) -> planilla_adicional_detalle::ActiveModel {
        let salario = self.salario();

        planilla_adicional_detalle::ActiveModel {
            id_planilla_adicional_detalles: NotSet,
            id_planilla_adicional: Set(id_planilla_adicional),
            nro: Set(self.nro),
            ci: Set(self.ci.trim().to_owned()),
            apellido_paterno: Set(self.apellido_paterno),
            apellido_materno: Set(self.apellido_materno),
            nombres: Set(self.nombres),
            sexo: Set(self.sexo.trim().to_owned()),
            cargo: Set(self.cargo),
            fecha_nac: Set(self.fecha_nac),
            fecha_ingreso: Set(self.fecha_ingreso),
            fecha_retiro: Set(self.fecha_retiro),
            dias_pagados: Set(self.dias_pagados),
            haber_basico: Set(self.haber_basico),
            bono_antiguedad: Set(self.bono_antiguedad),
            monto_horas_extra: Set(self.monto_horas_extra),
            monto_horas_extra_nocturnas: Set(self.monto_horas_extra_nocturnas),
            otros_bonos_pagos: Set(self.otros_bonos_pagos),
            salario: Set(salario),
            regional: Set(self.regional),
        }
    }
}

/// Validates every row and computes the payroll aggregates.
pub fn validate_rows(rows: &[WorkerRow]) -> Result<Totals, String> {
    if rows.is_empty() {
        return Err("the payroll has no workers".to_owned());
    }

    for row in rows {
        row.validate()?;
    }

    Ok(Totals {
        total_importe: rows.iter().map(WorkerRow::salario).sum(),
        total_trabaj: rows.len() as i32,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn row(nro: i32, ci: &str, haber_basico: f64) -> WorkerRow {
        WorkerRow {
            nro,
            ci: ci.to_owned(),
            apellido_paterno: "Condori".to_owned(),
            apellido_materno: "Flores".to_owned(),
            nombres: "Ana".to_owned(),
            sexo: "F".to_owned(),
            cargo: "Cajera".to_owned(),
            fecha_nac: NaiveDate::from_ymd_opt(1992, 7, 14).unwrap(),
            fecha_ingreso: NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
            fecha_retiro: None,
            dias_pagados: 30,
            haber_basico,
            bono_antiguedad: 0.0,
            monto_horas_extra: 0.0,
            monto_horas_extra_nocturnas: 0.0,
            otros_bonos_pagos: 0.0,
            regional: "La Paz".to_owned(),
        }
    }

    #[test]
    fn test_salario_sums_components() {
        let mut worker = row(1, "100", 3000.0);
        worker.bono_antiguedad = 150.0;
        worker.monto_horas_extra = 200.5;
        worker.monto_horas_extra_nocturnas = 49.5;
        worker.otros_bonos_pagos = 100.0;

        assert_eq!(worker.salario(), 3500.0);

        let detalle = worker.into_aporte_detalle(9);
        assert_eq!(detalle.salario, Set(3500.0));
        assert_eq!(detalle.id_planilla_aportes, Set(9));
    }

    #[test]
    fn test_validate_rows_totals() {
        let totals = validate_rows(&[row(1, "100", 3000.0), row(2, "200", 7000.0)]).unwrap();

        assert_eq!(totals, Totals { total_importe: 10_000.0, total_trabaj: 2 });
    }

    #[test]
    fn test_validate_rows_rejects() {
        assert!(validate_rows(&[]).is_err());

        let mut no_ci = row(1, " ", 3000.0);
        no_ci.ci = " ".to_owned();
        assert!(validate_rows(&[no_ci]).unwrap_err().contains("identity document"));

        let mut negative = row(2, "200", 3000.0);
        negative.otros_bonos_pagos = -1.0;
        assert!(validate_rows(&[negative]).is_err());

        let mut retired_early = row(3, "300", 3000.0);
        retired_early.fecha_retiro = Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(validate_rows(&[retired_early]).unwrap_err().starts_with("row 3"));

        let mut bad_sex = row(4, "400", 3000.0);
        bad_sex.sexo = "X".to_owned();
        assert!(validate_rows(&[bad_sex]).is_err());
    }
}
