//! Contribution settlement: indexed contribution, interest and penalties owed
//! for a payroll given its declaration and payment dates.
//!
//! The committed calculation and the preliminary ("what-if") calculation run
//! the same [`Calculator::settle`]; they only differ in where the payment date
//! comes from and whether the caller persists the result.

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate};
use sea_orm::ActiveValue::Set;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    consts,
    entity::planilla_aporte,
    ufv::{UfvError, UfvResolver},
    utils,
};

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("calculation preconditions not met: `{0}` is not set")]
    MissingDate(&'static str),

    #[error("invalid employer type `{0}`, expected `AP` or `AV`")]
    InvalidEmployerType(String),

    #[error(transparent)]
    Ufv(#[from] UfvError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployerType {
    Ap,
    Av,
}

impl EmployerType {
    pub fn rate(self) -> f64 {
        match self {
            EmployerType::Ap => consts::RATE_AP,
            EmployerType::Av => consts::RATE_AV,
        }
    }
}

impl FromStr for EmployerType {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AP" => Ok(EmployerType::Ap),
            "AV" => Ok(EmployerType::Av),
            other => Err(CalculationError::InvalidEmployerType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettlementInput {
    pub total_importe: f64,
    pub tipo_empresa: String,
    pub fecha_planilla: NaiveDate,
    pub fecha_declarada: DateTime<FixedOffset>,
    pub fecha_pago: DateTime<FixedOffset>,
}

impl SettlementInput {
    /// Input for the committed calculation, both dates must be stored on the payroll.
    pub fn committed(payroll: &planilla_aporte::Model) -> Result<Self, CalculationError> {
        Self::build(payroll, payroll.fecha_pago)
    }

    /// Input with a payment date that is not stored yet: a hypothetical one
    /// for preliminary calculations, or the one being recorded.
    pub fn with_payment(
        payroll: &planilla_aporte::Model,
        fecha_pago: DateTime<FixedOffset>,
    ) -> Result<Self, CalculationError> {
        Self::build(payroll, Some(fecha_pago))
    }

    fn build(
        payroll: &planilla_aporte::Model,
        fecha_pago: Option<DateTime<FixedOffset>>,
    ) -> Result<Self, CalculationError> {
        let fecha_declarada = payroll.fecha_declarada
            .ok_or(CalculationError::MissingDate("fecha_declarada"))?;
        let fecha_pago = fecha_pago
            .ok_or(CalculationError::MissingDate("fecha_pago"))?;

        Ok(Self {
            total_importe: payroll.total_importe,
            tipo_empresa: payroll.tipo_empresa.clone(),
            fecha_planilla: payroll.fecha_planilla,
            fecha_declarada,
            fecha_pago,
        })
    }
}

/// Unrounded results of a settlement. Amounts are rounded only when rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub fecha_declarada: DateTime<FixedOffset>,
    pub fecha_pago: DateTime<FixedOffset>,
    pub fecha_limite: NaiveDate,
    pub aporte_porcentaje: f64,
    pub ufv_dia_formal: f64,
    pub ufv_dia_presentacion: f64,
    pub aporte_actualizado: f64,
    pub monto_actualizado: f64,
    pub multa_no_presentacion: f64,
    pub dias_retraso: i64,
    pub intereses: f64,
    pub multa_sobre_intereses: f64,
    pub total_a_cancelar_parcial: f64,
    pub total_multas: f64,
    pub total_tasa_interes: f64,
    pub total_aportes_asuss: f64,
    pub total_aportes_min_salud: f64,
    pub total_a_cancelar: f64,
}

impl Settlement {
    /// Writes every computed column at once so a single UPDATE carries the whole result.
    pub fn apply_to(&self, model: &mut planilla_aporte::ActiveModel) {
        model.fecha_pago = Set(Some(self.fecha_pago));
        model.aporte_porcentaje = Set(Some(self.aporte_porcentaje));
        model.ufv_dia_formal = Set(Some(self.ufv_dia_formal));
        model.ufv_dia_presentacion = Set(Some(self.ufv_dia_presentacion));
        model.aporte_actualizado = Set(Some(self.aporte_actualizado));
        model.monto_actualizado = Set(Some(self.monto_actualizado));
        model.multa_no_presentacion = Set(Some(self.multa_no_presentacion));
        model.dias_retraso = Set(Some(self.dias_retraso.clamp(0, i32::MAX as i64) as i32));
        model.intereses = Set(Some(self.intereses));
        model.multa_sobre_intereses = Set(Some(self.multa_sobre_intereses));
        model.total_a_cancelar_parcial = Set(Some(self.total_a_cancelar_parcial));
        model.total_multas = Set(Some(self.total_multas));
        model.total_tasa_interes = Set(Some(self.total_tasa_interes));
        model.total_aportes_asuss = Set(Some(self.total_aportes_asuss));
        model.total_aportes_min_salud = Set(Some(self.total_aportes_min_salud));
        model.total_a_cancelar = Set(Some(self.total_a_cancelar));
    }
}

pub struct Calculator {
    tz: FixedOffset,
    ufv: Arc<dyn UfvResolver>,
}

impl Calculator {
    pub fn new(tz: FixedOffset, ufv: Arc<dyn UfvResolver>) -> Self {
        Self { tz, ufv }
    }

    pub fn timezone(&self) -> &FixedOffset {
        &self.tz
    }

    #[instrument(skip(self), fields(total_importe = input.total_importe, tipo_empresa = %input.tipo_empresa))]
    pub async fn settle(&self, input: &SettlementInput) -> Result<Settlement, CalculationError> {
        let declared = utils::local_midnight(&input.fecha_declarada, &self.tz);
        let payment = utils::local_midnight(&input.fecha_pago, &self.tz);

        let fecha_limite = utils::payment_deadline(input.fecha_planilla);
        let deadline = utils::start_of_day(fecha_limite, &self.tz);

        let employer_type: EmployerType = input.tipo_empresa.parse()?;
        let aporte_porcentaje = input.total_importe * employer_type.rate();

        // The payment side is indexed with the UFV of the day before paying
        let day_before_payment = payment.date_naive().pred_opt().unwrap_or(NaiveDate::MIN);
        let ufv_dia_formal = self.ufv.ufv_for(declared.date_naive()).await?;
        let ufv_dia_presentacion = self.ufv.ufv_for(day_before_payment).await?;

        let aporte_actualizado = (aporte_porcentaje / ufv_dia_formal * ufv_dia_presentacion).max(aporte_porcentaje);
        let monto_actualizado = (aporte_actualizado - aporte_porcentaje).max(0.0);

        let multa_no_presentacion = if declared > deadline {
            aporte_porcentaje * consts::LATE_FILING_RATE
        } else {
            0.0
        };

        let dias_retraso = days_late(payment, deadline);

        let intereses = aporte_actualizado * consts::ANNUAL_INTEREST_RATE / consts::INTEREST_DAY_COUNT * dias_retraso as f64;
        let multa_sobre_intereses = intereses * consts::INTEREST_PENALTY_RATE;

        let total_a_cancelar_parcial = aporte_porcentaje
            + monto_actualizado
            + multa_no_presentacion
            + intereses
            + multa_sobre_intereses;

        let total_aportes_asuss = aporte_porcentaje * consts::ASUSS_RATE;
        let total_aportes_min_salud = aporte_porcentaje * consts::HEALTH_MINISTRY_RATE;

        let total_a_cancelar = total_a_cancelar_parcial + consts::FORM_FEE - total_aportes_asuss - total_aportes_min_salud;

        debug!(%fecha_limite, dias_retraso, ufv_dia_formal, ufv_dia_presentacion, "settlement computed");
        info!(total_a_cancelar, "payroll settled");

        Ok(Settlement {
            fecha_declarada: declared,
            fecha_pago: input.fecha_pago.with_timezone(&self.tz),
            fecha_limite,
            aporte_porcentaje,
            ufv_dia_formal,
            ufv_dia_presentacion,
            aporte_actualizado,
            monto_actualizado,
            multa_no_presentacion,
            dias_retraso,
            intereses,
            multa_sobre_intereses,
            total_a_cancelar_parcial,
            total_multas: multa_no_presentacion + multa_sobre_intereses,
            total_tasa_interes: intereses,
            total_aportes_asuss,
            total_aportes_min_salud,
            total_a_cancelar,
        })
    }
}

/// Whole days between the deadline and the payment, both at local midnight.
///
/// Committed and preliminary calculations share this formula.
fn days_late(payment: DateTime<FixedOffset>, deadline: DateTime<FixedOffset>) -> i64 {
    if payment <= deadline {
        return 0;
    }

    let seconds = (payment - deadline).num_seconds();

    (seconds + 86_399) / 86_400
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeZone as _;

    use crate::{entity::sea_orm_active_enums::PayrollStatus, ufv::tests::StaticUfv};

    use super::*;

    pub(crate) fn bolivia() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        bolivia().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    /// March 2024 payroll, AP, 10000 base; deadline is 2024-04-30
    pub(crate) fn payroll() -> planilla_aporte::Model {
        planilla_aporte::Model {
            id_planilla_aportes: 1,
            com_nro: None,
            cod_patronal: "01-730-00001".to_owned(),
            empresa: "Banco Union".to_owned(),
            tipo_empresa: "AP".to_owned(),
            fecha_planilla: date(2024, 3, 1),
            total_importe: 10_000.0,
            total_trabaj: 3,
            estado: PayrollStatus::Approved,
            observaciones: None,
            usuario_creacion: Some("employer".to_owned()),
            fecha_creacion: local(2024, 4, 1, 9),
            usuario_modificacion: None,
            fecha_modificacion: None,
            fecha_declarada: Some(local(2024, 4, 30, 10)),
            fecha_pago: None,
            aporte_porcentaje: None,
            ufv_dia_formal: None,
            ufv_dia_presentacion: None,
            aporte_actualizado: None,
            monto_actualizado: None,
            multa_no_presentacion: None,
            dias_retraso: None,
            intereses: None,
            multa_sobre_intereses: None,
            total_a_cancelar_parcial: None,
            total_multas: None,
            total_tasa_interes: None,
            total_aportes_asuss: None,
            total_aportes_min_salud: None,
            total_a_cancelar: None,
        }
    }

    fn calculator(ufv: StaticUfv) -> Calculator {
        Calculator::new(bolivia(), Arc::new(ufv))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[actix_web::test]
    async fn test_declared_on_deadline_has_no_penalty() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 4, 30, 16));

        let settlement = calculator(StaticUfv::flat(2.5))
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_close(settlement.aporte_porcentaje, 1000.0);
        assert_close(settlement.multa_no_presentacion, 0.0);
        assert_eq!(settlement.dias_retraso, 0);
        assert_close(settlement.intereses, 0.0);
        assert_eq!(settlement.fecha_limite, date(2024, 4, 30));
        // 1000 + 5 - 5 - 50
        assert_close(settlement.total_a_cancelar, 950.0);
    }

    #[actix_web::test]
    async fn test_interest_for_ten_days_late() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 5, 10, 11));

        let settlement = calculator(StaticUfv::flat(2.5))
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_eq!(settlement.dias_retraso, 10);
        assert_close(settlement.aporte_actualizado, 1000.0);
        assert_close(settlement.monto_actualizado, 0.0);
        assert_close(settlement.intereses, 2.775);
        assert_close(settlement.multa_sobre_intereses, 0.2775);
        assert_close(settlement.total_a_cancelar_parcial, 1003.0525);
        assert_close(settlement.total_aportes_asuss, 5.0);
        assert_close(settlement.total_aportes_min_salud, 50.0);
        assert_close(settlement.total_a_cancelar, 953.0525);
        assert_close(settlement.total_multas, 0.2775);
    }

    #[actix_web::test]
    async fn test_late_declaration_penalty() {
        let mut model = payroll();
        model.fecha_declarada = Some(local(2024, 5, 1, 8));
        model.fecha_pago = Some(local(2024, 5, 1, 9));

        let settlement = calculator(StaticUfv::flat(2.5))
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_close(settlement.multa_no_presentacion, 10.0);
        assert_eq!(settlement.dias_retraso, 1);
    }

    #[actix_web::test]
    async fn test_dates_are_compared_in_fund_time() {
        // 2024-05-01 02:00 UTC is still April 30th in La Paz
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut model = payroll();
        model.fecha_declarada = Some(utc.with_ymd_and_hms(2024, 5, 1, 2, 0, 0).unwrap());
        model.fecha_pago = Some(utc.with_ymd_and_hms(2024, 5, 1, 3, 59, 0).unwrap());

        let settlement = calculator(StaticUfv::flat(2.5))
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_close(settlement.multa_no_presentacion, 0.0);
        assert_eq!(settlement.dias_retraso, 0);
        assert_eq!(settlement.fecha_declarada, local(2024, 4, 30, 0));
    }

    #[actix_web::test]
    async fn test_indexation_uses_day_before_payment() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 4, 20, 9));

        // No fallback: any other lookup date fails
        let ufv = StaticUfv::default()
            .with(date(2024, 4, 30), 2.0)
            .with(date(2024, 4, 19), 2.2);

        let settlement = calculator(ufv)
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_close(settlement.ufv_dia_formal, 2.0);
        assert_close(settlement.ufv_dia_presentacion, 2.2);
        assert_close(settlement.aporte_actualizado, 1100.0);
        assert_close(settlement.monto_actualizado, 100.0);
    }

    #[actix_web::test]
    async fn test_adjusted_never_below_base() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 4, 20, 9));

        let ufv = StaticUfv::default()
            .with(date(2024, 4, 30), 2.5)
            .with(date(2024, 4, 19), 2.4);

        let settlement = calculator(ufv)
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert!(settlement.aporte_actualizado >= settlement.aporte_porcentaje);
        assert_close(settlement.monto_actualizado, 0.0);
    }

    #[actix_web::test]
    async fn test_av_rate() {
        let mut model = payroll();
        model.tipo_empresa = "AV".to_owned();
        model.fecha_pago = Some(local(2024, 4, 30, 9));

        let settlement = calculator(StaticUfv::flat(2.5))
            .settle(&SettlementInput::committed(&model).unwrap()).await.unwrap();

        assert_close(settlement.aporte_porcentaje, 300.0);
    }

    #[actix_web::test]
    async fn test_missing_dates_rejected() {
        let model = payroll();
        assert!(matches!(
            SettlementInput::committed(&model),
            Err(CalculationError::MissingDate("fecha_pago"))
        ));

        let mut model = payroll();
        model.fecha_declarada = None;
        assert!(matches!(
            SettlementInput::with_payment(&model, local(2024, 5, 2, 9)),
            Err(CalculationError::MissingDate("fecha_declarada"))
        ));
    }

    #[actix_web::test]
    async fn test_invalid_employer_type_rejected_before_lookup() {
        let mut model = payroll();
        model.tipo_empresa = "XX".to_owned();
        model.fecha_pago = Some(local(2024, 5, 2, 9));

        // Empty series: reaching the resolver would fail with `NotFound`
        let res = calculator(StaticUfv::default())
            .settle(&SettlementInput::committed(&model).unwrap()).await;

        assert!(matches!(res, Err(CalculationError::InvalidEmployerType(t)) if t == "XX"));
    }

    #[actix_web::test]
    async fn test_missing_ufv_fails() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 5, 2, 9));

        let ufv = StaticUfv::default().with(date(2024, 4, 30), 2.5);
        let res = calculator(ufv)
            .settle(&SettlementInput::committed(&model).unwrap()).await;

        assert!(matches!(res, Err(CalculationError::Ufv(UfvError::NotFound(d))) if d == date(2024, 5, 1)));
    }

    #[actix_web::test]
    async fn test_preliminary_matches_committed() {
        // Regression: both paths count late days with the same formula
        let payment = local(2024, 5, 10, 15);
        let mut committed = payroll();
        committed.fecha_pago = Some(payment);

        let calculator = calculator(StaticUfv::flat(2.5));
        let a = calculator.settle(&SettlementInput::committed(&committed).unwrap()).await.unwrap();
        let b = calculator.settle(&SettlementInput::with_payment(&payroll(), payment).unwrap()).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(b.dias_retraso, 10);
    }

    #[actix_web::test]
    async fn test_settle_is_idempotent() {
        let mut model = payroll();
        model.fecha_pago = Some(local(2024, 6, 3, 9));
        let input = SettlementInput::committed(&model).unwrap();

        let calculator = calculator(StaticUfv::flat(2.48));
        let first = calculator.settle(&input).await.unwrap();
        let second = calculator.settle(&input).await.unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_employer_type_parse() {
        assert_eq!("AP".parse::<EmployerType>().unwrap(), EmployerType::Ap);
        assert_eq!(" AV ".parse::<EmployerType>().unwrap(), EmployerType::Av);
        assert!("ap".parse::<EmployerType>().is_err());
    }

    #[test]
    fn test_apply_to_sets_every_result_column() {
        let settlement = Settlement {
            fecha_declarada: local(2024, 4, 30, 0),
            fecha_pago: local(2024, 5, 10, 9),
            fecha_limite: date(2024, 4, 30),
            aporte_porcentaje: 1.0,
            ufv_dia_formal: 2.0,
            ufv_dia_presentacion: 3.0,
            aporte_actualizado: 4.0,
            monto_actualizado: 5.0,
            multa_no_presentacion: 6.0,
            dias_retraso: 7,
            intereses: 8.0,
            multa_sobre_intereses: 9.0,
            total_a_cancelar_parcial: 10.0,
            total_multas: 11.0,
            total_tasa_interes: 12.0,
            total_aportes_asuss: 13.0,
            total_aportes_min_salud: 14.0,
            total_a_cancelar: 15.0,
        };

        let mut model = planilla_aporte::ActiveModel::default();
        settlement.apply_to(&mut model);

        assert_eq!(model.fecha_pago, Set(Some(local(2024, 5, 10, 9))));
        assert_eq!(model.dias_retraso, Set(Some(7)));
        assert_eq!(model.total_a_cancelar, Set(Some(15.0)));
        assert_eq!(model.ufv_dia_presentacion, Set(Some(3.0)));
    }
}
