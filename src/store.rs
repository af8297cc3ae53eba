//! Persistence of payrolls and their worker details.
//!
//! Everything that touches more than one row runs in a single transaction.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveValue::{self, NotSet, Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    calculation::{Calculator, EmployerType, Settlement, SettlementInput},
    entity::{
        pago_aporte, planilla_adicional, planilla_adicional_detalle, planilla_aporte, planilla_aporte_detalle,
        prelude::*, sea_orm_active_enums::PayrollStatus,
    },
    error::ApiError,
    lifecycle::{self, ObservationChange, Transition, TransitionError},
    locks::PayrollLocks,
    roster::{Period, RosterError},
    workers::{self, WorkerRow},
};

pub async fn find_payroll<C: ConnectionTrait>(conn: &C, id: i32) -> Result<planilla_aporte::Model, ApiError> {
    PlanillaAporte::find_by_id(id)
        .one(conn).await?
        .ok_or_else(|| ApiError::NotFound(format!("payroll {id} does not exist")))
}

/// Only one payroll may exist per employer and period.
pub async fn ensure_period_free<C: ConnectionTrait>(conn: &C, cod_patronal: &str, period: Period) -> Result<(), ApiError> {
    let existing = PlanillaAporte::find()
        .filter(planilla_aporte::Column::CodPatronal.eq(cod_patronal))
        .filter(planilla_aporte::Column::FechaPlanilla.eq(period.first_day()))
        .one(conn).await?;

    if existing.is_some() {
        return Err(ApiError::Validation(format!("a payroll already exists for employer `{cod_patronal}` in period {period}")));
    }

    Ok(())
}

async fn insert_aporte_details<C: ConnectionTrait>(conn: &C, id: i32, rows: Vec<WorkerRow>) -> Result<u64, ApiError> {
    Ok(
        PlanillaAporteDetalle::insert_many(rows.into_iter().map(|row| row.into_aporte_detalle(id)))
            .exec_without_returning(conn).await?
    )
}

async fn insert_adicional_details<C: ConnectionTrait>(conn: &C, id: i32, rows: Vec<WorkerRow>) -> Result<u64, ApiError> {
    Ok(
        PlanillaAdicionalDetalle::insert_many(rows.into_iter().map(|row| row.into_adicional_detalle(id)))
            .exec_without_returning(conn).await?
    )
}

/// Deletes the whole detail set of a payroll and inserts `rows` in its place.
///
/// Must run inside the caller's transaction.
pub async fn replace_aporte_details<C: ConnectionTrait>(conn: &C, id: i32, rows: Vec<WorkerRow>) -> Result<u64, ApiError> {
    PlanillaAporteDetalle::delete_many()
        .filter(planilla_aporte_detalle::Column::IdPlanillaAportes.eq(id))
        .exec(conn).await?;

    insert_aporte_details(conn, id, rows).await
}

/// Same as [`replace_aporte_details`] for an additional payroll.
pub async fn replace_adicional_details<C: ConnectionTrait>(conn: &C, id: i32, rows: Vec<WorkerRow>) -> Result<u64, ApiError> {
    PlanillaAdicionalDetalle::delete_many()
        .filter(planilla_adicional_detalle::Column::IdPlanillaAdicional.eq(id))
        .exec(conn).await?;

    insert_adicional_details(conn, id, rows).await
}

#[derive(Debug, Clone)]
pub struct NewPayroll {
    pub com_nro: Option<i32>,
    pub cod_patronal: String,
    pub empresa: String,
    pub tipo_empresa: String,
    pub period: Period,
}

/// Inserts a payroll in `Uninitiated` status together with its worker rows.
#[instrument(skip(db, new, rows), fields(cod_patronal = %new.cod_patronal, period = %new.period, rows = rows.len()))]
pub async fn create_payroll(
    db: &DatabaseConnection,
    new: NewPayroll,
    rows: Vec<WorkerRow>,
    usuario: &str,
    now: DateTime<FixedOffset>,
) -> Result<planilla_aporte::Model, ApiError> {
    let totals = workers::validate_rows(&rows).map_err(ApiError::Validation)?;
    new.tipo_empresa.parse::<EmployerType>()?;

    let txn = db.begin().await?;

    ensure_period_free(&txn, &new.cod_patronal, new.period).await?;

    let planilla = PlanillaAporte::insert(planilla_aporte::ActiveModel {
        com_nro: Set(new.com_nro),
        cod_patronal: Set(new.cod_patronal.trim().to_owned()),
        empresa: Set(new.empresa),
        tipo_empresa: Set(new.tipo_empresa.trim().to_owned()),
        fecha_planilla: Set(new.period.first_day()),
        total_importe: Set(totals.total_importe),
        total_trabaj: Set(totals.total_trabaj),
        estado: Set(PayrollStatus::Uninitiated),
        usuario_creacion: Set(Some(usuario.to_owned())),
        fecha_creacion: Set(now),
        ..Default::default()
    }).exec_with_returning(&txn).await?;

    insert_aporte_details(&txn, planilla.id_planilla_aportes, rows).await?;

    txn.commit().await?;

    info!(id = planilla.id_planilla_aportes, "payroll created");

    Ok(planilla)
}

/// Inserts an additional payroll attached to an existing one.
pub async fn create_adicional(
    db: &DatabaseConnection,
    id_planilla: i32,
    motivo: &str,
    rows: Vec<WorkerRow>,
    usuario: &str,
    now: DateTime<FixedOffset>,
) -> Result<planilla_adicional::Model, ApiError> {
    let motivo = motivo.trim();
    if motivo.is_empty() {
        return Err(ApiError::Validation("a reason is required for an additional payroll".to_owned()));
    }

    let totals = workers::validate_rows(&rows).map_err(ApiError::Validation)?;

    let txn = db.begin().await?;

    find_payroll(&txn, id_planilla).await?;

    let adicional = PlanillaAdicional::insert(planilla_adicional::ActiveModel {
        id_planilla_aportes: Set(id_planilla),
        total_importe: Set(totals.total_importe),
        total_trabaj: Set(totals.total_trabaj),
        estado: Set(PayrollStatus::Uninitiated),
        motivo_adicional: Set(motivo.to_owned()),
        usuario_creacion: Set(Some(usuario.to_owned())),
        fecha_creacion: Set(now),
        ..Default::default()
    }).exec_with_returning(&txn).await?;

    insert_adicional_details(&txn, adicional.id_planilla_adicional, rows).await?;

    txn.commit().await?;

    info!(id = adicional.id_planilla_adicional, id_planilla, "additional payroll created");

    Ok(adicional)
}

fn observation_value(change: ObservationChange) -> ActiveValue<Option<String>> {
    match change {
        ObservationChange::Keep => NotSet,
        ObservationChange::Set(note) => Set(Some(note)),
        ObservationChange::Clear => Set(None),
    }
}

fn declared_value(declared_at: Option<DateTime<FixedOffset>>) -> ActiveValue<Option<DateTime<FixedOffset>>> {
    match declared_at {
        Some(declared_at) => Set(Some(declared_at)),
        None => NotSet,
    }
}

async fn lock_payroll(txn: &DatabaseTransaction, id: i32) -> Result<planilla_aporte::Model, ApiError> {
    PlanillaAporte::find_by_id(id)
        .lock_exclusive()
        .one(txn).await?
        .ok_or_else(|| ApiError::NotFound(format!("payroll {id} does not exist")))
}

async fn lock_adicional(txn: &DatabaseTransaction, id: i32) -> Result<planilla_adicional::Model, ApiError> {
    PlanillaAdicional::find_by_id(id)
        .lock_exclusive()
        .one(txn).await?
        .ok_or_else(|| ApiError::NotFound(format!("additional payroll {id} does not exist")))
}

/// Applies a status change decided by `decide` on the locked current status.
#[instrument(skip(db, decide))]
pub async fn transition_payroll(
    db: &DatabaseConnection,
    id: i32,
    usuario: &str,
    now: DateTime<FixedOffset>,
    decide: impl FnOnce(PayrollStatus) -> Result<Transition, TransitionError>,
) -> Result<planilla_aporte::Model, ApiError> {
    let txn = db.begin().await?;

    let payroll = lock_payroll(&txn, id).await?;
    let transition = decide(payroll.estado)?;

    let updated = PlanillaAporte::update(planilla_aporte::ActiveModel {
        id_planilla_aportes: Unchanged(id),
        estado: Set(transition.to),
        fecha_declarada: declared_value(transition.declared_at),
        observaciones: observation_value(transition.observation),
        usuario_modificacion: Set(Some(usuario.to_owned())),
        fecha_modificacion: Set(Some(now)),
        ..Default::default()
    }).exec(&txn).await?;

    txn.commit().await?;

    info!(from = %payroll.estado, to = %updated.estado, "payroll status changed");

    Ok(updated)
}

#[instrument(skip(db, decide))]
pub async fn transition_adicional(
    db: &DatabaseConnection,
    id: i32,
    usuario: &str,
    now: DateTime<FixedOffset>,
    decide: impl FnOnce(PayrollStatus) -> Result<Transition, TransitionError>,
) -> Result<planilla_adicional::Model, ApiError> {
    let txn = db.begin().await?;

    let adicional = lock_adicional(&txn, id).await?;
    let transition = decide(adicional.estado)?;

    let updated = PlanillaAdicional::update(planilla_adicional::ActiveModel {
        id_planilla_adicional: Unchanged(id),
        estado: Set(transition.to),
        fecha_declarada: declared_value(transition.declared_at),
        observaciones: observation_value(transition.observation),
        usuario_modificacion: Set(Some(usuario.to_owned())),
        fecha_modificacion: Set(Some(now)),
        ..Default::default()
    }).exec(&txn).await?;

    txn.commit().await?;

    info!(from = %adicional.estado, to = %updated.estado, "additional payroll status changed");

    Ok(updated)
}

/// Correction of an observed payroll: the detail set is replaced wholesale,
/// aggregates recomputed and the payroll goes back to review.
#[instrument(skip(db, rows), fields(rows = rows.len()))]
pub async fn correct_payroll(
    db: &DatabaseConnection,
    id: i32,
    rows: Vec<WorkerRow>,
    usuario: &str,
    now: DateTime<FixedOffset>,
) -> Result<planilla_aporte::Model, ApiError> {
    let totals = workers::validate_rows(&rows).map_err(ApiError::Validation)?;

    let txn = db.begin().await?;

    let payroll = lock_payroll(&txn, id).await?;
    let transition = lifecycle::resubmit(payroll.estado)?;

    replace_aporte_details(&txn, id, rows).await?;

    let updated = PlanillaAporte::update(planilla_aporte::ActiveModel {
        id_planilla_aportes: Unchanged(id),
        estado: Set(transition.to),
        observaciones: observation_value(transition.observation),
        total_importe: Set(totals.total_importe),
        total_trabaj: Set(totals.total_trabaj),
        usuario_modificacion: Set(Some(usuario.to_owned())),
        fecha_modificacion: Set(Some(now)),
        ..Default::default()
    }).exec(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}

#[instrument(skip(db, rows), fields(rows = rows.len()))]
pub async fn correct_adicional(
    db: &DatabaseConnection,
    id: i32,
    rows: Vec<WorkerRow>,
    usuario: &str,
    now: DateTime<FixedOffset>,
) -> Result<planilla_adicional::Model, ApiError> {
    let totals = workers::validate_rows(&rows).map_err(ApiError::Validation)?;

    let txn = db.begin().await?;

    let adicional = lock_adicional(&txn, id).await?;
    let transition = lifecycle::resubmit(adicional.estado)?;

    replace_adicional_details(&txn, id, rows).await?;

    let updated = PlanillaAdicional::update(planilla_adicional::ActiveModel {
        id_planilla_adicional: Unchanged(id),
        estado: Set(transition.to),
        observaciones: observation_value(transition.observation),
        total_importe: Set(totals.total_importe),
        total_trabaj: Set(totals.total_trabaj),
        usuario_modificacion: Set(Some(usuario.to_owned())),
        fecha_modificacion: Set(Some(now)),
        ..Default::default()
    }).exec(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}

pub async fn details_of<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Vec<planilla_aporte_detalle::Model>, ApiError> {
    Ok(
        PlanillaAporteDetalle::find()
            .filter(planilla_aporte_detalle::Column::IdPlanillaAportes.eq(id))
            .order_by_asc(planilla_aporte_detalle::Column::Nro)
            .all(conn).await?
    )
}

/// Worker roster of an employer for one period, ordered by sequence number.
pub async fn roster_for<C: ConnectionTrait>(conn: &C, cod_patronal: &str, period: Period) -> Result<Vec<planilla_aporte_detalle::Model>, ApiError> {
    let no_data = || RosterError::NoData { cod_patronal: cod_patronal.to_owned(), period };

    let payroll = PlanillaAporte::find()
        .filter(planilla_aporte::Column::CodPatronal.eq(cod_patronal))
        .filter(planilla_aporte::Column::FechaPlanilla.eq(period.first_day()))
        .one(conn).await?
        .ok_or_else(no_data)?;

    let details = details_of(conn, payroll.id_planilla_aportes).await?;
    if details.is_empty() {
        return Err(no_data().into());
    }

    Ok(details)
}

/// Payment being recorded together with a settlement
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub fecha_pago: DateTime<FixedOffset>,
    pub monto_pagado: f64,
    pub observaciones: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Settled {
    pub planilla: planilla_aporte::Model,
    pub liquidacion: Settlement,
    pub pago: Option<pago_aporte::Model>,
}

/// Committed calculation: reads the payroll under a row lock, settles it and
/// writes every computed column in one UPDATE, all in one transaction.
///
/// With `payment` the payroll must be approved; the payment date is stamped and
/// the payment row is inserted in the same transaction. Any failure, including
/// the UFV lookup, leaves the payroll untouched.
#[instrument(skip(db, locks, calculator, payment), fields(with_payment = payment.is_some()))]
pub async fn settle_payroll(
    db: &DatabaseConnection,
    locks: &PayrollLocks,
    calculator: &Calculator,
    id: i32,
    usuario: &str,
    payment: Option<NewPayment>,
) -> Result<Settled, ApiError> {
    let _guard = locks.acquire(id).await;

    let txn = db.begin().await?;

    let payroll = lock_payroll(&txn, id).await?;

    let input = match &payment {
        Some(payment) => {
            if payroll.estado != PayrollStatus::Approved {
                return Err(ApiError::Conflict(format!("payroll {id} is {} and cannot be paid until approved", payroll.estado)));
            }

            SettlementInput::with_payment(&payroll, payment.fecha_pago)?
        },
        None => SettlementInput::committed(&payroll)?,
    };

    let settlement = match calculator.settle(&input).await {
        Ok(settlement) => settlement,
        Err(e) => {
            warn!(error = %e, "settlement aborted, nothing persisted");
            return Err(e.into());
        },
    };

    let now = Utc::now().with_timezone(calculator.timezone());

    let mut model = planilla_aporte::ActiveModel {
        id_planilla_aportes: Unchanged(id),
        usuario_modificacion: Set(Some(usuario.to_owned())),
        fecha_modificacion: Set(Some(now)),
        ..Default::default()
    };
    settlement.apply_to(&mut model);

    let planilla = PlanillaAporte::update(model).exec(&txn).await?;

    let pago = match payment {
        Some(payment) => {
            let pago = PagoAporte::insert(pago_aporte::ActiveModel {
                id_pago: NotSet,
                id_planilla_aportes: Set(id),
                fecha_pago: Set(settlement.fecha_pago),
                monto_pagado: Set(payment.monto_pagado),
                observaciones: Set(payment.observaciones),
                usuario_creacion: Set(Some(usuario.to_owned())),
                fecha_creacion: Set(now),
            }).exec_with_returning(&txn).await?;

            Some(pago)
        },
        None => None,
    };

    txn.commit().await?;

    info!(total_a_cancelar = settlement.total_a_cancelar, "payroll settlement persisted");

    Ok(Settled {
        planilla,
        liquidacion: settlement,
        pago,
    })
}
