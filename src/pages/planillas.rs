use actix_web::{dev, get, post, put, web, FromRequest, HttpRequest, HttpResponse, Responder};
use futures_util::future::LocalBoxFuture;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    auth::{Admin, Identity},
    calculation::{Calculator, SettlementInput},
    entity::{planilla_aporte, planilla_aporte_detalle, prelude::*, sea_orm_active_enums::PayrollStatus},
    error::ApiError,
    lifecycle::{self, Review},
    locks::PayrollLocks,
    report::{self, DisplayLocale},
    roster::{self, Period},
    store::{self, NewPayroll},
    utils,
};

use super::{fund_now, CorrectRequest, Page, Pagination, ReviewRequest, SubmitRequest};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_payroll)
        .service(payroll_history)
        .service(pending_payrolls)
        .service(observed_payrolls)
        .service(compare_rosters)
        .service(get_payroll)
        .service(get_details)
        .service(get_details_by_region)
        .service(submit_payroll)
        .service(review_payroll)
        .service(correct_payroll)
        .service(calculate_payroll)
        .service(preliminary_calculation)
        .service(payroll_report);
}

#[post("")]
async fn create_payroll(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    payload: web::Json<CreatePayroll>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();

    let new = NewPayroll {
        com_nro: payload.com_nro,
        cod_patronal: payload.cod_patronal,
        empresa: payload.empresa,
        tipo_empresa: payload.tipo_empresa,
        period: Period::new(payload.gestion, payload.mes)?,
    };

    let planilla = store::create_payroll(&db, new, payload.trabajadores, &identity.username, fund_now(&calculator)).await?;

    Ok(HttpResponse::Created().json(web::Json(planilla)))
}

#[get("/historial/{cod_patronal}")]
async fn payroll_history(
    db: web::Data<DatabaseConnection>,
    _identity: Identity,
    cod_patronal: web::Path<String>,
    pagination: web::Query<Pagination>,
) -> Result<impl Responder, ApiError> {
    let items = PlanillaAporte::find()
        .filter(planilla_aporte::Column::CodPatronal.eq(cod_patronal.as_str()))
        .order_by_desc(planilla_aporte::Column::FechaPlanilla)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(db.as_ref()).await?;

    Ok(web::Json(Page::new(&pagination, items)))
}

#[get("/pendientes")]
async fn pending_payrolls(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    pagination: web::Query<Pagination>,
) -> Result<impl Responder, ApiError> {
    let items = PlanillaAporte::find()
        .filter(planilla_aporte::Column::Estado.eq(PayrollStatus::Pending))
        .order_by_asc(planilla_aporte::Column::FechaDeclarada)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(db.as_ref()).await?;

    Ok(web::Json(Page::new(&pagination, items)))
}

#[get("/observadas/{cod_patronal}")]
async fn observed_payrolls(
    db: web::Data<DatabaseConnection>,
    _identity: Identity,
    cod_patronal: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let items = PlanillaAporte::find()
        .filter(planilla_aporte::Column::CodPatronal.eq(cod_patronal.as_str()))
        .filter(planilla_aporte::Column::Estado.eq(PayrollStatus::Observed))
        .order_by_desc(planilla_aporte::Column::FechaPlanilla)
        .all(db.as_ref()).await?;

    Ok(web::Json(items))
}

/// Hires and terminations between two monthly rosters of an employer
#[get("/comparar/{cod_patronal}/{gestion}/{mes_anterior}/{mes_actual}")]
async fn compare_rosters(
    db: web::Data<DatabaseConnection>,
    _identity: Identity,
    path: web::Path<(String, i32, u32, u32)>,
) -> Result<impl Responder, ApiError> {
    let (cod_patronal, gestion, mes_anterior, mes_actual) = path.into_inner();

    let current = Period::new(gestion, mes_actual)?;
    let previous = Period::previous_of(current, mes_anterior)?;

    let current_roster = store::roster_for(db.as_ref(), &cod_patronal, current).await?;
    let previous_roster = store::roster_for(db.as_ref(), &cod_patronal, previous).await?;

    let mut diff = roster::compare(&current_roster, &previous_roster, current.first_day());
    diff.periodo_anterior = Some(previous);
    diff.periodo_actual = Some(current);

    Ok(web::Json(diff))
}

#[get("/{id_planilla}")]
async fn get_payroll(planilla: planilla_aporte::Model, _identity: Identity) -> impl Responder {
    web::Json(planilla)
}

#[get("/{id_planilla}/detalles")]
async fn get_details(
    db: web::Data<DatabaseConnection>,
    planilla: planilla_aporte::Model,
    _identity: Identity,
) -> Result<impl Responder, ApiError> {
    let details = store::details_of(db.as_ref(), planilla.id_planilla_aportes).await?;

    Ok(web::Json(details))
}

#[get("/{id_planilla}/detalles/{regional}")]
async fn get_details_by_region(
    db: web::Data<DatabaseConnection>,
    planilla: planilla_aporte::Model,
    _identity: Identity,
    path: web::Path<(i32, String)>,
) -> Result<impl Responder, ApiError> {
    let (_, regional) = path.into_inner();

    let details = PlanillaAporteDetalle::find()
        .filter(planilla_aporte_detalle::Column::IdPlanillaAportes.eq(planilla.id_planilla_aportes))
        .filter(planilla_aporte_detalle::Column::Regional.eq(regional))
        .order_by_asc(planilla_aporte_detalle::Column::Nro)
        .all(db.as_ref()).await?;

    Ok(web::Json(details))
}

#[put("/{id_planilla}/presentar")]
async fn submit_payroll(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    id: web::Path<i32>,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    let now = fund_now(&calculator);
    let declared_at = SubmitRequest::from_body(&body)?.fecha_declarada.unwrap_or(now);

    let planilla = store::transition_payroll(&db, id.into_inner(), &identity.username, now, |from| {
        lifecycle::submit(from, declared_at, calculator.timezone())
    }).await?;

    Ok(web::Json(planilla))
}

#[put("/{id_planilla}/estado")]
async fn review_payroll(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    admin: Admin,
    id: web::Path<i32>,
    payload: web::Json<ReviewRequest>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();
    let decision = Review::from_request(payload.estado, payload.observaciones)?;

    let planilla = store::transition_payroll(&db, id.into_inner(), &admin.username, fund_now(&calculator), |from| {
        lifecycle::review(from, decision)
    }).await?;

    Ok(web::Json(planilla))
}

#[put("/{id_planilla}/corregir")]
async fn correct_payroll(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    id: web::Path<i32>,
    payload: web::Json<CorrectRequest>,
) -> Result<impl Responder, ApiError> {
    let planilla = store::correct_payroll(
        &db,
        id.into_inner(),
        payload.into_inner().trabajadores,
        &identity.username,
        fund_now(&calculator),
    ).await?;

    Ok(web::Json(planilla))
}

/// Committed recalculation with the dates stored on the payroll
#[post("/{id_planilla}/calcular")]
async fn calculate_payroll(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    locks: web::Data<PayrollLocks>,
    admin: Admin,
    id: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let settled = store::settle_payroll(&db, &locks, &calculator, id.into_inner(), &admin.username, None).await?;

    Ok(web::Json(settled))
}

/// What the payroll would owe if paid on `fecha_pago`; nothing is stored
#[get("/{id_planilla}/calcular-preliminar")]
async fn preliminary_calculation(
    calculator: web::Data<Calculator>,
    planilla: planilla_aporte::Model,
    _identity: Identity,
    query: web::Query<PreliminaryQuery>,
) -> Result<impl Responder, ApiError> {
    let fecha_pago = utils::start_of_day(query.fecha_pago, calculator.timezone());

    let input = SettlementInput::with_payment(&planilla, fecha_pago)?;
    let settlement = calculator.settle(&input).await?;

    Ok(web::Json(settlement))
}

#[get("/{id_planilla}/reporte")]
async fn payroll_report(
    calculator: web::Data<Calculator>,
    locale: web::Data<DisplayLocale>,
    planilla: planilla_aporte::Model,
    _identity: Identity,
) -> impl Responder {
    web::Json(report::flatten_payroll(&planilla, **locale, calculator.timezone()))
}
