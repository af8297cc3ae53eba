use actix_web::{dev, get, post, put, web, FromRequest, HttpRequest, HttpResponse, Responder};
use futures_util::future::LocalBoxFuture;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use crate::{
    auth::{Admin, Identity},
    calculation::Calculator,
    entity::{planilla_adicional, planilla_adicional_detalle, prelude::*},
    error::ApiError,
    lifecycle::{self, Review},
    store,
    workers::WorkerRow,
};

use super::{fund_now, CorrectRequest, ReviewRequest, SubmitRequest};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(additionals_of_payroll)
        .service(create_additional)
        .service(get_additional)
        .service(get_additional_details)
        .service(submit_additional)
        .service(review_additional)
        .service(correct_additional);
}

#[derive(Debug, Deserialize)]
struct CreateAdditional {
    motivo_adicional: String,
    trabajadores: Vec<WorkerRow>,
}

impl FromRequest for planilla_adicional::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let id = req.match_info().get("id_adicional").expect("This extractor must be used under `id_adicional` path");
            let Ok(id) = id.parse::<i32>() else {
                return Err(actix_web::error::ErrorBadRequest("invalid `id_adicional`"))
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let Some(adicional) = PlanillaAdicional::find_by_id(id)
                .one(db.as_ref()).await.map_err(ApiError::from)?
            else {
                return Err(ApiError::NotFound(format!("additional payroll {id} does not exist")).into())
            };

            Ok(adicional)
        })
    }
}

#[get("/por-planilla/{id_planilla}")]
async fn additionals_of_payroll(
    db: web::Data<DatabaseConnection>,
    _identity: Identity,
    id_planilla: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let items = PlanillaAdicional::find()
        .filter(planilla_adicional::Column::IdPlanillaAportes.eq(id_planilla.into_inner()))
        .order_by_asc(planilla_adicional::Column::FechaCreacion)
        .all(db.as_ref()).await?;

    Ok(web::Json(items))
}

#[post("/{id_planilla}")]
async fn create_additional(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    id_planilla: web::Path<i32>,
    payload: web::Json<CreateAdditional>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();

    let adicional = store::create_adicional(
        &db,
        id_planilla.into_inner(),
        &payload.motivo_adicional,
        payload.trabajadores,
        &identity.username,
        fund_now(&calculator),
    ).await?;

    Ok(HttpResponse::Created().json(web::Json(adicional)))
}

#[get("/{id_adicional}")]
async fn get_additional(adicional: planilla_adicional::Model, _identity: Identity) -> impl Responder {
    web::Json(adicional)
}

#[get("/{id_adicional}/detalles")]
async fn get_additional_details(
    db: web::Data<DatabaseConnection>,
    adicional: planilla_adicional::Model,
    _identity: Identity,
) -> Result<impl Responder, ApiError> {
    let details = PlanillaAdicionalDetalle::find()
        .filter(planilla_adicional_detalle::Column::IdPlanillaAdicional.eq(adicional.id_planilla_adicional))
        .order_by_asc(planilla_adicional_detalle::Column::Nro)
        .all(db.as_ref()).await?;

    Ok(web::Json(details))
}

#[put("/{id_adicional}/presentar")]
async fn submit_additional(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    id: web::Path<i32>,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    let now = fund_now(&calculator);
    let declared_at = SubmitRequest::from_body(&body)?.fecha_declarada.unwrap_or(now);

    let adicional = store::transition_adicional(&db, id.into_inner(), &identity.username, now, |from| {
        lifecycle::submit(from, declared_at, calculator.timezone())
    }).await?;

    Ok(web::Json(adicional))
}

#[put("/{id_adicional}/estado")]
async fn review_additional(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    admin: Admin,
    id: web::Path<i32>,
    payload: web::Json<ReviewRequest>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();
    let decision = Review::from_request(payload.estado, payload.observaciones)?;

    let adicional = store::transition_adicional(&db, id.into_inner(), &admin.username, fund_now(&calculator), |from| {
        lifecycle::review(from, decision)
    }).await?;

    Ok(web::Json(adicional))
}

#[put("/{id_adicional}/corregir")]
async fn correct_additional(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    identity: Identity,
    id: web::Path<i32>,
    payload: web::Json<CorrectRequest>,
) -> Result<impl Responder, ApiError> {
    let adicional = store::correct_adicional(
        &db,
        id.into_inner(),
        payload.into_inner().trabajadores,
        &identity.username,
        fund_now(&calculator),
    ).await?;

    Ok(web::Json(adicional))
}
