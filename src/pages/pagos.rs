use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Deserialize;

use crate::{
    auth::{Admin, Identity},
    calculation::Calculator,
    entity::{pago_aporte, prelude::*},
    error::ApiError,
    locks::PayrollLocks,
    store::{self, NewPayment},
};

use super::{Page, Pagination};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(record_payment)
        .service(list_payments)
        .service(payments_of_payroll);
}

#[derive(Debug, Deserialize)]
struct RecordPayment {
    id_planilla_aportes: i32,
    fecha_pago: DateTime<FixedOffset>,
    monto_pagado: f64,
    observaciones: Option<String>,
}

/// Records a payment of an approved payroll and settles it with that payment date.
#[post("")]
async fn record_payment(
    db: web::Data<DatabaseConnection>,
    calculator: web::Data<Calculator>,
    locks: web::Data<PayrollLocks>,
    identity: Identity,
    payload: web::Json<RecordPayment>,
) -> Result<impl Responder, ApiError> {
    let payload = payload.into_inner();

    if !payload.monto_pagado.is_finite() || payload.monto_pagado <= 0.0 {
        return Err(ApiError::Validation("`monto_pagado` must be a positive amount".to_owned()));
    }

    let payment = NewPayment {
        fecha_pago: payload.fecha_pago,
        monto_pagado: payload.monto_pagado,
        observaciones: payload.observaciones,
    };

    let settled = store::settle_payroll(
        &db,
        &locks,
        &calculator,
        payload.id_planilla_aportes,
        &identity.username,
        Some(payment),
    ).await?;

    Ok(HttpResponse::Created().json(web::Json(settled)))
}

#[get("")]
async fn list_payments(
    db: web::Data<DatabaseConnection>,
    _admin: Admin,
    pagination: web::Query<Pagination>,
) -> Result<impl Responder, ApiError> {
    let items = PagoAporte::find()
        .order_by_desc(pago_aporte::Column::FechaPago)
        .offset(pagination.offset())
        .limit(pagination.limit())
        .all(db.as_ref()).await?;

    Ok(web::Json(Page::new(&pagination, items)))
}

#[get("/por-planilla/{id_planilla}")]
async fn payments_of_payroll(
    db: web::Data<DatabaseConnection>,
    _identity: Identity,
    id_planilla: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let items = PagoAporte::find()
        .filter(pago_aporte::Column::IdPlanillaAportes.eq(id_planilla.into_inner()))
        .order_by_asc(pago_aporte::Column::FechaPago)
        .all(db.as_ref()).await?;

    Ok(web::Json(items))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::TimeZone as _;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::{json, Value};

    use crate::{
        auth::{tests::{admin, bearer, employer, SECRET}, Authority},
        calculation::tests::{bolivia, payroll},
        entity::sea_orm_active_enums::PayrollStatus,
        pages::tests::{calculator, locks},
    };

    use super::*;

    macro_rules! app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Authority::new(SECRET)))
                    .app_data(web::Data::new($db.into_connection()))
                    .app_data(calculator())
                    .app_data(locks())
                    .service(web::scope("/pagos-aportes").configure(config))
            ).await
        };
    }

    fn pago() -> pago_aporte::Model {
        let paid_at = bolivia().with_ymd_and_hms(2024, 5, 10, 11, 0, 0).unwrap();

        pago_aporte::Model {
            id_pago: 3,
            id_planilla_aportes: 1,
            fecha_pago: paid_at,
            monto_pagado: 953.05,
            observaciones: None,
            usuario_creacion: Some("empresa01".to_owned()),
            fecha_creacion: paid_at,
        }
    }

    #[actix_web::test]
    async fn test_record_payment_settles_payroll() {
        let mut settled = payroll();
        settled.fecha_pago = Some(pago().fecha_pago);
        settled.dias_retraso = Some(10);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ payroll() ] ])
            .append_query_results([ vec![ settled.clone() ] ])
            .append_query_results([ vec![ pago() ] ]);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/pagos-aportes")
            .insert_header(bearer(&employer()))
            .set_json(json!({
                "id_planilla_aportes": 1,
                "fecha_pago": "2024-05-10T11:00:00-04:00",
                "monto_pagado": 953.05
            }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["pago"]["id_pago"], 3);
        assert_eq!(body["liquidacion"]["dias_retraso"], 10);
        assert_eq!(body["planilla"]["dias_retraso"], 10);
    }

    #[actix_web::test]
    async fn test_record_payment_requires_approval() {
        let mut pending = payroll();
        pending.estado = PayrollStatus::Pending;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ pending ] ]);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/pagos-aportes")
            .insert_header(bearer(&employer()))
            .set_json(json!({
                "id_planilla_aportes": 1,
                "fecha_pago": "2024-05-10T11:00:00-04:00",
                "monto_pagado": 953.05
            }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_record_payment_rejects_non_positive_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let app = app!(db);

        let req = test::TestRequest::post()
            .uri("/pagos-aportes")
            .insert_header(bearer(&employer()))
            .set_json(json!({
                "id_planilla_aportes": 1,
                "fecha_pago": "2024-05-10T11:00:00-04:00",
                "monto_pagado": 0.0
            }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_payments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ pago() ],
                vec![ pago() ],
            ]);
        let app = app!(db);

        let req = test::TestRequest::get()
            .uri("/pagos-aportes?page=1&limit=5")
            .insert_header(bearer(&admin()))
            .to_request();

        let page: Page<pago_aporte::Model> = test::call_and_read_body_json(&app, req).await;
        assert_eq!((page.page, page.limit), (1, 5));
        assert_eq!(page.items, vec![ pago() ]);

        let req = test::TestRequest::get()
            .uri("/pagos-aportes/por-planilla/1")
            .insert_header(bearer(&employer()))
            .to_request();

        let items: Vec<pago_aporte::Model> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(items, vec![ pago() ]);
    }
}
