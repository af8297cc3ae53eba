use super::*;

impl FromRequest for planilla_aporte::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let id_planilla = req.match_info().get("id_planilla").expect("This extractor must be used under `id_planilla` path");
            let Ok(id_planilla) = id_planilla.parse::<i32>() else {
                return Err(actix_web::error::ErrorBadRequest("invalid `id_planilla`"))
            };

            let db = req.app_data::<web::Data<DatabaseConnection>>().expect("DatabaseConnection must be attached");

            let planilla = store::find_payroll(db.as_ref(), id_planilla).await?;

            Ok(planilla)
        })
    }
}
