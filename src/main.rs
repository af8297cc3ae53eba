use std::{fs::OpenOptions, sync::Arc};

use actix_web::{web, App, HttpServer};
use sea_orm::Database;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::{auth::Authority, calculation::Calculator, locks::PayrollLocks, ufv::HttpUfvResolver};

mod config;
mod consts;
mod utils;

mod entity;
mod auth;
mod error;

mod ufv;
mod lifecycle;
mod roster;
mod calculation;
mod locks;
mod report;
mod workers;
mod store;

mod pages;

#[actix_web::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open("trace.log")
        .unwrap();

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config::Config {
        host_address,
        database_opt,
        jwt_key,
        ufv_source_url,
        ufv_timeout,
        fund_timezone,
        display_locale,
    } = config::load();

    let ufv = HttpUfvResolver::new(ufv_source_url, ufv_timeout).expect("Unable to build UFV client");

    let database = web::Data::new(Database::connect(database_opt).await.expect("Unable to connect to database"));
    let authority = web::Data::new(Authority::new(jwt_key.as_bytes()));
    let calculator = web::Data::new(Calculator::new(fund_timezone, Arc::new(ufv)));
    let locks = web::Data::new(PayrollLocks::new());
    let locale = web::Data::new(display_locale);

    info!(%fund_timezone, ?display_locale, "Starting contributions service");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .app_data(authority.clone())
            .app_data(calculator.clone())
            .app_data(locks.clone())
            .app_data(locale.clone())
            .wrap(TracingLogger::default())
            .configure(pages::config)
    });

    server
        .bind(host_address).unwrap()
        .run().await.unwrap();
}
