use std::{env, net::{SocketAddr, ToSocketAddrs as _}, time::Duration};

use chrono::FixedOffset;
use sea_orm::ConnectOptions;
use tracing::info;

use crate::{consts, report::DisplayLocale};

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,

    pub ufv_source_url: String,
    pub ufv_timeout: Duration,

    /// Every date rule of the fund is evaluated in this offset
    pub fund_timezone: FixedOffset,
    pub display_locale: DisplayLocale,
}

pub fn load() -> Config {
    Config {
        host_address: load_host_address(),
        database_opt: load_database_opt().into(),
        jwt_key: load_jwt_key(),
        ufv_source_url: load_ufv_source_url(),
        ufv_timeout: load_ufv_timeout(),
        fund_timezone: load_fund_timezone(),
        display_locale: load_display_locale(),
    }
}

fn load_host_address() -> SocketAddr {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    var.to_socket_addrs()
        .expect("`HOST_ADDRESS` is not in a valid format").nth(0)
        .expect("unable to resolve host from `HOST_ADDRESS`")
}

fn load_database_opt() -> impl Into<ConnectOptions> {
    info!("Loading environment `DATABASE_URL`");

    let var = env::var("DATABASE_URL").expect("Environment `DATABASE_URL` is required to be set");

    var
}

fn load_jwt_key() -> String {
    info!("Loading environment `JWT_SECRET`");

    let var = env::var("JWT_SECRET").expect("Environment `JWT_SECRET` is required to be set");

    var
}

fn load_ufv_source_url() -> String {
    info!("Loading environment `UFV_SOURCE_URL`");

    let var = env::var("UFV_SOURCE_URL").expect("Environment `UFV_SOURCE_URL` is required to be set");

    var
}

fn load_ufv_timeout() -> Duration {
    info!("Loading environment `UFV_TIMEOUT_SECS`");

    let secs = env::var("UFV_TIMEOUT_SECS")
        .map(|v| v.parse::<u64>().expect("`UFV_TIMEOUT_SECS` must be a whole number of seconds"))
        .unwrap_or(10);

    Duration::from_secs(secs)
}

fn load_fund_timezone() -> FixedOffset {
    info!("Loading environment `FUND_UTC_OFFSET_HOURS`");

    let hours = env::var("FUND_UTC_OFFSET_HOURS")
        .map(|v| v.parse::<i32>().expect("`FUND_UTC_OFFSET_HOURS` must be an integer"))
        .unwrap_or(consts::DEFAULT_FUND_UTC_OFFSET_HOURS);

    FixedOffset::east_opt(hours * 3600).expect("`FUND_UTC_OFFSET_HOURS` is out of range")
}

fn load_display_locale() -> DisplayLocale {
    info!("Loading environment `DISPLAY_LOCALE`");

    env::var("DISPLAY_LOCALE")
        .map(|v| v.parse().expect("`DISPLAY_LOCALE` must be `es-BO` or `en-US`"))
        .unwrap_or(DisplayLocale::EsBo)
}
