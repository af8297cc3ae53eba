/// Contribution rate for employers registered as "AP"
pub const RATE_AP: f64 = 0.10;
/// Contribution rate for employers registered as "AV"
pub const RATE_AV: f64 = 0.03;

/// Applied on the base contribution when the payroll is declared after the deadline
pub const LATE_FILING_RATE: f64 = 0.01;

pub const ANNUAL_INTEREST_RATE: f64 = 0.0999;
/// Commercial year convention used for daily interest
pub const INTEREST_DAY_COUNT: f64 = 360.0;
pub const INTEREST_PENALTY_RATE: f64 = 0.10;

pub const ASUSS_RATE: f64 = 0.005;
pub const HEALTH_MINISTRY_RATE: f64 = 0.05;

/// Fixed administrative charge for the contribution form
pub const FORM_FEE: f64 = 5.0;

/// UTC-4
pub const DEFAULT_FUND_UTC_OFFSET_HOURS: i32 = -4;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 200;
