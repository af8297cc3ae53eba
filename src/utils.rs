use chrono::{DateTime, Datelike as _, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta};

/// Moves `time` into the fund's timezone and truncates it to local midnight.
pub fn local_midnight(time: &DateTime<FixedOffset>, tz: &FixedOffset) -> DateTime<FixedOffset> {
    let local_date = time.with_timezone(tz).date_naive();

    start_of_day(local_date, tz)
}

pub fn start_of_day(date: NaiveDate, tz: &FixedOffset) -> DateTime<FixedOffset> {
    let utc = date.and_time(NaiveTime::MIN) - TimeDelta::seconds(tz.local_minus_utc() as i64);

    DateTime::from_naive_utc_and_offset(utc, *tz)
}

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Returns the `[start, end)` window of the calendar month containing `date`.
pub fn month_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);

    (start, end)
}

/// Last calendar day of the month following the period month.
///
/// A March payroll must be paid by the last day of April.
pub fn payment_deadline(period: NaiveDate) -> NaiveDate {
    let (start, _) = month_window(period);

    start
        .checked_add_months(Months::new(2))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(NaiveDate::MAX)
}
