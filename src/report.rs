use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

use crate::entity::planilla_aporte;

/// Number formatting used when rendering amounts for documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLocale {
    /// `1.234,56`
    EsBo,
    /// `1,234.56`
    EnUs,
}

impl DisplayLocale {
    fn separators(self) -> (char, char) {
        match self {
            DisplayLocale::EsBo => ('.', ','),
            DisplayLocale::EnUs => (',', '.'),
        }
    }

    /// Two decimals, thousands grouped
    pub fn format_amount(self, amount: f64) -> String {
        let (group_sep, decimal_sep) = self.separators();

        let fixed = format!("{:.2}", amount.abs());
        let (integer, decimals) = fixed.split_once('.').unwrap_or((&fixed, "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, digit) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(group_sep);
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };

        format!("{sign}{grouped}{decimal_sep}{decimals}")
    }

    /// Index values such as the UFV keep five decimals and no grouping
    pub fn format_index(self, value: f64) -> String {
        let (_, decimal_sep) = self.separators();

        format!("{value:.5}").replace('.', &decimal_sep.to_string())
    }
}

impl FromStr for DisplayLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es-bo" | "es_bo" | "es" => Ok(DisplayLocale::EsBo),
            "en-us" | "en_us" | "en" => Ok(DisplayLocale::EnUs),
            other => Err(format!("unsupported display locale `{other}`")),
        }
    }
}

/// Columns holding UFV index values rather than money
const INDEX_COLUMNS: &[&str] = &["ufv_dia_formal", "ufv_dia_presentacion"];

/// Columns rendered as `dd/mm/yyyy`
const DATE_COLUMNS: &[&str] = &[
    "fecha_planilla",
    "fecha_creacion",
    "fecha_modificacion",
    "fecha_declarada",
    "fecha_pago",
];

/// Flat key/value view of a payroll consumed by the document renderer.
///
/// Amounts are rounded to two decimals here and only here. UFV values keep
/// five decimals. Dates are shown in the fund's timezone.
pub fn flatten_payroll(
    payroll: &planilla_aporte::Model,
    locale: DisplayLocale,
    tz: &FixedOffset,
) -> BTreeMap<String, String> {
    let mut record = BTreeMap::new();

    let Ok(Value::Object(fields)) = serde_json::to_value(payroll) else {
        return record;
    };

    for (key, value) in fields {
        let rendered = match value {
            Value::Null => String::new(),
            Value::Number(n) if INDEX_COLUMNS.contains(&key.as_str()) => {
                locale.format_index(n.as_f64().unwrap_or_default())
            }
            Value::Number(n) if n.is_f64() => locale.format_amount(n.as_f64().unwrap_or_default()),
            Value::Number(n) => n.to_string(),
            Value::String(s) if DATE_COLUMNS.contains(&key.as_str()) => render_date(&s, tz),
            Value::String(s) => s,
            other => other.to_string(),
        };

        record.insert(key, rendered);
    }

    record.insert("estado_nombre".to_owned(), payroll.estado.to_string());

    record
}

fn render_date(s: &str, tz: &FixedOffset) -> String {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return time.with_timezone(tz).format("%d/%m/%Y").to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }

    s.to_owned()
}
