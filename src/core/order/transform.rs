use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::schema::{column_kind, column_names, ColumnKind};
use crate::core::fields::number_or_null;
use crate::domain::model::{cell_text, Record, Table};

/// Alternate payment-provider emails, in order of preference.
pub const EMAIL_FALLBACK_COLUMNS: [&str; 3] = [
    "Metafield: woo._ppcp_paypal_payer_email",
    "Metafield: woo._ppcp_paypal_billing_email",
    "Metafield: woo.Payer PayPal address",
];

pub const PHONE_COLUMNS: [&str; 3] = ["Customer: Phone", "Billing: Phone", "Shipping: Phone"];

pub const NOTE_SEPARATOR: &str = "\n================\n";

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("non digit regex"));

/// Advisory messages collected while transforming one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisories {
    pub email_fallbacks: Vec<String>,
    pub phone_cleanups: Vec<String>,
}

impl Advisories {
    pub fn is_empty(&self) -> bool {
        self.email_fallbacks.is_empty() && self.phone_cleanups.is_empty()
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.email_fallbacks
            .into_iter()
            .chain(self.phone_cleanups)
            .collect()
    }
}

pub fn transform(orders: Table) -> Table {
    transform_with_advisories(orders).0
}

pub fn transform_with_advisories(orders: Table) -> (Table, Advisories) {
    let source_columns: HashSet<String> = orders.columns.iter().cloned().collect();
    let mut advisories = Advisories::default();

    let mut table = conform_to_schema(orders);
    coerce_types(&mut table);
    apply_email_fallbacks(&mut table, &mut advisories.email_fallbacks);
    clean_phone_numbers(&mut table, &mut advisories.phone_cleanups);
    clean_blank_text(&mut table, &source_columns);

    tracing::debug!(
        "Order transform: {} row(s), {} email fallback(s), {} phone clean-up(s)",
        table.len(),
        advisories.email_fallbacks.len(),
        advisories.phone_cleanups.len()
    );
    (table, advisories)
}

/// Schema column order, with every unrecognised column removed.
fn conform_to_schema(orders: Table) -> Table {
    let rows = orders
        .rows
        .into_iter()
        .map(|mut row| {
            column_names()
                .map(|column| {
                    let value = row.remove(column).unwrap_or(Value::Null);
                    (column, value)
                })
                .collect::<Record>()
        })
        .collect();
    Table::new(column_names()).with_rows(rows)
}

fn coerce_types(table: &mut Table) {
    for row in &mut table.rows {
        for (column, value) in row.data.iter_mut() {
            let coerced = match column_kind(column) {
                Some(ColumnKind::Numeric) => number_or_null(Some(&*value)),
                Some(ColumnKind::Flag) => parse_flag(value),
                Some(ColumnKind::Identifier) => match cell_text(value) {
                    Some(text) => Value::String(text),
                    None => Value::Null,
                },
                _ => continue,
            };
            *value = coerced;
        }
    }
}

/// Explicit literal map, matched exactly; anything unlisted (`TRUE`, `Yes`, ` no `) is absent.
pub fn parse_flag(value: &Value) -> Value {
    if let Value::Bool(b) = value {
        return Value::Bool(*b);
    }
    match cell_text(value).as_deref() {
        Some("true" | "True" | "1" | "yes") => Value::Bool(true),
        Some("false" | "False" | "0" | "no") => Value::Bool(false),
        _ => Value::Null,
    }
}

/// First usable alternate email for a row whose customer email is blank, with its source column.
pub fn fallback_email(row: &Record) -> Option<(&'static str, String)> {
    EMAIL_FALLBACK_COLUMNS.iter().find_map(|column| {
        row.non_blank(column)
            .filter(|email| email.contains('@') && email.contains('.'))
            .map(|email| (*column, email))
    })
}

pub fn apply_email_fallbacks(table: &mut Table, notes: &mut Vec<String>) {
    for (index, row) in table.rows.iter_mut().enumerate() {
        if row.non_blank("Customer: Email").is_some() {
            continue;
        }
        let Some((source, email)) = fallback_email(row) else {
            continue;
        };
        let order = row
            .text("Name")
            .unwrap_or_else(|| format!("Row {}", index + 1));
        notes.push(format!(
            "Row {} Order {order}: Used email from '{source}' → '{email}'",
            index + 1
        ));
        row.set("Customer: Email", email);
    }
}

/// `+` followed by the digits of `phone`.
pub fn normalize_us_phone(phone: &str) -> String {
    format!("+{}", NON_DIGITS.replace_all(phone, ""))
}

/// Rewrites valid `+1` numbers to `+1XXXXXXXXXX`. Invalid ones are cleared and explained in the
/// first row's `Note` of each order.
pub fn clean_phone_numbers(table: &mut Table, notes: &mut Vec<String>) {
    table.ensure_column("Note");
    let mut annotated: HashSet<String> = HashSet::new();

    for (index, row) in table.rows.iter_mut().enumerate() {
        let mut rejected = Vec::new();

        for column in PHONE_COLUMNS {
            let Some(phone) = row.text(column).map(|p| p.trim().to_string()) else {
                continue;
            };
            if !phone.starts_with("+1") {
                continue;
            }
            let cleaned = normalize_us_phone(&phone);
            if cleaned.len() == 12 {
                if phone != cleaned {
                    notes.push(format!("Row {} {column}: '{phone}' → '{cleaned}'", index + 1));
                }
                row.set(column, cleaned);
            } else {
                rejected.push(format!(
                    "Customer phone {phone} was removed from phone fields because it is invalid"
                ));
                row.set(column, "");
            }
        }

        let Some(order) = row.non_blank("Name") else {
            continue;
        };
        if rejected.is_empty() || annotated.contains(&order) {
            continue;
        }
        let mut note = row.text("Note").unwrap_or_default();
        if !note.is_empty() {
            note.push_str(NOTE_SEPARATOR);
        }
        note.push_str(&rejected.join(NOTE_SEPARATOR));
        row.set("Note", note);
        annotated.insert(order);
    }
}

/// Text columns the source supplied get `""` for blanks and literal `nan`. Numeric, flag and raw
/// columns keep their absent values.
fn clean_blank_text(table: &mut Table, source_columns: &HashSet<String>) {
    for row in &mut table.rows {
        for (column, value) in row.data.iter_mut() {
            if !matches!(
                column_kind(column),
                Some(ColumnKind::Text | ColumnKind::Identifier)
            ) {
                continue;
            }
            let is_nan = matches!(value, Value::String(s) if s == "nan");
            if is_nan || (value.is_null() && source_columns.contains(column)) {
                *value = Value::String(String::new());
            }
        }
    }
}
