//! Rebuilds order rows as Shopify line items.
//!
//! Every input row carrying line-level data becomes one line item. An order without any
//! line-level data gets a single synthetic item whose title is recovered from the order note.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::schema::column_names;
use super::transform::fallback_email;
use crate::core::fields::{create_handle, is_truthy, number_value, parse_number};
use crate::domain::model::{cell_text, Record, Table};

pub const FALLBACK_HANDLE: &str = "unknown-product";
pub const FALLBACK_TITLE: &str = "Unknown Product";
const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ZONED_DATE_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S %z"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Header fields carried over verbatim when the source has them.
const COPIED_COLUMNS: [&str; 36] = [
    "Send Receipt",
    "Inventory Behaviour",
    "Note",
    "Tags",
    "Tags Command",
    "Closed At",
    "Currency",
    "Payment: Status",
    "Additional Details",
    "Customer: Phone",
    "Billing: First Name",
    "Billing: Last Name",
    "Billing: Company",
    "Billing: Phone",
    "Billing: Address 1",
    "Billing: Address 2",
    "Billing: Zip",
    "Billing: City",
    "Billing: Province",
    "Billing: Province Code",
    "Billing: Country",
    "Billing: Country Code",
    "Shipping: First Name",
    "Shipping: Last Name",
    "Shipping: Company",
    "Shipping: Phone",
    "Shipping: Address 1",
    "Shipping: Address 2",
    "Shipping: Zip",
    "Shipping: City",
    "Shipping: Province",
    "Shipping: Province Code",
    "Shipping: Country",
    "Shipping: Country Code",
    "Line: Vendor",
    "Line: Fulfillment Service",
];

const COPIED_TRANSACTION_COLUMNS: [&str; 2] = ["Transaction: Currency", "Transaction: Gateway"];

static NOTE_PRODUCT_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?i)Stock levels reduced:\s*([^,\n]+)",
        r"(?i)Product:\s*([^,\n]+)",
        r"(?i)Item:\s*([^,\n]+)",
    ]
    .map(|pattern| Regex::new(pattern).expect("note product regex"))
});
static STOCK_CHANGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d+→\d+\s*$").expect("stock change regex"));

/// Normalises a timestamp to `YYYY-MM-DD HH:MM:SS`. Unrecognised input comes back trimmed but
/// otherwise unchanged; blank input gives an empty string.
pub fn format_date(value: Option<&Value>) -> String {
    let Some(text) = value.and_then(cell_text) else {
        return String::new();
    };
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    for format in ZONED_DATE_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return parsed.format(OUTPUT_DATE_FORMAT).to_string();
        }
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return parsed.format(OUTPUT_DATE_FORMAT).to_string();
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return parsed.format("%Y-%m-%d 00:00:00").to_string();
        }
    }
    text.to_string()
}

/// Line-item handle; never empty.
pub fn line_handle(title: &str) -> String {
    let handle = create_handle(title);
    if handle.is_empty() {
        FALLBACK_HANDLE.to_string()
    } else {
        handle
    }
}

pub fn extract_product_from_note(note: &str) -> Option<String> {
    NOTE_PRODUCT_PATTERNS.iter().find_map(|pattern| {
        pattern.captures(note).and_then(|captures| captures.get(1)).map(|found| {
            STOCK_CHANGE_SUFFIX
                .replace(found.as_str().trim(), "")
                .into_owned()
        })
    })
}

/// Explicit status, then tracking number, then closed-at, then note keywords.
pub fn fulfillment_status(row: &Record) -> String {
    if let Some(status) = row.text("Fulfillment: Status") {
        return status.to_lowercase();
    }
    if row.non_blank("Fulfillment: Tracking Number").is_some()
        || row.non_blank("Closed At").is_some()
    {
        return "success".to_string();
    }
    let note = row.text("Note").unwrap_or_default().to_lowercase();
    if note.contains("completed") || note.contains("shipped") {
        return "success".to_string();
    }
    "unfulfilled".to_string()
}

fn safe_float(value: Option<&Value>) -> f64 {
    value.and_then(parse_number).unwrap_or(0.0)
}

fn customer_email(row: &Record) -> String {
    row.non_blank("Customer: Email")
        .or_else(|| fallback_email(row).map(|(_, email)| email))
        .unwrap_or_default()
}

/// Order-level fields every derived line item carries.
fn header(row: &Record, order_name: &str) -> Record {
    let mut item = Record::new();
    item.set("Name", order_name);
    item.set("Command", "NEW");
    item.set("Line: Type", "Line Item");
    item.set("Line: Command", "DEFAULT");
    item.set("Customer: Email", customer_email(row));
    item.set("Transaction: Kind", "sale");
    item.set("Transaction: Status", "success");

    let processed_at = format_date(row.get("Processed At"));
    if !processed_at.is_empty() {
        item.set("Processed At", processed_at.clone());
        item.set("Transaction: Processed At", processed_at);
    }

    let status = fulfillment_status(row);
    if status != "unfulfilled" {
        item.set("Fulfillment: Status", status);
    }
    item
}

pub fn line_item_row(row: &Record, order_name: &str) -> Record {
    let mut item = header(row, order_name);

    for column in COPIED_COLUMNS.iter().chain(&COPIED_TRANSACTION_COLUMNS) {
        if let Some(value) = row.get(column) {
            item.set(*column, value.clone());
        }
    }
    if row.get("Tax: Total").is_some() {
        item.set("Tax: Total", safe_float(row.get("Tax: Total")));
    }
    if row.get("Line: Discount").is_some() {
        item.set("Line: Discount", safe_float(row.get("Line: Discount")));
    }
    if row.get("Line: Grams").is_some() {
        item.set("Line: Grams", safe_float(row.get("Line: Grams")) as i64);
    }
    for flag in ["Line: Requires Shipping", "Line: Taxable"] {
        if let Some(value) = row.get(flag) {
            item.set(flag, is_truthy(Some(value)));
        }
    }

    let title = row.non_blank("Line: Title").unwrap_or_else(|| "Product".to_string());
    let quantity = row
        .get("Line: Quantity")
        .and_then(parse_number)
        .map(|q| q as i64)
        .unwrap_or(1);
    let price = safe_float(row.get("Line: Price"));
    let line_total = row
        .get("Line: Total")
        .and_then(parse_number)
        .unwrap_or(price * quantity as f64);
    let amount = row
        .get("Transaction: Amount")
        .and_then(parse_number)
        .unwrap_or(line_total);

    item.set("Line: Product Handle", line_handle(&title));
    item.set("Line: Title", title.clone());
    item.set("Line: Name", title);
    if let Some(sku) = row.non_blank("Line: SKU") {
        item.set("Line: SKU", sku);
    }
    item.set("Line: Quantity", quantity);
    item.set("Line: Price", number_value(price));
    item.set("Transaction: Amount", number_value(amount));

    let fulfilled_at = format_date(row.get("Fulfillment: Processed At"));
    if !fulfilled_at.is_empty() {
        item.set("Fulfillment: Processed At", fulfilled_at);
    }
    for column in ["Fulfillment: Tracking Number", "Fulfillment: Shipment Status"] {
        if let Some(text) = row.non_blank(column) {
            item.set(column, text);
        }
    }
    item
}

/// Stand-in line item for an order that carries no line-level data.
pub fn generic_line_item(row: &Record, order_name: &str) -> Record {
    let mut item = header(row, order_name);

    let note = row.text("Note").unwrap_or_default();
    let title = extract_product_from_note(&note)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    let amount = number_value(safe_float(row.get("Transaction: Amount")));

    if !note.is_empty() {
        item.set("Note", note);
    }
    item.set("Line: Product Handle", line_handle(&title));
    item.set("Line: Title", title.clone());
    item.set("Line: Name", title);
    item.set("Line: Quantity", 1);
    item.set("Line: Price", amount.clone());
    item.set("Transaction: Amount", amount);
    item
}

fn has_line_data(row: &Record) -> bool {
    row.data
        .iter()
        .any(|(column, _)| column.starts_with("Line:") && row.non_blank(column).is_some())
}

/// One line item per row with line data; one synthetic item for the first row of any order
/// that has none.
pub fn rebuild_line_items(orders: Table) -> Table {
    let with_lines: HashSet<String> = orders
        .rows
        .iter()
        .filter(|row| has_line_data(row))
        .filter_map(|row| row.non_blank("Name"))
        .collect();
    let mut synthesized: HashSet<String> = HashSet::new();
    let mut rebuilt = Table::new(column_names());

    for row in &orders.rows {
        let name = row.non_blank("Name");
        let order_name = name.clone().unwrap_or_default();
        if has_line_data(row) {
            rebuilt.push(line_item_row(row, &order_name));
            continue;
        }
        let first_for_order = match name {
            Some(name) => !with_lines.contains(&name) && synthesized.insert(name),
            None => true,
        };
        if first_for_order {
            rebuilt.push(generic_line_item(row, &order_name));
        }
    }

    tracing::info!(
        "🧾 Rebuilt {} order row(s) into {} line item(s)",
        orders.len(),
        rebuilt.len()
    );
    rebuilt
}
