//! Customer export → Shopify customer import, with US address validation and zip repair.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::core::fields::equals_number;
use crate::domain::model::{Record, Table};
use crate::domain::ports::RetailerTagging;
use crate::domain::report::{FixableDefect, ValidationReport};

pub const REQUIRED_COLUMNS: [&str; 10] = [
    "First Name",
    "Last Name",
    "Email",
    "Accepts Email Marketing",
    "Default Address Company",
    "Default Address Address1",
    "Default Address City",
    "Default Address Province Code",
    "Default Address Country Code",
    "Phone",
];

pub const COUNTRY_CODE: &str = "Default Address Country Code";
pub const PROVINCE_CODE: &str = "Default Address Province Code";
pub const ZIP: &str = "Default Address Zip";
pub const IMPORT_NOTE: &str = "Imported from WooCommerce";

const HELPER_COLUMNS: [&str; 2] = ["Role", "Is_Retailer"];
const TEXT_COLUMNS: [&str; 4] = [ZIP, "Phone", PROVINCE_CODE, COUNTRY_CODE];
const STRING_COLUMNS: [&str; 8] = [
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Tags",
    ZIP,
    PROVINCE_CODE,
    COUNTRY_CODE,
];

const STATE_CHEAT_SHEET: &str = "\n\nTo fix: Replace with valid 2-letter US state abbreviations. Common examples:\n\
• California = CA\n• New York = NY\n• Texas = TX\n• Florida = FL\n• Illinois = IL\n• Pennsylvania = PA";

static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("us zip regex"));
static FOUR_DIGIT_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("four digit zip regex"));
static US_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("us state regex"));

/// Where a US zip falls. Exactly one class applies to every zip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipClass {
    Valid,
    /// Exactly four digits; the leading zero was lost somewhere upstream.
    Fixable { fixed: String },
    Invalid,
    Blank,
}

pub fn classify_us_zip(zip: Option<&str>) -> ZipClass {
    let zip = zip.map(str::trim).unwrap_or_default();
    if zip.is_empty() || zip == "nan" {
        ZipClass::Blank
    } else if US_ZIP.is_match(zip) {
        ZipClass::Valid
    } else if FOUR_DIGIT_ZIP.is_match(zip) {
        ZipClass::Fixable {
            fixed: format!("0{zip}"),
        }
    } else {
        ZipClass::Invalid
    }
}

fn is_us(row: &Record) -> bool {
    row.text(COUNTRY_CODE)
        .is_some_and(|code| code.trim().eq_ignore_ascii_case("US"))
}

fn customer_name(row: &Record) -> String {
    let first = row.non_blank("First Name").unwrap_or_else(|| "Unknown".to_string());
    let last = row.non_blank("Last Name").unwrap_or_else(|| "Customer".to_string());
    format!("{first} {last}")
}

/// 1-based spreadsheet row, counting the header line.
fn display_row(index: usize) -> usize {
    index + 2
}

#[derive(Debug, Clone, Default)]
pub struct CustomerTransformer {
    tagging: RetailerTagging,
}

impl CustomerTransformer {
    pub fn new(tagging: RetailerTagging) -> Self {
        Self { tagging }
    }

    pub fn validate(&self, customers: &Table) -> ValidationReport {
        let mut errors = Vec::new();

        let missing = customers.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            errors.push(format!("Missing required columns: {}", missing.join(", ")));
        }

        if customers.has_column("Email") {
            let empty = customers
                .rows
                .iter()
                .filter(|row| row.non_blank("Email").is_none())
                .count();
            if empty > 0 {
                errors.push(format!("{empty} customers have empty email addresses"));
            }
        }

        let mut fixable = Vec::new();
        if customers.has_column(COUNTRY_CODE) && customers.has_column(ZIP) {
            let mut invalid = Vec::new();
            for (index, row) in customers.rows.iter().enumerate().filter(|(_, r)| is_us(r)) {
                let zip = row.text(ZIP);
                match classify_us_zip(zip.as_deref()) {
                    ZipClass::Valid | ZipClass::Blank => {}
                    ZipClass::Fixable { fixed } => fixable.push(FixableDefect {
                        row: display_row(index),
                        customer: customer_name(row),
                        zip: zip.unwrap_or_default().trim().to_string(),
                        fixed_zip: fixed,
                    }),
                    ZipClass::Invalid => invalid.push(format!(
                        "Row {}: {} - '{}' (must be 5 digits or 5+4 format like '12345-6789')",
                        display_row(index),
                        customer_name(row),
                        zip.unwrap_or_default().trim()
                    )),
                }
            }

            if !fixable.is_empty() {
                let details: Vec<String> = fixable
                    .iter()
                    .map(|d| format!("Row {}: {} - '{}' → '{}'", d.row, d.customer, d.zip, d.fixed_zip))
                    .collect();
                errors.push(format!(
                    "4-digit US zip codes found that can be auto-fixed by adding leading zero:\n{}",
                    details.join("\n")
                ));
            }
            if !invalid.is_empty() {
                errors.push(format!(
                    "Invalid US zip codes found. US zip codes must be 5 digits or 5+4 format (12345 or 12345-6789):\n{}",
                    invalid.join("\n")
                ));
            }
        }

        if customers.has_column(COUNTRY_CODE) && customers.has_column(PROVINCE_CODE) {
            let invalid: Vec<String> = customers
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| is_us(row))
                .filter_map(|(index, row)| state_issue(index, row))
                .collect();
            if !invalid.is_empty() {
                let count = invalid.len();
                errors.push(format!(
                    "Invalid US state codes found ({count} issue{}). US addresses must have 2-letter state codes (e.g., CA, NY, TX, FL):\n{}{STATE_CHEAT_SHEET}",
                    if count == 1 { "" } else { "s" },
                    invalid.join("\n")
                ));
            }
        }

        tracing::debug!(
            "Customer validation: {} error group(s), {} fixable zip(s)",
            errors.len(),
            fixable.len()
        );
        ValidationReport::new(errors, Vec::new(), customers.len()).with_fixable_defects(fixable)
    }

    /// Zero-pads every 4-digit US zip. Other rows and fields are returned untouched.
    pub fn fix_4digit_zips(&self, customers: Table) -> Table {
        if !customers.has_column(COUNTRY_CODE) || !customers.has_column(ZIP) {
            return customers;
        }
        let mut fixed = customers;
        let mut count = 0usize;
        for row in fixed.rows.iter_mut().filter(|row| is_us(row)) {
            if let ZipClass::Fixable { fixed: zip } = classify_us_zip(row.text(ZIP).as_deref()) {
                row.set(ZIP, zip);
                count += 1;
            }
        }
        tracing::info!("🔧 Fixed {} 4-digit zip code(s)", count);
        fixed
    }

    pub fn transform(&self, customers: Table) -> Table {
        let mut table = customers;

        if table.has_column("Accepts Email Marketing") {
            for row in &mut table.rows {
                let opted_in = equals_number(row.get("Accepts Email Marketing"), 1.0);
                row.set("Accepts Email Marketing", if opted_in { "yes" } else { "no" });
            }
        }

        table.ensure_column("Tags");
        for row in &mut table.rows {
            let tag = self.retailer_tag(row);
            row.set("Tags", tag);
        }

        let text_columns: Vec<&str> = TEXT_COLUMNS
            .iter()
            .copied()
            .filter(|c| table.has_column(c))
            .collect();
        for column in text_columns {
            for row in &mut table.rows {
                let text = row.text(column).unwrap_or_default();
                row.set(column, text);
            }
        }
        let string_columns: Vec<&str> = STRING_COLUMNS
            .iter()
            .copied()
            .filter(|c| table.has_column(c))
            .collect();
        for column in string_columns {
            for row in &mut table.rows {
                let text = row.text(column).filter(|t| t != "nan").unwrap_or_default();
                row.set(column, text);
            }
        }

        table.ensure_column("Note");
        for row in &mut table.rows {
            row.set("Note", IMPORT_NOTE);
        }

        for helper in HELPER_COLUMNS {
            table.drop_column(helper);
        }
        let blank: Vec<String> = table
            .columns
            .iter()
            .filter(|c| c.trim().is_empty())
            .cloned()
            .collect();
        for column in blank {
            table.drop_column(&column);
        }

        table
    }

    fn retailer_tag(&self, row: &Record) -> &'static str {
        let from_role = || {
            if row
                .text("Role")
                .is_some_and(|role| role.eq_ignore_ascii_case("retailer"))
            {
                "Retailer"
            } else {
                ""
            }
        };
        match self.tagging {
            RetailerTagging::Role => from_role(),
            RetailerTagging::IsRetailer => match row.get("Is_Retailer") {
                Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("yes") => "Retailer",
                Some(_) => "",
                None => from_role(),
            },
        }
    }
}

fn state_issue(index: usize, row: &Record) -> Option<String> {
    let raw = row.text(PROVINCE_CODE).map(|s| s.trim().to_string());
    match raw.as_deref() {
        None | Some("") => Some(format!(
            "Row {}: {} - Empty state code",
            display_row(index),
            customer_name(row)
        )),
        Some(code) if code.eq_ignore_ascii_case("nan") => Some(format!(
            "Row {}: {} - Empty state code",
            display_row(index),
            customer_name(row)
        )),
        Some(code) => {
            let upper = code.to_uppercase();
            (!US_STATE.is_match(&upper)).then(|| {
                format!(
                    "Row {}: {} - '{}' (must be 2-letter US state code like 'CA', 'NY', 'TX')",
                    display_row(index),
                    customer_name(row),
                    upper
                )
            })
        }
    }
}
