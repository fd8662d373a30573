//! WooCommerce product export → Shopify product import.

use serde_json::Value;

use crate::core::fields::{
    convert_weight_to_grams, create_handle, equals_number, is_truthy, number_or_zero,
    number_value, process_description, process_images, process_pricing, process_tags,
};
use crate::domain::model::{cell_text, Record, Table};
use crate::utils::error::{EtlError, Result};

pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Name",
    "SKU",
    "Description",
    "Categories",
    "Tags",
    "Images",
    "Regular price",
    "Sale price",
    "Weight (lbs)",
    "Stock",
    "Published",
    "Tax status",
];

pub const SHOPIFY_PRODUCT_COLUMNS: [&str; 48] = [
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Product Category",
    "Type",
    "Tags",
    "Published",
    "Option1 Name",
    "Option1 Value",
    "Option2 Name",
    "Option2 Value",
    "Option3 Name",
    "Option3 Value",
    "Variant SKU",
    "Variant Grams",
    "Variant Inventory Tracker",
    "Variant Inventory Qty",
    "Variant Inventory Policy",
    "Variant Fulfillment Service",
    "Variant Price",
    "Variant Compare At Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Variant Barcode",
    "Image Src",
    "Image Position",
    "Image Alt Text",
    "Gift Card",
    "SEO Title",
    "SEO Description",
    "Google Shopping / Google Product Category",
    "Google Shopping / Gender",
    "Google Shopping / Age Group",
    "Google Shopping / MPN",
    "Google Shopping / Condition",
    "Google Shopping / Custom Product",
    "Variant Image",
    "Variant Weight Unit",
    "Variant Tax Code",
    "Cost per item",
    "Included / United States",
    "Price / United States",
    "Compare At Price / United States",
    "Included / International",
    "Price / International",
    "Compare At Price / International",
    "Status",
];

const NUMERIC_COLUMNS: [&str; 4] = [
    "Variant Price",
    "Variant Compare At Price",
    "Variant Grams",
    "Variant Inventory Qty",
];

const UNPUBLISHED: f64 = -1.0;

/// Summary numbers for a finished product run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    pub input_rows: usize,
    pub output_rows: usize,
    pub rows_with_images: usize,
    pub active_products: usize,
}

impl TransformStats {
    pub fn compute(input_rows: usize, output: &Table) -> Self {
        let non_blank = |row: &Record, column: &str| row.non_blank(column).is_some();
        Self {
            input_rows,
            output_rows: output.len(),
            rows_with_images: output.rows.iter().filter(|r| non_blank(r, "Image Src")).count(),
            active_products: output
                .rows
                .iter()
                .filter(|r| r.text("Status").as_deref() == Some("active"))
                .count(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProductTransformer;

impl ProductTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Fails before touching any row when a required column is missing.
    pub fn validate_columns(&self, products: &Table) -> Result<()> {
        let missing = products.missing_columns(&REQUIRED_COLUMNS);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(EtlError::SchemaError { missing })
        }
    }

    pub fn transform(&self, products: Table) -> Result<Table> {
        self.validate_columns(&products)?;
        tracing::debug!("Transforming {} product rows", products.len());

        let mut output = Table::new(SHOPIFY_PRODUCT_COLUMNS);
        for row in &products.rows {
            for record in expand_product(row) {
                output.push(clean_numeric_columns(record));
            }
        }

        Ok(output)
    }
}

/// Main row followed by one image-only row per additional image. Image rows are built as the
/// iterator is advanced; cloning it restarts from the current position.
pub fn expand_product(row: &Record) -> impl Iterator<Item = Record> + Clone + '_ {
    let images = process_images(row.get("Images"));
    let title = row.text("Name").unwrap_or_default();
    let handle = create_handle(&title);
    let main = main_row(row, &handle, &title, images.first().map(String::as_str));

    let extra = images
        .into_iter()
        .enumerate()
        .skip(1)
        .map(move |(index, src)| image_row(&handle, &title, &src, index + 1));

    std::iter::once(main).chain(extra)
}

fn main_row(row: &Record, handle: &str, title: &str, first_image: Option<&str>) -> Record {
    let published = !equals_number(row.get("Published"), UNPUBLISHED);
    let pricing = process_pricing(row.get("Sale price"), row.get("Regular price"));
    let stock = row
        .get("Stock")
        .filter(|value| cell_text(value).is_some_and(|text| !text.trim().is_empty()))
        .cloned()
        .unwrap_or_else(|| Value::from(0));
    let inventory_qty = if is_truthy(row.get("In stock?")) {
        stock
    } else {
        Value::from(0)
    };
    let taxable = row.text("Tax status").as_deref() == Some("taxable");

    let mut record = blank_record();
    record.set("Handle", handle);
    record.set("Title", title);
    record.set("Body (HTML)", process_description(row.get("Description")));
    record.set("Tags", process_tags(row.get("Tags")));
    record.set("Published", flag(published));
    record.set("Variant SKU", row.get("SKU").cloned().unwrap_or(Value::Null));
    record.set("Variant Grams", convert_weight_to_grams(row.get("Weight (lbs)")));
    record.set("Variant Inventory Tracker", "shopify");
    record.set("Variant Inventory Qty", inventory_qty);
    record.set("Variant Inventory Policy", "deny");
    record.set("Variant Fulfillment Service", "manual");
    record.set("Variant Price", pricing.variant_price);
    record.set("Variant Compare At Price", pricing.compare_at_price);
    record.set("Variant Requires Shipping", "TRUE");
    record.set("Variant Taxable", flag(taxable));
    if let Some(src) = first_image {
        record.set("Image Src", src);
        record.set("Image Position", "1");
        record.set("Image Alt Text", title);
    }
    record.set("Gift Card", "FALSE");
    record.set("SEO Title", title);
    record.set("SEO Description", row.text("Short description").unwrap_or_default());
    record.set("Variant Weight Unit", "g");
    record.set("Included / United States", "TRUE");
    record.set("Included / International", "TRUE");
    record.set("Status", if published { "active" } else { "archived" });
    record
}

fn image_row(handle: &str, title: &str, src: &str, position: usize) -> Record {
    let mut record = blank_record();
    record.set("Handle", handle);
    record.set("Image Src", src);
    record.set("Image Position", position.to_string());
    record.set("Image Alt Text", title);
    record
}

fn blank_record() -> Record {
    SHOPIFY_PRODUCT_COLUMNS
        .iter()
        .map(|column| (*column, Value::String(String::new())))
        .collect()
}

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Numeric columns become numbers (0 when blank or unparseable). Compare-at price is the
/// exception: it is rendered blank when it comes out as 0.
fn clean_numeric_columns(mut record: Record) -> Record {
    for column in NUMERIC_COLUMNS {
        let coerced = number_or_zero(record.get(column));
        record.set(column, coerced);
    }
    // grams stay a real number even when whole
    let grams = record.get("Variant Grams").and_then(Value::as_f64).unwrap_or(0.0);
    record.set("Variant Grams", grams);
    let compare_at = match record.get("Variant Compare At Price").and_then(Value::as_f64) {
        Some(price) if price != 0.0 => number_value(price),
        _ => Value::String(String::new()),
    };
    record.set("Variant Compare At Price", compare_at);
    record
}
