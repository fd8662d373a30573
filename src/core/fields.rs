//! Field derivation utilities shared by the product, customer and order transformers.
//!
//! Every function here is pure and works on a single cell value.

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::domain::model::cell_text;

pub const GRAMS_PER_POUND: f64 = 453.592;

static NON_HANDLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("handle filter regex"));
static HANDLE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("handle separator regex"));
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\n|[\n\r\x0b\x0c\x{85}\x{2028}\x{2029}]").expect("line break regex")
});
static CATEGORY_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;>]").expect("category separator regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// URL-safe handle: lowercase, word characters, single hyphens, no hyphen at either end.
///
/// ```
/// use woo_shopify_etl::core::fields::create_handle;
/// assert_eq!(create_handle("Red T-Shirt!!"), "red-t-shirt");
/// assert_eq!(create_handle(""), "");
/// ```
pub fn create_handle(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept = NON_HANDLE_CHARS.replace_all(&lowered, "");
    let joined = HANDLE_SEPARATORS.replace_all(kept.trim(), "-");
    joined.trim_matches('-').to_string()
}

/// Removes every line break character and literal `\n` sequences without inserting a separator.
pub fn process_description(description: Option<&Value>) -> String {
    match description.and_then(cell_text) {
        Some(text) => LINE_BREAKS.replace_all(&text, "").into_owned(),
        None => String::new(),
    }
}

/// Comma separated image list, trimmed, empty entries dropped.
pub fn process_images(images: Option<&Value>) -> Vec<String> {
    images
        .and_then(cell_text)
        .map(|text| {
            text.split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Pounds to grams, rounded to 4 decimal places. Anything non-numeric, or too large to give a
/// finite weight, gives `0.0`.
pub fn convert_weight_to_grams(weight_lbs: Option<&Value>) -> f64 {
    weight_lbs
        .and_then(parse_number)
        .map(|lbs| round_to(lbs * GRAMS_PER_POUND, 4))
        .filter(|grams| grams.is_finite())
        .unwrap_or(0.0)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Trims each tag, strips leading `#`, drops empties. Duplicates are kept.
pub fn process_tags(tags: Option<&Value>) -> String {
    let Some(text) = tags.and_then(cell_text) else {
        return String::new();
    };
    text.split(',')
        .map(|tag| tag.trim().trim_start_matches('#').trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips everything but word characters, whitespace and hyphens, then collapses whitespace.
pub fn clean_string(text: &str) -> String {
    let kept = NON_HANDLE_CHARS.replace_all(text.trim(), "");
    WHITESPACE_RUNS.replace_all(&kept, " ").trim().to_string()
}

/// Splits on `,`, `;` and `>` and deduplicates case-insensitively, keeping first spelling.
///
/// Not part of the product output; WooCommerce category trees do not map onto a
/// Shopify column, but the normalised list is handy for reporting.
pub fn process_categories(categories: Option<&Value>) -> String {
    let Some(text) = categories.and_then(cell_text) else {
        return String::new();
    };
    let mut seen = HashSet::new();
    CATEGORY_SEPARATORS
        .split(&text)
        .map(clean_string)
        .filter(|category| !category.is_empty() && seen.insert(category.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolved variant pricing for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub variant_price: Value,
    /// Blank unless the product is on sale at a price distinct from the regular price.
    pub compare_at_price: Value,
}

pub fn process_pricing(sale_price: Option<&Value>, regular_price: Option<&Value>) -> Pricing {
    let sale = present(sale_price);
    let regular = present(regular_price);

    let variant_price = sale
        .or(regular)
        .cloned()
        .unwrap_or_else(|| Value::from(0));

    let compare_at_price = match (sale, regular) {
        (Some(sale), Some(regular)) if !same_amount(sale, regular) => regular.clone(),
        _ => Value::String(String::new()),
    };

    Pricing {
        variant_price,
        compare_at_price,
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| cell_text(v).is_some_and(|text| !text.trim().is_empty()))
}

fn same_amount(a: &Value, b: &Value) -> bool {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => cell_text(a).map(|s| s.trim().to_string()) == cell_text(b).map(|s| s.trim().to_string()),
    }
}

/// Numeric reading of a cell: numbers as-is, strings parsed after trimming.
/// Booleans and everything else are not numbers.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Coerces to a JSON number, `0` when unparseable. Integers stay integers.
pub fn number_or_zero(value: Option<&Value>) -> Value {
    value
        .and_then(parse_number)
        .map(number_value)
        .unwrap_or_else(|| Value::from(0))
}

/// Coerces to a JSON number, `Null` when unparseable.
pub fn number_or_null(value: Option<&Value>) -> Value {
    value.and_then(parse_number).map(number_value).unwrap_or(Value::Null)
}

/// Whole numbers become integer JSON numbers so they print without a fraction.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

/// Loose truthiness for flags like `In stock?`. Absent means true, as the export omits it
/// for simple in-stock products.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "0.0" | "false" | "no" | "n"
        ),
        Some(_) => true,
    }
}

/// True when the cell is numerically equal to `target` (`1`, `"1"`, `"1.0"` all equal 1).
pub fn equals_number(value: Option<&Value>, target: f64) -> bool {
    value.and_then(parse_number).is_some_and(|n| n == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_handle() {
        assert_eq!(create_handle("Red T-Shirt!!"), "red-t-shirt");
        assert_eq!(create_handle("  Hello   World  "), "hello-world");
        assert_eq!(create_handle("A -- B"), "a-b");
        assert_eq!(create_handle("-Leading and trailing-"), "leading-and-trailing");
        assert_eq!(create_handle("!!!"), "");
        assert_eq!(create_handle(""), "");
    }

    #[test]
    fn test_create_handle_is_idempotent() {
        for title in ["Red T-Shirt!!", "Café Crème 2-Pack", "  __under_score__ ", "x---y"] {
            let once = create_handle(title);
            assert_eq!(create_handle(&once), once, "title {title:?}");
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
        }
    }

    #[test]
    fn test_process_description_strips_breaks() {
        let desc = json!("Line one\nLine two\r\n\\nLiteral\u{2028}end\u{85}.");
        assert_eq!(
            process_description(Some(&desc)),
            "Line oneLine twoLiteralend."
        );
        assert_eq!(process_description(None), "");
        assert_eq!(process_description(Some(&json!(42))), "42");
    }

    #[test]
    fn test_process_images() {
        let images = json!(" a.jpg , b.jpg,, c.jpg ");
        assert_eq!(process_images(Some(&images)), vec!["a.jpg", "b.jpg", "c.jpg"]);
        assert!(process_images(Some(&json!(""))).is_empty());
        assert!(process_images(None).is_empty());
    }

    #[test]
    fn test_convert_weight_to_grams_four_decimal_places() {
        let cases = [
            (json!(1.0), 453.592),
            (json!(0.5), 226.796),
            (json!(2.345), 1063.6732),
            (json!(0.1), 45.3592),
            (json!(10), 4535.92),
            (json!(0.001), 0.4536),
            (json!(0.00001), 0.0045),
            (json!("1.5"), 680.388),
            (json!("5"), 2267.96),
        ];
        for (input, expected) in cases {
            let grams = convert_weight_to_grams(Some(&input));
            assert!((grams - expected).abs() < 1e-9, "{input} -> {grams}");
            assert_eq!(format!("{grams:.4}"), format!("{expected:.4}"));
        }
    }

    #[test]
    fn test_convert_weight_invalid_inputs() {
        for input in [json!(null), json!(""), json!("invalid"), json!(true), json!([]), json!({})] {
            assert_eq!(convert_weight_to_grams(Some(&input)), 0.0, "{input}");
        }
        assert_eq!(convert_weight_to_grams(None), 0.0);
    }

    #[test]
    fn test_convert_weight_overflow_is_zero() {
        for input in [json!("1e308"), json!("-1e308"), json!(1e307)] {
            let grams = convert_weight_to_grams(Some(&input));
            assert!(grams.is_finite(), "{input} -> {grams}");
            assert_eq!(grams, 0.0, "{input}");
        }
    }

    #[test]
    fn test_process_tags_keeps_duplicates() {
        let tags = json!("#sale, new ,#sale,, ##hot");
        assert_eq!(process_tags(Some(&tags)), "sale, new, sale, hot");
        assert_eq!(process_tags(None), "");
    }

    #[test]
    fn test_process_categories_dedupes() {
        let cats = json!("Cards > Pokémon, cards; Sealed!!");
        assert_eq!(process_categories(Some(&cats)), "Cards, Pokémon, Sealed");
    }

    #[test]
    fn test_pricing_on_sale() {
        let p = process_pricing(Some(&json!("10")), Some(&json!("20")));
        assert_eq!(p.variant_price, json!("10"));
        assert_eq!(p.compare_at_price, json!("20"));
    }

    #[test]
    fn test_pricing_equal_sale_and_regular() {
        let p = process_pricing(Some(&json!("20")), Some(&json!("20.0")));
        assert_eq!(p.variant_price, json!("20"));
        assert_eq!(p.compare_at_price, json!(""));
    }

    #[test]
    fn test_pricing_without_sale() {
        let p = process_pricing(Some(&json!("  ")), Some(&json!("15")));
        assert_eq!(p.variant_price, json!("15"));
        assert_eq!(p.compare_at_price, json!(""));

        let p = process_pricing(None, None);
        assert_eq!(p.variant_price, json!(0));
        assert_eq!(p.compare_at_price, json!(""));
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(None));
        assert!(is_truthy(Some(&json!("1"))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(!is_truthy(Some(&json!("0"))));
        assert!(!is_truthy(Some(&json!("False"))));
        assert!(!is_truthy(Some(&json!(0))));
    }

    #[test]
    fn test_number_helpers() {
        assert_eq!(number_or_zero(Some(&json!("abc"))), json!(0));
        assert_eq!(number_or_zero(Some(&json!("12"))), json!(12));
        assert_eq!(number_or_zero(Some(&json!("12.5"))), json!(12.5));
        assert_eq!(number_or_null(Some(&json!("n/a"))), Value::Null);
        assert!(equals_number(Some(&json!("1.0")), 1.0));
        assert!(!equals_number(Some(&json!("yes")), 1.0));
    }
}
