use super::transform::{apply_email_fallbacks, clean_phone_numbers};
use crate::domain::model::Table;
use crate::domain::report::ValidationReport;

const ESSENTIAL_COLUMNS: [&str; 2] = ["Name", "Customer: Email"];

/// Checks an order export. Never touches `orders`; the email and phone passes run on a copy
/// purely to report what the transform will change.
pub fn validate(orders: &Table) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if orders.is_empty() {
        errors.push("❌ Empty dataframe provided".to_string());
        return ValidationReport::new(errors, warnings, 0);
    }

    let missing = orders.missing_columns(&ESSENTIAL_COLUMNS);
    if !missing.is_empty() {
        errors.push(format!("❌ Missing essential columns: {}", missing.join(", ")));
    }

    if !orders.columns.iter().any(|c| c.starts_with("Line:")) {
        warnings.push(
            "⚠️ No line item columns found - will create basic order structure".to_string(),
        );
    }

    if !orders.has_column("Transaction: Amount") && !orders.has_column("Line: Total") {
        warnings.push("⚠️ No transaction amount data found".to_string());
    }

    let mut scratch = orders.clone();

    let mut emails = Vec::new();
    apply_email_fallbacks(&mut scratch, &mut emails);
    if !emails.is_empty() {
        warnings.push(
            "📧 Missing customer emails detected - the following fallback emails will be used:"
                .to_string(),
        );
        warnings.extend(emails.iter().map(|w| format!("   • {w}")));
    }

    let mut phones = Vec::new();
    clean_phone_numbers(&mut scratch, &mut phones);
    if !phones.is_empty() {
        warnings.push(
            "📞 Phone number formatting issues detected - the following will be cleaned:"
                .to_string(),
        );
        warnings.extend(phones.iter().map(|w| format!("   • {w}")));
    }

    ValidationReport::new(errors, warnings, orders.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use serde_json::json;

    fn order_row(name: &str, email: Option<&str>) -> Record {
        let mut record: Record = [("Name", json!(name)), ("Line: Title", json!("Booster Pack"))]
            .into_iter()
            .collect();
        record.set("Customer: Email", email.map(Into::into).unwrap_or(json!(null)));
        record
    }

    #[test]
    fn test_empty_table_is_invalid() {
        let report = validate(&Table::new(["Name", "Customer: Email"]));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["❌ Empty dataframe provided"]);
        assert_eq!(report.row_count, 0);
    }

    #[test]
    fn test_missing_essential_columns() {
        let t = Table::new(["Name"]).with_rows(vec![[("Name", "#1")].into_iter().collect()]);
        let report = validate(&t);
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["❌ Missing essential columns: Customer: Email"]);
        assert!(report
            .warnings
            .contains(&"⚠️ No line item columns found - will create basic order structure".to_string()));
        assert!(report
            .warnings
            .contains(&"⚠️ No transaction amount data found".to_string()));
    }

    #[test]
    fn test_dry_run_reports_without_mutating() {
        let mut row = order_row("#1001", None);
        row.set("Metafield: woo.Payer PayPal address", "buyer@example.com");
        row.set("Customer: Phone", "+1 (555) 123-4567");
        let t = Table::new([
            "Name",
            "Customer: Email",
            "Line: Title",
            "Line: Total",
            "Metafield: woo.Payer PayPal address",
            "Customer: Phone",
        ])
        .with_rows(vec![row]);
        let before = t.clone();

        let report = validate(&t);
        assert!(report.valid);
        assert_eq!(t, before);
        assert_eq!(report.row_count, 1);
        assert_eq!(
            report.warnings,
            vec![
                "📧 Missing customer emails detected - the following fallback emails will be used:".to_string(),
                "   • Row 1 Order #1001: Used email from 'Metafield: woo.Payer PayPal address' → 'buyer@example.com'".to_string(),
                "📞 Phone number formatting issues detected - the following will be cleaned:".to_string(),
                "   • Row 1 Customer: Phone: '+1 (555) 123-4567' → '+15551234567'".to_string(),
            ]
        );
    }

    #[test]
    fn test_clean_orders_have_no_warnings() {
        let t = Table::new(["Name", "Customer: Email", "Line: Title", "Transaction: Amount"])
            .with_rows(vec![order_row("#1", Some("a@b.com"))]);
        let report = validate(&t);
        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }
}
