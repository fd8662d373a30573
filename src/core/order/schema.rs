//! Fixed output schema for order imports.
//!
//! Every column carries the coercion it receives during transformation. The kinds
//! follow the naming conventions of the import template (`: Price`, `: Taxable`, `ID`, ...)
//! but are decided here once instead of being re-derived from names on every run.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Parsed as a number; unparseable values become absent.
    Numeric,
    /// Tri-state boolean: true, false or absent.
    Flag,
    /// Identifier rendered as text so long numeric ids keep every digit.
    Identifier,
    /// Free text; blanks become empty strings when the source carried the column.
    Text,
    /// Passed through untouched.
    Raw,
}

use ColumnKind::{Flag, Identifier, Numeric, Raw, Text};

pub static ORDER_COLUMNS: &[(&str, ColumnKind)] = &[
    ("Name", Text),
    ("Command", Text),
    ("Send Receipt", Flag),
    ("Inventory Behaviour", Text),
    ("Note", Text),
    ("Tags", Text),
    ("Tags Command", Text),
    ("Created At", Text),
    ("Updated At", Text),
    ("Cancelled At", Text),
    ("Cancel: Reason", Text),
    ("Cancel: Send Receipt", Flag),
    ("Processed At", Text),
    ("Closed At", Text),
    ("Currency", Text),
    ("Tax 1: Title", Text),
    ("Tax 1: Rate", Numeric),
    ("Tax 1: Price", Numeric),
    ("Tax 2: Title", Text),
    ("Tax 2: Rate", Numeric),
    ("Tax 2: Price", Numeric),
    ("Tax 3: Title", Text),
    ("Tax 3: Rate", Numeric),
    ("Tax 3: Price", Numeric),
    ("Tax: Included", Flag),
    ("Tax: Total", Numeric),
    ("Payment: Status", Text),
    ("Additional Details", Text),
    ("Customer: Email", Text),
    ("Customer: Phone", Text),
    ("Billing: First Name", Text),
    ("Billing: Last Name", Text),
    ("Billing: Company", Text),
    ("Billing: Phone", Text),
    ("Billing: Address 1", Text),
    ("Billing: Address 2", Text),
    ("Billing: Zip", Text),
    ("Billing: City", Text),
    ("Billing: Province", Text),
    ("Billing: Province Code", Text),
    ("Billing: Country", Text),
    ("Billing: Country Code", Text),
    ("Shipping: First Name", Text),
    ("Shipping: Last Name", Text),
    ("Shipping: Company", Text),
    ("Shipping: Phone", Text),
    ("Shipping: Address 1", Text),
    ("Shipping: Address 2", Text),
    ("Shipping: Zip", Text),
    ("Shipping: City", Text),
    ("Shipping: Province", Text),
    ("Shipping: Province Code", Text),
    ("Shipping: Country", Text),
    ("Shipping: Country Code", Text),
    ("Row #", Raw),
    ("Top Row", Raw),
    ("Line: Type", Text),
    ("Line: Command", Text),
    ("Line: ID", Identifier),
    ("Line: Product Handle", Text),
    ("Line: Title", Text),
    ("Line: Name", Text),
    ("Line: Variant ID", Identifier),
    ("Line: Variant Title", Text),
    ("Line: SKU", Text),
    ("Line: Quantity", Numeric),
    ("Line: Price", Numeric),
    ("Line: Discount", Numeric),
    ("Line: Total", Numeric),
    ("Line: Grams", Numeric),
    ("Line: Requires Shipping", Text),
    ("Line: Vendor", Text),
    ("Line: Properties", Text),
    ("Line: Gift Card", Flag),
    ("Line: Taxable", Flag),
    ("Line: Tax 1 Title", Text),
    ("Line: Tax 1 Rate", Raw),
    ("Line: Tax 1 Price", Raw),
    ("Line: Tax 2 Title", Text),
    ("Line: Tax 2 Rate", Raw),
    ("Line: Tax 2 Price", Raw),
    ("Line: Tax 3 Title", Text),
    ("Line: Tax 3 Rate", Raw),
    ("Line: Tax 3 Price", Raw),
    ("Line: Fulfillable Quantity", Raw),
    ("Line: Fulfillment Service", Text),
    ("Line: Fulfillment Status", Text),
    ("Refund: ID", Identifier),
    ("Refund: Created At", Text),
    ("Refund: Note", Text),
    ("Refund: Restock", Flag),
    ("Refund: Restock Type", Text),
    ("Refund: Restock Location", Text),
    ("Refund: Send Receipt", Flag),
    ("Refund: Generate Transaction", Text),
    ("Transaction: ID", Identifier),
    ("Transaction: Kind", Text),
    ("Transaction: Processed At", Text),
    ("Transaction: Amount", Numeric),
    ("Transaction: Currency", Text),
    ("Transaction: Status", Text),
    ("Transaction: Message", Text),
    ("Transaction: Gateway", Text),
    ("Transaction: Test", Flag),
    ("Transaction: Authorization", Text),
    ("Transaction: Error Code", Text),
    ("Transaction: CC AVS Result", Text),
    ("Transaction: CC Bin", Text),
    ("Transaction: CC CVV Result", Text),
    ("Transaction: CC Number", Text),
    ("Transaction: CC Company", Text),
    ("Fulfillment: ID", Identifier),
    ("Fulfillment: Processed At", Text),
    ("Fulfillment: Status", Text),
    ("Fulfillment: Shipment Status", Text),
    ("Fulfillment: Location", Text),
    ("Fulfillment: Tracking Company", Text),
    ("Fulfillment: Tracking Number", Text),
    ("Fulfillment: Tracking URL", Text),
    ("Fulfillment: Send Receipt", Flag),
    ("ID (Ref)", Identifier),
    ("Name (Ref)", Text),
    ("Import Result", Text),
    ("Import Comment", Text),
    ("Metafield: woo.id", Text),
    ("Metafield: woo.created_via", Text),
    ("Metafield: woo.customer_id", Text),
    ("Metafield: woo.transaction_id", Text),
    ("Metafield: woo.payment_method", Text),
    ("Metafield: woo.is_vat_exempt", Text),
    ("Metafield: woo._woo_pp_txnData", Text),
    ("Metafield: woo._paypal_status", Text),
    ("Metafield: woo._paypal_transaction_fee", Text),
    ("Metafield: woo.Payer PayPal address", Text),
    ("Metafield: woo.Payer first name", Text),
    ("Metafield: woo.Payer last name", Text),
    ("Metafield: woo.Payment type", Text),
    ("Metafield: woo._order_number", Text),
    ("Metafield: woo._order_number_formatted", Text),
    ("Metafield: woo._alg_wc_mppu_order_data_saved", Text),
    ("Metafield: woo._wp_page_template", Text),
    ("Metafield: woo._stripe_customer_id", Text),
    ("Metafield: woo._stripe_source_id", Text),
    ("Metafield: woo._stripe_intent_id", Text),
    ("Metafield: woo._stripe_charge_captured", Text),
    ("Metafield: woo._stripe_fee", Text),
    ("Metafield: woo._stripe_net", Text),
    ("Metafield: woo._stripe_currency", Text),
    ("Metafield: woo.wc-shippo-shipping_shipments", Text),
    ("Metafield: woo._wcpdf_invoice_settings", Text),
    ("Metafield: woo._wcpdf_packing_slip_date", Text),
    ("Metafield: woo._wcpdf_packing_slip_date_formatted", Text),
    ("Metafield: woo._sequential_order_number_id", Text),
    ("Metafield: woo._sequential_order_number", Text),
    ("Metafield: woo._start_sequential_order_number", Text),
    ("Metafield: woo._order_number_meta", Text),
    ("Metafield: woo.wc-shippo-shipping_shipments_updated", Text),
    ("Metafield: woo._stripe_refund_id", Text),
    ("Metafield: woo._auction", Text),
    ("Metafield: woo._wc_facebook_for_woocommerce_order_placed", Text),
    ("Metafield: woo._wc_facebook_for_woocommerce_purchase_tracked", Text),
    ("Metafield: woo.wf_invoice_number", Text),
    ("Metafield: woo.mailchimp_woocommerce_landing_site", Text),
    ("Metafield: woo._wf_invoice_date", Text),
    ("Metafield: woo.wf_invoice_html", Text),
    ("Metafield: woo._created_document_old", Text),
    ("Metafield: woo.mailchimp_woocommerce_is_subscribed", Text),
    ("Metafield: woo.mailchimp_woocommerce_campaign_id", Text),
    ("Metafield: woo._stripe_status_before_hold", Text),
    ("Metafield: woo._stripe_status_final", Text),
    ("Metafield: woo._wcpdf_packing-slip_creation_trigger", Text),
    ("Metafield: woo._wcpdf_packing_slip_creation_trigger", Text),
    ("Metafield: woo._wcpdf_invoice_display_date", Text),
    ("Metafield: woo._wc_order_attribution_source_type", Text),
    ("Metafield: woo._wc_order_attribution_referrer", Text),
    ("Metafield: woo._wc_order_attribution_utm_source", Text),
    ("Metafield: woo._wc_order_attribution_session_entry", Text),
    ("Metafield: woo._wc_order_attribution_session_start_time", Text),
    ("Metafield: woo._wc_order_attribution_session_pages", Text),
    ("Metafield: woo._wc_order_attribution_session_count", Text),
    ("Metafield: woo._wc_order_attribution_user_agent", Text),
    ("Metafield: woo._wc_order_attribution_device_type", Text),
    ("Metafield: woo._wc_order_attribution_utm_medium", Text),
    ("Metafield: woo._ppcp_paypal_order_id", Text),
    ("Metafield: woo._ppcp_paypal_intent", Text),
    ("Metafield: woo._ppcp_paypal_payment_mode", Text),
    ("Metafield: woo._ppcp_paypal_payment_source", Text),
    ("Metafield: woo._ppcp_paypal_fees", Text),
    ("Metafield: woo.PayPal Transaction Fee", Text),
    ("Metafield: woo._ppcp_refunds", Text),
    ("Metafield: woo._ppcp_paypal_refund_fees", Text),
    ("Metafield: woo._wc_order_attribution_utm_content", Text),
    ("Metafield: woo._wc_stripe_charge_status", Text),
    ("Metafield: woo._wc_order_attribution_utm_campaign", Text),
    ("Metafield: woo._ppcp_paypal_payer_email", Text),
    ("Metafield: woo._payment_intent_id", Text),
    ("Metafield: woo._ppcp_paypal_tracking_info_meta_name", Text),
    ("Metafield: woo._stripe_upe_payment_type", Text),
    ("Metafield: woo._ppcp_paypal_captured", Text),
    ("Metafield: woo.wt_store_credit_used", Text),
    ("Metafield: woo._stripe_upe_waiting_for_redirect", Text),
    ("Metafield: woo._stripe_upe_redirect_processed", Text),
    ("Metafield: woo.wt_pklist_order_language", Text),
    ("Metafield: woo._wt_thankyou_action_done", Text),
    ("Metafield: woo._created_document", Text),
    ("Metafield: woo._stripe_payment_awaiting_action", Text),
    ("Metafield: woo._stripe_lock_payment", Text),
    ("Metafield: woo._shipping_hash", Text),
    ("Metafield: woo._coupons_hash", Text),
    ("Metafield: woo._fees_hash", Text),
    ("Metafield: woo._taxes_hash", Text),
    ("Metafield: woo.urcr_allow_to", Text),
    ("Metafield: woo._meta_purchase_tracked", Text),
    ("Metafield: woo._ppcp_paypal_billing_phone", Text),
    ("Metafield: woo._ppcp_paypal_billing_email", Text),
    ("Metafield: woo.urcr_meta_content", Text),
];

static KINDS: LazyLock<HashMap<&'static str, ColumnKind>> =
    LazyLock::new(|| ORDER_COLUMNS.iter().copied().collect());

pub fn column_kind(column: &str) -> Option<ColumnKind> {
    KINDS.get(column).copied()
}

pub fn column_names() -> impl Iterator<Item = &'static str> {
    ORDER_COLUMNS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const NUMERIC_SUFFIXES: [&str; 8] = [
        "Price", "Amount", "Total", "Rate", "Grams", "Weight", "Discount", "Quantity",
    ];
    const FLAG_SUFFIXES: [&str; 7] = [
        "Required",
        "Included",
        "Taxable",
        "Gift Card",
        "Send Receipt",
        "Restock",
        "Test",
    ];

    fn ends_with_any(column: &str, suffixes: &[&str]) -> bool {
        suffixes
            .iter()
            .any(|s| column == *s || column.ends_with(&format!(": {s}")))
    }

    #[test]
    fn test_columns_are_unique() {
        let unique: HashSet<_> = column_names().collect();
        assert_eq!(unique.len(), ORDER_COLUMNS.len());
    }

    #[test]
    fn test_line_command_follows_line_type() {
        let names: Vec<_> = column_names().collect();
        let at = names.iter().position(|c| *c == "Line: Type").unwrap();
        assert_eq!(names[at + 1], "Line: Command");
    }

    #[test]
    fn test_kinds_agree_with_naming_conventions() {
        for (column, kind) in ORDER_COLUMNS {
            let expected = if matches!(*column, "Top Row" | "Row #") {
                Raw
            } else if ends_with_any(column, &NUMERIC_SUFFIXES) && !column.contains("Email") {
                Numeric
            } else if ends_with_any(column, &FLAG_SUFFIXES) {
                Flag
            } else if column.contains("ID") {
                Identifier
            } else if NUMERIC_SUFFIXES.iter().any(|s| column.contains(s)) {
                Raw
            } else {
                Text
            };
            assert_eq!(*kind, expected, "{column}");
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(column_kind("Line: Price"), Some(Numeric));
        assert_eq!(column_kind("Line: Tax 1 Price"), Some(Raw));
        assert_eq!(column_kind("Line: Taxable"), Some(Flag));
        assert_eq!(column_kind("Transaction: ID"), Some(Identifier));
        assert_eq!(column_kind("Customer: Email"), Some(Text));
        assert_eq!(column_kind("Not A Column"), None);
    }
}
