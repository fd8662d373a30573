//! Order export → Shopify order import.

pub mod line_items;
pub mod schema;
pub mod transform;
pub mod validate;

use crate::domain::model::Table;
use crate::domain::report::ValidationReport;

pub use transform::Advisories;

#[derive(Debug, Clone, Default)]
pub struct OrderTransformer {
    rebuild_line_items: bool,
}

impl OrderTransformer {
    pub fn new(rebuild_line_items: bool) -> Self {
        Self { rebuild_line_items }
    }

    pub fn validate(&self, orders: &Table) -> ValidationReport {
        validate::validate(orders)
    }

    pub fn transform(&self, orders: Table) -> Table {
        self.transform_with_advisories(orders).0
    }

    pub fn transform_with_advisories(&self, orders: Table) -> (Table, Advisories) {
        let orders = if self.rebuild_line_items {
            line_items::rebuild_line_items(orders)
        } else {
            orders
        };
        transform::transform_with_advisories(orders)
    }
}
