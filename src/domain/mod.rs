// Domain layer: tables, reports and ports. No I/O lives here.

pub mod model;
pub mod ports;
pub mod report;
