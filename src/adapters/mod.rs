// Adapters layer: concrete codecs for the formats the pipelines read and write.
pub mod csv;
