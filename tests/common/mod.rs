#![allow(dead_code)]

use std::path::{Path, PathBuf};
use woo_shopify_etl::{CliConfig, ImportKind, RetailerTagging};

pub fn config(kind: ImportKind, input: &Path, output: &Path) -> CliConfig {
    CliConfig {
        kind,
        input: input.to_string_lossy().into_owned(),
        output_path: output.to_string_lossy().into_owned(),
        fix_zips: false,
        bypass: false,
        retailer_tagging: RetailerTagging::Role,
        rebuild_line_items: false,
        bundle: false,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

/// Files in `dir` with the given extension, sorted by name.
pub fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    files
}
