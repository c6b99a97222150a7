// src/source/mod.rs
use std::fs::File;
use std::io::BufReader;

use anyhow::{anyhow, Context};
use csv::ReaderBuilder;
use tracing::info;

use crate::error::ImportError;

/// One fully-buffered delimited file: the header row plus every data row,
/// all fields as pass-through text.
#[derive(Debug)]
pub struct TabularFile {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read the whole source file into memory. Record 0 is the header; a file
/// with no records at all is an error, since there is nothing to derive
/// destination columns from.
pub fn load_delimited(path: &str) -> Result<TabularFile, ImportError> {
    let source_err = |source: anyhow::Error| ImportError::SourceFile {
        path: path.to_string(),
        source,
    };

    let file = File::open(path)
        .with_context(|| "opening source file")
        .map_err(source_err)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("parse error at record {}", idx))
            .map_err(source_err)?;
        let fields: Vec<String> = record.iter().map(|f| f.to_string()).collect();
        match header {
            None => header = Some(fields),
            Some(_) => rows.push(fields),
        }
    }

    let header = header.ok_or_else(|| source_err(anyhow!("file is empty, no header row")))?;
    info!(rows = rows.len(), columns = header.len(), "source file loaded");
    Ok(TabularFile { header, rows })
}
