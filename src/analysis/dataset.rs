use std::path::Path;
use ndarray::Array2;
use thiserror::Error;
use crate::analysis::source;
use crate::config::SourceConfig;
use crate::types::{GasClass, FEATURE_COLUMNS, LABEL_COLUMN};
/// Canonical name of the particulate column.
const PM_CANONICAL: &str = "PM2.5";
const PM_ALIASES: [&str; 3] = ["PM", "PM25", "PM2.5"];
const TIME_ALIASES: [&str; 2] = ["Time", "Timestamp"];
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found")]
    Missing,
    #[error("unreadable: {0}")]
    Unreadable(String),
    #[error("missing columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("no data rows")]
    Empty,
}
/// Projected rows of one source: eight features and the label, each cell
/// `None` when it was blank or not a number.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceTable {
    pub name: String,
    pub rows: Vec<[Option<f64>; 9]>,
}
/// What happened to each configured source.
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub outcome: Result<usize, SourceError>,
}
/// Merged features (`n × 8`) and class labels.
#[derive(Clone, Debug)]
pub struct MergedDataset {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}
impl MergedDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
/// Rename aliases to canonical names; time columns map to `None` (dropped).
pub fn harmonize_header(name: &str) -> Option<&str> {
    let name = name.trim();
    if TIME_ALIASES.contains(&name) {
        None
    } else if PM_ALIASES.contains(&name) {
        Some(PM_CANONICAL)
    } else {
        Some(name)
    }
}
/// Parse one source's CSV text into the fixed 9-column projection.
pub fn project(name: &str, text: &str) -> Result<SourceTable, SourceError> {
    // 截断的行 (采集中断) 只丢掉这一行
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<Option<String>> = reader
        .headers()
        .map_err(|e| SourceError::Unreadable(e.to_string()))?
        .iter()
        .map(|h| harmonize_header(h).map(str::to_owned))
        .collect();
    let wanted = FEATURE_COLUMNS.iter().copied().chain(std::iter::once(LABEL_COLUMN));
    let mut positions = [0usize; 9];
    let mut missing = Vec::new();
    for (slot, column) in wanted.enumerate() {
        match headers.iter().position(|h| h.as_deref() == Some(column)) {
            Some(idx) => positions[slot] = idx,
            None => missing.push(column.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(SourceError::SchemaMismatch { missing });
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::Unreadable(e.to_string()))?;
        let mut row = [None; 9];
        for (cell, &idx) in row.iter_mut().zip(positions.iter()) {
            *cell = record
                .get(idx)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| !v.is_nan());
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(SourceTable {
        name: name.to_string(),
        rows,
    })
}
pub fn load_source(source: &SourceConfig) -> Result<SourceTable, SourceError> {
    if !source.path.exists() {
        return Err(SourceError::Missing);
    }
    let text = read_text(&source.path)?;
    project(&source.name, &text)
}
fn read_text(path: &Path) -> Result<String, SourceError> {
    let log = source::read_log(path).map_err(|e| SourceError::Unreadable(e.to_string()))?;
    Ok(log.lines.join("\n"))
}
/// Apply the per-source label rule in place.
///
/// Flagged sources promote `Label == 1` to their class and keep other
/// labels; every other source is overwritten to [`GasClass::Normal`].
pub fn assign_labels(table: &mut SourceTable, flagged: Option<GasClass>) {
    let label = FEATURE_COLUMNS.len();
    for row in &mut table.rows {
        row[label] = match flagged {
            Some(class) if row[label] == Some(1.0) => Some(class.code() as f64),
            Some(_) => row[label],
            None => Some(GasClass::Normal.code() as f64),
        };
    }
}
/// Concatenate tables and drop rows with any missing cell.
pub fn concat(tables: &[SourceTable]) -> MergedDataset {
    let complete: Vec<[f64; 9]> = tables
        .iter()
        .flat_map(|t| t.rows.iter())
        .filter_map(|row| {
            let mut out = [0.0; 9];
            for (dst, src) in out.iter_mut().zip(row.iter()) {
                *dst = (*src)?;
            }
            Some(out)
        })
        .filter(|row| row[8] >= 0.0 && row[8].fract() == 0.0)
        .collect();
    let n_features = FEATURE_COLUMNS.len();
    let mut features = Array2::zeros((complete.len(), n_features));
    let mut labels = Vec::with_capacity(complete.len());
    for (i, row) in complete.iter().enumerate() {
        for j in 0..n_features {
            features[[i, j]] = row[j];
        }
        labels.push(row[n_features] as usize);
    }
    MergedDataset { features, labels }
}
/// Load, relabel and merge every source in registry order. Sources that
/// fail to load are reported with their [`SourceError`] and left out.
pub fn merge_sources(sources: &[SourceConfig]) -> (MergedDataset, Vec<SourceReport>) {
    let mut tables = Vec::new();
    let mut reports = Vec::new();
    for source in sources {
        match load_source(source) {
            Ok(mut table) => {
                let flagged = source.flagged_class();
                if flagged.is_none() {
                    log::warn!(
                        "source {} has no class mapping, all {} rows labeled Normal",
                        source.name,
                        table.rows.len()
                    );
                }
                assign_labels(&mut table, flagged);
                log::info!("loaded {} ({} rows)", source.name, table.rows.len());
                reports.push(SourceReport {
                    name: source.name.clone(),
                    outcome: Ok(table.rows.len()),
                });
                tables.push(table);
            }
            Err(e) => {
                log::warn!("skipping source {} ({}): {e}", source.name, source.path.display());
                reports.push(SourceReport {
                    name: source.name.clone(),
                    outcome: Err(e),
                });
            }
        }
    }
    (concat(&tables), reports)
}
