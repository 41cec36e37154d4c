use std::io::Read;
use std::path::Path;

use biopsy_core::{BiopsyError, Float, Label, Matrix, Result};
use tracing::{debug, info};

use super::schema::{Variant, WDBC_FEATURES};

/// Parsed feature matrix with its label vector.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Matrix,
    pub y: Vec<Label>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Number of samples per class, sorted by class code.
    pub fn class_counts(&self) -> Vec<(Label, usize)> {
        let mut counts: Vec<(Label, usize)> = Vec::new();
        let mut sorted = self.y.clone();
        sorted.sort_unstable();
        for label in sorted {
            match counts.last_mut() {
                Some((l, c)) if *l == label => *c += 1,
                _ => counts.push((label, 1)),
            }
        }
        counts
    }
}

/// Loads the dataset for `variant` from a local path or an `http(s)://` URL.
pub fn load_dataset(variant: Variant, source: &str) -> Result<Dataset> {
    let text = read_source(source)?;
    let dataset = match variant {
        Variant::Clump => parse_clump_csv(text.as_bytes())?,
        Variant::Wdbc => parse_wdbc_csv(text.as_bytes())?,
    };
    info!(
        %variant,
        source,
        samples = dataset.n_samples(),
        features = dataset.n_features(),
        "Loaded dataset"
    );
    Ok(dataset)
}

fn read_source(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        debug!(url = source, "Fetching remote dataset");
        let response = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .map_err(|e| BiopsyError::Http(format!("{source}: {e}")))?;
        response
            .text()
            .map_err(|e| BiopsyError::Http(format!("{source}: {e}")))
    } else {
        std::fs::read_to_string(Path::new(source))
            .map_err(|e| BiopsyError::Io(format!("{source}: {e}")))
    }
}

fn parse_float(raw: &str, line: u64, column: usize) -> Result<Float> {
    raw.trim().parse::<Float>().map_err(|_| {
        BiopsyError::Csv(format!(
            "line {line}, column {column}: cannot parse {raw:?} as a number"
        ))
    })
}

fn parse_label(raw: &str, line: u64) -> Result<Label> {
    let value = parse_float(raw, line, 0)?;
    if value < 0.0 || value.fract() != 0.0 {
        return Err(BiopsyError::Csv(format!(
            "line {line}: class label {raw:?} is not a non-negative integer"
        )));
    }
    Ok(value as Label)
}

fn build_matrix(rows: Vec<Vec<Float>>, ncols: usize) -> Result<Matrix> {
    if rows.is_empty() {
        return Err(BiopsyError::EmptyTrainingData);
    }
    let flat: Vec<Float> = rows.into_iter().flatten().collect();
    Ok(Matrix::from_row_slice(flat.len() / ncols, ncols, &flat))
}

/// Parses a headed CSV laid out as `id, feature_1 … feature_k, class`.
///
/// Features are every column between the first and the last; the last column
/// holds an integer class code.
pub fn parse_clump_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| BiopsyError::Csv(e.to_string()))?
        .clone();
    if headers.len() < 3 {
        return Err(BiopsyError::Csv(format!(
            "expected at least 3 columns (id, features, class), found {}",
            headers.len()
        )));
    }
    let width = headers.len();
    let feature_names: Vec<String> = headers
        .iter()
        .skip(1)
        .take(width - 2)
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for record in rdr.records() {
        let record = record.map_err(|e| BiopsyError::Csv(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != width {
            return Err(BiopsyError::Csv(format!(
                "line {line}: expected {width} fields, found {}",
                record.len()
            )));
        }

        let features = (1..width - 1)
            .map(|j| parse_float(&record[j], line, j))
            .collect::<Result<Vec<_>>>()?;
        rows.push(features);
        labels.push(parse_label(&record[width - 1], line)?);
    }

    Ok(Dataset {
        x: build_matrix(rows, width - 2)?,
        y: labels,
        feature_names,
    })
}

/// Parses the headerless Wisconsin Diagnostic layout:
/// `id, diagnosis (M|B), 30 features`.
pub fn parse_wdbc_csv<R: Read>(reader: R) -> Result<Dataset> {
    let width = WDBC_FEATURES.len() + 2;
    let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_reader(reader);

    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for record in rdr.records() {
        let record = record.map_err(|e| BiopsyError::Csv(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != width {
            return Err(BiopsyError::Csv(format!(
                "line {line}: expected {width} fields, found {}",
                record.len()
            )));
        }

        let label = match record[1].trim() {
            "M" => 1,
            "B" => 0,
            other => {
                return Err(BiopsyError::Csv(format!(
                    "line {line}: unknown diagnosis {other:?}"
                )))
            }
        };

        let features = (2..width)
            .map(|j| parse_float(&record[j], line, j))
            .collect::<Result<Vec<_>>>()?;
        rows.push(features);
        labels.push(label);
    }

    Ok(Dataset {
        x: build_matrix(rows, WDBC_FEATURES.len())?,
        y: labels,
        feature_names: WDBC_FEATURES.iter().map(|s| s.to_string()).collect(),
    })
}
