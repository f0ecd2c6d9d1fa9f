use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("could not decode {path} with any supported text encoding")]
    Undecodable { path: PathBuf },
    #[error("no line matched the `[time] values,...` layout")]
    NoMatches,
    #[error("no sample lines found after marker `{marker}`")]
    NoSamples { marker: String },
    #[error("unsupported field layout on line {line}: {fields} values (expected 8 or 9)")]
    UnsupportedLayout { line: usize, fields: usize },
    #[error("timestamp parsing failed for every row")]
    NoValidTimestamps,
    #[error("unrecognized timestamp `{0}`")]
    BadTimestamp(String),
    #[error("contact-loss filter removed every row")]
    EmptyAfterFilter,
    #[error("merged training table is empty")]
    EmptyDataset,
    #[error("invalid training input: {0}")]
    Training(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AnalysisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for AnalysisError {
    fn from(value: image::ImageError) -> Self {
        AnalysisError::Plot(value.to_string())
    }
}
