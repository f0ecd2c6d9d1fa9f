use std::path::Path;
use chrono::NaiveDateTime;
use serde::Deserialize;
use crate::analysis::{source, timefmt, AnalysisError};
/// Row layout of the CSVs fed to the dashboard.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "MQ_A")]
    mq_a: f64,
    #[serde(rename = "MQ_B")]
    mq_b: f64,
    #[serde(rename = "Temp")]
    temp: f64,
    #[serde(rename = "Hum")]
    hum: f64,
    #[serde(rename = "PM25")]
    pm25: f64,
    #[serde(rename = "Label", default)]
    label: Option<f64>,
}
/// Column-oriented series ready for plotting.
#[derive(Clone, Debug, Default)]
pub struct DashboardSeries {
    pub time: Vec<NaiveDateTime>,
    pub mq_a: Vec<f64>,
    pub mq_b: Vec<f64>,
    pub temp: Vec<f64>,
    pub hum: Vec<f64>,
    pub pm25: Vec<f64>,
    /// Empty when the file has no `Label` column.
    pub label: Vec<Option<f64>>,
}
impl DashboardSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    /// Indices of rows flagged `Label == 1`.
    pub fn alarm_indices(&self) -> Vec<usize> {
        self.label
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == Some(1.0))
            .map(|(i, _)| i)
            .collect()
    }
}
pub fn load(path: &Path) -> Result<DashboardSeries, AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let log = source::read_log(path)?;
    parse(&log.lines.join("\n"))
}
/// Parse CSV text. Times go through the exact `HH:MM:SS.ffffff` layout
/// first; if any value misses it the whole column is re-read with inference.
pub fn parse(text: &str) -> Result<DashboardSeries, AnalysisError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<CsvRow>, csv::Error>>()?;
    let exact: Option<Vec<NaiveDateTime>> =
        rows.iter().map(|r| timefmt::parse_exact(&r.time)).collect();
    let time = match exact {
        Some(times) => times,
        None => {
            log::info!("exact time layout failed, inferring time format");
            rows.iter()
                .map(|r| {
                    timefmt::parse_timestamp(&r.time)
                        .ok_or_else(|| AnalysisError::BadTimestamp(r.time.clone()))
                })
                .collect::<Result<_, _>>()?
        }
    };
    let mut series = DashboardSeries {
        time,
        ..DashboardSeries::default()
    };
    for row in rows {
        series.mq_a.push(row.mq_a);
        series.mq_b.push(row.mq_b);
        series.temp.push(row.temp);
        series.hum.push(row.hum);
        series.pm25.push(row.pm25);
        series.label.push(row.label);
    }
    Ok(series)
}
#[cfg(test)]
mod tests {
    use super::*;
    const HEADER: &str = "Time,MQ_A,MQ_B,Temp,Hum,PM25,Label";
    #[test]
    fn parses_exact_times_and_alarms() {
        let text = format!(
            "{HEADER}\n10:00:00.000000,100,200,25.1,50,30,0\n10:00:01.500000,900,250,25.2,51,90,1\n"
        );
        let series = parse(&text).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.alarm_indices(), vec![1]);
        assert_eq!(series.mq_a, vec![100.0, 900.0]);
        assert_eq!(series.time[1].format("%H:%M:%S%.3f").to_string(), "10:00:01.500");
    }
    #[test]
    fn mixed_times_fall_back_to_inference() {
        let text = format!(
            "{HEADER}\n10:00:00,1,2,3,4,5,0\n1900-01-01 10:00:01.250000,1,2,3,4,5,0\n"
        );
        let series = parse(&text).unwrap();
        assert_eq!(series.time[0].format("%H:%M:%S").to_string(), "10:00:00");
        assert_eq!(series.time[1].format("%H:%M:%S").to_string(), "10:00:01");
    }
    #[test]
    fn label_column_is_optional() {
        let text = "Time,MQ_A,MQ_B,Temp,Hum,PM25\n10:00:00.1,1,2,3,4,5\n";
        let series = parse(text).unwrap();
        assert_eq!(series.label, vec![None]);
        assert!(series.alarm_indices().is_empty());
    }
    #[test]
    fn missing_column_is_an_error() {
        let text = "Time,MQ_A,Temp,Hum,PM25\n10:00:00.1,1,3,4,5\n";
        assert!(matches!(parse(text), Err(AnalysisError::Csv(_))));
    }
    #[test]
    fn unreadable_time_is_an_error() {
        let text = format!("{HEADER}\nsoon,1,2,3,4,5,0\n");
        assert!(matches!(parse(&text), Err(AnalysisError::BadTimestamp(t)) if t == "soon"));
    }
    #[test]
    fn load_strips_bom() {
        let path = std::env::temp_dir().join("mqsense-dashboard-bom.csv");
        std::fs::write(&path, format!("\u{feff}{HEADER}\n10:00:00.5,1,2,3,4,5,1\n")).unwrap();
        let series = load(&path).unwrap();
        assert_eq!(series.alarm_indices(), vec![0]);
        std::fs::remove_file(&path).ok();
    }
    #[test]
    fn header_only_file_is_an_empty_series() {
        let series = parse(&format!("{HEADER}\n")).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }
}
