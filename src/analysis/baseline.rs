use crate::analysis::source::LogText;
use crate::analysis::AnalysisError;
/// Readings of the two channels taken from one received-data line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineSample {
    pub mq3: i64,
    pub mq135: i64,
}
/// Both channel traces with their quiescent baselines.
#[derive(Clone, Debug)]
pub struct BaselineReport {
    pub mq3: Vec<f64>,
    pub mq135: Vec<f64>,
    pub mq3_baseline: f64,
    pub mq135_baseline: f64,
}
/// Parse `...]<marker>a,b,c,d,e,...`; fields 2 and 4 are MQ-3 and MQ-135.
pub fn parse_marker_line(line: &str, marker: &str) -> Option<BaselineSample> {
    let needle = format!("]{marker}");
    let (_, content) = line.split_once(needle.as_str())?;
    let fields: Vec<&str> = content.trim().split(',').collect();
    if fields.len() < 5 {
        return None;
    }
    Some(BaselineSample {
        mq3: fields[1].trim().parse().ok()?,
        mq135: fields[3].trim().parse().ok()?,
    })
}
/// Mean of the smallest `ceil(quantile * N)` values.
///
/// The sensor idles most of the time, so the low tail is the resting level
/// and the exposure spikes fall outside it.
pub fn estimate_baseline(values: &[f64], quantile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let take = ((values.len() as f64 * quantile).ceil() as usize).clamp(1, sorted.len());
    Some(sorted[..take].iter().sum::<f64>() / take as f64)
}
pub fn analyze(
    log: &LogText,
    marker: &str,
    quantile: f64,
) -> Result<BaselineReport, AnalysisError> {
    let samples: Vec<BaselineSample> = log
        .lines
        .iter()
        .filter(|line| line.contains(marker))
        .filter_map(|line| parse_marker_line(line, marker))
        .collect();
    log::info!("extracted {} samples from {} lines", samples.len(), log.lines.len());
    if samples.is_empty() {
        return Err(AnalysisError::NoSamples {
            marker: marker.to_string(),
        });
    }
    let mq3: Vec<f64> = samples.iter().map(|s| s.mq3 as f64).collect();
    let mq135: Vec<f64> = samples.iter().map(|s| s.mq135 as f64).collect();
    let mq3_baseline = estimate_baseline(&mq3, quantile).unwrap_or_default();
    let mq135_baseline = estimate_baseline(&mq135, quantile).unwrap_or_default();
    Ok(BaselineReport {
        mq3,
        mq135,
        mq3_baseline,
        mq135_baseline,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    const MARKER: &str = "收←◆";
    #[test]
    fn bottom_decile_of_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(estimate_baseline(&values, 0.1), Some(5.5));
    }
    #[test]
    fn order_does_not_matter() {
        let values = vec![4000.0, 12.0, 3500.0, 10.0, 2900.0, 11.0, 15.0, 14.0, 13.0, 16.0];
        assert_eq!(estimate_baseline(&values, 0.1), Some(10.0));
        assert_eq!(estimate_baseline(&values, 0.2), Some(10.5));
    }
    #[test]
    fn small_inputs_still_take_one_value() {
        assert_eq!(estimate_baseline(&[7.0, 3.0], 0.1), Some(3.0));
        assert_eq!(estimate_baseline(&[], 0.1), None);
    }
    #[test]
    fn marker_line_takes_second_and_fourth_fields() {
        let sample = parse_marker_line("[10:00:00.001]收←◆101,202,303,404,505", MARKER).unwrap();
        assert_eq!(sample, BaselineSample { mq3: 202, mq135: 404 });
    }
    #[test]
    fn marker_line_rejects_short_or_bad_payloads() {
        assert!(parse_marker_line("[10:00:00]收←◆1,2,3,4", MARKER).is_none());
        assert!(parse_marker_line("[10:00:00]收←◆1,x,3,4,5", MARKER).is_none());
        assert!(parse_marker_line("[10:00:00]发→◇1,2,3,4,5", MARKER).is_none());
    }
    #[test]
    fn analyze_reports_missing_samples() {
        let log = LogText {
            encoding: "UTF-8",
            lines: vec!["nothing here".into()],
        };
        assert!(matches!(
            analyze(&log, MARKER, 0.1),
            Err(AnalysisError::NoSamples { .. })
        ));
    }
    #[test]
    fn analyze_collects_both_channels() {
        let lines = (1..=20)
            .map(|i| format!("[10:00:{i:02}]收←◆0,{},0,{},0", i * 10, i))
            .collect();
        let log = LogText {
            encoding: "UTF-8",
            lines,
        };
        let report = analyze(&log, MARKER, 0.1).unwrap();
        assert_eq!(report.mq3.len(), 20);
        assert_eq!(report.mq3_baseline, 15.0);
        assert_eq!(report.mq135_baseline, 1.5);
    }
}
