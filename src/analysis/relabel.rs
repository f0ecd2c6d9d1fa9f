use crate::analysis::source::{self, LogText, RawRow};
use crate::analysis::{timefmt, AnalysisError};
use crate::config::RelabelConfig;
use crate::types::{AlarmLabel, SensorReading};
/// Field layouts the firmware is known to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLayout {
    /// `MQ4, MQ3, MQ7, MQ135, MQ136, Temp, Hum, PM25`
    Channels,
    /// The eight channels followed by the on-device label.
    ChannelsWithLabel,
}
impl LogLayout {
    pub fn detect(fields: usize) -> Option<Self> {
        match fields {
            8 => Some(LogLayout::Channels),
            9 => Some(LogLayout::ChannelsWithLabel),
            _ => None,
        }
    }
}
/// A layout-checked row whose timestamp has not been parsed yet.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundRow {
    pub line_no: usize,
    pub timestamp: String,
    pub layout: LogLayout,
    pub values: Vec<f64>,
}
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub lines: usize,
    pub matched: usize,
    pub timed: usize,
    pub kept: usize,
    pub alarms: usize,
}
impl StageCounts {
    pub fn dropped_by_filter(&self) -> usize {
        self.timed - self.kept
    }
}
#[derive(Clone, Debug)]
pub struct RelabelOutcome {
    pub readings: Vec<SensorReading>,
    pub counts: StageCounts,
}
/// Check every matched row against the supported layouts.
pub fn bind_layout(rows: Vec<RawRow>) -> Result<Vec<BoundRow>, AnalysisError> {
    rows.into_iter()
        .map(|row| {
            let layout =
                LogLayout::detect(row.values.len()).ok_or(AnalysisError::UnsupportedLayout {
                    line: row.line_no,
                    fields: row.values.len(),
                })?;
            Ok(BoundRow {
                line_no: row.line_no,
                timestamp: row.timestamp,
                layout,
                values: row.values,
            })
        })
        .collect()
}
/// Parse timestamps; rows whose time cannot be understood are dropped.
pub fn attach_time(rows: Vec<BoundRow>) -> Vec<SensorReading> {
    rows.into_iter()
        .filter_map(|row| {
            let Some(time) = timefmt::parse_timestamp(&row.timestamp) else {
                log::debug!(
                    "line {}: dropping unparseable time `{}`",
                    row.line_no,
                    row.timestamp
                );
                return None;
            };
            let v = &row.values;
            Some(SensorReading {
                time,
                mq4: v[0],
                mq3: v[1],
                mq7: v[2],
                mq135: v[3],
                mq136: v[4],
                temp: v[5],
                hum: v[6],
                pm25: v[7],
                raw_label: match row.layout {
                    LogLayout::ChannelsWithLabel => Some(v[8]),
                    LogLayout::Channels => None,
                },
                label: AlarmLabel::Normal,
            })
        })
        .collect()
}
/// The probe is only in contact when both MQ4 and PM2.5 read above their
/// floors; anything else is a loose-wire artifact.
pub fn is_engaged(reading: &SensorReading, config: &RelabelConfig) -> bool {
    reading.mq4 > config.contact_gas_min && reading.pm25 > config.contact_pm_min
}
pub fn alarm_for(mq7: f64, threshold: f64) -> AlarmLabel {
    if mq7 > threshold {
        AlarmLabel::Alarm
    } else {
        AlarmLabel::Normal
    }
}
/// Run every stage over a decoded capture: regex rows, layout binding,
/// timestamp coercion, contact-loss filter, relabel. [`StageCounts`] records
/// how many rows survive each stage.
pub fn process(log: &LogText, config: &RelabelConfig) -> Result<RelabelOutcome, AnalysisError> {
    let mut counts = StageCounts {
        lines: log.lines.len(),
        ..StageCounts::default()
    };
    let raw = source::parse_rows(&log.lines);
    counts.matched = raw.len();
    log::info!("regex matched {} of {} lines", counts.matched, counts.lines);
    if raw.is_empty() {
        return Err(AnalysisError::NoMatches);
    }
    let bound = bind_layout(raw)?;
    let timed = attach_time(bound);
    counts.timed = timed.len();
    log::info!("{} rows have a valid timestamp", counts.timed);
    if timed.is_empty() {
        return Err(AnalysisError::NoValidTimestamps);
    }
    let mut readings: Vec<SensorReading> = timed
        .into_iter()
        .filter(|r| is_engaged(r, config))
        .collect();
    counts.kept = readings.len();
    log::info!(
        "contact-loss filter kept {} rows, dropped {}",
        counts.kept,
        counts.dropped_by_filter()
    );
    if readings.is_empty() {
        return Err(AnalysisError::EmptyAfterFilter);
    }
    for reading in &mut readings {
        reading.label = alarm_for(reading.mq7, config.alarm_threshold);
    }
    counts.alarms = readings
        .iter()
        .filter(|r| r.label == AlarmLabel::Alarm)
        .count();
    log::info!("relabeled {} alarm points", counts.alarms);
    Ok(RelabelOutcome { readings, counts })
}
/// Index of the reading with the highest MQ7 value; first one wins on ties.
pub fn peak_index(readings: &[SensorReading]) -> Option<usize> {
    readings
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, r)| match best {
            Some((_, v)) if v >= r.mq7 => best,
            _ => Some((idx, r.mq7)),
        })
        .map(|(idx, _)| idx)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn reading(mq4: f64, mq7: f64, pm25: f64) -> SensorReading {
        SensorReading {
            time: timefmt::parse_timestamp("10:00:00").unwrap(),
            mq4,
            mq3: 0.0,
            mq7,
            mq135: 0.0,
            mq136: 0.0,
            temp: 25.0,
            hum: 50.0,
            pm25,
            raw_label: None,
            label: AlarmLabel::Normal,
        }
    }
    fn capture(lines: &[&str]) -> LogText {
        LogText {
            encoding: "UTF-8",
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }
    #[test]
    fn contact_filter_needs_both_channels() {
        let config = RelabelConfig::default();
        assert!(!is_engaged(&reading(150.0, 0.0, 60.0), &config));
        assert!(is_engaged(&reading(250.0, 0.0, 60.0), &config));
        assert!(!is_engaged(&reading(250.0, 0.0, 40.0), &config));
    }
    #[test]
    fn alarm_threshold_is_strict() {
        assert_eq!(alarm_for(999.0, 1000.0), AlarmLabel::Normal);
        assert_eq!(alarm_for(1000.0, 1000.0), AlarmLabel::Normal);
        assert_eq!(alarm_for(1001.0, 1000.0), AlarmLabel::Alarm);
    }
    #[test]
    fn layouts_outside_eight_or_nine_fail() {
        let rows = vec![RawRow {
            line_no: 7,
            timestamp: "10:00:00".into(),
            values: vec![0.0; 10],
        }];
        assert!(matches!(
            bind_layout(rows),
            Err(AnalysisError::UnsupportedLayout { line: 7, fields: 10 })
        ));
    }
    #[test]
    fn nine_field_rows_keep_the_device_label() {
        let log = capture(&["[10:00:00.000100]收←◆300,1,1200,1,1,25,50,80,0"]);
        let outcome = process(&log, &RelabelConfig::default()).unwrap();
        let r = &outcome.readings[0];
        assert_eq!(r.raw_label, Some(0.0));
        assert_eq!(r.label, AlarmLabel::Alarm);
    }
    #[test]
    fn full_pipeline_counts_each_stage() {
        let log = capture(&[
            "header line",
            "[10:00:00.100000]收←◆300,1,999,1,1,25,50,80",
            "[10:00:01.100000]收←◆300,1,1001,1,1,25,50,80",
            "[10:00:02]收←◆150,1,5000,1,1,25,50,80",
            "[garbled]收←◆300,1,5000,1,1,25,50,80",
            "[10:00:03]收←◆300,1,5000,1,1,25,50,40",
        ]);
        let outcome = process(&log, &RelabelConfig::default()).unwrap();
        assert_eq!(
            outcome.counts,
            StageCounts {
                lines: 6,
                matched: 5,
                timed: 4,
                kept: 2,
                alarms: 1,
            }
        );
        let labels: Vec<_> = outcome.readings.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![AlarmLabel::Normal, AlarmLabel::Alarm]);
        assert_eq!(outcome.counts.dropped_by_filter(), 2);
    }
    #[test]
    fn empty_stages_report_distinct_errors() {
        let config = RelabelConfig::default();
        assert!(matches!(
            process(&capture(&["no data"]), &config),
            Err(AnalysisError::NoMatches)
        ));
        assert!(matches!(
            process(&capture(&["[??] 1,2,3,4,5,6,7,8"]), &config),
            Err(AnalysisError::NoValidTimestamps)
        ));
        assert!(matches!(
            process(&capture(&["[10:00:00] 1,2,3,4,5,6,7,8"]), &config),
            Err(AnalysisError::EmptyAfterFilter)
        ));
    }
    #[test]
    fn peak_prefers_first_maximum() {
        let rows = vec![
            reading(300.0, 10.0, 60.0),
            reading(300.0, 30.0, 60.0),
            reading(300.0, 30.0, 60.0),
        ];
        assert_eq!(peak_index(&rows), Some(1));
        assert_eq!(peak_index(&[]), None);
    }
}
