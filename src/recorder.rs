use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::analysis::{timefmt, AnalysisError};
use crate::types::{SensorReading, CLEANED_COLUMNS};

// Excel 打开时靠 BOM 识别 UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 把清洗、打标后的读数写成 CSV (UTF-8 with BOM)
pub struct DatasetRecorder<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl DatasetRecorder<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, AnalysisError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> DatasetRecorder<W> {
    pub fn new(mut inner: W) -> Result<Self, AnalysisError> {
        inner.write_all(UTF8_BOM)?;
        let mut writer = csv::Writer::from_writer(inner);
        // 写入表头: Time, MQ4 ... PM25, Label
        writer.write_record(CLEANED_COLUMNS)?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_reading(&mut self, r: &SensorReading) -> Result<(), AnalysisError> {
        let time = r.time.format(timefmt::CSV_TIME_FORMAT).to_string();
        let fields = [
            time,
            r.mq4.to_string(),
            r.mq3.to_string(),
            r.mq7.to_string(),
            r.mq135.to_string(),
            r.mq136.to_string(),
            r.temp.to_string(),
            r.hum.to_string(),
            r.pm25.to_string(),
            r.label.code().to_string(),
        ];
        self.writer.write_record(&fields)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all(&mut self, readings: &[SensorReading]) -> Result<(), AnalysisError> {
        for r in readings {
            self.write_reading(r)?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W, AnalysisError> {
        self.writer
            .into_inner()
            .map_err(|e| AnalysisError::Io(e.into_error()))
    }
}
