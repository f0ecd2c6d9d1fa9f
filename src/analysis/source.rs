use std::borrow::Cow;
use std::path::Path;
use encoding_rs::{Encoding, GB18030, GBK, UTF_8, WINDOWS_1252};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::analysis::AnalysisError;
/// Encodings tried in order when reading serial-monitor captures.
/// Windows-1252 stands in for the host "ANSI" code page and never fails.
const FALLBACK_ENCODINGS: [&Encoding; 4] = [UTF_8, GBK, GB18030, WINDOWS_1252];
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(.*?)\][^0-9\-]*([0-9.,\-]+)").expect("static pattern is valid")
});
/// Minimum number of numeric fields a matched line must carry.
pub const MIN_FIELDS: usize = 8;
/// A decoded text file, split into lines.
#[derive(Clone, Debug)]
pub struct LogText {
    pub encoding: &'static str,
    pub lines: Vec<String>,
}
/// One regex-matched log line: the bracketed token and its numeric payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRow {
    pub line_no: usize,
    pub timestamp: String,
    pub values: Vec<f64>,
}
/// Read a whole capture, trying each fallback encoding in turn.
pub fn read_log(path: &Path) -> Result<LogText, AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    let (encoding, text) =
        decode_with_fallback(&bytes).ok_or_else(|| AnalysisError::Undecodable {
            path: path.to_path_buf(),
        })?;
    let lines = text.lines().map(str::to_owned).collect();
    Ok(LogText { encoding, lines })
}
/// Decode `bytes` with the first encoding that accepts them without loss.
pub fn decode_with_fallback(bytes: &[u8]) -> Option<(&'static str, Cow<'_, str>)> {
    for encoding in FALLBACK_ENCODINGS {
        let decoded = if encoding == UTF_8 {
            let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            encoding.decode_without_bom_handling_and_without_replacement(body)
        } else {
            encoding.decode_without_bom_handling_and_without_replacement(bytes)
        };
        if let Some(text) = decoded {
            log::debug!("decoded capture as {}", encoding.name());
            return Some((encoding.name(), text));
        }
    }
    None
}
/// Extract `[timestamp] ... v1,v2,...` from a line.
///
/// Returns `None` when the pattern does not match, any field is not a
/// number, or fewer than [`MIN_FIELDS`] values were found.
pub fn parse_line(line_no: usize, line: &str) -> Option<RawRow> {
    let caps = LINE_PATTERN.captures(line)?;
    let timestamp = caps.get(1)?.as_str().to_string();
    let values = caps
        .get(2)?
        .as_str()
        .split(',')
        .filter(|piece| !piece.trim().is_empty())
        .map(|piece| piece.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if values.len() < MIN_FIELDS {
        return None;
    }
    Some(RawRow {
        line_no,
        timestamp,
        values,
    })
}
/// Run [`parse_line`] over every line, numbering lines from 1.
pub fn parse_rows(lines: &[String]) -> Vec<RawRow> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let row = parse_line(idx + 1, line);
            if row.is_none() && !line.trim().is_empty() {
                log::debug!("skipping line {}: no `[time] values` payload", idx + 1);
            }
            row
        })
        .collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bracketed_line_with_eight_fields_parses() {
        let row = parse_line(
            1,
            "[12:30:01.250]收←◆310,120,980,400,150,24.5,61.0,75",
        )
        .unwrap();
        assert_eq!(row.timestamp, "12:30:01.250");
        assert_eq!(
            row.values,
            vec![310.0, 120.0, 980.0, 400.0, 150.0, 24.5, 61.0, 75.0]
        );
    }
    #[test]
    fn short_payload_is_rejected() {
        assert!(parse_line(1, "[12:30:01]收←◆310,120,980,400,150,24.5,61.0").is_none());
    }
    #[test]
    fn lines_without_brackets_are_rejected() {
        assert!(parse_line(1, "310,120,980,400,150,24.5,61.0,75,0").is_none());
        assert!(parse_line(1, "").is_none());
    }
    #[test]
    fn malformed_number_drops_the_line() {
        assert!(parse_line(1, "[12:30:01] 1,2,3,4,5,6,7,8-9").is_none());
    }
    #[test]
    fn trailing_comma_is_ignored() {
        let row = parse_line(4, "[t] 1,2,3,4,5,6,7,8,").unwrap();
        assert_eq!(row.line_no, 4);
        assert_eq!(row.values.len(), 8);
    }
    #[test]
    fn parse_rows_numbers_lines_from_one() {
        let lines = vec![
            "garbage".to_string(),
            "[10:00:00] 1,2,3,4,5,6,7,8,0".to_string(),
        ];
        let rows = parse_rows(&lines);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line_no, 2);
    }
    #[test]
    fn utf8_with_bom_is_decoded() {
        let (encoding, text) = decode_with_fallback("\u{feff}[a] 1".as_bytes()).unwrap();
        assert_eq!(encoding, "UTF-8");
        assert_eq!(text, "[a] 1");
    }
    #[test]
    fn gbk_capture_falls_back() {
        let (encoded, _, _) = GBK.encode("[12:00:00]收←◆1,2");
        let (encoding, text) = decode_with_fallback(&encoded).unwrap();
        assert_eq!(encoding, "GBK");
        assert!(text.contains("收"));
    }
    #[test]
    fn missing_file_is_reported() {
        let path = std::env::temp_dir().join("mqsense-source-does-not-exist.txt");
        assert!(matches!(read_log(&path), Err(AnalysisError::FileNotFound(_))));
    }
}
