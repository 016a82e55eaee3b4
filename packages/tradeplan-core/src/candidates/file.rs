//! Persisted candidate list in `ticker,buy_price` form.
//!
//! ```text
//! ticker,buy_price
//! AAPL,145.32
//! MSFT,198.75
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::types::TradeCandidate;
use crate::{Error, Result};

pub const TICKER_FIELD: &str = "ticker";
pub const BUY_PRICE_FIELD: &str = "buy_price";

/// Read candidates from a file on disk.
pub fn read_candidates(path: impl AsRef<Path>) -> Result<Vec<TradeCandidate>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let candidates = parse_candidates(BufReader::new(file))?;
    tracing::debug!(
        count = candidates.len(),
        path = %path.display(),
        "read trade candidates"
    );
    Ok(candidates)
}

/// Write candidates to a file on disk, replacing any existing content.
pub fn write_candidates(path: impl AsRef<Path>, candidates: &[TradeCandidate]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    format_candidates(&mut writer, candidates)?;
    writer.flush()?;
    tracing::info!(
        count = candidates.len(),
        path = %path.display(),
        "exported trade candidates"
    );
    Ok(())
}

/// Parse candidates from any buffered reader.
///
/// Columns are located by header name, so their order does not matter and
/// extra columns are ignored. Blank lines are skipped. Input without a header
/// yields an empty list.
pub fn parse_candidates(reader: impl BufRead) -> Result<Vec<TradeCandidate>> {
    let mut lines = reader.lines().enumerate();

    let (header_line, header) = loop {
        match lines.next() {
            Some((idx, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break (idx + 1, line);
                }
            }
            None => return Ok(Vec::new()),
        }
    };

    let columns = split_record(header.trim_start_matches('\u{feff}'));
    let ticker_idx = column_index(&columns, TICKER_FIELD, header_line)?;
    let price_idx = column_index(&columns, BUY_PRICE_FIELD, header_line)?;

    let mut candidates = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields = split_record(&line);

        let ticker = field(&fields, ticker_idx, TICKER_FIELD, line_no)?;
        let raw_price = field(&fields, price_idx, BUY_PRICE_FIELD, line_no)?;
        let price: f64 = raw_price.parse().map_err(|_| Error::InvalidRecord {
            line: line_no,
            message: format!("buy_price '{}' is not a number", raw_price),
        })?;

        let candidate = TradeCandidate::new(ticker, price).map_err(|e| Error::InvalidRecord {
            line: line_no,
            message: e.to_string(),
        })?;
        candidates.push(candidate);
    }

    Ok(candidates)
}

/// Write the header and one row per candidate.
pub fn format_candidates(mut writer: impl Write, candidates: &[TradeCandidate]) -> Result<()> {
    writeln!(writer, "{},{}", TICKER_FIELD, BUY_PRICE_FIELD)?;
    for candidate in candidates {
        // f64 Display is the shortest form that parses back to the same value.
        writeln!(
            writer,
            "{},{}",
            escape_field(&candidate.ticker),
            candidate.reference_price
        )?;
    }
    Ok(())
}

fn column_index(columns: &[String], name: &str, line: usize) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| Error::InvalidRecord {
            line,
            message: format!("missing '{}' column", name),
        })
}

fn field<'a>(fields: &'a [String], idx: usize, name: &str, line: usize) -> Result<&'a str> {
    fields
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidRecord {
            line,
            message: format!("missing '{}' value", name),
        })
}

/// Split one record into trimmed fields, honouring double quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn parse(text: &str) -> Result<Vec<TradeCandidate>> {
        parse_candidates(Cursor::new(text))
    }

    #[test]
    fn test_parse_candidates() {
        let list = parse("ticker,buy_price\nAMZN,215.0\nTGT,139\n").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ticker, "AMZN");
        assert_eq!(list[0].reference_price, 215.0);
        assert_eq!(list[1].ticker, "TGT");
        assert_eq!(list[1].reference_price, 139.0);
    }

    #[test]
    fn test_parse_reordered_and_extra_columns() {
        let list = parse("name,buy_price,ticker\nApple Inc.,145.32,AAPL\n").unwrap();
        assert_eq!(list, vec![TradeCandidate::new("AAPL", 145.32).unwrap()]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let list = parse("\nticker , buy_price\r\n\n  MSFT ,  198.75 \r\n\n").unwrap();
        assert_eq!(list, vec![TradeCandidate::new("MSFT", 198.75).unwrap()]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let list = parse("ticker,buy_price\n\"BRK,B\",\"412.5\"\n").unwrap();
        assert_eq!(list[0].ticker, "BRK,B");
        assert_eq!(list[0].reference_price, 412.5);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("ticker,buy_price\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_column() {
        let result = parse("symbol,buy_price\nAAPL,145.32\n");
        assert!(matches!(result, Err(Error::InvalidRecord { line: 1, .. })));
    }

    #[test]
    fn test_parse_bad_price_reports_line() {
        let result = parse("ticker,buy_price\nAAPL,145.32\nMSFT,n/a\n");
        assert!(matches!(result, Err(Error::InvalidRecord { line: 3, .. })));

        let result = parse("ticker,buy_price\nAAPL,-3\n");
        assert!(matches!(result, Err(Error::InvalidRecord { line: 2, .. })));

        let result = parse("ticker,buy_price\n,10\n");
        assert!(matches!(result, Err(Error::InvalidRecord { line: 2, .. })));
    }

    #[test]
    fn test_parse_short_row() {
        let result = parse("ticker,buy_price\nAAPL\n");
        assert!(matches!(result, Err(Error::InvalidRecord { line: 2, .. })));
    }

    #[test]
    fn test_format_candidates() {
        let list = vec![
            TradeCandidate::new("AAPL", 145.32).unwrap(),
            TradeCandidate::new("MSFT", 200.0).unwrap(),
        ];
        let mut out = Vec::new();
        format_candidates(&mut out, &list).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ticker,buy_price\nAAPL,145.32\nMSFT,200\n"
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies_to_trade.csv");

        let list = vec![
            TradeCandidate::new("AAPL", 145.32).unwrap(),
            TradeCandidate::new("BRK,B", 412.518).unwrap(),
            TradeCandidate::new("NVDA", 0.1 + 0.2).unwrap(),
        ];

        write_candidates(&path, &list).unwrap();
        let read_back = read_candidates(&path).unwrap();

        assert_eq!(read_back, list);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_candidates(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
