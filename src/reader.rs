//! CSV reading with encoding fallback.
//!
//! Source files arrive in whatever encoding the upstream tool saved them in,
//! typically UTF-8 (with or without a byte-order mark) or one of the legacy
//! Korean code pages. [`read_table`] tries each candidate in
//! [`SourceEncoding::FALLBACK_ORDER`] and keeps the first one that both decodes
//! cleanly and parses as a table.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{EvalError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A candidate text encoding for source files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8 with an optional leading byte-order mark
    Utf8Sig,
    /// Plain UTF-8
    Utf8,
    /// Windows code page 949 (Unified Hangul Code)
    Cp949,
    /// EUC-KR
    EucKr,
}

impl SourceEncoding {
    /// Order in which encodings are attempted.
    pub const FALLBACK_ORDER: [Self; 4] = [Self::Utf8Sig, Self::Utf8, Self::Cp949, Self::EucKr];

    /// Conventional label for logs and error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utf8Sig => "utf-8-sig",
            Self::Utf8 => "utf-8",
            Self::Cp949 => "cp949",
            Self::EucKr => "euc-kr",
        }
    }

    /// Decode `bytes`, failing on any malformed sequence.
    ///
    /// `encoding_rs` implements EUC-KR as the WHATWG superset, which is
    /// code page 949, so both Korean candidates share one decoder.
    pub fn decode(self, bytes: &[u8]) -> std::result::Result<String, String> {
        match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                String::from_utf8(body.to_vec()).map_err(|e| e.to_string())
            }
            Self::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
            Self::Cp949 | Self::EucKr => encoding_rs::EUC_KR
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(std::borrow::Cow::into_owned)
                .ok_or_else(|| "malformed multi-byte sequence".to_string()),
        }
    }
}

/// A parsed table: header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header labels in file order
    pub headers: Vec<String>,
    /// Data rows, possibly ragged
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the column at `index`, one per row. Missing cells read as `""`.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }

    /// Values of the first column.
    #[must_use]
    pub fn first_column(&self) -> Vec<String> {
        self.column(0)
    }
}

/// A table together with the encoding that produced it
#[derive(Debug, Clone)]
pub struct DecodedTable {
    /// Parsed table
    pub table: Table,
    /// Encoding that succeeded
    pub encoding: SourceEncoding,
}

/// Parse decoded CSV text into a [`Table`]. The first record is the header.
///
/// Rows may be shorter or longer than the header; absent cells are left for
/// [`Table::column`] to fill with `""`.
pub fn parse_table(text: &str) -> std::result::Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(ToString::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Read `path`, trying every encoding in [`SourceEncoding::FALLBACK_ORDER`].
///
/// An attempt fails if decoding hits a malformed sequence or the text does not
/// parse as CSV. When every attempt fails the error lists all of them.
pub fn read_table(path: &Path) -> Result<DecodedTable> {
    let bytes = fs::read(path).map_err(|e| EvalError::SourceUnreadable {
        path: path.to_path_buf(),
        attempts: vec![format!("read: {e}")],
    })?;

    let mut attempts = Vec::new();
    for encoding in SourceEncoding::FALLBACK_ORDER {
        let parsed = encoding
            .decode(&bytes)
            .and_then(|text| parse_table(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(table) => {
                info!(
                    path = %path.display(),
                    encoding = encoding.label(),
                    rows = table.len(),
                    "Loaded CSV"
                );
                return Ok(DecodedTable { table, encoding });
            }
            Err(reason) => {
                debug!(path = %path.display(), encoding = encoding.label(), %reason, "Decode attempt failed");
                attempts.push(format!("{}: {reason}", encoding.label()));
            }
        }
    }

    Err(EvalError::SourceUnreadable {
        path: path.to_path_buf(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped() {
        let decoded = SourceEncoding::Utf8Sig
            .decode(b"\xEF\xBB\xBFtext\nvalue\n")
            .unwrap();
        assert_eq!(decoded, "text\nvalue\n");
    }

    #[test]
    fn test_utf8_rejects_legacy_bytes() {
        let (bytes, _, _) = encoding_rs::EUC_KR.encode("뉴스");
        assert!(SourceEncoding::Utf8.decode(&bytes).is_err());
        assert_eq!(SourceEncoding::Cp949.decode(&bytes).unwrap(), "뉴스");
    }

    #[test]
    fn test_parse_table_skips_blank_lines() {
        let table = parse_table("a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.first_column(), vec!["1", "3"]);
    }

    #[test]
    fn test_parse_table_pads_short_rows() {
        let table = parse_table("a,b\n1,2\n3\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column(1), vec!["2", ""]);
    }
}
