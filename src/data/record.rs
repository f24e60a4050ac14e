//! Record Module
//! Row and file-record types shared by the registry, aggregator and table
//! engine.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Column names with dashboard semantics, when a report carries them.
/// The schema itself is discovered per file, never fixed in advance.
pub mod columns {
    pub const MUNICIPALITY: &str = "Municipios";
    pub const LOSS: &str = "Perda";
    pub const DISTRIBUTED_VOLUME: &str = "VD";
    pub const DIRECTORATE: &str = "Diretoria";
    pub const MANAGEMENT: &str = "Gerencia";
    pub const LOCALITY: &str = "Localidade";
    pub const LOSS_INDEX_DEVIATION: &str = "IPDDesvio";
}

/// One report row: an ordered mapping from column name to raw string value.
///
/// Order matters because the persisted layout stores rows as plain JSON
/// objects with no separate column list; the column order of a reloaded
/// file is whatever order its first row's keys carry. Lookups are linear
/// scans, which is fine at spreadsheet scale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a column, or `None` when the column is absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Column names in their original order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Raw cell values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// Rows serialize as JSON objects and keep key order on the way back in, so
// the persisted `data` array round-trips the discovered schema.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, String>()? {
                    cells.push(entry);
                }
                Ok(Row { cells })
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Report category, persisted as a snake_case `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Analysis,
    DeviationReport,
    DistributedVolume,
    ConsumedVolume,
    NegativeLoss,
    Generic,
}

/// One ingested report file. Immutable once created: the registry replaces
/// records wholesale and never patches them in place.
///
/// The serde layout matches the persisted registry format exactly:
/// `{id, name, type, date, data}` with `date` as an ISO-8601 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(rename = "date")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "data")]
    pub rows: Vec<Row>,
}

impl FileRecord {
    /// Column set of this file, discovered from its first row.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.column_names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> FileRecord {
        FileRecord {
            id: "f-1".into(),
            name: "perdas_jan.csv".into(),
            kind: FileKind::NegativeLoss,
            uploaded_at: Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
            rows: vec![Row::from_pairs([
                ("Municipios", "Aracaju"),
                ("Perda", "-10,00"),
                ("VD", "100,00"),
            ])],
        }
    }

    #[test]
    fn row_lookup_and_order() {
        let row = Row::from_pairs([("B", "2"), ("A", "1")]);
        assert_eq!(row.get("A"), Some("1"));
        assert_eq!(row.get("C"), None);
        let names: Vec<_> = row.column_names().collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn record_round_trips_persisted_layout() {
        let record = sample_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "negative_loss");
        assert!(json["date"].as_str().unwrap().starts_with("2024-03-15T10:30:00"));
        assert_eq!(json["data"][0]["Perda"], "-10,00");

        let back: FileRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.uploaded_at, record.uploaded_at);
        assert_eq!(back.rows, record.rows);
    }

    #[test]
    fn row_order_survives_serde() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns(), vec!["Municipios", "Perda", "VD"]);
    }
}
