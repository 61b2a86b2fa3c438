// claimsguard-core/src/domain/dataset/table.rs

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::fmt;

/// Formats accepted when a cell is read as a date without an explicit format.
/// Only unambiguous ISO-style layouts: anything else needs normalization first.
const LENIENT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const LENIENT_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// A single cell of a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Reads the cell as a date, coercing unreadable values to `None`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_lenient_date(s),
            _ => None,
        }
    }

    /// Text rendering, used both for key identity and for persistence. Loaded
    /// cells render exactly as read. `None` means the cell is missing.
    pub fn render(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            Value::Null => None,
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, ""),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

pub fn parse_lenient_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            LENIENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TableError {
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// In-memory, row-major table with named columns.
///
/// A `Table` is owned by exactly one validation pass at a time; strategies take it
/// by value and hand back the (possibly) corrected version.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Result<Self, TableError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].contains(c) {
                return Err(TableError::DuplicateColumn(c.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a table from raw text cells (as read from CSV). Cells keep their
    /// original text; numbers and dates are parsed on read by the rules that need them.
    pub fn from_text_rows<S: Into<String>>(
        columns: Vec<S>,
        raw_rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(columns)?;
        let width = table.columns.len();

        for (r, raw) in raw_rows.into_iter().enumerate() {
            if raw.len() != width {
                return Err(TableError::RowWidth {
                    row: r,
                    expected: width,
                    actual: raw.len(),
                });
            }
            table.rows.push(
                raw.into_iter()
                    .map(|cell| match cell {
                        Some(text) if !text.trim().is_empty() => Value::Text(text),
                        _ => Value::Null,
                    })
                    .collect(),
            );
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the cells of one column, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Replaces a cell; returns `false` when the row or column doesn't exist.
    pub fn set(&mut self, row: usize, column: &str, value: Value) -> bool {
        match (self.column_index(column), self.rows.get_mut(row)) {
            (Some(idx), Some(r)) => {
                r[idx] = value;
                true
            }
            _ => false,
        }
    }

    /// Keeps only the rows whose flag is `true`. `keep` must be one flag per row.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.rows.retain(|_| flags.next().copied().unwrap_or(true));
    }

    /// Flags every row whose key already appeared on an earlier row (keep-first).
    /// Missing key cells compare equal to each other.
    pub fn duplicate_flags(&self, key_columns: &[usize]) -> Vec<bool> {
        let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .map(|row| {
                let key = key_columns.iter().map(|&c| row[c].render()).collect();
                !seen.insert(key)
            })
            .collect()
    }
}
