//! Lightweight logical value/column representation handed over by file readers.
//!
//! A `RowBatch` is one decoded page: a set of equally long columns of
//! `Scalar`s. Readers convert from their physical encoding before the
//! delete machinery sees the data.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::schema::DataType;

/// A single typed value.
///
/// Equality and hashing are defined by logical value:
/// - `Null` equals only `Null`.
/// - Floats compare by bit pattern with every NaN folded into one canonical
///   NaN, so `NaN == NaN` and `0.0 != -0.0`.
/// - `Struct` and `List` compare element-wise, recursively.
/// - Values of different variants are never equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
    Date32(i32),
    Timestamp(i64),
    Decimal128(i128),
    Struct(Vec<Scalar>),
    List(Vec<Scalar>),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Whether this value can legally appear in a column of type `dt`.
    ///
    /// `Null` fits every type; nested values are checked recursively.
    pub fn matches_type(&self, dt: &DataType) -> bool {
        match (self, dt) {
            (Scalar::Null, _) => true,
            (Scalar::Bool(_), DataType::Boolean)
            | (Scalar::I32(_), DataType::Int32)
            | (Scalar::I64(_), DataType::Int64)
            | (Scalar::F32(_), DataType::Float32)
            | (Scalar::F64(_), DataType::Float64)
            | (Scalar::Str(_), DataType::Utf8)
            | (Scalar::Bin(_), DataType::Binary)
            | (Scalar::Date32(_), DataType::Date32)
            | (Scalar::Timestamp(_), DataType::Timestamp)
            | (Scalar::Decimal128(_), DataType::Decimal128 { .. }) => true,
            (Scalar::Struct(values), DataType::Struct(fields)) => {
                values.len() == fields.len()
                    && values
                        .iter()
                        .zip(fields)
                        .all(|(v, f)| v.matches_type(&f.data_type))
            }
            (Scalar::List(values), DataType::List(element)) => {
                values.iter().all(|v| v.matches_type(&element.data_type))
            }
            _ => false,
        }
    }

    /// Variant tag used for hashing; also separates variants in `eq`.
    fn tag(&self) -> u8 {
        use Scalar::*;
        match self {
            Null => 0,
            Bool(_) => 1,
            I32(_) => 2,
            I64(_) => 3,
            F32(_) => 4,
            F64(_) => 5,
            Str(_) => 6,
            Bin(_) => 7,
            Date32(_) => 8,
            Timestamp(_) => 9,
            Decimal128(_) => 10,
            Struct(_) => 11,
            List(_) => 12,
        }
    }
}

fn f32_bits(f: f32) -> u32 {
    if f.is_nan() {
        f32::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

fn f64_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (I32(a), I32(b)) | (Date32(a), Date32(b)) => a == b,
            (I64(a), I64(b)) | (Timestamp(a), Timestamp(b)) => a == b,
            (F32(a), F32(b)) => f32_bits(*a) == f32_bits(*b),
            (F64(a), F64(b)) => f64_bits(*a) == f64_bits(*b),
            (Str(a), Str(b)) => a == b,
            (Bin(a), Bin(b)) => a == b,
            (Decimal128(a), Decimal128(b)) => a == b,
            (Struct(a), Struct(b)) | (List(a), List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Scalar::*;

        // Write type discriminant first
        state.write_u8(self.tag());

        match self {
            Null => {}
            Bool(b) => b.hash(state),
            I32(i) | Date32(i) => i.hash(state),
            I64(i) | Timestamp(i) => i.hash(state),
            F32(f) => f32_bits(*f).hash(state),
            F64(f) => f64_bits(*f).hash(state),
            Str(s) => s.hash(state),
            Bin(b) => b.hash(state),
            Decimal128(d) => d.hash(state),
            // Vec's Hash writes the length prefix, so [a, b] and [[a], b] differ.
            Struct(values) | List(values) => values.hash(state),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I32(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Minimal column representation. Replace with Arrow arrays downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One decoded page of rows, stored column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Value at (`column`, `row`), if both are in range.
    pub fn value(&self, column: usize, row: usize) -> Option<&Scalar> {
        self.columns.get(column).and_then(|c| c.values.get(row))
    }

    /// Check that every column has the same number of rows.
    pub fn validate(&self) -> Result<(), String> {
        let rows = self.num_rows();
        match self.columns.iter().find(|c| c.len() != rows) {
            Some(col) => Err(format!(
                "column '{}' has {} rows, expected {}",
                col.name,
                col.len(),
                rows
            )),
            None => Ok(()),
        }
    }

    /// Keep only the rows whose entry in `keep` is true. Column order and
    /// row order are preserved.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<RowBatch, String> {
        if keep.len() != self.num_rows() {
            return Err(format!(
                "selection has {} entries, batch has {} rows",
                keep.len(),
                self.num_rows()
            ));
        }

        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: col
                    .values
                    .iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| v.clone())
                    .collect(),
            })
            .collect();

        Ok(RowBatch { columns })
    }
}
