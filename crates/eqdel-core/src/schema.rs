//! Logical schema types keyed by stable field IDs. Pure data; no Arrow dependency here.
//!
//! Column names and physical positions are informational only. Two schemas
//! describe the same logical column iff they carry the same `FieldId`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{hash_serde, Hash256};
use crate::id::FieldId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
    /// Days since the Unix epoch.
    Date32,
    /// Microseconds since the Unix epoch.
    Timestamp,
    Decimal128 {
        precision: u8,
        scale: i8,
    },
    Struct(Vec<Field>),
    List(Box<Field>),
}

impl DataType {
    pub fn is_nested(&self) -> bool {
        matches!(self, DataType::Struct(_) | DataType::List(_))
    }

    pub fn struct_fields(&self) -> Option<&[Field]> {
        match self {
            DataType::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(
        id: impl Into<FieldId>,
        name: impl Into<String>,
        data_type: DataType,
        nullable: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            nullable,
        }
    }

    /// Returns true if `id` names this field or any field nested under it.
    fn contains_id(&self, id: FieldId) -> bool {
        if self.id == id {
            return true;
        }
        match &self.data_type {
            DataType::Struct(children) => children.iter().any(|c| c.contains_id(id)),
            DataType::List(element) => element.contains_id(id),
            _ => false,
        }
    }

    fn collect_leaf_ids(&self, out: &mut Vec<FieldId>) {
        match &self.data_type {
            DataType::Struct(children) if !children.is_empty() => {
                children.iter().for_each(|c| c.collect_leaf_ids(out))
            }
            _ => out.push(self.id),
        }
    }

    fn collect_ids(&self, out: &mut Vec<FieldId>) {
        out.push(self.id);
        match &self.data_type {
            DataType::Struct(children) => children.iter().for_each(|c| c.collect_ids(out)),
            DataType::List(element) => element.collect_ids(out),
            _ => {}
        }
    }

    /// Narrow this field to the selected IDs.
    ///
    /// - Field itself selected: kept whole.
    /// - Struct with selected descendants: kept with only those children.
    /// - List with any selected descendant: kept whole (element projection
    ///   is not supported).
    fn select(&self, ids: &HashSet<FieldId>) -> Option<Field> {
        if ids.contains(&self.id) {
            return Some(self.clone());
        }
        match &self.data_type {
            DataType::Struct(children) => {
                let selected: Vec<Field> = children.iter().filter_map(|c| c.select(ids)).collect();
                if selected.is_empty() {
                    None
                } else {
                    Some(Field {
                        data_type: DataType::Struct(selected),
                        ..self.clone()
                    })
                }
            }
            DataType::List(_) => ids
                .iter()
                .any(|id| self.contains_id(*id))
                .then(|| self.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    /// Top-level field with the given ID.
    pub fn field_by_id(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Top-level position of the field with the given ID.
    pub fn index_of_id(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Top-level field IDs, in schema order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|f| f.id).collect()
    }

    /// Every field ID in the schema, depth first.
    pub fn all_field_ids(&self) -> Vec<FieldId> {
        let mut out = Vec::new();
        self.fields.iter().for_each(|f| f.collect_ids(&mut out));
        out
    }

    /// IDs of the fields that carry values, depth first. Structs contribute
    /// their children instead of themselves; lists count as one leaf.
    pub fn leaf_field_ids(&self) -> Vec<FieldId> {
        let mut out = Vec::new();
        self.fields.iter().for_each(|f| f.collect_leaf_ids(&mut out));
        out
    }

    /// Reject schemas that reuse a field ID anywhere in the tree.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for id in self.all_field_ids() {
            if !seen.insert(id) {
                return Err(Error::Schema(format!("duplicate field id {id}")));
            }
        }
        Ok(())
    }

    /// Project this schema onto `ids`.
    ///
    /// Field order in the result follows this schema, never the order of
    /// `ids`. Every requested ID must exist somewhere in the schema.
    pub fn select<I>(&self, ids: I) -> Result<Schema>
    where
        I: IntoIterator<Item = FieldId>,
    {
        let ids: HashSet<FieldId> = ids.into_iter().collect();
        let known: HashSet<FieldId> = self.all_field_ids().into_iter().collect();

        let mut missing: Vec<FieldId> = ids.difference(&known).copied().collect();
        if !missing.is_empty() {
            missing.sort();
            let listed: Vec<String> = missing.iter().map(|id| id.get().to_string()).collect();
            return Err(Error::Schema(format!(
                "field ids [{}] not found in schema",
                listed.join(", ")
            )));
        }

        Ok(Schema {
            fields: self.fields.iter().filter_map(|f| f.select(&ids)).collect(),
        })
    }

    /// Stable content hash of the schema (IDs, names, types, nullability).
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(self)
    }
}
