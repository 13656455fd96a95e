use crate::catalog::{AssessmentField, FieldCatalog};
use std::sync::Arc;

/// One source record re-keyed by the catalog's canonical names.
///
/// Every catalog field is present; a field the source record did not reach is
/// the empty string. Rows are immutable once built.
#[derive(Clone, Debug)]
pub struct CanonicalRow {
    catalog: Arc<FieldCatalog>,
    values: Box<[String]>,
}

impl CanonicalRow {
    /// Map a raw record through the catalog, trimming each field.
    pub fn from_record<S: AsRef<str>>(catalog: Arc<FieldCatalog>, record: &[S]) -> Self {
        let values = catalog
            .fields()
            .iter()
            .map(|f| {
                record
                    .get(f.ordinal)
                    .map(|v| v.as_ref().trim().to_string())
                    .unwrap_or_default()
            })
            .collect();
        Self { catalog, values }
    }

    /// Build a row from `(canonical name, value)` pairs; unnamed fields stay empty
    /// and names outside the catalog are ignored.
    pub fn from_named<'a, I>(catalog: Arc<FieldCatalog>, named: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = vec![String::new(); catalog.len()].into_boxed_slice();
        for (name, value) in named {
            if let Some(slot) = catalog.slot(name) {
                values[slot] = value.trim().to_string();
            }
        }
        Self { catalog, values }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Value for a canonical name, or `None` when the catalog lacks that name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.catalog.slot(name).map(|slot| self.values[slot].as_str())
    }

    /// Value of a standard assessment field; empty when the catalog lacks it.
    pub fn field(&self, field: AssessmentField) -> &str {
        self.get(field.name()).unwrap_or("")
    }

    pub fn student_id(&self) -> &str {
        self.field(AssessmentField::StudentId)
    }

    /// `(canonical name, value)` in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.catalog
            .names()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl PartialEq for CanonicalRow {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.catalog, &other.catalog) || self.catalog == other.catalog)
            && self.values == other.values
    }
}

impl Eq for CanonicalRow {}

#[cfg(feature = "serde")]
impl serde::Serialize for CanonicalRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
