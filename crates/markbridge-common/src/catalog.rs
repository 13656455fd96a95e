//! Canonical field vocabulary.
//!
//! A [`FieldCatalog`] associates zero-based source ordinals with canonical
//! field names, and carries a header-text → canonical-name map used when a
//! worksheet header row is matched against the vocabulary. The catalog is a
//! plain value: callers build one (usually [`FieldCatalog::assessment`]) and
//! hand it to the filter, resolver and writers, so tests can substitute their
//! own.

use rustc_hash::FxHashMap;
use std::error::Error;
use std::fmt;

/// Trim and lowercase header text for catalog lookups.
pub fn normalize_header(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// Two fields were declared with the same source ordinal.
    DuplicateOrdinal(usize),
    /// Two fields were declared with the same canonical name.
    DuplicateName(String),
    /// A field name was empty after trimming.
    EmptyName { ordinal: usize },
    /// An alias pointed at a name the catalog does not define.
    UnknownField(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateOrdinal(ordinal) => {
                write!(f, "source ordinal {ordinal} is mapped more than once")
            }
            CatalogError::DuplicateName(name) => {
                write!(f, "canonical field '{name}' is declared more than once")
            }
            CatalogError::EmptyName { ordinal } => {
                write!(f, "field at source ordinal {ordinal} has an empty name")
            }
            CatalogError::UnknownField(name) => {
                write!(f, "alias refers to unknown canonical field '{name}'")
            }
        }
    }
}

impl Error for CatalogError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogField {
    pub ordinal: usize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldCatalog {
    /// Sorted by ordinal; row values are stored in this order.
    fields: Vec<CatalogField>,
    by_name: FxHashMap<String, usize>,
    /// Normalized header text -> slot in `fields`.
    headers: FxHashMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog from `(ordinal, name)` pairs.
    ///
    /// Every canonical name is registered as its own header alias.
    pub fn new<I, S>(fields: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut fields: Vec<CatalogField> = fields
            .into_iter()
            .map(|(ordinal, name)| CatalogField {
                ordinal,
                name: name.into().trim().to_string(),
            })
            .collect();
        fields.sort_by_key(|f| f.ordinal);

        let mut by_name = FxHashMap::default();
        let mut headers = FxHashMap::default();
        for (slot, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(CatalogError::EmptyName {
                    ordinal: field.ordinal,
                });
            }
            if slot > 0 && fields[slot - 1].ordinal == field.ordinal {
                return Err(CatalogError::DuplicateOrdinal(field.ordinal));
            }
            if by_name.insert(field.name.clone(), slot).is_some() {
                return Err(CatalogError::DuplicateName(field.name.clone()));
            }
            headers.insert(normalize_header(&field.name), slot);
        }

        Ok(Self {
            fields,
            by_name,
            headers,
        })
    }

    /// The sixteen-column assessment export vocabulary.
    pub fn assessment() -> Self {
        let fields = AssessmentField::ALL
            .iter()
            .enumerate()
            .map(|(ordinal, f)| (ordinal, f.name()));
        match Self::new(fields) {
            Ok(catalog) => catalog,
            // The static vocabulary has unique, non-empty names and ordinals.
            Err(err) => unreachable!("assessment catalog is invalid: {err}"),
        }
    }

    /// Register additional header text that resolves to `canonical`.
    pub fn with_alias(mut self, header: &str, canonical: &str) -> Result<Self, CatalogError> {
        let slot = *self
            .by_name
            .get(canonical)
            .ok_or_else(|| CatalogError::UnknownField(canonical.to_string()))?;
        self.headers.insert(normalize_header(header), slot);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[CatalogField] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Highest source ordinal the catalog reads, if any.
    pub fn max_ordinal(&self) -> Option<usize> {
        self.fields.last().map(|f| f.ordinal)
    }

    /// Storage slot of a canonical name (exact match).
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn field_at_ordinal(&self, ordinal: usize) -> Option<&CatalogField> {
        self.fields
            .binary_search_by_key(&ordinal, |f| f.ordinal)
            .ok()
            .map(|slot| &self.fields[slot])
    }

    /// Resolve worksheet header text, ignoring case and surrounding whitespace.
    pub fn lookup_header(&self, header: &str) -> Option<&CatalogField> {
        let key = normalize_header(header);
        if key.is_empty() {
            return None;
        }
        self.headers.get(&key).map(|slot| &self.fields[*slot])
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::assessment()
    }
}

/// Fields of the assessment export, in source-column order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssessmentField {
    LineType,
    CurriculumItemCode,
    CurriculumItemVersionNumber,
    CurriculumItemFullTitle,
    DeliveryYear,
    DeliveryStudyPeriodCode,
    DeliveryStudyPeriodDescription,
    DeliveryLocationCode,
    DeliveryLocationDescription,
    DeliveryNumber,
    StudentId,
    StudentStudyItemAttemptNumber,
    AssessmentId,
    TypeDescription,
    Description,
    Barcode,
}

impl AssessmentField {
    pub const ALL: [AssessmentField; 16] = [
        AssessmentField::LineType,
        AssessmentField::CurriculumItemCode,
        AssessmentField::CurriculumItemVersionNumber,
        AssessmentField::CurriculumItemFullTitle,
        AssessmentField::DeliveryYear,
        AssessmentField::DeliveryStudyPeriodCode,
        AssessmentField::DeliveryStudyPeriodDescription,
        AssessmentField::DeliveryLocationCode,
        AssessmentField::DeliveryLocationDescription,
        AssessmentField::DeliveryNumber,
        AssessmentField::StudentId,
        AssessmentField::StudentStudyItemAttemptNumber,
        AssessmentField::AssessmentId,
        AssessmentField::TypeDescription,
        AssessmentField::Description,
        AssessmentField::Barcode,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AssessmentField::LineType => "LineType",
            AssessmentField::CurriculumItemCode => "StudentStudyItemAssessmentCurriculumItemCode",
            AssessmentField::CurriculumItemVersionNumber => {
                "StudentStudyItemAssessmentCurriculumItemVersionNumber"
            }
            AssessmentField::CurriculumItemFullTitle => {
                "StudentStudyItemAssessmentCurriculumItemFullTitle"
            }
            AssessmentField::DeliveryYear => "StudentStudyItemAssessmentDeliveryYear",
            AssessmentField::DeliveryStudyPeriodCode => {
                "StudentStudyItemAssessmentDeliveryStudyPeriodCode"
            }
            AssessmentField::DeliveryStudyPeriodDescription => {
                "StudentStudyItemAssessmentDeliveryStudyPeriodDescription"
            }
            AssessmentField::DeliveryLocationCode => "StudentStudyItemAssessmentDeliveryLocationCode",
            AssessmentField::DeliveryLocationDescription => {
                "StudentStudyItemAssessmentDeliveryLocationDescription"
            }
            AssessmentField::DeliveryNumber => "StudentStudyItemAssessmentDeliveryNumber",
            AssessmentField::StudentId => "StudentStudyItemAssessmentStudentID",
            AssessmentField::StudentStudyItemAttemptNumber => {
                "StudentStudyItemAssessmentStudentStudyItemAttemptNumber"
            }
            AssessmentField::AssessmentId => "StudentStudyItemAssessmentID",
            AssessmentField::TypeDescription => "StudentStudyItemAssessmentTypeDescription",
            AssessmentField::Description => "StudentStudyItemAssessmentDescription",
            AssessmentField::Barcode => "StudentStudyItemAssessmentBarcode",
        }
    }
}

impl fmt::Display for AssessmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_catalog_spans_sixteen_ordinals() {
        let catalog = FieldCatalog::assessment();
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.max_ordinal(), Some(15));
        assert_eq!(
            catalog.field_at_ordinal(10).map(|f| f.name.as_str()),
            Some("StudentStudyItemAssessmentStudentID")
        );
    }

    #[test]
    fn header_lookup_ignores_case_and_padding() {
        let catalog = FieldCatalog::new([(0, "studentid"), (1, "mark")]).unwrap();
        for header in ["StudentID", " studentid ", "STUDENTID"] {
            assert_eq!(
                catalog.lookup_header(header).map(|f| f.name.as_str()),
                Some("studentid"),
                "header {header:?}"
            );
        }
        assert!(catalog.lookup_header("   ").is_none());
        assert!(catalog.lookup_header("grade").is_none());
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let catalog = FieldCatalog::new([(0, "studentid"), (1, "mark")])
            .unwrap()
            .with_alias("Student Number", "studentid")
            .unwrap();
        assert_eq!(
            catalog.lookup_header("student number").map(|f| f.ordinal),
            Some(0)
        );
        let err = FieldCatalog::new([(0, "studentid")])
            .unwrap()
            .with_alias("Grade", "grade")
            .unwrap_err();
        assert_eq!(err, CatalogError::UnknownField("grade".into()));
    }

    #[test]
    fn rejects_duplicate_ordinals_and_names() {
        assert_eq!(
            FieldCatalog::new([(0, "a"), (0, "b")]).unwrap_err(),
            CatalogError::DuplicateOrdinal(0)
        );
        assert_eq!(
            FieldCatalog::new([(0, "a"), (1, "a")]).unwrap_err(),
            CatalogError::DuplicateName("a".into())
        );
        assert_eq!(
            FieldCatalog::new([(3, "  ")]).unwrap_err(),
            CatalogError::EmptyName { ordinal: 3 }
        );
    }

    #[test]
    fn sparse_ordinals_keep_their_positions() {
        let catalog = FieldCatalog::new([(5, "late"), (0, "first")]).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["first", "late"]);
        assert!(catalog.field_at_ordinal(3).is_none());
    }
}
