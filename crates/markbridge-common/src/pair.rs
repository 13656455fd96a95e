use std::fmt;

/// An `(identifier, value)` pair with a non-empty identifier.
///
/// Both parts are stored trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyedPair {
    id: String,
    value: String,
}

impl KeyedPair {
    /// `None` when the identifier is empty after trimming.
    pub fn new(id: impl AsRef<str>, value: impl AsRef<str>) -> Option<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            value: value.as_ref().trim().to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_parts(self) -> (String, String) {
        (self.id, self.value)
    }
}

impl fmt::Display for KeyedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_is_required() {
        assert!(KeyedPair::new("  ", "70").is_none());
        let pair = KeyedPair::new(" s1 ", " 70 ").unwrap();
        assert_eq!((pair.id(), pair.value()), ("s1", "70"));
        assert_eq!(KeyedPair::new("s2", "").unwrap().to_string(), "s2\t");
    }
}
