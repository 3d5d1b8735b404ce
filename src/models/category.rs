use serde::{Serialize, Serializer};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category a transaction is filed under.
///
/// The "no category" case is its own variant rather than a magic label, so a
/// grouping key can never be confused with a user category of the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    Named(String),
    Uncategorized,
}

impl CategoryKey {
    /// Build a key from an optional raw label. Empty labels and the parser's
    /// own "Uncategorized" marker (any case) map to [`CategoryKey::Uncategorized`].
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => Self::Uncategorized,
            Some(s) if s.eq_ignore_ascii_case(UNCATEGORIZED) => Self::Uncategorized,
            Some(s) => Self::Named(s.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Uncategorized => UNCATEGORIZED,
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Self::Uncategorized)
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
