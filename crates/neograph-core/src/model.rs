//! Graph vocabulary: node labels, relations and handles.

use serde::Serialize;

/// Node labels written by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeLabel {
    Visit,
    Sex,
    CareSite,
    Race,
    Age,
    Diagnosis,
}

impl NodeLabel {
    pub const ALL: [NodeLabel; 6] = [
        NodeLabel::Visit,
        NodeLabel::Sex,
        NodeLabel::CareSite,
        NodeLabel::Race,
        NodeLabel::Age,
        NodeLabel::Diagnosis,
    ];

    /// The store label for this node type.
    pub fn label(&self) -> &'static str {
        match self {
            NodeLabel::Visit => "Visit",
            NodeLabel::Sex => "Sex",
            NodeLabel::CareSite => "CareSite",
            NodeLabel::Race => "Race",
            NodeLabel::Age => "Age",
            NodeLabel::Diagnosis => "Diagnosis",
        }
    }

    /// The property that uniquely identifies a node of this type.
    pub fn key_property(&self) -> &'static str {
        match self {
            NodeLabel::Visit => "visit_id",
            NodeLabel::Sex | NodeLabel::Race | NodeLabel::Age => "label",
            NodeLabel::CareSite => "site_id",
            NodeLabel::Diagnosis => "code",
        }
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Directed relationship types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Relation {
    Sex,
    CareSite,
    Race,
    Age,
    Dx,
    ParentDx,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Sex => "sex",
            Relation::CareSite => "care_site",
            Relation::Race => "race",
            Relation::Age => "age",
            Relation::Dx => "dx",
            Relation::ParentDx => "parent_dx",
        }
    }

    /// Label of the node this relation points at.
    pub fn target(&self) -> NodeLabel {
        match self {
            Relation::Sex => NodeLabel::Sex,
            Relation::CareSite => NodeLabel::CareSite,
            Relation::Race => NodeLabel::Race,
            Relation::Age => NodeLabel::Age,
            Relation::Dx | Relation::ParentDx => NodeLabel::Diagnosis,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a node that exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeHandle {
    pub label: NodeLabel,
    pub key: String,
}

impl NodeHandle {
    pub fn new(label: NodeLabel, key: impl Into<String>) -> Self {
        Self { label, key: key.into() }
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{})", self.label, self.key)
    }
}

/// Normalize a categorical value or visit id into its node key.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Strip dots and surrounding whitespace from a diagnosis code.
pub fn strip_code(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '.').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("MALE"), "male");
        assert_eq!(normalize_key("  SiteA "), "sitea");
    }

    #[test]
    fn test_strip_code() {
        assert_eq!(strip_code("250.01"), "25001");
        assert_eq!(strip_code(" E849.7 "), "E8497");
        assert_eq!(strip_code("..."), "");
    }

    #[test]
    fn test_relation_targets() {
        assert_eq!(Relation::Dx.target(), NodeLabel::Diagnosis);
        assert_eq!(Relation::ParentDx.target(), NodeLabel::Diagnosis);
        assert_eq!(Relation::CareSite.target(), NodeLabel::CareSite);
        assert_eq!(NodeLabel::CareSite.key_property(), "site_id");
    }
}
