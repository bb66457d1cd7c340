//! Resource data model and wire representation.
//!
//! Records are created fresh per request from a provider listing and are
//! garbage once the response is rendered; nothing here is cached.

use crate::types::{ResourceId, MY_DRIVE, SHARED_WITH_ME};
use serde::Serialize;

/// One resource entry from the provider listing.
///
/// The provider's data model allows multiple parents; only the first is
/// honored. A record without any parent reference is parked under the
/// `SHARED_WITH_ME` root. `children` stays empty until the forest is built.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceRecord {
    /// Display name.
    #[serde(rename = "text")]
    pub name: String,

    /// Provider-assigned identifier, unique across the listing.
    pub id: ResourceId,

    /// Resolved parent reference.
    #[serde(rename = "parentId")]
    pub parent_id: ResourceId,

    /// Content-type tag; empty for synthetic roots.
    #[serde(rename = "type")]
    pub kind: String,

    /// Child records in listing order, populated by forest construction.
    #[serde(rename = "nodes")]
    pub children: Vec<ResourceRecord>,
}

impl ResourceRecord {
    /// Wrap a raw provider entry, collapsing the parent list to its first id.
    pub fn new(
        name: impl Into<String>,
        id: impl Into<ResourceId>,
        parents: Vec<String>,
        kind: impl Into<String>,
    ) -> Self {
        let parent_id = parents
            .into_iter()
            .next()
            .unwrap_or_else(|| SHARED_WITH_ME.to_string());

        ResourceRecord {
            name: name.into(),
            id: id.into(),
            parent_id,
            kind: kind.into(),
            children: Vec::new(),
        }
    }

    /// Placeholder root anchoring resources whose parent is not in the listing.
    pub fn synthetic_root(label: &str) -> Self {
        ResourceRecord {
            name: label.to_string(),
            id: label.to_string(),
            parent_id: label.to_string(),
            kind: String::new(),
            children: Vec::new(),
        }
    }

    /// True for the placeholder roots synthesized during forest construction.
    pub fn is_synthetic_root(&self) -> bool {
        self.kind.is_empty() && (self.id == SHARED_WITH_ME || self.id == MY_DRIVE)
    }
}

/// A name-search match straight from a provider query.
///
/// No relationship to `ResourceRecord`; hits are never placed in a forest.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Display name.
    #[serde(rename = "text")]
    pub name: String,

    /// Provider-assigned identifier.
    pub id: ResourceId,

    /// Content-type tag.
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_parent_wins() {
        let record = ResourceRecord::new(
            "doc",
            "f1",
            vec!["p1".to_string(), "p2".to_string()],
            "application/vnd.folder",
        );
        assert_eq!(record.parent_id, "p1");
    }

    #[test]
    fn empty_parent_list_routes_to_shared_with_me() {
        let record = ResourceRecord::new("doc", "f1", vec![], "text/plain");
        assert_eq!(record.parent_id, SHARED_WITH_ME);
    }

    #[test]
    fn synthetic_root_uses_label_for_all_identity_fields() {
        let root = ResourceRecord::synthetic_root(MY_DRIVE);
        assert_eq!(root.id, MY_DRIVE);
        assert_eq!(root.name, MY_DRIVE);
        assert_eq!(root.parent_id, MY_DRIVE);
        assert_eq!(root.kind, "");
        assert!(root.is_synthetic_root());
    }

    #[test]
    fn wire_field_names_match_contract() {
        let mut root = ResourceRecord::new("root", "1", vec![], "folder");
        root.children
            .push(ResourceRecord::new("child", "2", vec!["1".to_string()], "file"));

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["text"], "root");
        assert_eq!(json["id"], "1");
        assert_eq!(json["parentId"], SHARED_WITH_ME);
        assert_eq!(json["type"], "folder");
        assert_eq!(json["nodes"][0]["id"], "2");
    }
}
