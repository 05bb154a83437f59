//! Diagnosis code hierarchy.
//!
//! A code is linked to each of its prefixes down to the base category:
//! `25001 -> 2500 -> 250`. Base categories are three characters long, or four
//! for external-cause codes starting with `E`.

use tracing::debug;

use crate::cache::IdentityCache;
use crate::error::StoreResult;
use crate::model::{NodeHandle, NodeLabel, Relation};
use crate::store::GraphStore;

/// Length of the root category for `code`.
pub fn base_length(code: &str) -> usize {
    if code.starts_with('E') {
        4
    } else {
        3
    }
}

/// Prefixes of `code` from the root category up to the full code.
///
/// Codes shorter than their base length form a single-node chain of
/// themselves. An empty code has no chain.
pub fn code_chain(code: &str) -> Vec<String> {
    let chars: Vec<char> = code.chars().collect();
    let base = base_length(code);
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() < base {
        return vec![code.to_string()];
    }
    (base..=chars.len())
        .map(|j| chars[..j].iter().collect())
        .collect()
}

/// Upsert every prefix of `code` and link each one to its parent.
///
/// Returns the chain handles, root first. Running it again for the same code
/// changes nothing.
pub async fn build_hierarchy<S: GraphStore>(
    cache: &IdentityCache<S>,
    code: &str,
) -> StoreResult<Vec<NodeHandle>> {
    let mut chain: Vec<NodeHandle> = Vec::new();
    for prefix in code_chain(code) {
        let node = cache.lookup_or_insert(NodeLabel::Diagnosis, &prefix).await?;
        if let Some(parent) = chain.last() {
            cache.store().connect(&node, Relation::ParentDx, parent).await?;
        }
        chain.push(node);
    }
    debug!(code, depth = chain.len(), "Built diagnosis hierarchy");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn dx(code: &str) -> NodeHandle {
        NodeHandle::new(NodeLabel::Diagnosis, code)
    }

    #[test]
    fn test_code_chain() {
        assert_eq!(code_chain("V10"), vec!["V10"]);
        assert_eq!(code_chain("2500"), vec!["250", "2500"]);
        assert_eq!(code_chain("25001"), vec!["250", "2500", "25001"]);
        assert_eq!(code_chain("E8497"), vec!["E849", "E8497"]);
        assert_eq!(code_chain("E84"), vec!["E84"]);
        assert_eq!(code_chain("42"), vec!["42"]);
        assert!(code_chain("").is_empty());
    }

    #[tokio::test]
    async fn test_build_links_child_to_parent() {
        let cache = IdentityCache::new(MemoryStore::new());
        let chain = build_hierarchy(&cache, "25001").await.unwrap();
        assert_eq!(chain, vec![dx("250"), dx("2500"), dx("25001")]);

        let store = cache.store();
        assert_eq!(store.edges_from(&dx("25001"), Relation::ParentDx), vec![dx("2500")]);
        assert_eq!(store.edges_from(&dx("2500"), Relation::ParentDx), vec![dx("250")]);
        assert!(store.edges_from(&dx("250"), Relation::ParentDx).is_empty());
    }

    #[tokio::test]
    async fn test_external_cause_root_has_no_parent() {
        let cache = IdentityCache::new(MemoryStore::new());
        build_hierarchy(&cache, "E8497").await.unwrap();
        let store = cache.store();
        assert_eq!(store.edges_from(&dx("E8497"), Relation::ParentDx), vec![dx("E849")]);
        assert!(store.edges_from(&dx("E849"), Relation::ParentDx).is_empty());
        assert!(!store.contains_node(NodeLabel::Diagnosis, "E84"));
    }

    #[tokio::test]
    async fn test_rebuild_is_noop() {
        let cache = IdentityCache::new(MemoryStore::new());
        build_hierarchy(&cache, "2500").await.unwrap();
        build_hierarchy(&cache, "2500").await.unwrap();
        build_hierarchy(&cache, "25001").await.unwrap();
        assert_eq!(cache.store().node_count(), 3);
        assert_eq!(cache.store().edge_count(), 2);
    }
}
