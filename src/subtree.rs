//! Descendant resolution over a built forest.

use crate::resource::ResourceRecord;
use crate::types::ResourceId;
use std::collections::VecDeque;

/// Collect the inclusive descendant id set of `target_id`.
///
/// The forest is searched breadth-first for the first node carrying the
/// target id. An id that is not in the forest is treated as a childless leaf
/// rather than an error, so callers can still address resources that fell
/// out of the listing.
pub fn resolve_descendants(forest: &[ResourceRecord], target_id: &str) -> Vec<ResourceId> {
    let mut queue: VecDeque<&ResourceRecord> = forest.iter().collect();
    let mut target = None;

    while let Some(node) = queue.pop_front() {
        if node.id == target_id {
            target = Some(node);
            break;
        }
        queue.extend(node.children.iter());
    }

    let Some(root) = target else {
        return vec![target_id.to_string()];
    };

    // Pre-order walk with an explicit stack; drive hierarchies can be deep
    // enough to overflow the call stack under native recursion.
    let mut stack = vec![root];
    let mut ids = Vec::new();
    while let Some(node) = stack.pop() {
        ids.push(node.id.clone());
        for child in node.children.iter().rev() {
            stack.push(child);
        }
    }

    ids
}
