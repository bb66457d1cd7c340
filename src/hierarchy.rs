//! Forest construction from a flat resource listing.
//!
//! The provider returns resources in arbitrary order, each carrying only a
//! parent reference. The hierarchy is rebuilt from scratch on every request,
//! synthesizing placeholder roots for parents that are absent from the
//! listing.

use crate::resource::ResourceRecord;
use crate::types::{MY_DRIVE, SHARED_WITH_ME};
use std::collections::{HashMap, VecDeque};

/// Build the forest of root records from a flat listing.
///
/// Each record attaches under the record matching its `parent_id`, preserving
/// input order among siblings. A parent id with no matching record gets a
/// placeholder root, indexed under the missing id so every record sharing
/// that parent lands under the same placeholder. The placeholder label is
/// `MY_DRIVE` unless the missing id is exactly the `SHARED_WITH_ME` sentinel.
///
/// Runs in O(n) time and space. Records whose parent chain never reaches a
/// root (a record listing itself as parent, or a parent cycle in degenerate
/// provider data) are unreachable and drop out of the returned forest.
pub fn build_forest(records: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
    let listed = records.len();

    let mut index: HashMap<String, usize> = HashMap::with_capacity(listed);
    for (slot, record) in records.iter().enumerate() {
        index.insert(record.id.clone(), slot);
    }
    let parent_ids: Vec<String> = records.iter().map(|r| r.parent_id.clone()).collect();

    let mut slots: Vec<Option<ResourceRecord>> = records.into_iter().map(Some).collect();
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); listed];
    let mut parent_slots: Vec<Option<usize>> = vec![None; listed];
    let mut roots: Vec<usize> = Vec::new();

    for (slot, parent_id) in parent_ids.into_iter().enumerate() {
        let parent_slot = match index.get(&parent_id) {
            Some(&existing) => existing,
            None => {
                let label = if parent_id == SHARED_WITH_ME {
                    SHARED_WITH_ME
                } else {
                    MY_DRIVE
                };
                let placeholder = slots.len();
                slots.push(Some(ResourceRecord::synthetic_root(label)));
                edges.push(Vec::new());
                parent_slots.push(None);
                index.insert(parent_id, placeholder);
                roots.push(placeholder);
                placeholder
            }
        };
        edges[parent_slot].push(slot);
        parent_slots[slot] = Some(parent_slot);
    }

    // Every slot has at most one inbound edge, so the breadth-first order
    // visits each reachable slot exactly once, parents before children.
    let mut order: Vec<usize> = Vec::with_capacity(slots.len());
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    while let Some(slot) = queue.pop_front() {
        order.push(slot);
        queue.extend(edges[slot].iter().copied());
    }

    // Assemble bottom-up: walking the order in reverse moves each completed
    // subtree into its parent slot. The reverse sweep appends siblings
    // backwards, so each node's children are flipped once on the way out.
    for &slot in order.iter().rev() {
        let mut node = slots[slot].take().unwrap();
        node.children.reverse();
        match parent_slots[slot] {
            Some(parent) => {
                if let Some(parent_node) = slots[parent].as_mut() {
                    parent_node.children.push(node);
                }
            }
            None => slots[slot] = Some(node),
        }
    }

    roots.into_iter().filter_map(|slot| slots[slot].take()).collect()
}
