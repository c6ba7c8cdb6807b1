// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Weight-balanced (BB[α]) tree: each node's tag is its subtree weight
//! (descendant-leaf count, with an absent child counting as weight 1). A
//! node is in balance while its left weight sits in `[0.293·W, 0.707·W]`;
//! outside that band a single or double rotation is chosen by comparing the
//! heavy child's inner-grandchild weight against `0.586` of that child's
//! subtree weight, per the source's BB[α] thresholds.

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::tree::rotate::{rotate_left, rotate_right};
use crate::tree::{descend, find, foreach_inorder, max_node, min_node, unlink_leafish, Node};
use std::cmp::Ordering;

const ALPHA: f64 = 0.293;
const ONE_MINUS_ALPHA: f64 = 0.707;
const GAMMA: f64 = 0.586;

type WbNode<K, V> = Node<K, V, u64>;

fn weight<K, V>(arena: &Arena<WbNode<K, V>>, id: Option<NodeId>) -> u64 {
    id.map_or(1, |id| arena[id].tag)
}

fn recompute_weight<K, V>(arena: &mut Arena<WbNode<K, V>>, id: NodeId) {
    let w = weight(arena, arena[id].left) + weight(arena, arena[id].right);
    arena[id].tag = w;
}

/// A key-value map backed by a weight-balanced tree.
pub struct WeightBalancedMap<K, V> {
    arena: Arena<WbNode<K, V>>,
    root: Option<NodeId>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
}

impl<K, V> WeightBalancedMap<K, V> {
    pub fn new(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        WeightBalancedMap {
            arena: Arena::new(),
            root: None,
            count: 0,
            cmp: Box::new(cmp),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.count = 0;
    }

    pub fn select(&self, key: &K) -> Option<&V> {
        find(&self.arena, self.root, key, &self.cmp).map(|id| &self.arena[id].value)
    }

    pub fn foreach(&self, f: impl FnMut(&K, &V) -> bool) -> bool {
        foreach_inorder(&self.arena, self.root, f)
    }

    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        match descend(&self.arena, self.root, &key, &self.cmp) {
            Ok(id) => return InsertOutcome::Duplicate(&mut self.arena[id].value),
            Err(None) => {
                let id = self.arena.alloc(Node::new(key, value, 2));
                self.root = Some(id);
            }
            Err(Some((parent, went_left))) => {
                let id = self.arena.alloc(Node::new(key, value, 2));
                self.arena[id].parent = Some(parent);
                if went_left {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                retrace(&mut self.arena, &mut self.root, id);
            }
        }
        self.count += 1;
        InsertOutcome::Inserted
    }

    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        let target = find(&self.arena, self.root, key, &self.cmp)?;
        let victim = if self.arena[target].left.is_some() && self.arena[target].right.is_some() {
            let left_w = weight(&self.arena, self.arena[target].left);
            let right_w = weight(&self.arena, self.arena[target].right);
            let swap_with = if left_w >= right_w {
                max_node(&self.arena, self.arena[target].left.unwrap())
            } else {
                min_node(&self.arena, self.arena[target].right.unwrap())
            };
            std::mem::swap(&mut self.arena[target].key, &mut self.arena[swap_with].key);
            std::mem::swap(&mut self.arena[target].value, &mut self.arena[swap_with].value);
            swap_with
        } else {
            target
        };

        let (parent, _was_left) = unlink_leafish(&mut self.arena, &mut self.root, victim);
        retrace_from(&mut self.arena, &mut self.root, parent);
        let removed = self.arena.free(victim);
        self.count -= 1;
        Some((removed.key, removed.value))
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    #[cfg(test)]
    fn check_balanced(&self, id: Option<NodeId>) {
        if let Some(id) = id {
            let w = weight(&self.arena, Some(id)) as f64;
            let wl = weight(&self.arena, self.arena[id].left) as f64;
            assert!(
                ALPHA * w - 1e-9 <= wl && wl <= ONE_MINUS_ALPHA * w + 1e-9,
                "weight-balance band violated: wl={wl} w={w}"
            );
            self.check_balanced(self.arena[id].left);
            self.check_balanced(self.arena[id].right);
        }
    }
}

/// Walks from `node`'s parent up to the root, recomputing weight and
/// re-running the BB[α] fixer at every ancestor. Safe to call after both
/// insert (starts at the new leaf) and delete (starts at the unlink point).
fn retrace<K, V>(arena: &mut Arena<WbNode<K, V>>, root: &mut Option<NodeId>, node: NodeId) {
    retrace_from(arena, root, arena[node].parent);
}

fn retrace_from<K, V>(arena: &mut Arena<WbNode<K, V>>, root: &mut Option<NodeId>, mut parent: Option<NodeId>) {
    while let Some(p) = parent {
        let next_parent = arena[p].parent;
        recompute_weight(arena, p);
        fixup(arena, root, p);
        parent = next_parent;
    }
}

/// Restores the BB[α] band at `node` if its current left/total weight ratio
/// falls outside `[0.293, 0.707]`, choosing single vs. double rotation by
/// comparing the heavy child's inner-grandchild weight against `0.586` of
/// that child's own weight.
fn fixup<K, V>(arena: &mut Arena<WbNode<K, V>>, root: &mut Option<NodeId>, node: NodeId) {
    let w = weight(arena, Some(node)) as f64;
    let wl = weight(arena, arena[node].left) as f64;
    if wl < ALPHA * w {
        let right = arena[node].right.expect("left-light node must have a right child");
        let right_weight = weight(arena, Some(right)) as f64;
        let inner = weight(arena, arena[right].left) as f64;
        if inner > GAMMA * right_weight {
            let rl = arena[right].left.expect("inner grandchild must exist to trigger a double rotation");
            rotate_right(arena, root, right);
            recompute_weight(arena, right);
            recompute_weight(arena, rl);
            rotate_left(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, rl);
        } else {
            rotate_left(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, right);
        }
    } else if wl > ONE_MINUS_ALPHA * w {
        let left = arena[node].left.expect("left-heavy node must have a left child");
        let left_weight = weight(arena, Some(left)) as f64;
        let inner = weight(arena, arena[left].right) as f64;
        if inner > GAMMA * left_weight {
            let lr = arena[left].right.expect("inner grandchild must exist to trigger a double rotation");
            rotate_left(arena, root, left);
            recompute_weight(arena, left);
            recompute_weight(arena, lr);
            rotate_right(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, lr);
        } else {
            rotate_right(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, left);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp_i32(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn scenario_3_ordered_inserts_yield_sorted_foreach() {
        let mut m = WeightBalancedMap::new(cmp_i32);
        for i in 1..=15 {
            assert!(m.insert(i, ()).is_inserted());
        }
        let mut keys = Vec::new();
        m.foreach(|k, _| {
            keys.push(*k);
            true
        });
        assert_eq!(keys, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn stays_weight_balanced_under_ascending_inserts() {
        let mut m = WeightBalancedMap::new(cmp_i32);
        for i in 0..2000 {
            m.insert(i, i);
        }
        m.check_balanced(m.root);
    }

    #[test]
    fn stays_weight_balanced_under_random_insert_delete() {
        let mut m = WeightBalancedMap::new(cmp_i32);
        let mut present = std::collections::BTreeSet::new();
        let mut state = 123456789u64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 600) as i32
        };
        for _ in 0..6000 {
            let k = next();
            if present.contains(&k) {
                assert!(m.delete(&k));
                present.remove(&k);
            } else {
                assert!(m.insert(k, k).is_inserted());
                present.insert(k);
            }
            m.check_balanced(m.root);
        }
        for k in &present {
            assert_eq!(m.select(k), Some(k));
        }
    }

    #[test]
    fn duplicate_insert_exposes_existing_value_slot() {
        let mut m = WeightBalancedMap::new(cmp_i32);
        m.insert(1, "first");
        assert!(m.insert(1, "second").is_duplicate());
        assert_eq!(m.select(&1), Some(&"first"));
    }
}
