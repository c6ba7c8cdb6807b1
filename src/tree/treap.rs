// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Treap: BST order in keys, max-heap order in a caller-derived priority.
//! Insertion attaches the new leaf normally, then rotates it upward while it
//! outranks its parent; deletion rotates the higher-priority child up
//! (sifting the target down) until it has at most one child, then unlinks
//! it outright — no further rebalancing needed, since every rotation keeps
//! both the BST and heap invariants intact by construction.

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::tree::rotate::{rotate_left, rotate_right};
use crate::tree::{descend, find, foreach_inorder, unlink_leafish, Node};
use std::cmp::Ordering;

type TreapNode<K, V> = Node<K, V, u64>;

/// A key-value map backed by a treap.
pub struct TreapMap<K, V> {
    arena: Arena<TreapNode<K, V>>,
    root: Option<NodeId>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
    priority: Box<dyn Fn(&K) -> u64>,
}

impl<K, V> TreapMap<K, V> {
    pub fn new(cmp: impl Fn(&K, &K) -> Ordering + 'static, priority: impl Fn(&K) -> u64 + 'static) -> Self {
        TreapMap {
            arena: Arena::new(),
            root: None,
            count: 0,
            cmp: Box::new(cmp),
            priority: Box::new(priority),
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

    /// The key currently at the root, i.e. the maximum-priority key.
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.arena[id].key)
    }

    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        match descend(&self.arena, self.root, &key, &self.cmp) {
            Ok(id) => return InsertOutcome::Duplicate(&mut self.arena[id].value),
            Err(None) => {
                let prio = (self.priority)(&key);
                let id = self.arena.alloc(Node::new(key, value, prio));
                self.root = Some(id);
            }
            Err(Some((parent, went_left))) => {
                let prio = (self.priority)(&key);
                let id = self.arena.alloc(Node::new(key, value, prio));
                self.arena[id].parent = Some(parent);
                if went_left {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                bubble_up(&mut self.arena, &mut self.root, id);
            }
        }
        self.count += 1;
        InsertOutcome::Inserted
    }

    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        let mut target = find(&self.arena, self.root, key, &self.cmp)?;
        while self.arena[target].left.is_some() && self.arena[target].right.is_some() {
            let l = self.arena[target].left.unwrap();
            let r = self.arena[target].right.unwrap();
            if self.arena[l].tag > self.arena[r].tag {
                rotate_right(&mut self.arena, &mut self.root, target);
            } else {
                rotate_left(&mut self.arena, &mut self.root, target);
            }
        }
        unlink_leafish(&mut self.arena, &mut self.root, target);
        let removed = self.arena.free(target);
        self.count -= 1;
        Some((removed.key, removed.value))
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    #[cfg(test)]
    fn check_heap_order(&self, id: Option<NodeId>) {
        if let Some(id) = id {
            if let Some(l) = self.arena[id].left {
                assert!(self.arena[id].tag >= self.arena[l].tag, "heap order violated on the left");
                self.check_heap_order(Some(l));
            }
            if let Some(r) = self.arena[id].right {
                assert!(self.arena[id].tag >= self.arena[r].tag, "heap order violated on the right");
                self.check_heap_order(Some(r));
            }
        }
    }
}

/// Rotates `id` upward (right if it is a left child, left if a right child)
/// while its priority exceeds its parent's, restoring max-heap order.
fn bubble_up<K, V>(arena: &mut Arena<TreapNode<K, V>>, root: &mut Option<NodeId>, mut id: NodeId) {
    while let Some(p) = arena[id].parent {
        if arena[id].tag <= arena[p].tag {
            break;
        }
        if arena[p].left == Some(id) {
            rotate_right(arena, root, p);
        } else {
            rotate_left(arena, root, p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp_i32(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn prio_identity(k: &i32) -> u64 {
        *k as u64
    }

    #[test]
    fn scenario_8_root_key_is_max_inserted_by_priority() {
        let mut m = TreapMap::new(cmp_i32, prio_identity);
        for k in [5, 9, 2, 7, 1, 12, 3] {
            m.insert(k, ());
        }
        assert_eq!(m.root_key(), Some(&12));
    }

    #[test]
    fn holds_bst_and_heap_order_under_random_insert_delete() {
        let mut m = TreapMap::new(cmp_i32, |k: &i32| {
            // a cheap deterministic scramble so priority order doesn't track key order
            let x = *k as u64;
            x.wrapping_mul(2654435761).rotate_left(13)
        });
        let mut present = std::collections::BTreeSet::new();
        let mut state = 55555555u64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 500) as i32
        };
        for _ in 0..5000 {
            let k = next();
            if present.contains(&k) {
                assert!(m.delete(&k));
                present.remove(&k);
            } else {
                assert!(m.insert(k, k).is_inserted());
                present.insert(k);
            }
            m.check_heap_order(m.root);
        }
        let mut seen = Vec::new();
        m.foreach(|k, _| {
            seen.push(*k);
            true
        });
        assert_eq!(seen, present.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_insert_exposes_existing_value_slot() {
        let mut m = TreapMap::new(cmp_i32, prio_identity);
        m.insert(1, "a");
        assert!(m.insert(1, "b").is_duplicate());
        assert_eq!(m.select(&1), Some(&"a"));
    }
}
