// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Internal path-reduction tree: the same weight tag as the weight-balanced
//! engine (subtree leaf count, absent child = 1), but rebalanced by directly
//! comparing grandchild weights instead of fixed α-thresholds. After a
//! rotation, the fixer recurses into the new root's two children, since
//! fixing one level can reveal an imbalance immediately below it that the
//! threshold-based weight-balanced tree never has to chase down explicitly.

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::tree::rotate::{rotate_left, rotate_right};
use crate::tree::{descend, find, foreach_inorder, max_node, min_node, unlink_leafish, Node};
use std::cmp::Ordering;

type PrNode<K, V> = Node<K, V, u64>;

fn weight<K, V>(arena: &Arena<PrNode<K, V>>, id: Option<NodeId>) -> u64 {
    id.map_or(1, |id| arena[id].tag)
}

fn recompute_weight<K, V>(arena: &mut Arena<PrNode<K, V>>, id: NodeId) {
    let w = weight(arena, arena[id].left) + weight(arena, arena[id].right);
    arena[id].tag = w;
}

/// A key-value map backed by an internal path-reduction tree.
pub struct PathReductionMap<K, V> {
    arena: Arena<PrNode<K, V>>,
    root: Option<NodeId>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
}

impl<K, V> PathReductionMap<K, V> {
    pub fn new(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        PathReductionMap {
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
    fn check_weights(&self, id: Option<NodeId>) {
        if let Some(id) = id {
            let expected = weight(&self.arena, self.arena[id].left) + weight(&self.arena, self.arena[id].right);
            assert_eq!(self.arena[id].tag, expected, "stale weight tag");
            self.check_weights(self.arena[id].left);
            self.check_weights(self.arena[id].right);
        }
    }
}

fn retrace<K, V>(arena: &mut Arena<PrNode<K, V>>, root: &mut Option<NodeId>, node: NodeId) {
    retrace_from(arena, root, arena[node].parent);
}

fn retrace_from<K, V>(arena: &mut Arena<PrNode<K, V>>, root: &mut Option<NodeId>, mut parent: Option<NodeId>) {
    while let Some(p) = parent {
        let next_parent = arena[p].parent;
        recompute_weight(arena, p);
        fixup(arena, root, p);
        parent = next_parent;
    }
}

/// Compares grandchild weights directly rather than against a fixed ratio:
/// if the heavy side's outer grandchild outweighs the light side, a single
/// rotation suffices; if only the inner grandchild does, a double rotation
/// is needed. Either way, the fixer recurses into the new root's two
/// children to chase down any imbalance the rotation itself introduced.
fn fixup<K, V>(arena: &mut Arena<PrNode<K, V>>, root: &mut Option<NodeId>, node: NodeId) {
    let wl = weight(arena, arena[node].left);
    let wr = weight(arena, arena[node].right);
    if wr > wl {
        let right = arena[node].right.expect("right-heavy node must have a right child");
        let outer = weight(arena, arena[right].right);
        let inner = weight(arena, arena[right].left);
        if outer > wl {
            let new_root = rotate_left(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, new_root);
            let left_child = arena[new_root].left;
            let right_child = arena[new_root].right;
            if let Some(l) = left_child {
                fixup(arena, root, l);
            }
            if let Some(r) = right_child {
                fixup(arena, root, r);
            }
        } else if inner > wl {
            let rl = arena[right].left.expect("inner grandchild must exist to trigger a double rotation");
            rotate_right(arena, root, right);
            recompute_weight(arena, right);
            recompute_weight(arena, rl);
            let new_root = rotate_left(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, new_root);
            let left_child = arena[new_root].left;
            let right_child = arena[new_root].right;
            if let Some(l) = left_child {
                fixup(arena, root, l);
            }
            if let Some(r) = right_child {
                fixup(arena, root, r);
            }
        }
    } else if wl > wr {
        let left = arena[node].left.expect("left-heavy node must have a left child");
        let outer = weight(arena, arena[left].left);
        let inner = weight(arena, arena[left].right);
        if outer > wr {
            let new_root = rotate_right(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, new_root);
            let left_child = arena[new_root].left;
            let right_child = arena[new_root].right;
            if let Some(l) = left_child {
                fixup(arena, root, l);
            }
            if let Some(r) = right_child {
                fixup(arena, root, r);
            }
        } else if inner > wr {
            let lr = arena[left].right.expect("inner grandchild must exist to trigger a double rotation");
            rotate_left(arena, root, left);
            recompute_weight(arena, left);
            recompute_weight(arena, lr);
            let new_root = rotate_right(arena, root, node);
            recompute_weight(arena, node);
            recompute_weight(arena, new_root);
            let left_child = arena[new_root].left;
            let right_child = arena[new_root].right;
            if let Some(l) = left_child {
                fixup(arena, root, l);
            }
            if let Some(r) = right_child {
                fixup(arena, root, r);
            }
        }
    }
}
