// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Height-balanced (AVL) tree: the source's two-bit balance factor per node,
//! kept as {−1, 0, +1} by the [`Balance`] tag, with single/double rotations
//! applied the moment an ancestor's balance factor would leave that range.
//!
//! Insertion only ever needs one rotation (single or double) to restore the
//! invariant, after which height above the rotation is unchanged and the
//! upward walk stops; deletion can require a rotation at every level up to
//! the root, because removing a node can shrink height all the way up.

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::tree::rotate::{rotate_left, rotate_left_right, rotate_right, rotate_right_left};
use crate::tree::{descend, find, foreach_inorder, max_node, min_node, unlink_leafish, Node};
use std::cmp::Ordering;

/// Which side of a node is taller, or neither. Mirrors the source's 2-bit
/// balance factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Balance {
    Left,
    Even,
    Right,
}

type AvlNode<K, V> = Node<K, V, Balance>;

/// A key-value map backed by an AVL tree.
pub struct AvlMap<K, V> {
    arena: Arena<AvlNode<K, V>>,
    root: Option<NodeId>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
}

impl<K, V> AvlMap<K, V> {
    pub fn new(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        AvlMap {
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

    /// Visits every key in ascending order; stops early if `f` returns
    /// `false`.
    pub fn foreach(&self, f: impl FnMut(&K, &V) -> bool) -> bool {
        foreach_inorder(&self.arena, self.root, f)
    }

    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        match descend(&self.arena, self.root, &key, &self.cmp) {
            Ok(id) => return InsertOutcome::Duplicate(&mut self.arena[id].value),
            Err(None) => {
                let id = self.arena.alloc(Node::new(key, value, Balance::Even));
                self.root = Some(id);
            }
            Err(Some((parent, went_left))) => {
                let id = self.arena.alloc(Node::new(key, value, Balance::Even));
                self.arena[id].parent = Some(parent);
                if went_left {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                retrace_after_insert(&mut self.arena, &mut self.root, id);
            }
        }
        self.count += 1;
        InsertOutcome::Inserted
    }

    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        let target = find(&self.arena, self.root, key, &self.cmp)?;
        let victim = if self.arena[target].left.is_some() && self.arena[target].right.is_some() {
            let swap_with = if self.arena[target].tag == Balance::Left {
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

        let (parent, was_left) = unlink_leafish(&mut self.arena, &mut self.root, victim);
        if let Some(p) = parent {
            retrace_after_delete(&mut self.arena, &mut self.root, p, was_left);
        }
        let removed = self.arena.free(victim);
        self.count -= 1;
        Some((removed.key, removed.value))
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    #[cfg(test)]
    fn height(&self, id: Option<NodeId>) -> i64 {
        match id {
            None => 0,
            Some(id) => 1 + self.height(self.arena[id].left).max(self.height(self.arena[id].right)),
        }
    }

    #[cfg(test)]
    fn check_balanced(&self, id: Option<NodeId>) {
        if let Some(id) = id {
            let lh = self.height(self.arena[id].left);
            let rh = self.height(self.arena[id].right);
            assert!((lh - rh).abs() <= 1, "AVL invariant violated at a node");
            self.check_balanced(self.arena[id].left);
            self.check_balanced(self.arena[id].right);
        }
    }
}

/// Walks up from the freshly inserted leaf `n`, updating balance factors as
/// the subtree rooted at each ancestor grows by one, and stops at the first
/// rotation (insertion always restores the pre-insert height above it, so no
/// further ancestor needs revisiting).
fn retrace_after_insert<K, V>(arena: &mut Arena<AvlNode<K, V>>, root: &mut Option<NodeId>, mut n: NodeId) {
    loop {
        let p = match arena[n].parent {
            Some(p) => p,
            None => return,
        };
        let n_is_left = arena[p].left == Some(n);
        match arena[p].tag {
            Balance::Even => {
                arena[p].tag = if n_is_left { Balance::Left } else { Balance::Right };
                n = p;
                continue;
            }
            Balance::Left => {
                if n_is_left {
                    rebalance_left_heavy(arena, root, p);
                } else {
                    arena[p].tag = Balance::Even;
                }
                return;
            }
            Balance::Right => {
                if !n_is_left {
                    rebalance_right_heavy(arena, root, p);
                } else {
                    arena[p].tag = Balance::Even;
                }
                return;
            }
        }
    }
}

/// Walks up from `parent`, whose subtree on the `removed_was_left` side just
/// shrank by one, repairing balance factors and rotating as needed. Unlike
/// insertion, this may run all the way to the root, since a single rotation
/// can still leave the subtree one shorter than before the deletion.
fn retrace_after_delete<K, V>(
    arena: &mut Arena<AvlNode<K, V>>,
    root: &mut Option<NodeId>,
    mut parent: NodeId,
    mut removed_was_left: bool,
) {
    loop {
        let (next, height_decreased) = match arena[parent].tag {
            Balance::Even => {
                arena[parent].tag = if removed_was_left { Balance::Right } else { Balance::Left };
                return;
            }
            Balance::Left if removed_was_left => {
                arena[parent].tag = Balance::Even;
                (parent, true)
            }
            Balance::Right if !removed_was_left => {
                arena[parent].tag = Balance::Even;
                (parent, true)
            }
            Balance::Left => rebalance_left_heavy(arena, root, parent),
            Balance::Right => rebalance_right_heavy(arena, root, parent),
        };
        if !height_decreased {
            return;
        }
        match arena[next].parent {
            None => return,
            Some(gp) => {
                removed_was_left = arena[gp].left == Some(next);
                parent = gp;
            }
        }
    }
}

/// `p` is left-heavy by two. Rotates right (single, if `p.left` is itself
/// left-heavy or balanced) or left-right (double, if `p.left` is
/// right-heavy), fixing up tags, and reports the new subtree root plus
/// whether overall height decreased (the `Balance::Even` inner case is only
/// reachable from deletion, never insertion — insertion's caller discards
/// the bool and always stops after one call).
fn rebalance_left_heavy<K, V>(
    arena: &mut Arena<AvlNode<K, V>>,
    root: &mut Option<NodeId>,
    p: NodeId,
) -> (NodeId, bool) {
    let l = arena[p].left.expect("left-heavy node must have a left child");
    match arena[l].tag {
        Balance::Left => {
            rotate_right(arena, root, p);
            arena[p].tag = Balance::Even;
            arena[l].tag = Balance::Even;
            (l, true)
        }
        Balance::Even => {
            rotate_right(arena, root, p);
            arena[p].tag = Balance::Left;
            arena[l].tag = Balance::Right;
            (l, false)
        }
        Balance::Right => {
            let lr = arena[l].right.expect("right-heavy left child must have a right child");
            let lr_tag = arena[lr].tag;
            rotate_left_right(arena, root, p);
            match lr_tag {
                Balance::Left => {
                    arena[p].tag = Balance::Right;
                    arena[l].tag = Balance::Even;
                }
                Balance::Right => {
                    arena[p].tag = Balance::Even;
                    arena[l].tag = Balance::Left;
                }
                Balance::Even => {
                    arena[p].tag = Balance::Even;
                    arena[l].tag = Balance::Even;
                }
            }
            arena[lr].tag = Balance::Even;
            (lr, true)
        }
    }
}

/// Mirror of [`rebalance_left_heavy`] for a node that is right-heavy by two.
fn rebalance_right_heavy<K, V>(
    arena: &mut Arena<AvlNode<K, V>>,
    root: &mut Option<NodeId>,
    p: NodeId,
) -> (NodeId, bool) {
    let r = arena[p].right.expect("right-heavy node must have a right child");
    match arena[r].tag {
        Balance::Right => {
            rotate_left(arena, root, p);
            arena[p].tag = Balance::Even;
            arena[r].tag = Balance::Even;
            (r, true)
        }
        Balance::Even => {
            rotate_left(arena, root, p);
            arena[p].tag = Balance::Right;
            arena[r].tag = Balance::Left;
            (r, false)
        }
        Balance::Left => {
            let rl = arena[r].left.expect("left-heavy right child must have a left child");
            let rl_tag = arena[rl].tag;
            rotate_right_left(arena, root, p);
            match rl_tag {
                Balance::Right => {
                    arena[p].tag = Balance::Left;
                    arena[r].tag = Balance::Even;
                }
                Balance::Left => {
                    arena[p].tag = Balance::Even;
                    arena[r].tag = Balance::Right;
                }
                Balance::Even => {
                    arena[p].tag = Balance::Even;
                    arena[r].tag = Balance::Even;
                }
            }
            arena[rl].tag = Balance::Even;
            (rl, true)
        }
    }
}
