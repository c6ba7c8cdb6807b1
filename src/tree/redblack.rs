// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Red-black tree: CLRS-style insertion (uncle-red recolor / uncle-black
//! rotate-and-recolor, propagated up to the root) and deletion (double-black
//! repair loop after removing a black node), rendered over arena indices
//! instead of a sentinel `nil` node.
//!
//! There is no sentinel: `Option<NodeId>` stands in for `nil`, and every nil
//! is implicitly black ([`is_red`] treats `None` as black), matching the
//! source's "external null nodes count as black."

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::tree::rotate::{rotate_left, rotate_right};
use crate::tree::{descend, find, foreach_inorder, min_node, unlink_leafish, Node};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

type RbNode<K, V> = Node<K, V, Color>;

fn is_red<K, V>(arena: &Arena<RbNode<K, V>>, id: Option<NodeId>) -> bool {
    id.is_some_and(|id| arena[id].tag == Color::Red)
}

/// A key-value map backed by a red-black tree.
pub struct RedBlackMap<K, V> {
    arena: Arena<RbNode<K, V>>,
    root: Option<NodeId>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
}

impl<K, V> RedBlackMap<K, V> {
    pub fn new(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        RedBlackMap {
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
                let id = self.arena.alloc(Node::new(key, value, Color::Red));
                self.root = Some(id);
                fixup_insert(&mut self.arena, &mut self.root, id);
            }
            Err(Some((parent, went_left))) => {
                let id = self.arena.alloc(Node::new(key, value, Color::Red));
                self.arena[id].parent = Some(parent);
                if went_left {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                fixup_insert(&mut self.arena, &mut self.root, id);
            }
        }
        self.count += 1;
        InsertOutcome::Inserted
    }

    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        let target = find(&self.arena, self.root, key, &self.cmp)?;
        let victim = if self.arena[target].left.is_some() && self.arena[target].right.is_some() {
            let succ = min_node(&self.arena, self.arena[target].right.unwrap());
            std::mem::swap(&mut self.arena[target].key, &mut self.arena[succ].key);
            std::mem::swap(&mut self.arena[target].value, &mut self.arena[succ].value);
            succ
        } else {
            target
        };

        let victim_color = self.arena[victim].tag;
        let x = self.arena[victim].left.or(self.arena[victim].right);
        let (parent, was_left) = unlink_leafish(&mut self.arena, &mut self.root, victim);
        if victim_color == Color::Black {
            fixup_delete(&mut self.arena, &mut self.root, x, parent, was_left);
        }
        let removed = self.arena.free(victim);
        self.count -= 1;
        Some((removed.key, removed.value))
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        if let Some(r) = self.root {
            assert_eq!(self.arena[r].tag, Color::Black, "root must be black");
        }
        self.check_node(self.root);
    }

    #[cfg(test)]
    fn check_node(&self, id: Option<NodeId>) -> i64 {
        match id {
            None => 1,
            Some(id) => {
                if self.arena[id].tag == Color::Red {
                    assert!(!is_red(&self.arena, self.arena[id].left), "red node has a red left child");
                    assert!(!is_red(&self.arena, self.arena[id].right), "red node has a red right child");
                }
                let lh = self.check_node(self.arena[id].left);
                let rh = self.check_node(self.arena[id].right);
                assert_eq!(lh, rh, "unequal black-height across children");
                lh + if self.arena[id].tag == Color::Black { 1 } else { 0 }
            }
        }
    }
}

/// CLRS `RB-INSERT-FIXUP`: recolor while the uncle is red, rotate once
/// (single or double) and recolor when the uncle is black, then force the
/// root black unconditionally.
fn fixup_insert<K, V>(arena: &mut Arena<RbNode<K, V>>, root: &mut Option<NodeId>, mut z: NodeId) {
    loop {
        let p = match arena[z].parent {
            Some(p) if arena[p].tag == Color::Red => p,
            _ => break,
        };
        let gp = arena[p]
            .parent
            .expect("a red node's parent always has a parent because the root is always black");
        if arena[gp].left == Some(p) {
            let uncle = arena[gp].right;
            if is_red(arena, uncle) {
                arena[p].tag = Color::Black;
                arena[uncle.unwrap()].tag = Color::Black;
                arena[gp].tag = Color::Red;
                z = gp;
            } else {
                if arena[p].right == Some(z) {
                    rotate_left(arena, root, p);
                    z = p;
                }
                let p2 = arena[z].parent.unwrap();
                let gp2 = arena[p2].parent.unwrap();
                arena[p2].tag = Color::Black;
                arena[gp2].tag = Color::Red;
                rotate_right(arena, root, gp2);
                break;
            }
        } else {
            let uncle = arena[gp].left;
            if is_red(arena, uncle) {
                arena[p].tag = Color::Black;
                arena[uncle.unwrap()].tag = Color::Black;
                arena[gp].tag = Color::Red;
                z = gp;
            } else {
                if arena[p].left == Some(z) {
                    rotate_right(arena, root, p);
                    z = p;
                }
                let p2 = arena[z].parent.unwrap();
                let gp2 = arena[p2].parent.unwrap();
                arena[p2].tag = Color::Black;
                arena[gp2].tag = Color::Red;
                rotate_left(arena, root, gp2);
                break;
            }
        }
    }
    if let Some(r) = *root {
        arena[r].tag = Color::Black;
    }
}

/// CLRS `RB-DELETE-FIXUP`, parameterized on `(parent, was_left)` instead of
/// `x.p`/`x == x.p.left` since a nil `x` carries no node of its own to read
/// those from.
fn fixup_delete<K, V>(
    arena: &mut Arena<RbNode<K, V>>,
    root: &mut Option<NodeId>,
    mut x: Option<NodeId>,
    mut parent: Option<NodeId>,
    mut x_is_left: bool,
) {
    while x != *root && !is_red(arena, x) {
        let p = match parent {
            Some(p) => p,
            None => break,
        };
        if x_is_left {
            let mut w = arena[p]
                .right
                .expect("double-black node's sibling cannot be nil under the black-height invariant");
            if arena[w].tag == Color::Red {
                arena[w].tag = Color::Black;
                arena[p].tag = Color::Red;
                rotate_left(arena, root, p);
                w = arena[p].right.expect("sibling reappears as p's new right child after rotation");
            }
            if !is_red(arena, arena[w].left) && !is_red(arena, arena[w].right) {
                arena[w].tag = Color::Red;
                x_is_left = arena[p].parent.is_some_and(|gp| arena[gp].left == Some(p));
                parent = arena[p].parent;
                x = Some(p);
            } else {
                if !is_red(arena, arena[w].right) {
                    if let Some(wl) = arena[w].left {
                        arena[wl].tag = Color::Black;
                    }
                    arena[w].tag = Color::Red;
                    rotate_right(arena, root, w);
                    w = arena[p].right.expect("sibling reappears after inner rotation");
                }
                arena[w].tag = arena[p].tag;
                arena[p].tag = Color::Black;
                if let Some(wr) = arena[w].right {
                    arena[wr].tag = Color::Black;
                }
                rotate_left(arena, root, p);
                x = *root;
                parent = None;
            }
        } else {
            let mut w = arena[p]
                .left
                .expect("double-black node's sibling cannot be nil under the black-height invariant");
            if arena[w].tag == Color::Red {
                arena[w].tag = Color::Black;
                arena[p].tag = Color::Red;
                rotate_right(arena, root, p);
                w = arena[p].left.expect("sibling reappears as p's new left child after rotation");
            }
            if !is_red(arena, arena[w].left) && !is_red(arena, arena[w].right) {
                arena[w].tag = Color::Red;
                x_is_left = arena[p].parent.is_some_and(|gp| arena[gp].left == Some(p));
                parent = arena[p].parent;
                x = Some(p);
            } else {
                if !is_red(arena, arena[w].left) {
                    if let Some(wr) = arena[w].right {
                        arena[wr].tag = Color::Black;
                    }
                    arena[w].tag = Color::Red;
                    rotate_left(arena, root, w);
                    w = arena[p].left.expect("sibling reappears after inner rotation");
                }
                arena[w].tag = arena[p].tag;
                arena[p].tag = Color::Black;
                if let Some(wl) = arena[w].left {
                    arena[wl].tag = Color::Black;
                }
                rotate_right(arena, root, p);
                x = *root;
                parent = None;
            }
        }
    }
    if let Some(xx) = x {
        arena[xx].tag = Color::Black;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp_i32(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn scenario_2_dup_and_delete() {
        let mut m = RedBlackMap::new(cmp_i32);
        assert!(m.insert(5, "x").is_inserted());
        assert!(m.insert(5, "y").is_duplicate());
        assert_eq!(m.select(&5), Some(&"x"));
        assert!(m.delete(&5));
        assert_eq!(m.select(&5), None);
    }

    #[test]
    fn holds_invariants_under_ascending_inserts() {
        let mut m = RedBlackMap::new(cmp_i32);
        for i in 0..2000 {
            m.insert(i, i);
        }
        m.check_invariants();
    }

    #[test]
    fn holds_invariants_under_random_insert_delete() {
        let mut m = RedBlackMap::new(cmp_i32);
        let mut present = std::collections::BTreeSet::new();
        let mut state = 2463534242u64;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 800) as i32
        };
        for _ in 0..8000 {
            let k = next();
            if present.contains(&k) {
                assert!(m.delete(&k));
                present.remove(&k);
            } else {
                assert!(m.insert(k, k).is_inserted());
                present.insert(k);
            }
            m.check_invariants();
            assert_eq!(m.len(), present.len());
        }
        for k in &present {
            assert_eq!(m.select(k), Some(k));
        }
    }

    #[test]
    fn foreach_visits_in_ascending_order() {
        let mut m = RedBlackMap::new(cmp_i32);
        for k in [10, 5, 15, 3, 7, 12, 20] {
            m.insert(k, ());
        }
        let mut seen = Vec::new();
        m.foreach(|k, _| {
            seen.push(*k);
            true
        });
        assert_eq!(seen, vec![3, 5, 7, 10, 12, 15, 20]);
    }

    #[test]
    fn delete_down_to_empty_keeps_root_invariant() {
        let mut m = RedBlackMap::new(cmp_i32);
        for i in 0..50 {
            m.insert(i, i);
        }
        for i in 0..50 {
            assert!(m.delete(&i));
            m.check_invariants();
        }
        assert_eq!(m.len(), 0);
        assert!(m.select(&0).is_none());
    }
}
