// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The four rotation primitives shared by every ordered tree engine.
//!
//! Single-left and single-right rewire three nodes and at most one
//! non-null grandchild (the moving subtree); double rotations are simply
//! two single rotations composed by the caller (rotate the child, then
//! rotate the parent the other way). Tag fixup — balance factors, color,
//! weight, priority — is engine-specific and always runs *after* pointer
//! rewiring, so it is left to each engine rather than baked in here.

use super::Node;
use crate::arena::{Arena, NodeId};

/// Rotates `x` left: `x`'s right child `y` becomes the new subtree root,
/// `x` becomes `y`'s left child, and `y`'s old left subtree becomes `x`'s
/// new right subtree. Returns `y`. Updates `root` if `x` was the tree root.
///
/// # Panics
/// Panics if `x` has no right child — every caller must check this first,
/// since it is a logic error, not a data-dependent outcome.
pub(crate) fn rotate_left<K, V, Tag>(
    arena: &mut Arena<Node<K, V, Tag>>,
    root: &mut Option<NodeId>,
    x: NodeId,
) -> NodeId {
    let y = arena[x].right.expect("rotate_left requires a right child");
    let y_left = arena[y].left;

    arena[x].right = y_left;
    if let Some(t) = y_left {
        arena[t].parent = Some(x);
    }

    let x_parent = arena[x].parent;
    arena[y].parent = x_parent;
    match x_parent {
        None => *root = Some(y),
        Some(p) => {
            if arena[p].left == Some(x) {
                arena[p].left = Some(y);
            } else {
                arena[p].right = Some(y);
            }
        }
    }

    arena[y].left = Some(x);
    arena[x].parent = Some(y);
    y
}

/// Mirror of [`rotate_left`]: `x`'s left child becomes the new subtree root.
///
/// # Panics
/// Panics if `x` has no left child.
pub(crate) fn rotate_right<K, V, Tag>(
    arena: &mut Arena<Node<K, V, Tag>>,
    root: &mut Option<NodeId>,
    x: NodeId,
) -> NodeId {
    let y = arena[x].left.expect("rotate_right requires a left child");
    let y_right = arena[y].right;

    arena[x].left = y_right;
    if let Some(t) = y_right {
        arena[t].parent = Some(x);
    }

    let x_parent = arena[x].parent;
    arena[y].parent = x_parent;
    match x_parent {
        None => *root = Some(y),
        Some(p) => {
            if arena[p].left == Some(x) {
                arena[p].left = Some(y);
            } else {
                arena[p].right = Some(y);
            }
        }
    }

    arena[y].right = Some(x);
    arena[x].parent = Some(y);
    y
}

/// Double rotation: rotate `x`'s left child left, then rotate `x` right.
/// Used when the inner grandchild on the left side is the heavier one.
pub(crate) fn rotate_left_right<K, V, Tag>(
    arena: &mut Arena<Node<K, V, Tag>>,
    root: &mut Option<NodeId>,
    x: NodeId,
) -> NodeId {
    let left = arena[x].left.expect("rotate_left_right requires a left child");
    rotate_left(arena, root, left);
    rotate_right(arena, root, x)
}

/// Double rotation: rotate `x`'s right child right, then rotate `x` left.
/// Mirror of [`rotate_left_right`].
pub(crate) fn rotate_right_left<K, V, Tag>(
    arena: &mut Arena<Node<K, V, Tag>>,
    root: &mut Option<NodeId>,
    x: NodeId,
) -> NodeId {
    let right = arena[x].right.expect("rotate_right_left requires a right child");
    rotate_right(arena, root, right);
    rotate_left(arena, root, x)
}
