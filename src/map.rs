// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The `Map` facade: one of the nine engines behind a single capability set
//! -- `{clear, select, insert, unlink, delete, foreach}` plus a `sorted`
//! flag fixed at construction.
//!
//! The source's vtable-over-function-pointers has two equally valid Rust
//! renderings: a tagged variant, or an interface with one implementation
//! per engine. This module offers both. [`MapEngine`] is a closed enum --
//! the variant set can never grow without a source change, so an enum
//! dispatches without any heap indirection, the same preference for
//! concrete enums over trait objects shown elsewhere in this crate whenever
//! a variant set is closed. [`ContainerMap`] is the same capability set as
//! an object-safe trait, implemented for `MapEngine<K, V>`, for callers who
//! want to hold a heterogeneous collection of Maps behind
//! `Box<dyn ContainerMap<K, V>>` -- analogous to a backend trait whose
//! implementation set genuinely is open-ended (e.g. a disk-backed index
//! alongside an in-memory one), which needs the trait-object form
//! unconditionally. Ours doesn't need it unconditionally, so it isn't
//! forced on callers who only ever construct one concrete engine.

use crate::callbacks::InsertOutcome;
use crate::error::ClassicResult;
use crate::hash::chained::ChainedMap;
use crate::hash::open_addressing::OpenAddressingMap;
use crate::tree::avl::AvlMap;
use crate::tree::path_reduction::PathReductionMap;
use crate::tree::redblack::RedBlackMap;
use crate::tree::splay::SplayMap;
use crate::tree::treap::TreapMap;
use crate::tree::weight_balanced::WeightBalancedMap;
use crate::skiplist::SkipListMap;
use std::cmp::Ordering;

/// One of the nine interchangeable key-value engines, selected at
/// construction and fixed for the container's lifetime.
pub enum MapEngine<K, V> {
    Avl(AvlMap<K, V>),
    RedBlack(RedBlackMap<K, V>),
    WeightBalanced(WeightBalancedMap<K, V>),
    PathReduction(PathReductionMap<K, V>),
    Splay(SplayMap<K, V>),
    Treap(TreapMap<K, V>),
    SkipList(SkipListMap<K, V>),
    Chained(ChainedMap<K, V>),
    OpenAddressing(OpenAddressingMap<K, V>),
}

impl<K, V> MapEngine<K, V> {
    pub fn avl(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        MapEngine::Avl(AvlMap::new(cmp))
    }

    pub fn red_black(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        MapEngine::RedBlack(RedBlackMap::new(cmp))
    }

    pub fn weight_balanced(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        MapEngine::WeightBalanced(WeightBalancedMap::new(cmp))
    }

    pub fn path_reduction(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        MapEngine::PathReduction(PathReductionMap::new(cmp))
    }

    pub fn splay(cmp: impl Fn(&K, &K) -> Ordering + 'static) -> Self {
        MapEngine::Splay(SplayMap::new(cmp))
    }

    pub fn treap(
        cmp: impl Fn(&K, &K) -> Ordering + 'static,
        priority: impl Fn(&K) -> u64 + 'static,
    ) -> Self {
        MapEngine::Treap(TreapMap::new(cmp, priority))
    }

    pub fn skip_list(
        cmp: impl Fn(&K, &K) -> Ordering + 'static,
        max_link: u32,
        level_cb: impl FnMut() -> usize + 'static,
    ) -> ClassicResult<Self> {
        Ok(MapEngine::SkipList(SkipListMap::new(cmp, max_link, level_cb)?))
    }

    pub fn chained(
        cmp: impl Fn(&K, &K) -> Ordering + 'static,
        hash: impl Fn(&K) -> u64 + 'static,
        size: u32,
    ) -> ClassicResult<Self> {
        Ok(MapEngine::Chained(ChainedMap::new(cmp, hash, size)?))
    }

    pub fn open_addressing(
        cmp: impl Fn(&K, &K) -> Ordering + 'static,
        hash: impl Fn(&K) -> u64 + 'static,
        size: u32,
    ) -> ClassicResult<Self> {
        Ok(MapEngine::OpenAddressing(OpenAddressingMap::new(cmp, hash, size)?))
    }

    pub fn len(&self) -> usize {
        match self {
            MapEngine::Avl(m) => m.len(),
            MapEngine::RedBlack(m) => m.len(),
            MapEngine::WeightBalanced(m) => m.len(),
            MapEngine::PathReduction(m) => m.len(),
            MapEngine::Splay(m) => m.len(),
            MapEngine::Treap(m) => m.len(),
            MapEngine::SkipList(m) => m.len(),
            MapEngine::Chained(m) => m.len(),
            MapEngine::OpenAddressing(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` for every ordered engine (AVL, red-black, weight-balanced,
    /// path-reduction, splay, treap) and the skip list; `false` for the two
    /// hash engines. Fixed by which variant the Map holds -- never toggled
    /// at runtime.
    pub fn sorted(&self) -> bool {
        !matches!(self, MapEngine::Chained(_) | MapEngine::OpenAddressing(_))
    }

    pub fn clear(&mut self) {
        match self {
            MapEngine::Avl(m) => m.clear(),
            MapEngine::RedBlack(m) => m.clear(),
            MapEngine::WeightBalanced(m) => m.clear(),
            MapEngine::PathReduction(m) => m.clear(),
            MapEngine::Splay(m) => m.clear(),
            MapEngine::Treap(m) => m.clear(),
            MapEngine::SkipList(m) => m.clear(),
            MapEngine::Chained(m) => m.clear(),
            MapEngine::OpenAddressing(m) => m.clear(),
        }
    }

    /// Takes `&mut self` uniformly across every variant, even though only
    /// the splay engine's lookup is actually mutating (it splays the found
    /// or last-visited node to the root) -- a single facade signature that
    /// fits the one engine needing it costs the other eight nothing.
    pub fn select(&mut self, key: &K) -> Option<&V> {
        match self {
            MapEngine::Avl(m) => m.select(key),
            MapEngine::RedBlack(m) => m.select(key),
            MapEngine::WeightBalanced(m) => m.select(key),
            MapEngine::PathReduction(m) => m.select(key),
            MapEngine::Splay(m) => m.select(key),
            MapEngine::Treap(m) => m.select(key),
            MapEngine::SkipList(m) => m.select(key),
            MapEngine::Chained(m) => m.select(key),
            MapEngine::OpenAddressing(m) => m.select(key),
        }
    }

    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        match self {
            MapEngine::Avl(m) => m.insert(key, value),
            MapEngine::RedBlack(m) => m.insert(key, value),
            MapEngine::WeightBalanced(m) => m.insert(key, value),
            MapEngine::PathReduction(m) => m.insert(key, value),
            MapEngine::Splay(m) => m.insert(key, value),
            MapEngine::Treap(m) => m.insert(key, value),
            MapEngine::SkipList(m) => m.insert(key, value),
            MapEngine::Chained(m) => m.insert(key, value),
            MapEngine::OpenAddressing(m) => m.insert(key, value),
        }
    }

    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        match self {
            MapEngine::Avl(m) => m.unlink(key),
            MapEngine::RedBlack(m) => m.unlink(key),
            MapEngine::WeightBalanced(m) => m.unlink(key),
            MapEngine::PathReduction(m) => m.unlink(key),
            MapEngine::Splay(m) => m.unlink(key),
            MapEngine::Treap(m) => m.unlink(key),
            MapEngine::SkipList(m) => m.unlink(key),
            MapEngine::Chained(m) => m.unlink(key),
            MapEngine::OpenAddressing(m) => m.unlink(key),
        }
    }

    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    /// Visits every stored pair -- ascending by key for every `sorted`
    /// variant, arbitrary bucket/probe order for the two hash engines.
    /// Stops early and returns `false` as soon as `f` does.
    pub fn foreach(&self, mut f: impl FnMut(&K, &V) -> bool) -> bool {
        match self {
            MapEngine::Avl(m) => m.foreach(f),
            MapEngine::RedBlack(m) => m.foreach(f),
            MapEngine::WeightBalanced(m) => m.foreach(f),
            MapEngine::PathReduction(m) => m.foreach(f),
            MapEngine::Splay(m) => m.foreach(f),
            MapEngine::Treap(m) => m.foreach(f),
            MapEngine::SkipList(m) => m.foreach(f),
            MapEngine::Chained(m) => m.foreach(f),
            MapEngine::OpenAddressing(m) => m.foreach(f),
        }
    }
}

/// The `Map` capability set as an object-safe trait, for callers who need to
/// hold several different engines behind one dynamically dispatched type
/// (e.g. `Vec<Box<dyn ContainerMap<K, V>>>`). `foreach` takes a trait-object
/// callback rather than a generic one to keep the trait object-safe --
/// `&mut dyn FnMut` still accepts an ordinary closure at the call site.
pub trait ContainerMap<K, V> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn sorted(&self) -> bool;
    fn clear(&mut self);
    fn select(&mut self, key: &K) -> Option<&V>;
    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V>;
    fn unlink(&mut self, key: &K) -> Option<(K, V)>;
    fn delete(&mut self, key: &K) -> bool;
    fn foreach_dyn(&self, f: &mut dyn FnMut(&K, &V) -> bool) -> bool;
}

impl<K, V> ContainerMap<K, V> for MapEngine<K, V> {
    fn len(&self) -> usize {
        MapEngine::len(self)
    }

    fn is_empty(&self) -> bool {
        MapEngine::is_empty(self)
    }

    fn sorted(&self) -> bool {
        MapEngine::sorted(self)
    }

    fn clear(&mut self) {
        MapEngine::clear(self)
    }

    fn select(&mut self, key: &K) -> Option<&V> {
        MapEngine::select(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        MapEngine::insert(self, key, value)
    }

    fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        MapEngine::unlink(self, key)
    }

    fn delete(&mut self, key: &K) -> bool {
        MapEngine::delete(self, key)
    }

    fn foreach_dyn(&self, f: &mut dyn FnMut(&K, &V) -> bool) -> bool {
        MapEngine::foreach(self, f)
    }
}
