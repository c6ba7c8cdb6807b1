// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Separate-chaining hash table with chains kept sorted by ascending hash.
//!
//! Each bucket is a singly linked chain of [`ChainedNode`]s ordered by
//! ascending cached hash, which lets both lookup and insertion terminate
//! early as soon as a chain entry's hash exceeds the target's — the chain
//! can never contain a match beyond that point.

use crate::arena::{Arena, NodeId};
use crate::callbacks::InsertOutcome;
use crate::error::{ClassicError, ClassicResult};
use crate::hash::{over_load_factor, prime_geq};
use std::cmp::Ordering;

struct ChainedNode<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<NodeId>,
}

/// A key-value map backed by a separate-chaining hash table.
pub struct ChainedMap<K, V> {
    arena: Arena<ChainedNode<K, V>>,
    table: Vec<Option<NodeId>>,
    count: usize,
    cmp: Box<dyn Fn(&K, &K) -> Ordering>,
    hash: Box<dyn Fn(&K) -> u64>,
}

impl<K, V> ChainedMap<K, V> {
    /// Creates a table with initial bucket count `prime_geq(size)`.
    ///
    /// `size == 0` is rejected: it isn't meaningless (an empty table is
    /// actually the common starting point, sized up to the first prime),
    /// but it signals a caller that forgot to size the table at all.
    pub fn new(
        cmp: impl Fn(&K, &K) -> Ordering + 'static,
        hash: impl Fn(&K) -> u64 + 'static,
        size: u32,
    ) -> ClassicResult<Self> {
        if size == 0 {
            return Err(ClassicError::InvalidArgument {
                what: "chained hash table capacity must be non-zero",
            });
        }
        let bucket_count = prime_geq(u64::from(size));
        Ok(ChainedMap {
            arena: Arena::new(),
            table: vec![None; bucket_count as usize],
            count: 0,
            cmp: Box::new(cmp),
            hash: Box::new(hash),
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drops every stored pair and re-blanks the bucket table. Tolerates a
    /// zero-bucket table (e.g. after a pathological prior grow failure),
    /// unlike the source, which assumes the table pointer always has room.
    pub fn clear(&mut self) {
        self.arena.clear();
        for slot in self.table.iter_mut() {
            *slot = None;
        }
        self.count = 0;
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.table.len() as u64) as usize
    }

    pub fn select(&self, key: &K) -> Option<&V> {
        if self.table.is_empty() {
            return None;
        }
        let hash = (self.hash)(key);
        let mut cur = self.table[self.bucket_of(hash)];
        while let Some(id) = cur {
            let node = &self.arena[id];
            if node.hash > hash {
                return None;
            }
            if node.hash == hash && (self.cmp)(key, &node.key) == Ordering::Equal {
                return Some(&node.value);
            }
            cur = node.next;
        }
        None
    }

    /// Grows the table to `prime_geq(min_size)`, rehashing every node while
    /// preserving per-bucket hash order. A failed allocation leaves the
    /// table at its old size — non-fatal, per the load-factor contract.
    fn try_grow(&mut self, min_size: u32) {
        let new_size = prime_geq(u64::from(min_size));
        if new_size as usize == self.table.len() {
            return;
        }
        let mut new_table: Vec<Option<NodeId>> = Vec::new();
        if new_table.try_reserve_exact(new_size as usize).is_err() {
            log::warn!(
                "chained hash table grow to {} buckets failed: insert proceeds at old size {}",
                new_size,
                self.table.len()
            );
            return;
        }
        new_table.resize(new_size as usize, None);

        for bucket in 0..self.table.len() {
            let mut cur = self.table[bucket].take();
            while let Some(id) = cur {
                let next = self.arena[id].next;
                let hash = self.arena[id].hash;
                let target = (hash % u64::from(new_size)) as usize;
                insert_sorted_by_hash(&mut self.arena, &mut new_table, target, id, hash);
                cur = next;
            }
        }
        self.table = new_table;
        log::trace!("chained hash table grown to {} buckets", new_size);
    }

    /// Inserts `key` -> `value`. If `key` is already present, the pair is
    /// left untouched and [`InsertOutcome::Duplicate`] exposes the stored
    /// value for inspection or in-place update.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<'_, V> {
        if over_load_factor(self.count, self.table.len() as u32) {
            self.try_grow(self.table.len() as u32 + 1);
        }

        let hash = (self.hash)(&key);
        let bucket = self.bucket_of(hash);

        let mut cur = self.table[bucket];
        let mut prev: Option<NodeId> = None;
        while let Some(id) = cur {
            let node = &self.arena[id];
            if hash < node.hash {
                break;
            }
            if hash == node.hash && (self.cmp)(&key, &node.key) == Ordering::Equal {
                return InsertOutcome::Duplicate(&mut self.arena[id].value);
            }
            prev = Some(id);
            cur = node.next;
        }

        let new_id = self.arena.alloc(ChainedNode {
            key,
            value,
            hash,
            next: cur,
        });
        match prev {
            None => self.table[bucket] = Some(new_id),
            Some(p) => self.arena[p].next = Some(new_id),
        }
        self.count += 1;
        InsertOutcome::Inserted
    }

    /// Removes `key`, handing ownership of the stored pair back to the
    /// caller without running any destructor (Rust's `Drop` already covers
    /// the "destructor" contract for anything the caller does keep).
    pub fn unlink(&mut self, key: &K) -> Option<(K, V)> {
        if self.table.is_empty() {
            return None;
        }
        let hash = (self.hash)(key);
        let bucket = self.bucket_of(hash);

        let mut cur = self.table[bucket];
        let mut prev: Option<NodeId> = None;
        while let Some(id) = cur {
            let node = &self.arena[id];
            if hash < node.hash {
                return None;
            }
            if hash == node.hash && (self.cmp)(key, &node.key) == Ordering::Equal {
                let next = node.next;
                match prev {
                    None => self.table[bucket] = next,
                    Some(p) => self.arena[p].next = next,
                }
                let removed = self.arena.free(id);
                self.count -= 1;
                return Some((removed.key, removed.value));
            }
            prev = Some(id);
            cur = node.next;
        }
        None
    }

    /// Removes `key`, dropping the stored pair. Returns `false` if absent.
    pub fn delete(&mut self, key: &K) -> bool {
        self.unlink(key).is_some()
    }

    /// Visits every stored pair in unspecified (bucket/chain) order. Stops
    /// early and returns `false` if `f` returns `false`.
    pub fn foreach(&self, mut f: impl FnMut(&K, &V) -> bool) -> bool {
        for bucket in self.table.iter() {
            let mut cur = *bucket;
            while let Some(id) = cur {
                let node = &self.arena[id];
                if !f(&node.key, &node.value) {
                    return false;
                }
                cur = node.next;
            }
        }
        true
    }
}

/// Splices `id` (whose cached hash is `hash`) into `table[bucket]`'s chain,
/// preserving ascending-hash order.
fn insert_sorted_by_hash<K, V>(
    arena: &mut Arena<ChainedNode<K, V>>,
    table: &mut [Option<NodeId>],
    bucket: usize,
    id: NodeId,
    hash: u64,
) {
    let mut cur = table[bucket];
    let mut prev: Option<NodeId> = None;
    while let Some(cid) = cur {
        if hash < arena[cid].hash {
            break;
        }
        prev = Some(cid);
        cur = arena[cid].next;
    }
    arena[id].next = cur;
    match prev {
        None => table[bucket] = Some(id),
        Some(p) => arena[p].next = Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp_i32(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn hash_i32(k: &i32) -> u64 {
        *k as u64
    }

    #[test]
    fn insert_select_duplicate_delete() {
        let mut m = ChainedMap::new(cmp_i32, hash_i32, 3).unwrap();
        assert!(m.insert(5, "x").is_inserted());
        assert!(m.insert(5, "y").is_duplicate());
        assert_eq!(m.select(&5), Some(&"x"));
        assert!(m.delete(&5));
        assert_eq!(m.select(&5), None);
    }

    #[test]
    fn grows_past_load_factor_and_keeps_all_entries() {
        let mut m = ChainedMap::new(cmp_i32, hash_i32, 3).unwrap();
        for i in 0..20 {
            assert!(m.insert(i, i * 10).is_inserted());
        }
        assert_eq!(m.len(), 20);
        assert_eq!(m.select(&13), Some(&130));
        for i in 0..20 {
            assert_eq!(m.select(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn chains_stay_sorted_by_hash_after_grow() {
        let mut m = ChainedMap::new(cmp_i32, hash_i32, 3).unwrap();
        for i in (0..40).rev() {
            m.insert(i, ());
        }
        for bucket in &m.table {
            let mut cur = *bucket;
            let mut last_hash = None;
            while let Some(id) = cur {
                let node = &m.arena[id];
                if let Some(h) = last_hash {
                    assert!(node.hash >= h);
                }
                last_hash = Some(node.hash);
                cur = node.next;
            }
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(ChainedMap::new(cmp_i32, hash_i32, 0).is_err());
    }

    #[test]
    fn foreach_visits_every_key_exactly_once() {
        let mut m = ChainedMap::new(cmp_i32, hash_i32, 11).unwrap();
        for i in 0..10 {
            m.insert(i, i);
        }
        let mut seen = Vec::new();
        m.foreach(|k, _| {
            seen.push(*k);
            true
        });
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }
}
