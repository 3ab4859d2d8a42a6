use std::collections::BinaryHeap;

use ahash::{HashMap, HashMapExt};

use crate::poly::packing::PackedKey;

/// A product term that has not been merged yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Candidate {
    /// Term `term` of the dividend.
    Dividend { term: usize },
    /// Term `term` of generator `generator` times
    /// term `quotient_term` of the quotient of that generator.
    Product {
        generator: usize,
        term: usize,
        quotient_term: usize,
    },
}

/// A max-queue of candidates, keyed by packed monomial.
///
/// Only distinct monomials enter the heap. All candidates with the same monomial
/// are chained in a map from the monomial to a list of node indices, so that
/// popping the top monomial yields the whole group at once.
/// Nodes live in an arena and are recycled through a free list.
pub struct CandidateQueue {
    nodes: Vec<Candidate>,
    free: Vec<u32>,
    heap: BinaryHeap<PackedKey>,
    chains: HashMap<PackedKey, Vec<u32>>,
    spare_chains: Vec<Vec<u32>>,
}

impl CandidateQueue {
    pub fn with_capacity(cap: usize) -> Self {
        CandidateQueue {
            nodes: Vec::with_capacity(cap),
            free: Vec::with_capacity(cap),
            heap: BinaryHeap::with_capacity(cap),
            chains: HashMap::with_capacity(cap),
            spare_chains: vec![],
        }
    }

    /// Store a candidate in a free node and return its index.
    #[inline]
    pub fn alloc(&mut self, candidate: Candidate) -> u32 {
        if let Some(i) = self.free.pop() {
            self.nodes[i as usize] = candidate;
            i
        } else {
            self.nodes.push(candidate);
            (self.nodes.len() - 1) as u32
        }
    }

    /// Return a node to the free list.
    #[inline]
    pub fn release(&mut self, node: u32) {
        debug_assert!(!self.free.contains(&node));
        self.free.push(node);
    }

    #[inline]
    pub fn get(&self, node: u32) -> Candidate {
        self.nodes[node as usize]
    }

    #[inline]
    pub fn set(&mut self, node: u32, candidate: Candidate) {
        self.nodes[node as usize] = candidate;
    }

    /// The number of nodes that were ever allocated.
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn peek(&self) -> Option<&PackedKey> {
        self.heap.peek()
    }

    /// Enqueue `node` under `key`.
    pub fn insert(&mut self, key: PackedKey, node: u32) {
        if let Some(chain) = self.chains.get_mut(&key) {
            chain.push(node);
        } else {
            let mut chain = self.spare_chains.pop().unwrap_or_default();
            chain.push(node);
            self.chains.insert(key.clone(), chain);
            self.heap.push(key); // only add when new
        }
    }

    /// Move all nodes with the largest key into `group` and return that key.
    pub fn pop_group(&mut self, group: &mut Vec<u32>) -> Option<PackedKey> {
        let key = self.heap.pop()?;
        if let Some(mut chain) = self.chains.remove(&key) {
            group.append(&mut chain);
            self.spare_chains.push(chain);
        }
        Some(key)
    }

    /// Drop all content but keep the allocated memory.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.heap.clear();
        for (_, mut chain) in self.chains.drain() {
            chain.clear();
            self.spare_chains.push(chain);
        }
    }
}

#[cfg(test)]
mod test {
    use smallvec::smallvec;

    use super::{Candidate, CandidateQueue};

    #[test]
    fn groups() {
        let mut q = CandidateQueue::with_capacity(4);

        let a = q.alloc(Candidate::Dividend { term: 0 });
        let b = q.alloc(Candidate::Product {
            generator: 0,
            term: 1,
            quotient_term: 0,
        });
        let c = q.alloc(Candidate::Dividend { term: 1 });

        q.insert(smallvec![5, 1], a);
        q.insert(smallvec![3, 7], c);
        q.insert(smallvec![5, 1], b);

        let mut group = vec![];
        assert_eq!(q.pop_group(&mut group), Some(smallvec![5, 1]));
        assert_eq!(group, vec![a, b]);
        assert_eq!(q.get(b), Candidate::Product {
            generator: 0,
            term: 1,
            quotient_term: 0
        });

        q.release(a);
        q.release(b);
        group.clear();

        // released nodes are reused
        let d = q.alloc(Candidate::Dividend { term: 2 });
        assert!(d == a || d == b);
        assert_eq!(q.pool_size(), 3);
        q.insert(smallvec![4, 0], d);

        assert_eq!(q.pop_group(&mut group), Some(smallvec![4, 0]));
        assert_eq!(group, vec![d]);
        group.clear();
        assert_eq!(q.pop_group(&mut group), Some(smallvec![3, 7]));
        assert_eq!(group, vec![c]);
        assert!(q.is_empty());
        assert_eq!(q.pop_group(&mut group), None);

        q.insert(smallvec![1, 1], c);
        q.reset();
        assert!(q.is_empty());
        assert_eq!(q.pool_size(), 0);
    }
}
