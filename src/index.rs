//! Ordered keyed index over an arena of nodes.
//!
//! A plain binary search tree: no rebalancing, so lookup cost is
//! O(depth) with a worst case of O(n) when keys arrive pre-sorted.
//! That trade-off is acceptable at library scale and is part of the
//! contract; a balanced structure could replace this one behind the
//! same `insert`/`get`/`remove`/`iter` surface.
//!
//! Nodes live in a `Vec` and reference each other by index, with
//! freed slots recycled through a free list. All operations are
//! iterative (explicit descent loops, explicit-stack iterator), so
//! deep trees cannot overflow the call stack.

use std::borrow::Borrow;
use std::cmp::Ordering;

/// One arena slot: a key, its payload, and child links.
#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<usize>,
    right: Option<usize>,
}

/// Ordered lookup structure mapping keys to typed payloads.
///
/// Inserting an existing key replaces its payload in place; keys are
/// never duplicated in the tree.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    root: Option<usize>,
    len: usize,
}

impl<K: Ord, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Number of keys in the index
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a key, replacing the payload if the key already exists.
    ///
    /// Returns the previous payload on replacement.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(root) = self.root else {
            let idx = self.alloc(key, value);
            self.root = Some(idx);
            self.len = 1;
            return None;
        };

        let mut cur = root;
        loop {
            match key.cmp(&self.node(cur).key) {
                Ordering::Less => match self.node(cur).left {
                    Some(next) => cur = next,
                    None => {
                        let idx = self.alloc(key, value);
                        self.node_mut(cur).left = Some(idx);
                        self.len += 1;
                        return None;
                    }
                },
                Ordering::Greater => match self.node(cur).right {
                    Some(next) => cur = next,
                    None => {
                        let idx = self.alloc(key, value);
                        self.node_mut(cur).right = Some(idx);
                        self.len += 1;
                        return None;
                    }
                },
                Ordering::Equal => {
                    let node = self.node_mut(cur);
                    return Some(std::mem::replace(&mut node.value, value));
                }
            }
        }
    }

    /// Look up the payload for a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root?;
        loop {
            match key.cmp(self.node(cur).key.borrow()) {
                Ordering::Less => cur = self.node(cur).left?,
                Ordering::Greater => cur = self.node(cur).right?,
                Ordering::Equal => return Some(&self.node(cur).value),
            }
        }
    }

    /// Look up the payload for a key, mutably
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root?;
        loop {
            match key.cmp(self.node(cur).key.borrow()) {
                Ordering::Less => cur = self.node(cur).left?,
                Ordering::Greater => cur = self.node(cur).right?,
                Ordering::Equal => return Some(&mut self.node_mut(cur).value),
            }
        }
    }

    /// Check whether a key is present
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Remove a key, returning its payload.
    ///
    /// A node with two children is replaced by its in-order successor
    /// (the minimum of the right subtree); a leaf or single-child node
    /// is spliced out. Removing a missing key is a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // Locate the target and which parent link points at it
        let mut parent: Option<(usize, Side)> = None;
        let mut cur = self.root?;
        loop {
            match key.cmp(self.node(cur).key.borrow()) {
                Ordering::Less => {
                    parent = Some((cur, Side::Left));
                    cur = self.node(cur).left?;
                }
                Ordering::Greater => {
                    parent = Some((cur, Side::Right));
                    cur = self.node(cur).right?;
                }
                Ordering::Equal => break,
            }
        }

        let (left, right) = (self.node(cur).left, self.node(cur).right);
        self.len -= 1;

        if let (Some(_), Some(right_idx)) = (left, right) {
            // Two children: pull up the in-order successor's key and
            // payload, then splice the successor out of the right
            // subtree (it never has a left child).
            let mut succ_parent: Option<usize> = None;
            let mut succ = right_idx;
            while let Some(next) = self.node(succ).left {
                succ_parent = Some(succ);
                succ = next;
            }
            let succ_right = self.node(succ).right;
            match succ_parent {
                Some(p) => self.node_mut(p).left = succ_right,
                None => self.node_mut(cur).right = succ_right,
            }
            let succ_node = self.release(succ);
            let target = self.node_mut(cur);
            target.key = succ_node.key;
            Some(std::mem::replace(&mut target.value, succ_node.value))
        } else {
            let child = left.or(right);
            match parent {
                None => self.root = child,
                Some((p, Side::Left)) => self.node_mut(p).left = child,
                Some((p, Side::Right)) => self.node_mut(p).right = child,
            }
            Some(self.release(cur).value)
        }
    }

    /// Iterate over (key, payload) pairs in ascending key order.
    ///
    /// The iterator is lazy and restartable; it holds a shared borrow
    /// of the index for its lifetime.
    pub fn iter(&self) -> InOrder<'_, K, V> {
        InOrder {
            index: self,
            stack: Vec::new(),
            next: self.root,
        }
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            left: None,
            right: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> Node<K, V> {
        self.free.push(idx);
        self.nodes[idx].take().expect("released slot must be occupied")
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.nodes[idx].as_ref().expect("linked slot must be occupied")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.nodes[idx].as_mut().expect("linked slot must be occupied")
    }
}

/// Which parent link points at a node
#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Lazy in-order iterator over an [`OrderedIndex`]
#[derive(Debug)]
pub struct InOrder<'a, K, V> {
    index: &'a OrderedIndex<K, V>,
    stack: Vec<usize>,
    next: Option<usize>,
}

impl<'a, K: Ord, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.next {
            self.stack.push(idx);
            self.next = self.index.node(idx).left;
        }
        let idx = self.stack.pop()?;
        let node = self.index.node(idx);
        self.next = node.right;
        Some((&node.key, &node.value))
    }
}
