use std::cmp::Ordering::{Equal, Greater, Less};
use std::iter::FromIterator;

use compare::{natural, Compare, Natural};
use log::{debug, trace};

use crate::iter::{IntoIter, Items, Iter, Keys, LevelIter, Order, Values};
use crate::node::Color::*;
use crate::node::{Arena, Color, Dir, NodeId};

// A mutable red-black tree with parent links. Nodes sit in an arena and
// point at each other by index; rotations and splices rewrite both ends of
// every link they touch before returning.
//
// Insertion and removal first do the plain BST edit, then run a repair
// walk towards the root. Both repairs are loops rather than recursion.

/// An ordered map backed by a red-black tree.
///
/// Keys are ordered by the comparator `C`, which defaults to the keys'
/// natural `Ord`. Inserting a key that is already present is a no-op.
#[derive(Clone)]
pub struct RbTree<K, V, C = Natural<K>> {
    pub(crate) nodes: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    pub(crate) len: usize,
    cmp: C,
}

/// Outcome of a descent: either the node holding the key, or the last node
/// visited and the side of it where the key would hang.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Search {
    Found(NodeId),
    Vacant(Option<(NodeId, Dir)>),
}

/// A read-only view of one node, for inspecting the shape of a tree.
pub struct NodeRef<'a, K: 'a, V: 'a> {
    nodes: &'a Arena<K, V>,
    id: NodeId,
}

impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> NodeRef<'a, K, V> { *self }
}
impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn at(nodes: &'a Arena<K, V>, id: Option<NodeId>) -> Option<NodeRef<'a, K, V>> {
        id.map(|id| NodeRef { nodes, id })
    }

    pub fn key(&self) -> &'a K { &self.nodes[self.id].key }
    pub fn value(&self) -> &'a V { &self.nodes[self.id].value }
    pub fn color(&self) -> Color { self.nodes[self.id].color }
    pub fn is_red(&self) -> bool { self.nodes[self.id].is_red() }

    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        NodeRef::at(self.nodes, self.nodes[self.id].left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        NodeRef::at(self.nodes, self.nodes[self.id].right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        NodeRef::at(self.nodes, self.nodes[self.id].parent)
    }
}

impl<K: Ord, V> RbTree<K, V> {
    /// Creates an empty tree ordered by `K`'s `Ord` implementation.
    #[inline]
    pub fn new() -> RbTree<K, V> {
        RbTree::with_comparator(natural())
    }
}

impl<K: Ord, V> Default for RbTree<K, V> {
    #[inline]
    fn default() -> RbTree<K, V> { RbTree::new() }
}

impl<K, V, C> RbTree<K, V, C> {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The root node, if the tree is not empty.
    pub fn root(&self) -> Option<NodeRef<K, V>> {
        NodeRef::at(&self.nodes, self.root)
    }

    /// Smallest entry.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.nodes.dirmost(r, Dir::Left)))
    }

    /// Largest entry.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.nodes.dirmost(r, Dir::Right)))
    }

    /// Number of nodes on the longest path from the root down, 0 when empty.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, n: Option<NodeId>) -> usize {
        match n {
            None => 0,
            Some(n) => {
                let node = &self.nodes[n];
                1 + self.subtree_height(node.left).max(self.subtree_height(node.right))
            }
        }
    }

    /// Black nodes on the leftmost root-to-leaf path, root included. In a
    /// valid tree every such path agrees.
    pub fn black_height(&self) -> usize {
        let mut n = self.root;
        let mut count = 0;
        while let Some(id) = n {
            if !self.nodes[id].is_red() {
                count += 1;
            }
            n = self.nodes[id].left;
        }
        count
    }

    /// In-order iterator over the entries.
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(&self.nodes, self.root, self.len)
    }

    pub fn iter_pre(&self) -> Items<K, V> {
        Items::new(&self.nodes, self.root, self.len, Order::Pre)
    }

    pub fn iter_post(&self) -> Items<K, V> {
        Items::new(&self.nodes, self.root, self.len, Order::Post)
    }

    /// Breadth-first iterator, root first, each level left to right.
    pub fn iter_level(&self) -> LevelIter<K, V> {
        LevelIter::new(&self.nodes, self.root, self.len)
    }

    pub fn keys(&self) -> Keys<K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<K, V> {
        Values::new(self.iter())
    }

    #[inline]
    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id];
        (&node.key, &node.value)
    }

    /// Rotates the subtree at `n` towards `d`: `rotate(n, Dir::Left)` is the
    /// classic left rotation, lifting `n`'s right child into its place.
    /// The pivot's inner child moves across to `n`. Colors are untouched.
    fn rotate(&mut self, n: NodeId, d: Dir) {
        let pivot = match self.nodes[n].child(d.turnaround()) {
            Some(c) => c,
            None => panic!("cannot rotate {:?} {:?} without a {:?} child", n, d, d.turnaround()),
        };
        let inner = self.nodes[pivot].child(d);
        match self.nodes[n].parent {
            Some(p) => self.nodes.replace_child(p, n, Some(pivot)),
            None => {
                debug!("rotation moves the root from {:?} to {:?}", n, pivot);
                self.root = Some(pivot);
                self.nodes[pivot].parent = None;
            }
        }
        self.nodes.set_child(pivot, Some(n), d);
        self.nodes.set_child(n, inner, d.turnaround());
    }

    fn parent_of(&self, n: NodeId) -> NodeId {
        match self.nodes[n].parent {
            Some(p) => p,
            None => panic!("{:?} has no parent", n),
        }
    }

    fn sibling_of(&self, n: NodeId) -> NodeId {
        // the node being repaired is black, so its sibling's subtree has a
        // black height of at least one and cannot be empty
        match self.nodes.sibling(n) {
            Some(s) => s,
            None => panic!("black non-root {:?} has no sibling", n),
        }
    }

    fn insertion_repair(&mut self, mut n: NodeId) {
        loop {
            let parent = match self.nodes[n].parent {
                None => {
                    trace!("insert repair: {:?} is the root, blackening", n);
                    self.nodes[n].color = Black;
                    return;
                }
                Some(p) => p,
            };
            if !self.nodes[parent].is_red() {
                return;
            }
            let grandparent = match self.nodes.grandparent(n) {
                Some(g) => g,
                None => panic!("red root {:?}", parent),
            };
            let uncle = self.nodes.uncle(n);
            if self.nodes.is_red(uncle) {
                trace!("insert repair: red uncle, recoloring up to {:?}", grandparent);
                self.nodes[parent].color = Black;
                if let Some(u) = uncle {
                    self.nodes[u].color = Black;
                }
                self.nodes[grandparent].color = Red;
                n = grandparent;
                continue;
            }

            let line = match self.nodes.side_of(parent) {
                Some(d) => d,
                None => panic!("{:?} lost its grandparent", n),
            };
            let mut parent = parent;
            if self.nodes.side_of(n) != Some(line) {
                // zig-zag: straighten it so that the old parent is the
                // bottom of a straight line
                trace!("insert repair: straightening at {:?}", parent);
                self.rotate(parent, line);
                n = parent;
                parent = self.parent_of(n);
            }
            trace!("insert repair: rotating {:?} {:?}", grandparent, line.turnaround());
            self.nodes[parent].color = Black;
            self.nodes[grandparent].color = Red;
            self.rotate(grandparent, line.turnaround());
            return;
        }
    }

    // Runs before the black node `n` (with at most one child) is spliced
    // out. Treats `n` as the bearer of the black that is about to vanish
    // and rearranges its neighbourhood so that the paths through `n` carry
    // one black more than they need.
    fn prepare_removal(&mut self, mut n: NodeId) {
        loop {
            // case 1
            let parent = match self.nodes[n].parent {
                Some(p) if !self.nodes[n].is_red() => p,
                _ => return,
            };
            let d = match self.nodes.side_of(n) {
                Some(d) => d,
                None => panic!("{:?} lost its parent", n),
            };
            let mut sibling = self.sibling_of(n);

            // case 2
            if self.nodes[sibling].is_red() {
                trace!("removal repair: red sibling {:?}, rotating {:?}", sibling, parent);
                self.nodes[parent].color = Red;
                self.nodes[sibling].color = Black;
                self.rotate(parent, d);
                sibling = self.sibling_of(n);
            }

            let near = self.nodes[sibling].child(d);
            let far = self.nodes[sibling].child(d.turnaround());
            if !self.nodes.is_red(near) && !self.nodes.is_red(far) {
                if !self.nodes[parent].is_red() {
                    // case 3
                    trace!("removal repair: pushing the deficit up to {:?}", parent);
                    self.nodes[sibling].color = Red;
                    n = parent;
                    continue;
                }
                // case 4
                trace!("removal repair: red parent {:?} absorbs the deficit", parent);
                self.nodes[parent].color = Black;
                self.nodes[sibling].color = Red;
                return;
            }

            // case 5
            if let (Some(c), false) = (near, self.nodes.is_red(far)) {
                trace!("removal repair: turning the near red child {:?} outwards", c);
                self.nodes[sibling].color = Red;
                self.nodes[c].color = Black;
                self.rotate(sibling, d.turnaround());
                sibling = self.sibling_of(n);
            }

            // case 6
            let far = match self.nodes[sibling].child(d.turnaround()) {
                Some(f) if self.nodes[f].is_red() => f,
                _ => panic!("sibling {:?} of {:?} has no red far child", sibling, n),
            };
            trace!("removal repair: rotating {:?} towards {:?}", parent, d);
            self.nodes[sibling].color = self.nodes[parent].color;
            self.nodes[parent].color = Black;
            self.nodes[far].color = Black;
            self.rotate(parent, d);
            return;
        }
    }

    fn remove_node(&mut self, mut id: NodeId) -> (K, V) {
        if let (Some(left), Some(_)) = (self.nodes[id].left, self.nodes[id].right) {
            // trade places with the in-order predecessor, which has no
            // right child, and remove that node instead
            let pred = self.nodes.dirmost(left, Dir::Right);
            self.nodes.swap_entries(id, pred);
            id = pred;
        }

        if !self.nodes[id].is_red() {
            self.prepare_removal(id);
        }

        let child = self.nodes[id].left.or(self.nodes[id].right);
        match self.nodes[id].parent {
            Some(p) => self.nodes.replace_child(p, id, child),
            None => {
                debug!("removing root {:?}, promoting {:?}", id, child);
                self.root = child;
                if let Some(c) = child {
                    self.nodes[c].parent = None;
                    self.nodes[c].color = Black;
                }
            }
        }

        let node = self.nodes.release(id);
        self.len -= 1;
        if self.len == 0 {
            self.nodes.clear();
        }
        debug_assert!(self.lone_root_child_is_red_leaf());
        (node.key, node.value)
    }

    // A root with a single child must have a red leaf there; anything else
    // would unbalance the black heights.
    fn lone_root_child_is_red_leaf(&self) -> bool {
        let root = match self.root {
            None => return true,
            Some(r) => &self.nodes[r],
        };
        match (root.left, root.right) {
            (Some(c), None) | (None, Some(c)) => {
                let c = &self.nodes[c];
                c.is_red() && c.left.is_none() && c.right.is_none()
            }
            _ => true,
        }
    }

    /// Removes and returns the smallest entry.
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let id = self.nodes.dirmost(root, Dir::Left);
        Some(self.remove_node(id))
    }

    /// Removes and returns the largest entry.
    pub fn pop_max(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let id = self.nodes.dirmost(root, Dir::Right);
        Some(self.remove_node(id))
    }
}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> RbTree<K, V, C> {
        RbTree { nodes: Arena::new(), root: None, len: 0, cmp }
    }

    pub(crate) fn search<Q: ?Sized>(&self, key: &Q) -> Search
        where C: Compare<Q, K>
    {
        let mut cur = match self.root {
            None => return Search::Vacant(None),
            Some(r) => r,
        };
        loop {
            let d = match self.cmp.compare(key, &self.nodes[cur].key) {
                Equal => return Search::Found(cur),
                Less => Dir::Left,
                Greater => Dir::Right,
            };
            match self.nodes[cur].child(d) {
                Some(c) => cur = c,
                None => return Search::Vacant(Some((cur, d))),
            }
        }
    }

    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
        where C: Compare<Q, K>
    {
        match self.search(key) {
            Search::Found(id) => Some(&self.nodes[id].value),
            Search::Vacant(_) => None,
        }
    }

    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K>
    {
        match self.search(key) {
            Search::Found(id) => Some(self.entry(id)),
            Search::Vacant(_) => None,
        }
    }

    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
        where C: Compare<Q, K>
    {
        match self.search(key) {
            Search::Found(id) => Some(&mut self.nodes[id].value),
            Search::Vacant(_) => None,
        }
    }

    #[inline]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
        where C: Compare<Q, K>
    {
        matches!(self.search(key), Search::Found(_))
    }

    /// Inserts `key` with `value` and returns `true`, unless the key is
    /// already present, in which case the tree is left untouched and
    /// `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let slot = match self.search(&key) {
            Search::Found(_) => return false,
            Search::Vacant(slot) => slot,
        };
        self.len += 1;
        match slot {
            None => {
                let id = self.nodes.alloc(key, value, Black);
                debug!("{:?} is the first node", id);
                self.root = Some(id);
            }
            Some((parent, d)) => {
                let id = self.nodes.alloc(key, value, Red);
                self.nodes.set_child(parent, Some(id), d);
                self.insertion_repair(id);
            }
        }
        true
    }

    /// Removes `key` and returns its value, or `None` if it was absent.
    #[inline]
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
        where C: Compare<Q, K>
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
        where C: Compare<Q, K>
    {
        match self.search(key) {
            Search::Found(id) => Some(self.remove_node(id)),
            Search::Vacant(_) => None,
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbTree<K, V, C> {
    /// Structural equality: same shape, and the same key, value and color
    /// at every position.
    fn eq(&self, other: &RbTree<K, V, C>) -> bool {
        if self.len != other.len {
            return false;
        }
        let mut pending = vec![(self.root, other.root)];
        while let Some(pair) = pending.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    let (a, b) = (&self.nodes[a], &other.nodes[b]);
                    if a.color != b.color || a.key != b.key || a.value != b.value {
                        return false;
                    }
                    pending.push((a.left, b.left));
                    pending.push((a.right, b.right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<K: Eq, V: Eq, C> Eq for RbTree<K, V, C> {}

impl<K: Ord, V> FromIterator<(K, V)> for RbTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> RbTree<K, V> {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbTree<K, V, C> {
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<K, V, C> IntoIterator for RbTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consumes the tree, yielding its entries in order.
    fn into_iter(self) -> IntoIter<K, V> {
        let order: Vec<NodeId> = Iter::new(&self.nodes, self.root, self.len).ids().collect();
        IntoIter::new(self.nodes, order)
    }
}
