//! Node storage. Nodes live in an arena and refer to each other by
//! `NodeId`, so the downward child links and the upward parent links never
//! fight over ownership: the arena owns every node, the links are indices.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use self::Color::*;

/// The one-bit color tag carried by every node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self { Red => "R", Black => "B" })
    }
}

/// A side of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Dir { Left, Right }

impl Dir {
    pub fn turnaround(self) -> Dir {
        if self == Dir::Left { Dir::Right } else { Dir::Left }
    }
}

/// Handle of a node inside its tree's arena. Identity checks on nodes go
/// through this, never through key comparison.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(usize);

#[derive(Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub color: Color,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub fn child(&self, d: Dir) -> Option<NodeId> {
        match d {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, d: Dir) -> &mut Option<NodeId> {
        match d {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Red
    }
}

#[derive(Clone)]
pub struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {:?}", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {:?}", id),
        }
    }
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Arena<K, V> {
        Arena { slots: Vec::new(), free: Vec::new() }
    }

    /// Stores a detached node and returns its handle, reusing a freed slot
    /// when one is available.
    pub fn alloc(&mut self, key: K, value: V, color: Color) -> NodeId {
        let node = Node { key, value, color, left: None, right: None, parent: None };
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none());
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Takes a node out of the arena. Its links are returned as they were;
    /// the caller must already have unhooked it from its neighbours.
    pub fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("releasing dangling node id {:?}", id),
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Color of a possibly absent node; absent children are the black
    /// null leaves.
    #[inline]
    pub fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Black, |id| self[id].color)
    }

    #[inline]
    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color(id) == Red
    }

    /// Hangs `child` on the `d` side of `parent` and points the child back
    /// at its new parent.
    pub fn set_child(&mut self, parent: NodeId, child: Option<NodeId>, d: Dir) {
        *self[parent].child_mut(d) = child;
        if let Some(c) = child {
            self[c].parent = Some(parent);
        }
    }

    /// Swaps `old` out of whichever slot of `parent` holds it and puts
    /// `new` there instead.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Option<NodeId>) {
        let d = if self[parent].left == Some(old) {
            Dir::Left
        } else {
            assert!(self[parent].right == Some(old),
                    "{:?} is not a child of {:?}", old, parent);
            Dir::Right
        };
        self.set_child(parent, new, d);
    }

    /// Which side of its parent `n` hangs on, or `None` for a root.
    #[inline]
    pub fn side_of(&self, n: NodeId) -> Option<Dir> {
        self[n].parent.map(|p| {
            if self[p].left == Some(n) { Dir::Left } else { Dir::Right }
        })
    }

    pub fn sibling(&self, n: NodeId) -> Option<NodeId> {
        let p = self[n].parent?;
        let d = self.side_of(n)?;
        self[p].child(d.turnaround())
    }

    pub fn grandparent(&self, n: NodeId) -> Option<NodeId> {
        self[n].parent.and_then(|p| self[p].parent)
    }

    pub fn uncle(&self, n: NodeId) -> Option<NodeId> {
        self[n].parent.and_then(|p| self.sibling(p))
    }

    /// Follows `d` links from `n` until there are none left.
    pub fn dirmost(&self, mut n: NodeId, d: Dir) -> NodeId {
        while let Some(c) = self[n].child(d) {
            n = c;
        }
        n
    }

    /// Exchanges the entries of two nodes, leaving colors and links alone.
    pub fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi.0);
        match (head[lo.0].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => panic!("swapping entries of dangling nodes {:?} and {:?}", a, b),
        }
    }

    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
