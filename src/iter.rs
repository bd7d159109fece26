//! Traversals. The depth-first iterators walk the parent links, so they
//! need no stack and can be driven from both ends.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::node::{Arena, Dir, Node, NodeId};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Order { In, Pre, Post }

// Successor of `n` in in-order when `d` is `Right`; predecessor when `d` is
// `Left`.
fn inorder<K, V>(nodes: &Arena<K, V>, n: NodeId, d: Dir) -> Option<NodeId> {
    if let Some(c) = nodes[n].child(d) {
        return Some(nodes.dirmost(c, d.turnaround()));
    }
    let mut n = n;
    while let Some(p) = nodes[n].parent {
        if nodes[p].child(d) != Some(n) {
            return Some(p);
        }
        n = p;
    }
    None
}

// Pre-order successor when `d` is `Right`. With `d` set to `Left` this is a
// pre-order walk of the mirrored tree, which is post-order backwards.
fn preorder<K, V>(nodes: &Arena<K, V>, n: NodeId, d: Dir) -> Option<NodeId> {
    let node = &nodes[n];
    if let Some(c) = node.child(d.turnaround()).or(node.child(d)) {
        return Some(c);
    }
    let mut n = n;
    while let Some(p) = nodes[n].parent {
        if nodes[p].child(d.turnaround()) == Some(n) {
            if let Some(c) = nodes[p].child(d) {
                return Some(c);
            }
        }
        n = p;
    }
    None
}

// Post-order successor when `d` is `Right`; pre-order backwards when `d` is
// `Left`.
fn postorder<K, V>(nodes: &Arena<K, V>, n: NodeId, d: Dir) -> Option<NodeId> {
    let p = nodes[n].parent?;
    match nodes[p].child(d) {
        Some(c) if c != n => Some(deepest(nodes, c, d.turnaround())),
        _ => Some(p),
    }
}

// First leaf reached from `n` preferring `first` links over the others.
fn deepest<K, V>(nodes: &Arena<K, V>, mut n: NodeId, first: Dir) -> NodeId {
    loop {
        let node = &nodes[n];
        match node.child(first).or(node.child(first.turnaround())) {
            Some(c) => n = c,
            None => return n,
        }
    }
}

fn step<K, V>(nodes: &Arena<K, V>, n: NodeId, order: Order, d: Dir) -> Option<NodeId> {
    match (order, d) {
        (Order::In, d) => inorder(nodes, n, d),
        (Order::Pre, Dir::Right) | (Order::Post, Dir::Left) => preorder(nodes, n, d),
        (Order::Post, Dir::Right) | (Order::Pre, Dir::Left) => postorder(nodes, n, d),
    }
}

/// A depth-first traversal in a fixed order, double-ended.
pub struct Items<'a, K: 'a, V: 'a> {
    nodes: &'a Arena<K, V>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    order: Order,
    remaining: usize,
}

impl<'a, K, V> Clone for Items<'a, K, V> {
    fn clone(&self) -> Items<'a, K, V> {
        Items {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            order: self.order,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Items<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<K, V>, root: Option<NodeId>, len: usize,
                      order: Order) -> Items<'a, K, V> {
        let (front, back) = match root {
            None => (None, None),
            Some(r) => {
                let (front, back) = match order {
                    Order::In => (nodes.dirmost(r, Dir::Left), nodes.dirmost(r, Dir::Right)),
                    Order::Pre => (r, deepest(nodes, r, Dir::Right)),
                    Order::Post => (deepest(nodes, r, Dir::Left), r),
                };
                (Some(front), Some(back))
            }
        };
        Items { nodes, front, back, order, remaining: len }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    fn next_id(&mut self, d: Dir) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let cur = if d == Dir::Right { &mut self.front } else { &mut self.back };
        let id = (*cur)?;
        *cur = step(self.nodes, id, self.order, d);
        self.remaining -= 1;
        Some(id)
    }

    fn entry(&self, id: NodeId) -> (&'a K, &'a V) {
        let node: &'a Node<K, V> = &self.nodes[id];
        (&node.key, &node.value)
    }
}

impl<'a, K, V> Iterator for Items<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.next_id(Dir::Right).map(|id| self.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Items<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.next_id(Dir::Left).map(|id| self.entry(id))
    }
}

impl<'a, K, V> ExactSizeIterator for Items<'a, K, V> {}
impl<'a, K, V> FusedIterator for Items<'a, K, V> {}

/// In-order iterator over the entries of a tree.
pub struct Iter<'a, K: 'a, V: 'a> {
    items: Items<'a, K, V>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> {
        Iter { items: self.items.clone() }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<K, V>, root: Option<NodeId>, len: usize) -> Iter<'a, K, V> {
        Iter { items: Items::new(nodes, root, len, Order::In) }
    }

    pub(crate) fn ids(mut self) -> impl Iterator<Item = NodeId> + 'a {
        std::iter::from_fn(move || self.items.next_id(Dir::Right))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.items.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.items.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.items.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

pub struct Keys<'a, K: 'a, V: 'a> {
    inner: Iter<'a, K, V>,
}

pub struct Values<'a, K: 'a, V: 'a> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Keys<'a, K, V> { Keys { inner } }
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Values<'a, K, V> { Values { inner } }
}

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Keys<'a, K, V> { Keys { inner: self.inner.clone() } }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.inner.next().map(|(k, _)| k) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> { self.inner.next_back().map(|(k, _)| k) }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> { self.inner.next().map(|(_, v)| v) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> { self.inner.next_back().map(|(_, v)| v) }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

/// Breadth-first iterator: the root, then each level from left to right.
pub struct LevelIter<'a, K: 'a, V: 'a> {
    nodes: &'a Arena<K, V>,
    queue: VecDeque<NodeId>,
    remaining: usize,
}

impl<'a, K, V> LevelIter<'a, K, V> {
    pub(crate) fn new(nodes: &'a Arena<K, V>, root: Option<NodeId>, len: usize) -> LevelIter<'a, K, V> {
        LevelIter { nodes, queue: root.into_iter().collect(), remaining: len }
    }
}

impl<'a, K, V> Iterator for LevelIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let id = self.queue.pop_front()?;
        let node: &'a Node<K, V> = &self.nodes[id];
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for LevelIter<'a, K, V> {}
impl<'a, K, V> FusedIterator for LevelIter<'a, K, V> {}

/// Owning in-order iterator, produced by `RbTree::into_iter`.
pub struct IntoIter<K, V> {
    nodes: Arena<K, V>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(nodes: Arena<K, V>, order: Vec<NodeId>) -> IntoIter<K, V> {
        IntoIter { nodes, order: order.into_iter() }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let node = self.nodes.release(self.order.next()?);
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        let node = self.nodes.release(self.order.next_back()?);
        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use crate::tree::{NodeRef, RbTree};

    fn gen_tree(v: &[i32]) -> RbTree<i32, i32> {
        v.iter().map(|&x| (x, x * 10)).collect()
    }

    fn keys<'a, I: Iterator<Item = (&'a i32, &'a i32)>>(it: I) -> Vec<i32> {
        it.map(|(&k, _)| k).collect()
    }

    // straightforward recursive walks to check the link-chasing ones against
    fn reference_pre(n: Option<NodeRef<i32, i32>>, out: &mut Vec<i32>) {
        if let Some(n) = n {
            out.push(*n.key());
            reference_pre(n.left(), out);
            reference_pre(n.right(), out);
        }
    }

    fn reference_post(n: Option<NodeRef<i32, i32>>, out: &mut Vec<i32>) {
        if let Some(n) = n {
            reference_post(n.left(), out);
            reference_post(n.right(), out);
            out.push(*n.key());
        }
    }

    #[test]
    fn test_orders() {
        /*
          shaped like (keys only):

                       17
                     /    \
                    8      25
                   / \    /  \
                  5  15  18   40
                                \
                                 80
        */
        let m = gen_tree(&[8, 18, 5, 15, 17, 25, 40, 80]);

        assert_eq!(keys(m.iter()), vec![5, 8, 15, 17, 18, 25, 40, 80]);
        assert_eq!(keys(m.iter().rev()), vec![80, 40, 25, 18, 17, 15, 8, 5]);

        assert_eq!(keys(m.iter_pre()), vec![17, 8, 5, 15, 25, 18, 40, 80]);
        assert_eq!(keys(m.iter_pre().rev()), vec![80, 40, 18, 25, 15, 5, 8, 17]);

        assert_eq!(keys(m.iter_post()), vec![5, 15, 8, 18, 80, 40, 25, 17]);
        assert_eq!(keys(m.iter_post().rev()), vec![17, 25, 40, 80, 18, 8, 15, 5]);

        assert_eq!(keys(m.iter_level()), vec![17, 8, 25, 5, 15, 18, 40, 80]);
    }

    #[test]
    fn test_orders_ascending() {
        // 2(1, 4(3, 6(5, 7)))
        let m = gen_tree(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(keys(m.iter_pre()), vec![2, 1, 4, 3, 6, 5, 7]);
        assert_eq!(keys(m.iter_post()), vec![1, 3, 5, 7, 6, 4, 2]);
        assert_eq!(keys(m.iter_level()), vec![2, 1, 4, 3, 6, 5, 7]);
    }

    #[test]
    fn test_orders_match_recursive_walks() {
        let mut m = RbTree::new();
        for i in 0..300 {
            m.insert((i * 37) % 101, i);
            let mut pre = Vec::new();
            reference_pre(m.root(), &mut pre);
            let mut post = Vec::new();
            reference_post(m.root(), &mut post);
            assert_eq!(keys(m.iter_pre()), pre);
            assert_eq!(keys(m.iter_post()), post);
            pre.reverse();
            post.reverse();
            assert_eq!(keys(m.iter_pre().rev()), pre);
            assert_eq!(keys(m.iter_post().rev()), post);
        }
    }

    #[test]
    fn test_meet_in_the_middle() {
        let m = gen_tree(&[4, 2, 6, 1, 3, 5, 7]);
        let mut it = m.iter();
        assert_eq!(it.len(), 7);
        assert_eq!(it.next(), Some((&1, &10)));
        assert_eq!(it.next_back(), Some((&7, &70)));
        assert_eq!(it.next(), Some((&2, &20)));
        assert_eq!(it.next_back(), Some((&6, &60)));
        assert_eq!(it.len(), 3);
        assert_eq!(keys(it.by_ref()), vec![3, 4, 5]);
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);

        let mut pre = m.iter_pre();
        let front: Vec<_> = keys(pre.by_ref().take(3));
        let back: Vec<_> = keys(pre.rev());
        assert_eq!(front.len() + back.len(), 7);
    }

    #[test]
    fn test_empty() {
        let m: RbTree<i32, i32> = RbTree::new();
        assert_eq!(m.iter().next(), None);
        assert_eq!(m.iter_pre().next_back(), None);
        assert_eq!(m.iter_post().next(), None);
        assert_eq!(m.iter_level().next(), None);
        assert_eq!(m.into_iter().next(), None);
    }

    #[test]
    fn test_keys_values() {
        let m = gen_tree(&[3, 1, 2]);
        assert_eq!(m.keys().cloned().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(m.values().rev().cloned().collect::<Vec<_>>(), vec![30, 20, 10]);
        assert_eq!((&m).into_iter().count(), 3);
    }

    #[test]
    fn test_into_iter() {
        let m = gen_tree(&[5, 9, 1, 7, 3]);
        let mut it = m.into_iter();
        assert_eq!(it.next(), Some((1, 10)));
        assert_eq!(it.next_back(), Some((9, 90)));
        assert_eq!(it.collect::<Vec<_>>(), vec![(3, 30), (5, 50), (7, 70)]);
    }

    #[test]
    fn test_owned_values_drop_once() {
        use std::rc::Rc;
        let token = Rc::new(());
        let mut m = RbTree::new();
        for i in 0..50 {
            m.insert(i, token.clone());
        }
        assert_eq!(Rc::strong_count(&token), 51);
        let half: Vec<_> = m.into_iter().take(25).collect();
        assert_eq!(Rc::strong_count(&token), 26);
        drop(half);
        assert_eq!(Rc::strong_count(&token), 1);
    }
}
