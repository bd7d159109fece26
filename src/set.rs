use std::fmt;
use std::iter::FromIterator;

use compare::{Compare, Natural};

use crate::iter::{self, Keys};
use crate::tree::{NodeRef, RbTree};
use crate::validate::InvariantError;

/// An ordered set backed by a red-black tree.
#[derive(Clone)]
pub struct RbSet<T, C = Natural<T>> {
    map: RbTree<T, (), C>,
}

/// In-order iterator over the elements of an `RbSet`.
pub type Iter<'a, T> = Keys<'a, T, ()>;

fn key<'a, T>((k, _): (&'a T, &'a ())) -> &'a T { k }

impl<T: Ord> RbSet<T> {
    #[inline]
    pub fn new() -> RbSet<T> {
        RbSet { map: RbTree::new() }
    }
}

impl<T: Ord> Default for RbSet<T> {
    #[inline]
    fn default() -> RbSet<T> { RbSet::new() }
}

impl<T, C> RbSet<T, C> {
    #[inline]
    pub fn len(&self) -> usize { self.map.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn clear(&mut self) { self.map.clear() }

    pub fn height(&self) -> usize { self.map.height() }

    pub fn root(&self) -> Option<NodeRef<T, ()>> { self.map.root() }

    pub fn min(&self) -> Option<&T> { self.map.min().map(key) }

    pub fn max(&self) -> Option<&T> { self.map.max().map(key) }

    pub fn pop_min(&mut self) -> Option<T> { self.map.pop_min().map(|(k, _)| k) }

    pub fn pop_max(&mut self) -> Option<T> { self.map.pop_max().map(|(k, _)| k) }

    pub fn iter(&self) -> Iter<T> { self.map.keys() }

    pub fn iter_pre(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.map.iter_pre().map(key)
    }

    pub fn iter_post(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.map.iter_post().map(key)
    }

    pub fn iter_level(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.map.iter_level().map(key)
    }
}

impl<T, C: Compare<T>> RbSet<T, C> {
    pub fn with_comparator(cmp: C) -> RbSet<T, C> {
        RbSet { map: RbTree::with_comparator(cmp) }
    }

    /// Adds `value`, returning `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ())
    }

    #[inline]
    pub fn remove<Q: ?Sized>(&mut self, value: &Q) -> bool where C: Compare<Q, T> {
        self.map.remove(value).is_some()
    }

    pub fn take<Q: ?Sized>(&mut self, value: &Q) -> Option<T> where C: Compare<Q, T> {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    #[inline]
    pub fn contains<Q: ?Sized>(&self, value: &Q) -> bool where C: Compare<Q, T> {
        self.map.contains_key(value)
    }

    pub fn get<Q: ?Sized>(&self, value: &Q) -> Option<&T> where C: Compare<Q, T> {
        self.map.get_key_value(value).map(key)
    }

    pub fn validate(&self) -> Result<(), InvariantError> {
        self.map.validate()
    }
}

impl<T: PartialEq, C> PartialEq for RbSet<T, C> {
    /// Structural, like `RbTree`'s.
    fn eq(&self, other: &RbSet<T, C>) -> bool { self.map == other.map }
}

impl<T: Eq, C> Eq for RbSet<T, C> {}

impl<T: fmt::Display, C> fmt::Display for RbSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::Display::fmt(&self.map, f) }
}

impl<T: fmt::Debug, C> fmt::Debug for RbSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for RbSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> RbSet<T> {
        let mut set = RbSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>> Extend<T> for RbSet<T, C> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elt in iter {
            self.insert(elt);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RbSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Iter<'a, T> { self.iter() }
}

/// Owning in-order iterator over the elements of an `RbSet`.
pub struct IntoIter<T> {
    inner: iter::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<T> { self.inner.next().map(|(k, _)| k) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> { self.inner.next_back().map(|(k, _)| k) }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, C> IntoIterator for RbSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> IntoIter<T> { IntoIter { inner: self.map.into_iter() } }
}
