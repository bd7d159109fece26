//! `ordered_iter` support: in-order iterators are sorted, so two trees can
//! be joined in a single linear pass.
//!
//! The joins compare with `Ord`, so they only make sense for trees whose
//! comparator agrees with it (the default `Natural` one does).

use ordered_iter::{OrderedMapIterator, OrderedSetIterator};

use crate::iter::{Iter, Keys};

impl<'a, K, V> OrderedMapIterator for Iter<'a, K, V> {
    type Key = &'a K;
    type Val = &'a V;
}

impl<'a, K, V> OrderedSetIterator for Keys<'a, K, V> {}

#[cfg(test)]
mod tests {
    use ordered_iter::{OrderedMapIterator, OrderedSetIterator};

    use crate::set::RbSet;
    use crate::tree::RbTree;

    #[test]
    fn test_set_join() {
        let a: RbSet<i32> = (0..20).filter(|x| x % 2 == 0).collect();
        let b: RbSet<i32> = (0..20).filter(|x| x % 3 == 0).collect();
        let both: Vec<i32> = a.iter().inner_join_set(b.iter()).cloned().collect();
        assert_eq!(both, vec![0, 6, 12, 18]);
    }

    #[test]
    fn test_map_join() {
        let prices: RbTree<&str, u32> = vec![("apple", 3), ("kiwi", 5), ("pear", 4)].into_iter().collect();
        let stock: RbTree<&str, u32> = vec![("kiwi", 10), ("pear", 0), ("plum", 7)].into_iter().collect();
        let joined: Vec<(&str, (u32, u32))> = prices.iter().inner_join_map(stock.iter())
            .map(|(&k, (&p, &s))| (k, (p, s)))
            .collect();
        assert_eq!(joined, vec![("kiwi", (5, 10)), ("pear", (4, 0))]);
    }
}
