use std::cmp::Ordering::Less;
use std::error::Error;
use std::fmt;

use compare::Compare;

use crate::node::{Dir, NodeId};
use crate::tree::RbTree;

/// A broken tree invariant, as reported by `RbTree::validate`.
///
/// Depths count the root as 1; positions are 0-based in-order indices.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantError {
    RedRoot,
    RootHasParent,
    RedChildOfRed { depth: usize },
    BlackHeightMismatch { depth: usize, left: usize, right: usize },
    BrokenParentLink { depth: usize },
    OutOfOrder { position: usize },
    LengthMismatch { recorded: usize, counted: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::InvariantError::*;
        match *self {
            RedRoot => write!(f, "the root is red"),
            RootHasParent => write!(f, "the root has a parent"),
            RedChildOfRed { depth } => write!(f, "red node at depth {} has a red parent", depth),
            BlackHeightMismatch { depth, left, right } => {
                write!(f, "node at depth {} has black heights {} (left) and {} (right)",
                       depth, left, right)
            }
            BrokenParentLink { depth } => {
                write!(f, "node at depth {} does not point back at its parent", depth)
            }
            OutOfOrder { position } => write!(f, "key at position {} is out of order", position),
            LengthMismatch { recorded, counted } => {
                write!(f, "length is {} but the tree holds {} nodes", recorded, counted)
            }
        }
    }
}

impl Error for InvariantError {}

impl<K, V, C: Compare<K>> RbTree<K, V, C> {
    /// Checks every red-black invariant along with the parent links, the
    /// key order and the recorded length.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let counted = match self.root {
            None => 0,
            Some(root) => {
                if self.nodes[root].parent.is_some() {
                    return Err(InvariantError::RootHasParent);
                }
                if self.nodes[root].is_red() {
                    return Err(InvariantError::RedRoot);
                }
                let mut counted = 0;
                self.check_subtree(root, 1, &mut counted)?;
                counted
            }
        };
        if counted != self.len {
            return Err(InvariantError::LengthMismatch { recorded: self.len, counted });
        }

        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for (i, k) in keys.enumerate() {
                if self.comparator().compare(prev, k) != Less {
                    return Err(InvariantError::OutOfOrder { position: i + 1 });
                }
                prev = k;
            }
        }
        Ok(())
    }

    // Returns the black height of the subtree at `n`, counting `n`.
    fn check_subtree(&self, n: NodeId, depth: usize, counted: &mut usize)
                     -> Result<usize, InvariantError> {
        *counted += 1;
        let node = &self.nodes[n];
        let mut heights = [0; 2];
        for (h, &d) in heights.iter_mut().zip(&[Dir::Left, Dir::Right]) {
            if let Some(c) = node.child(d) {
                let child = &self.nodes[c];
                if child.parent != Some(n) {
                    return Err(InvariantError::BrokenParentLink { depth: depth + 1 });
                }
                if node.is_red() && child.is_red() {
                    return Err(InvariantError::RedChildOfRed { depth: depth + 1 });
                }
                *h = self.check_subtree(c, depth + 1, counted)?;
            }
        }
        if heights[0] != heights[1] {
            return Err(InvariantError::BlackHeightMismatch {
                depth,
                left: heights[0],
                right: heights[1],
            });
        }
        Ok(heights[0] + if node.is_red() { 0 } else { 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::InvariantError;
    use crate::node::Color::*;
    use crate::tree::RbTree;

    fn gen_tree(v: &[i32]) -> RbTree<i32, ()> {
        v.iter().map(|&x| (x, ())).collect()
    }

    #[test]
    fn test_valid_trees() {
        assert_eq!(RbTree::<i32, ()>::new().validate(), Ok(()));
        assert_eq!(gen_tree(&[1]).validate(), Ok(()));
        assert_eq!(gen_tree(&(0..100).collect::<Vec<_>>()).validate(), Ok(()));
    }

    #[test]
    fn test_red_root() {
        let mut t = gen_tree(&[1, 2, 3]);
        let root = t.root.unwrap();
        t.nodes[root].color = Red;
        assert_eq!(t.validate(), Err(InvariantError::RedRoot));
    }

    #[test]
    fn test_red_red() {
        // 2B(1B, 3B(-, 4R))
        let mut t = gen_tree(&[1, 2, 3, 4]);
        let three = t.nodes[t.root.unwrap()].right.unwrap();
        t.nodes[three].color = Red;
        assert_eq!(t.validate(), Err(InvariantError::RedChildOfRed { depth: 3 }));
    }

    #[test]
    fn test_black_height() {
        let mut t = gen_tree(&[1, 2, 3]);
        let one = t.nodes[t.root.unwrap()].left.unwrap();
        t.nodes[one].color = Black;
        let err = t.validate().unwrap_err();
        assert_eq!(err, InvariantError::BlackHeightMismatch { depth: 1, left: 1, right: 0 });
        assert_eq!(err.to_string(), "node at depth 1 has black heights 1 (left) and 0 (right)");
    }

    #[test]
    fn test_parent_link() {
        let mut t = gen_tree(&[1, 2, 3]);
        let root = t.root.unwrap();
        let one = t.nodes[root].left.unwrap();
        let three = t.nodes[root].right.unwrap();
        t.nodes[one].parent = Some(three);
        assert_eq!(t.validate(), Err(InvariantError::BrokenParentLink { depth: 2 }));
    }

    #[test]
    fn test_order_and_length() {
        let mut t = gen_tree(&[1, 2, 3]);
        let root = t.root.unwrap();
        t.nodes[root].key = 7;
        assert_eq!(t.validate(), Err(InvariantError::OutOfOrder { position: 2 }));
        t.nodes[root].key = 2;
        t.len = 4;
        assert_eq!(t.validate(), Err(InvariantError::LengthMismatch { recorded: 4, counted: 3 }));
    }
}
