//! A mutable red-black tree.
//!
//! `RbTree` is an ordered map whose nodes keep links to both children and
//! to their parent. Insertions and removals do the ordinary binary search
//! tree edit and then repair the coloring on the way back up, so lookups,
//! insertions and removals all take logarithmic time in the worst case.
//! `RbSet` wraps it for keys without values.
//!
//! ```
//! use redblack::RbTree;
//!
//! let mut tree = RbTree::new();
//! for k in 1..=7 {
//!     tree.insert(k, k * k);
//! }
//! assert_eq!(tree.get(&3), Some(&9));
//! assert_eq!(tree.remove(&3), Some(9));
//! assert!(tree.keys().cloned().eq(vec![1, 2, 4, 5, 6, 7]));
//! assert!(tree.validate().is_ok());
//! ```

#![deny(unsafe_code)]

extern crate compare;
extern crate log;
#[cfg(feature = "ordered_iter")]
extern crate ordered_iter;

pub use crate::node::Color;
pub use crate::set::RbSet;
pub use crate::tree::{NodeRef, RbTree};
pub use crate::validate::InvariantError;

mod display;
pub mod iter;
mod node;
#[cfg(feature = "ordered_iter")]
mod ordered;
pub mod set;
pub mod tree;
mod validate;
