use std::fmt;

use crate::node::NodeId;
use crate::tree::RbTree;

// narrowest column, used for the bottom level
const CELL: usize = 10;

impl<K: fmt::Display, V, C> fmt::Display for RbTree<K, V, C> {
    /// Draws the tree one level per line. Each node shows as
    /// `key:color (parent key)`, centered over the columns of its
    /// subtree; empty positions are left blank. Meant for small trees.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let root = match self.root {
            None => return f.write_str("Empty RB tree"),
            Some(r) => r,
        };
        let height = self.height();
        let mut level: Vec<Option<NodeId>> = vec![Some(root)];
        for depth in 0..height {
            let width = CELL << (height - 1 - depth);
            write!(f, "Level {}:", depth + 1)?;
            for slot in &level {
                match *slot {
                    None => write!(f, "{:w$}", "", w = width)?,
                    Some(id) => {
                        let node = &self.nodes[id];
                        let label = match node.parent {
                            Some(p) => format!("{}:{} ({})", node.key, node.color, self.nodes[p].key),
                            None => format!("{}:{} (-)", node.key, node.color),
                        };
                        write!(f, "{:^w$}", label, w = width)?;
                    }
                }
            }
            writeln!(f)?;
            level = level.iter()
                .flat_map(|slot| match *slot {
                    Some(id) => [self.nodes[id].left, self.nodes[id].right],
                    None => [None, None],
                })
                .collect();
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
