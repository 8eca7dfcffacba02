use std::fmt;

use super::{Node, PrefixTrie};

/// Display adapter printing one node per line, indented by depth.
///
/// Split nodes without values print `-`; nodes holding values print the
/// value list.
pub struct TrieDump<'t, V> {
    trie: &'t PrefixTrie<V>,
}

impl<'t, V> TrieDump<'t, V> {
    pub fn new(trie: &'t PrefixTrie<V>) -> Self {
        Self { trie }
    }
}

impl<V: fmt::Debug> fmt::Display for TrieDump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.trie.root();
        write!(f, "(root)")?;
        write_values(f, root)?;
        writeln!(f)?;

        // Reverse so the first child is printed first
        let mut stack: Vec<(Node<'_, V>, usize)> =
            root.children().map(|child| (child, 1)).collect();
        stack.reverse();

        while let Some((node, depth)) = stack.pop() {
            write!(f, "{:indent$}{:?}", "", node.key_suffix(), indent = depth * 2)?;
            write_values(f, node)?;
            writeln!(f)?;

            let mut children: Vec<_> = node.children().map(|child| (child, depth + 1)).collect();
            children.reverse();
            stack.extend(children);
        }

        Ok(())
    }
}

fn write_values<V: fmt::Debug>(f: &mut fmt::Formatter<'_>, node: Node<'_, V>) -> fmt::Result {
    if node.values().is_empty() {
        write!(f, " -")
    } else {
        write!(f, " {:?}", node.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_layout() {
        let mut trie = PrefixTrie::new();
        trie.insert("foreach", vec![2]);
        trie.insert("fork", vec![3]);
        trie.insert("=", vec![1]);

        let expected = "(root) -\n  \"=\" [1]\n  \"for\" -\n    \"each\" [2]\n    \"k\" [3]\n";
        assert_eq!(trie.dump(), expected);
    }

    #[test]
    fn test_dump_empty_trie() {
        let trie: PrefixTrie<u8> = PrefixTrie::new();
        assert_eq!(TrieDump::new(&trie).to_string(), "(root) -\n");
    }
}
