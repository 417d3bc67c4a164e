use std::collections::HashMap;

use ego_tree::NodeId;

use crate::tree::ElementTree;

/// Snapshot of every element's inner HTML, taken before any slot is filled.
///
/// Entries are reachable three ways: by dotted tag path (`summary.title`),
/// by bare tag name (`title`), and by node identity. When two elements share
/// a tag name the one visited later wins the bare-name entry; the path entry
/// keeps them apart as long as their ancestry differs.
#[derive(Debug, Clone, Default)]
pub struct OriginalContentIndex {
    by_path: HashMap<String, String>,
    by_tag: HashMap<String, String>,
    by_node: HashMap<NodeId, String>,
}

impl OriginalContentIndex {
    /// Captured content for a slot: the full path first, then the bare name
    pub fn lookup(&self, path: &str, name: &str) -> Option<&str> {
        self.by_path
            .get(&path.to_ascii_lowercase())
            .or_else(|| self.by_tag.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn by_path(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn by_tag(&self, tag: &str) -> Option<&str> {
        self.by_tag.get(tag).map(String::as_str)
    }

    /// Content of one specific element of the collected tree
    pub fn by_node(&self, id: NodeId) -> Option<&str> {
        self.by_node.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

/// Depth-first, pre-order walk over every element below the root
pub fn collect(tree: &ElementTree) -> OriginalContentIndex {
    let mut index = OriginalContentIndex::default();
    visit(tree, tree.root(), "", &mut index);
    index
}

fn visit(tree: &ElementTree, parent: NodeId, prefix: &str, index: &mut OriginalContentIndex) {
    for child in tree.element_children(parent) {
        let Some(tag) = tree.tag_name(child) else {
            continue;
        };
        let path = if prefix.is_empty() {
            tag.to_string()
        } else {
            format!("{}.{}", prefix, tag)
        };
        let content = tree.inner_html(child);

        index.by_tag.insert(tag.to_string(), content.clone());
        index.by_path.insert(path.clone(), content.clone());
        index.by_node.insert(child, content);

        visit(tree, child, &path, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_paths_and_tags() {
        let tree = ElementTree::parse(
            "<div><article_title>ORIG</article_title><summary><content>C</content></summary></div>",
        );
        let index = collect(&tree);

        assert_eq!(index.by_path("div.article_title"), Some("ORIG"));
        assert_eq!(index.by_path("div.summary.content"), Some("C"));
        assert_eq!(index.by_tag("article_title"), Some("ORIG"));
        assert_eq!(index.by_tag("summary"), Some("<content>C</content>"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_later_duplicate_tag_wins_bare_name() {
        let tree = ElementTree::parse("<a><name>first</name></a><b><name>second</name></b>");
        let index = collect(&tree);

        assert_eq!(index.by_tag("name"), Some("second"));
        assert_eq!(index.by_path("a.name"), Some("first"));
        assert_eq!(index.by_path("b.name"), Some("second"));
    }

    #[test]
    fn test_lookup_prefers_full_path() {
        let tree = ElementTree::parse("<a><name>first</name></a><b><name>second</name></b>");
        let index = collect(&tree);

        assert_eq!(index.lookup("a.name", "name"), Some("first"));
        assert_eq!(index.lookup("other.name", "name"), Some("second"));
        assert_eq!(index.lookup("A.Name", "Name"), Some("first"));
        assert_eq!(index.lookup("missing", "missing"), None);
    }

    #[test]
    fn test_by_node_keeps_duplicates_apart() {
        let tree = ElementTree::parse("<name>first</name><name>second</name>");
        let index = collect(&tree);
        let first = tree.find_first(tree.root(), "name").unwrap();

        assert_eq!(index.by_node(first), Some("first"));
        assert_eq!(index.by_tag("name"), Some("second"));
    }

    #[test]
    fn test_empty_fragment() {
        let index = collect(&ElementTree::parse("just text"));
        assert!(index.is_empty());
    }
}
