use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};

/// A mutable HTML fragment owned by a single population call.
///
/// Backed by scraper's arena tree, so a `NodeId` keeps pointing at the same
/// node while siblings are inserted or detached around it. Detached nodes
/// stay in the arena but are no longer reachable from the root.
pub struct ElementTree {
    html: Html,
    root: NodeId,
}

impl ElementTree {
    /// Parse an HTML fragment as if it were the content of a `<body>`.
    /// Malformed markup is repaired by the HTML5 parsing rules, never rejected.
    pub fn parse(fragment: &str) -> Self {
        let html = Html::parse_fragment(fragment);
        let root = html.root_element().id();
        Self { html, root }
    }

    /// The synthetic element wrapping the parsed fragment
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Lowercase tag name, or `None` for text, comments and unknown ids
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.html
            .tree
            .get(id)
            .and_then(|node| node.value().as_element())
            .map(|element| element.name())
    }

    /// Serialized content of an element, excluding the element itself
    pub fn inner_html(&self, id: NodeId) -> String {
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .map(|element| element.inner_html())
            .unwrap_or_default()
    }

    /// Serialize everything below the root
    pub fn render(&self) -> String {
        self.inner_html(self.root)
    }

    /// Direct element children of a node, in document order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|node| {
                node.children()
                    .filter(|child| child.value().is_element())
                    .map(|child| child.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First descendant of `scope` (document order, `scope` excluded) with the given tag.
    /// Tag names compare ASCII case-insensitively.
    pub fn find_first(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.find_first_where(scope, tag, |_| true)
    }

    /// Like [`find_first`](Self::find_first), restricted to nodes `keep` accepts
    pub fn find_first_where(
        &self,
        scope: NodeId,
        tag: &str,
        keep: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        self.html
            .tree
            .get(scope)?
            .descendants()
            .skip(1)
            .find(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|element| element.name().eq_ignore_ascii_case(tag))
                    && keep(node.id())
            })
            .map(|node| node.id())
    }

    /// True while `id` is still attached somewhere below `scope`
    pub fn is_within(&self, id: NodeId, scope: NodeId) -> bool {
        self.html
            .tree
            .get(id)
            .is_some_and(|node| node.ancestors().any(|ancestor| ancestor.id() == scope))
    }

    /// First text node below the root whose content contains `needle`
    pub fn find_text_containing(&self, needle: &str) -> Option<NodeId> {
        self.html
            .tree
            .get(self.root)?
            .descendants()
            .find(|node| {
                node.value()
                    .as_text()
                    .is_some_and(|text| text.contains(needle))
            })
            .map(|node| node.id())
    }

    /// Replace `target` with copies of the top-level nodes of `fragment`.
    ///
    /// The target's own tag disappears; only the fragment content remains in
    /// its place. Returns false (and changes nothing) when the target is no
    /// longer reachable from the root.
    pub fn replace_with_fragment(&mut self, target: NodeId, fragment: &ElementTree) -> bool {
        if !self.is_within(target, self.root) {
            return false;
        }

        if let Some(source_root) = fragment.html.tree.get(fragment.root) {
            for child in source_root.children() {
                let copied = match self.html.tree.get_mut(target) {
                    Some(mut anchor) => anchor.insert_before(child.value().clone()).id(),
                    None => return false,
                };
                self.graft_children(copied, child);
            }
        }

        if let Some(mut node) = self.html.tree.get_mut(target) {
            node.detach();
        }
        true
    }

    fn graft_children(&mut self, parent: NodeId, source: NodeRef<'_, Node>) {
        for child in source.children() {
            let copied = match self.html.tree.get_mut(parent) {
                Some(mut node) => node.append(child.value().clone()).id(),
                None => return,
            };
            self.graft_children(copied, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_round_trip() {
        let html = r#"<div class="a"><p>one</p><p>two</p></div>"#;
        assert_eq!(ElementTree::parse(html).render(), html);
    }

    #[test]
    fn test_render_normalizes_void_tags() {
        assert_eq!(ElementTree::parse("<p>a<br/>b</p>").render(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_custom_tags_survive_parsing() {
        let tree = ElementTree::parse("<article_title>Hi</article_title>");
        let slot = tree.find_first(tree.root(), "article_title").unwrap();
        assert_eq!(tree.tag_name(slot), Some("article_title"));
        assert_eq!(tree.inner_html(slot), "Hi");
    }

    #[test]
    fn test_find_first_is_document_order_and_case_insensitive() {
        let tree = ElementTree::parse("<div><item>1</item></div><item>2</item>");
        let first = tree.find_first(tree.root(), "ITEM").unwrap();
        assert_eq!(tree.inner_html(first), "1");
    }

    #[test]
    fn test_find_first_excludes_scope() {
        let tree = ElementTree::parse("<box><inner>x</inner></box>");
        let outer = tree.find_first(tree.root(), "box").unwrap();
        assert_eq!(tree.find_first(outer, "box"), None);
    }

    #[test]
    fn test_find_first_where_skips_rejected_nodes() {
        let tree = ElementTree::parse("<item>1</item><item>2</item>");
        let first = tree.find_first(tree.root(), "item").unwrap();
        let second = tree.find_first_where(tree.root(), "item", |id| id != first).unwrap();
        assert_eq!(tree.inner_html(second), "2");
    }

    #[test]
    fn test_element_children_skip_text() {
        let tree = ElementTree::parse("text<a>1</a> more <b>2</b>");
        let children = tree.element_children(tree.root());
        let names: Vec<_> = children.iter().filter_map(|id| tree.tag_name(*id)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_replace_with_fragment_unwraps_target() {
        let mut tree = ElementTree::parse("<div>before<slot_a>old</slot_a>after</div>");
        let target = tree.find_first(tree.root(), "slot_a").unwrap();
        let fragment = ElementTree::parse("<h1>new</h1><p>tail</p>");

        assert!(tree.replace_with_fragment(target, &fragment));
        assert_eq!(tree.render(), "<div>before<h1>new</h1><p>tail</p>after</div>");
        assert!(!tree.is_within(target, tree.root()));
    }

    #[test]
    fn test_replace_with_empty_fragment_removes_target() {
        let mut tree = ElementTree::parse("<div><gone>x</gone></div>");
        let target = tree.find_first(tree.root(), "gone").unwrap();
        assert!(tree.replace_with_fragment(target, &ElementTree::parse("")));
        assert_eq!(tree.render(), "<div></div>");
    }

    #[test]
    fn test_replace_detached_target_is_refused() {
        let mut tree = ElementTree::parse("<outer><leaf>x</leaf></outer>");
        let outer = tree.find_first(tree.root(), "outer").unwrap();
        let leaf = tree.find_first(tree.root(), "leaf").unwrap();
        tree.replace_with_fragment(outer, &ElementTree::parse("<p>y</p>"));

        assert!(!tree.is_within(leaf, tree.root()));
        assert!(!tree.replace_with_fragment(leaf, &ElementTree::parse("<p>z</p>")));
        assert_eq!(tree.render(), "<p>y</p>");
    }

    #[test]
    fn test_find_text_containing() {
        let tree = ElementTree::parse("<section>a<div>{{inner}}</div></section>");
        let marker = tree.find_text_containing("{{inner}}");
        assert!(marker.is_some());
        assert_eq!(tree.find_text_containing("{{missing}}"), None);
    }
}
