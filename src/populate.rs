//! Fills slot elements from a slot map.
//!
//! Recursion follows the shape of the data, not the tree: each level looks
//! up its keys inside the element matched one level above. Lookups only
//! consider elements present in the snapshot taken before population, so a
//! replacement can never redirect a later key to content that was just
//! inserted, while an element removed by an earlier key simply yields to the
//! next match.

use std::sync::OnceLock;

use ego_tree::NodeId;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::collector::{collect, OriginalContentIndex};
use crate::slot::{SlotMap, SlotValue, SUMMARY_KEY};
use crate::tree::ElementTree;

/// Marks where the inner stage of a summary is injected into its outer shell
pub const INNER_MARKER: &str = "{{inner}}";

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid placeholder pattern"))
}

/// Replace every `{{name}}` in `fragment` with `replacement`.
/// Tokens naming any other slot are left as they are.
pub fn resolve_placeholders(fragment: &str, name: &str, replacement: &str) -> String {
    placeholder_regex()
        .replace_all(fragment, |caps: &Captures| {
            if &caps[1] == name {
                replacement.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

pub struct Populator<'a> {
    index: &'a OriginalContentIndex,
}

impl<'a> Populator<'a> {
    pub fn new(index: &'a OriginalContentIndex) -> Self {
        Self { index }
    }

    /// Fill `tree` (the template the index was collected from) in place
    pub fn populate(&self, tree: &mut ElementTree, data: &SlotMap) {
        let root = tree.root();
        self.fill(tree, root, data, "", self.index);
    }

    /// `snapshot` is the pre-mutation index of `tree` itself: the template
    /// index at the top, a fresh one for each summary's inner region.
    fn fill(
        &self,
        tree: &mut ElementTree,
        scope: NodeId,
        data: &SlotMap,
        path: &str,
        snapshot: &OriginalContentIndex,
    ) {
        for (key, value) in data.iter() {
            let slot_path = join_path(path, key);

            let Some(target) =
                tree.find_first_where(scope, key, |id| snapshot.by_node(id).is_some())
            else {
                debug!(slot = %slot_path, "no element matches slot; skipped");
                continue;
            };

            match value {
                SlotValue::Fragment(html) => {
                    let resolved = self.resolve(html, &slot_path, key);
                    trace!(slot = %slot_path, "substituting fragment");
                    tree.replace_with_fragment(target, &ElementTree::parse(&resolved));
                }
                SlotValue::Nested(slots) => {
                    self.fill(tree, target, slots, &slot_path, snapshot);
                }
                SlotValue::Summary { outer, inner } => {
                    let Some(outer) = outer else {
                        debug!(slot = %slot_path, "summary has no outer shell; left untouched");
                        continue;
                    };
                    let original = snapshot
                        .by_node(target)
                        .map(str::to_owned)
                        .unwrap_or_else(|| tree.inner_html(target));
                    let shell = self.build_summary_shell(outer, inner.as_ref(), &original, &slot_path);
                    trace!(slot = %slot_path, "substituting summary shell");
                    tree.replace_with_fragment(target, &shell);
                }
            }
        }
    }

    /// Outer shell with the inner stage populated at its marker.
    /// `original` is the summary element's pre-mutation content.
    fn build_summary_shell(
        &self,
        outer: &str,
        inner: Option<&SlotMap>,
        original: &str,
        path: &str,
    ) -> ElementTree {
        let mut shell = ElementTree::parse(&self.resolve(outer, path, SUMMARY_KEY));

        let Some(inner) = inner else {
            return shell;
        };
        let Some(marker) = shell.find_text_containing(INNER_MARKER) else {
            debug!(slot = %path, "outer shell has no {{{{inner}}}} marker; inner stage ignored");
            return shell;
        };

        let mut region = ElementTree::parse(original);
        let region_snapshot = collect(&region);
        let region_root = region.root();
        self.fill(
            &mut region,
            region_root,
            inner,
            &format!("{}.inner", path),
            &region_snapshot,
        );
        shell.replace_with_fragment(marker, &region);
        shell
    }

    fn resolve(&self, fragment: &str, path: &str, key: &str) -> String {
        let original = match self.index.lookup(path, key) {
            Some(content) => content,
            None => {
                if fragment.contains(&format!("{{{{{}}}}}", key)) {
                    debug!(slot = %path, "no original content for placeholder; using empty string");
                }
                ""
            }
        };
        resolve_placeholders(fragment, key, original)
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}
