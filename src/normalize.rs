//! Cleans caller-supplied fragments before they are treated as HTML.
//!
//! Fragments often arrive already escaped by an upstream form or JSON layer:
//! `&quot;` inside attribute values, `\"` around them, `\{\{name\}\}` instead
//! of a placeholder. Left alone, attribute values split into bogus bare
//! attributes and placeholders never match.

use crate::slot::{SlotMap, SlotValue};

/// Stands in for a literal `\\` while single-character escapes are removed
const BACKSLASH_SENTINEL: &str = "\u{E000}";

/// Decode every string leaf of a slot map, recursively
pub fn normalize(slots: SlotMap) -> SlotMap {
    slots
        .into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn normalize_value(value: SlotValue) -> SlotValue {
    match value {
        SlotValue::Fragment(html) => SlotValue::Fragment(decode_fragment(&html)),
        SlotValue::Nested(slots) => SlotValue::Nested(normalize(slots)),
        SlotValue::Summary { outer, inner } => SlotValue::Summary {
            outer: outer.map(|outer| decode_fragment(&outer)),
            inner: inner.map(normalize),
        },
    }
}

/// Decode HTML entities, then strip JSON-style escapes from quotes and braces.
///
/// Order matters: `\\` is parked behind a sentinel so that `\\"` does not lose
/// its backslash to the quote rule, and is restored as a single `\`.
pub fn decode_fragment(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);

    decoded
        .replace("\\\\", BACKSLASH_SENTINEL)
        .replace("\\\"", "\"")
        .replace("\\'", "'")
        .replace("\\{", "{")
        .replace("\\}", "}")
        .replace(BACKSLASH_SENTINEL, "\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decodes_named_entities() {
        assert_eq!(
            decode_fragment("<h1 style=&quot;text-align:center;&quot;>{{title}}</h1>"),
            "<h1 style=\"text-align:center;\">{{title}}</h1>"
        );
        assert_eq!(decode_fragment("&lt;b&gt;a &amp; b&lt;/b&gt;"), "<b>a & b</b>");
    }

    #[test]
    fn test_decodes_numeric_entities() {
        assert_eq!(decode_fragment("it&#39;s &#x41;"), "it's A");
    }

    #[test]
    fn test_unescapes_json_quotes() {
        assert_eq!(
            decode_fragment(r#"<p class=\"lead\" title=\'x\'>"#),
            r#"<p class="lead" title='x'>"#
        );
    }

    #[test]
    fn test_unescapes_braces() {
        assert_eq!(decode_fragment(r"\{\{article_title\}\}"), "{{article_title}}");
    }

    #[test]
    fn test_double_backslash_collapses_to_one() {
        assert_eq!(decode_fragment(r"a\\b"), r"a\b");
        // the quote rule must not eat the protected backslash
        assert_eq!(decode_fragment(r#"\\""#), r#"\""#);
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(decode_fragment("<p>{{content}}</p>"), "<p>{{content}}</p>");
    }

    #[test]
    fn test_normalize_walks_every_leaf() {
        let slots = SlotMap::new()
            .with("title", SlotValue::fragment("&lt;h1&gt;"))
            .with(
                "points",
                SlotValue::Nested(SlotMap::new().with("content", SlotValue::fragment(r"\{\{content\}\}"))),
            )
            .with(
                "summary",
                SlotValue::summary(
                    "<div class=&quot;box&quot;>{{inner}}</div>",
                    SlotMap::new().with("title", SlotValue::fragment(r#"<h3 class=\"t\">"#)),
                ),
            );

        let normalized = normalize(slots);

        assert_eq!(normalized.get("title"), Some(&SlotValue::fragment("<h1>")));
        match normalized.get("points") {
            Some(SlotValue::Nested(points)) => {
                assert_eq!(points.get("content"), Some(&SlotValue::fragment("{{content}}")));
            }
            other => panic!("Expected nested slots, got {:?}", other),
        }
        match normalized.get("summary") {
            Some(SlotValue::Summary { outer, inner }) => {
                assert_eq!(outer.as_deref(), Some("<div class=\"box\">{{inner}}</div>"));
                assert_eq!(
                    inner.as_ref().and_then(|inner| inner.get("title")),
                    Some(&SlotValue::fragment("<h3 class=\"t\">"))
                );
            }
            other => panic!("Expected summary, got {:?}", other),
        }
    }
}
