//! # slotweave
//!
//! Populates HTML templates whose element tags act as named slots.
//!
//! Each data key names a tag. The matching element is replaced by the
//! caller's fragment, in which `{{name}}` stands for the element's original
//! inner HTML, so the slot tag itself disappears from the output. Object
//! values descend into the matched element; the reserved `summary` key takes
//! an `outer` shell plus an `inner` map populated at the shell's `{{inner}}`
//! marker.
//!
//! ## Example
//! ```ignore
//! use slotweave::{populate_html, SlotMap};
//!
//! let data = SlotMap::from_json_str(r#"{"article_title": "<h1>{{article_title}}</h1>"}"#)?;
//! let html = populate_html("<div><article_title>Hello</article_title></div>", Some(&data), None)?;
//! assert_eq!(html, "<div><h1>Hello</h1></div>");
//! ```

pub mod collector;
pub mod error;
pub mod normalize;
pub mod populate;
pub mod registry;
pub mod request;
pub mod slot;
pub mod tree;

pub use collector::{collect, OriginalContentIndex};
pub use error::{WeaveError, WeaveResult};
pub use normalize::normalize;
pub use populate::{resolve_placeholders, Populator};
pub use registry::{get_all_templates, get_template_by_id, Template, TemplateInfo};
pub use request::{PopulateRequest, PopulateResponse, TemplateListResponse};
pub use slot::{SlotMap, SlotValue};
pub use tree::ElementTree;

/// Populate `html_template` from `json_data`, or from a built-in template's data.
///
/// A non-empty `template_id` wins over `json_data`. Fails before any parsing
/// when neither is given or the id is unknown; unmatched slots and
/// placeholders never fail.
pub fn populate_html(
    html_template: &str,
    json_data: Option<&SlotMap>,
    template_id: Option<&str>,
) -> WeaveResult<String> {
    let data = match (template_id.filter(|id| !id.is_empty()), json_data) {
        (Some(id), _) => &get_template_by_id(id)?.data,
        (None, Some(data)) => data,
        (None, None) => return Err(WeaveError::MissingInput),
    };

    Ok(populate_with(html_template, data.clone()))
}

/// Populate a template from a slot map, with no registry involvement
pub fn populate_with(html_template: &str, data: SlotMap) -> String {
    let data = normalize(data);

    let mut tree = ElementTree::parse(html_template);
    let index = collect(&tree);
    Populator::new(&index).populate(&mut tree, &data);

    tree.render()
}
