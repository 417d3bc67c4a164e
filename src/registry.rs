//! Built-in templates that can stand in for an ad hoc data object.
//!
//! The table is compiled into the binary and parsed once on first use.
//! Adding a template means adding a YAML file to `templates/` and a line to
//! `SEEDS`; nothing is registered at runtime.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{WeaveError, WeaveResult};
use crate::slot::SlotMap;

/// Registration order is listing order
const SEEDS: &[(&str, &str)] = &[(
    "blue-theme.yaml",
    include_str!("../templates/blue-theme.yaml"),
)];

static REGISTRY: OnceLock<WeaveResult<Vec<Template>>> = OnceLock::new();

/// A named, predefined data object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub data: SlotMap,
}

/// Listing entry for a template, without its data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Template {
    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

fn load_seeds() -> WeaveResult<Vec<Template>> {
    let mut seen = HashSet::new();
    let mut templates = Vec::with_capacity(SEEDS.len());

    for (file, yaml) in SEEDS {
        let template: Template = serde_yaml::from_str(yaml)
            .map_err(|e| WeaveError::Registry(format!("{}: {}", file, e)))?;
        if !seen.insert(template.id.clone()) {
            return Err(WeaveError::Registry(format!(
                "{}: duplicate template id '{}'",
                file, template.id
            )));
        }
        templates.push(template);
    }

    Ok(templates)
}

fn registry() -> WeaveResult<&'static [Template]> {
    match REGISTRY.get_or_init(load_seeds) {
        Ok(templates) => Ok(templates),
        Err(e) => Err(e.clone()),
    }
}

/// Every registered template, in registration order
pub fn get_all_templates() -> WeaveResult<&'static [Template]> {
    registry()
}

/// Look up a template by id
pub fn get_template_by_id(id: &str) -> WeaveResult<&'static Template> {
    registry()?
        .iter()
        .find(|template| template.id == id)
        .ok_or_else(|| WeaveError::TemplateNotFound { id: id.to_string() })
}
