use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WeaveError, WeaveResult};
use crate::populate_html;
use crate::registry::{get_all_templates, TemplateInfo};
use crate::slot::SlotMap;

/// Body of a population request as it arrives from a host transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulateRequest {
    /// Template whose tags act as slots
    pub html_template: String,
    /// Built-in template to take data from; wins over `json_data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Ad hoc data object, required when no template id is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateInfo>,
}

impl PopulateRequest {
    fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Check the request shape before any template work starts
    pub fn validate(&self) -> WeaveResult<()> {
        if self.html_template.trim().is_empty() {
            return Err(WeaveError::InvalidRequest(
                "htmlTemplate must not be empty".to_string(),
            ));
        }

        match (&self.json_data, self.template_id()) {
            (Some(Value::Object(_)), Some(_)) => Ok(()),
            (Some(Value::Object(data)), None) if data.is_empty() => Err(WeaveError::InvalidRequest(
                "jsonData must not be empty when templateId is absent".to_string(),
            )),
            (Some(Value::Object(_)), None) => Ok(()),
            (Some(_), _) => Err(WeaveError::InvalidRequest(
                "jsonData must be an object".to_string(),
            )),
            (None, Some(_)) => Ok(()),
            (None, None) => Err(WeaveError::MissingInput),
        }
    }

    /// Validate, populate, and wrap the result
    pub fn execute(&self) -> WeaveResult<PopulateResponse> {
        self.validate()?;

        let data = self.json_data.as_ref().map(SlotMap::from_json).transpose()?;
        let result = populate_html(&self.html_template, data.as_ref(), self.template_id())?;

        Ok(PopulateResponse { result })
    }
}

impl TemplateListResponse {
    pub fn from_registry() -> WeaveResult<Self> {
        let templates = get_all_templates()?.iter().map(|t| t.info()).collect();
        Ok(Self { templates })
    }
}
