use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A property value on a page, kept close to Notion's JSON.
///
/// `kind` is Notion's type tag (`title`, `number`, `select`, ...), `value`
/// is the payload stored under that tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub id: String,
    pub kind: String,
    pub value: Value,
}

impl PropertyValue {
    /// Concatenated plain text of `title` and `rich_text` properties
    pub fn as_plain_text(&self) -> Option<String> {
        match self.kind.as_str() {
            "title" | "rich_text" => Some(plain_text_of(&self.value)),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind.as_str() {
            "number" => self.value.as_f64(),
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self.kind.as_str() {
            "checkbox" => self.value.as_bool(),
            _ => None,
        }
    }

    /// Name of the chosen option of a `select` or `status` property
    pub fn as_option_name(&self) -> Option<&str> {
        match self.kind.as_str() {
            "select" | "status" => self.value.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    /// `url`, `email` and `phone_number` properties
    pub fn as_str(&self) -> Option<&str> {
        match self.kind.as_str() {
            "url" | "email" | "phone_number" => self.value.as_str(),
            _ => None,
        }
    }
}

/// A column definition of a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub id: String,
    pub kind: String,
    pub config: Value,
}

impl PropertySchema {
    /// Option names of `select`, `multi_select` and `status` columns
    pub fn option_names(&self) -> Vec<&str> {
        self.config
            .get("options")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|opt| opt.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Joins the `plain_text` of every item in a rich text array.
pub(crate) fn plain_text_of(rich_text: &Value) -> String {
    rich_text
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}
