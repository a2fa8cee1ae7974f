use serde_json::{Map, Value};

use crate::util::format_number;

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Structured(String),
}

impl PropertyValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .unwrap_or_else(|| Self::Structured(number.to_string())),
            Value::Bool(flag) => Self::Bool(flag),
            other => Self::Structured(other.to_string()),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => format_number(*number),
            Self::Bool(flag) => flag.to_string(),
            Self::Structured(json) => json.clone(),
        }
    }
}

/// Property bag of an explored node. `name` and `description` are lifted out so the
/// details panel can show them first; everything else keeps payload order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeProperties {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rest: Vec<(String, PropertyValue)>,
}

impl NodeProperties {
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut properties = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "name" if properties.name.is_none() => {
                    properties.name = Some(PropertyValue::from_json(value).display());
                }
                "description" if properties.description.is_none() => {
                    let text = PropertyValue::from_json(value).display();
                    if !text.trim().is_empty() {
                        properties.description = Some(text);
                    }
                }
                _ => properties.rest.push((key, PropertyValue::from_json(value))),
            }
        }

        properties
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn name_and_description_are_lifted() {
        let properties = NodeProperties::from_map(map(json!({
            "rows": 1200,
            "name": "orders",
            "description": "All customer orders",
            "partitioned": true,
        })));

        assert_eq!(properties.name.as_deref(), Some("orders"));
        assert_eq!(
            properties.description.as_deref(),
            Some("All customer orders")
        );
        assert_eq!(
            properties.rest,
            vec![
                ("rows".to_owned(), PropertyValue::Number(1200.0)),
                ("partitioned".to_owned(), PropertyValue::Bool(true)),
            ]
        );
    }

    #[test]
    fn blank_description_is_dropped() {
        let properties = NodeProperties::from_map(map(json!({ "description": "   " })));
        assert_eq!(properties.description, None);
    }

    #[test]
    fn nested_values_render_as_json_text() {
        let properties = NodeProperties::from_map(map(json!({ "tags": ["a", "b"] })));
        assert_eq!(
            properties.rest,
            vec![(
                "tags".to_owned(),
                PropertyValue::Structured(r#"["a","b"]"#.to_owned())
            )]
        );
    }

    #[test]
    fn numeric_name_is_stringified() {
        let properties = NodeProperties::from_map(map(json!({ "name": 42 })));
        assert_eq!(properties.name.as_deref(), Some("42"));
    }
}
