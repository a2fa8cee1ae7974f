use eframe::egui::{Color32, RichText, Ui};

use crate::graph::{EditorNode, PropertyValue};

use super::super::explorer::SimNode;
use super::super::render_utils::{category_color, editor_kind_color};

/// Everything the details panel shows for one node, flattened to display strings.
#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct NodeDetails {
    pub(in crate::app) title: String,
    pub(in crate::app) id: String,
    pub(in crate::app) labels: Vec<String>,
    pub(in crate::app) description: Option<String>,
    pub(in crate::app) rows: Vec<(String, String)>,
    pub(in crate::app) accent: Color32,
}

impl NodeDetails {
    pub(in crate::app) fn from_node(node: &SimNode) -> Self {
        Self {
            title: node.display_name(),
            id: node.id.to_string(),
            labels: node.labels.clone(),
            description: node.properties.description.clone(),
            rows: node
                .properties
                .rest
                .iter()
                .map(|(key, value)| (key.clone(), value.display()))
                .collect(),
            accent: category_color(node.category),
        }
    }

    pub(in crate::app) fn from_editor_node(node: &EditorNode) -> Self {
        let description = node.description();
        Self {
            title: node.label.clone(),
            id: node.id.clone(),
            labels: [node.kind.as_str(), node.sub_type.as_str()]
                .into_iter()
                .filter(|label| !label.is_empty())
                .map(str::to_owned)
                .collect(),
            description: (!description.trim().is_empty()).then(|| description.to_owned()),
            rows: node
                .properties
                .iter()
                .filter(|(key, _)| key.as_str() != "description")
                .map(|(key, value)| (key.clone(), PropertyValue::from_json(value.clone()).display()))
                .collect(),
            accent: editor_kind_color(&node.kind, &node.sub_type),
        }
    }
}

/// Returns true when the close button was clicked.
pub(in crate::app) fn draw_node_details(ui: &mut Ui, details: &NodeDetails) -> bool {
    let mut close = false;
    ui.horizontal(|ui| {
        ui.heading(RichText::new(&details.title).color(details.accent));
        close = ui.small_button("✕").on_hover_text("Close").clicked();
    });
    ui.small(details.id.as_str());

    if !details.labels.is_empty() {
        ui.label(RichText::new(details.labels.join(" · ")).italics());
    }
    ui.add_space(6.0);

    if let Some(description) = &details.description {
        ui.label(description.as_str());
        ui.add_space(6.0);
    }

    ui.separator();
    if details.rows.is_empty() {
        ui.label("No further properties.");
        return close;
    }

    eframe::egui::ScrollArea::vertical()
        .id_salt("node_properties_scroll")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            eframe::egui::Grid::new("node_properties")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for (key, value) in &details.rows {
                        ui.label(RichText::new(key).strong());
                        ui.label(value.as_str());
                        ui.end_row();
                    }
                });
        });

    close
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;
    use serde_json::json;

    use super::super::super::editor::fixtures::node;
    use super::*;
    use crate::graph::{Category, NodeId, NodeProperties};

    fn sim_node(properties: serde_json::Value) -> SimNode {
        let serde_json::Value::Object(map) = properties else {
            panic!("properties must be an object");
        };
        SimNode {
            id: NodeId::Number(7),
            labels: vec!["Table".to_owned(), "Core".to_owned()],
            category: Category::Table,
            properties: NodeProperties::from_map(map),
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: 25.0,
        }
    }

    #[test]
    fn explorer_details_split_name_description_and_rows() {
        let details = NodeDetails::from_node(&sim_node(json!({
            "name": "orders",
            "description": "All customer orders",
            "row_count": 1200,
            "pii": false
        })));

        assert_eq!(details.title, "orders");
        assert_eq!(details.id, "7");
        assert_eq!(details.labels, vec!["Table", "Core"]);
        assert_eq!(details.description.as_deref(), Some("All customer orders"));
        assert_eq!(
            details.rows,
            vec![
                ("row_count".to_owned(), "1200".to_owned()),
                ("pii".to_owned(), "false".to_owned()),
            ]
        );
    }

    #[test]
    fn nameless_node_falls_back_to_id() {
        let details = NodeDetails::from_node(&sim_node(json!({})));
        assert_eq!(details.title, "7");
        assert_eq!(details.description, None);
        assert!(details.rows.is_empty());
    }

    #[test]
    fn editor_details_skip_description_row() {
        let mut editor_node = node("n1", 0.0, 0.0);
        editor_node
            .properties
            .insert("owner".to_owned(), json!("finance"));

        let details = NodeDetails::from_editor_node(&editor_node);
        assert_eq!(details.title, "n1");
        assert_eq!(details.labels, vec!["source", "table"]);
        assert_eq!(details.description.as_deref(), Some("n1 description"));
        assert_eq!(details.rows, vec![("owner".to_owned(), "finance".to_owned())]);
    }
}
