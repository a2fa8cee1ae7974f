mod category;
mod document;
mod payload;
mod properties;

pub use category::{Category, SizeClass};
pub use document::{EditorDocument, EditorEdge, EditorNode};
pub use payload::{GraphPayload, NodeId, load_graph_payload};
pub use properties::{NodeProperties, PropertyValue};
