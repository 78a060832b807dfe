use crate::ordered_map::OrderedMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Shape of a request or response payload.
///
/// Serialized the way the documentation viewer expects it: a leaf is its type
/// name as a string, an object is a JSON object keyed by field name, and an
/// array is a one-element JSON array holding the element shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Leaf(String),
    Object(OrderedMap<SchemaNode>),
    Array(Box<SchemaNode>),
}

impl SchemaNode {
    pub fn leaf(type_name: impl Into<String>) -> Self {
        SchemaNode::Leaf(type_name.into())
    }

    /// `Object({})`, the shape of a repeated or fieldless composite type
    pub fn empty_object() -> Self {
        SchemaNode::Object(OrderedMap::new())
    }

    pub fn array(element: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(element))
    }

    pub fn as_object(&self) -> Option<&OrderedMap<SchemaNode>> {
        match self {
            SchemaNode::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field of an object node.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.as_object().and_then(|fields| fields.get(name))
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Leaf(type_name) => serializer.serialize_str(type_name),
            SchemaNode::Object(fields) => fields.serialize(serializer),
            SchemaNode::Array(element) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(element.as_ref())?;
                seq.end()
            }
        }
    }
}
