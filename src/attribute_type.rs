//! Attribute types
//!
//! The catalog describes column types as JSON objects tagged by `baseType`.
//! Composite types nest: `ARRAY` and `MAP` carry an `innerType`, `RECORD`
//! carries named sub-attributes.
//!
//! ```text
//! {"baseType": "ARRAY", "innerType": {"baseType": "STRING"}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "baseType", rename_all = "UPPERCASE")]
pub enum AttributeType {
    Boolean,
    Double,
    Int,
    Long,
    String,
    Array {
        #[serde(rename = "innerType")]
        inner_type: Box<AttributeType>,
    },
    Map {
        #[serde(rename = "innerType")]
        inner_type: Box<AttributeType>,
    },
    Record {
        attributes: Vec<SubAttribute>,
    },
}

/// A named field of a `RECORD` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(rename = "isNullable")]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubAttribute {
    pub fn to_json(&self) -> Value {
        let mut data = json!({
            "name": self.name,
            "type": self.attr_type.to_json(),
            "isNullable": self.is_nullable,
        });
        if let Some(description) = &self.description {
            data["description"] = json!(description);
        }
        data
    }

    pub fn new(name: &str, attr_type: AttributeType, is_nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            attr_type,
            is_nullable,
            description: None,
        }
    }
}

/// `ARRAY<STRING>`, the catalog's type for columns created without one.
impl Default for AttributeType {
    fn default() -> Self {
        Self::array(Self::String)
    }
}

impl AttributeType {
    pub fn array(inner: AttributeType) -> Self {
        Self::Array {
            inner_type: Box::new(inner),
        }
    }

    pub fn map(inner: AttributeType) -> Self {
        Self::Map {
            inner_type: Box::new(inner),
        }
    }

    /// Geometry record used for spatial columns. Coordinates are nested `DOUBLE` arrays.
    pub fn geospatial() -> Self {
        let point = Self::array(Self::Double);
        let path = Self::array(point.clone());
        let rings = Self::array(path.clone());
        let polygons = Self::array(rings.clone());

        Self::Record {
            attributes: vec![
                SubAttribute::new("point", point, true),
                SubAttribute::new("multiPoint", path.clone(), true),
                SubAttribute::new("lineString", path, true),
                SubAttribute::new("multiLineString", rings.clone(), true),
                SubAttribute::new("polygon", rings, true),
                SubAttribute::new("multiPolygon", polygons, true),
            ],
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            Self::Array { .. } | Self::Map { .. } | Self::Record { .. }
        )
    }

    pub fn from_json(data: &Value) -> serde_json::Result<Self> {
        Self::deserialize(data)
    }

    /// Value of the `baseType` tag.
    pub fn base_type(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Double => "DOUBLE",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::String => "STRING",
            Self::Array { .. } => "ARRAY",
            Self::Map { .. } => "MAP",
            Self::Record { .. } => "RECORD",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut data = json!({ "baseType": self.base_type() });
        match self {
            Self::Array { inner_type } | Self::Map { inner_type } => {
                data["innerType"] = inner_type.to_json();
            }
            Self::Record { attributes } => {
                data["attributes"] = attributes.iter().map(SubAttribute::to_json).collect();
            }
            _ => {}
        }
        data
    }
}
