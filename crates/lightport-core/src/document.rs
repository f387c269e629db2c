use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The closed set of light kinds both dialects agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Omni,
    Spot,
    Directional,
}

impl LightType {
    /// Validate a wire/portable enum value. Unknown values are an error,
    /// never a silent default.
    pub fn from_wire(value: i32) -> Result<Self> {
        match value {
            0 => Ok(LightType::Omni),
            1 => Ok(LightType::Spot),
            2 => Ok(LightType::Directional),
            _ => Err(Error::UnknownLightType { value }),
        }
    }

    pub fn wire_value(self) -> i32 {
        match self {
            LightType::Omni => 0,
            LightType::Spot => 1,
            LightType::Directional => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LightType::Omni => "omni",
            LightType::Spot => "spot",
            LightType::Directional => "directional",
        }
    }
}

/// One static-light definition. `colour` must hold exactly 3 values and
/// `atten_bounds` exactly 2; the codec enforces this before any asset write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDefinition {
    #[serde(rename = "type")]
    pub light_type: i32,
    pub flags: u32,
    pub colour: Vec<f32>,
    pub intensity: f32,
    #[serde(alias = "attenbounds")]
    pub atten_bounds: Vec<f32>,
}

/// One placed light. `def_index` refers to a definition by list position;
/// `forward`/`up` are expected unit-length but not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightInstance {
    #[serde(alias = "defindex")]
    pub def_index: i64,
    pub origin: Vec<f32>,
    pub forward: Vec<f32>,
    pub up: Vec<f32>,
}

/// The portable document: ordered definitions plus ordered instances.
/// List order is the authoritative index space — position is identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDataDocument {
    #[serde(alias = "lightdefinitions", default)]
    pub light_definitions: Vec<LightDefinition>,
    #[serde(alias = "lightinstances", default)]
    pub light_instances: Vec<LightInstance>,
}

impl LightDataDocument {
    /// Parse the portable JSON form. Member names are matched
    /// case-insensitively: keys are lowercased before deserialization, so
    /// `LightDefinitions`, `lightDefinitions` and `lightdefinitions` all
    /// resolve to the same field.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(text)?;
        lowercase_keys(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to the portable JSON form with lower-camel-case names.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn lowercase_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let entries: Vec<(String, Value)> = std::mem::take(map)
                .into_iter()
                .map(|(key, mut inner)| {
                    lowercase_keys(&mut inner);
                    (key.to_ascii_lowercase(), inner)
                })
                .collect();
            map.extend(entries);
        }
        Value::Array(items) => {
            for item in items {
                lowercase_keys(item);
            }
        }
        _ => {}
    }
}
