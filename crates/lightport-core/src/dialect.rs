use crate::error::{Error, Result};
use crate::path::{FieldKind, FieldPath};

use FieldKind::{
    Custom, Flags, LongEnum, LongInteger, Real, RealBounds, RealPoint3d, RealRgbColor,
    RealVector3d, ShortEnum, WordFlags,
};

/// Path template plus numeric transform for one logical attribute.
///
/// The tail is the path below the block element; `scale` is the divisor the
/// asset representation applies: `toAsset(v) = v / scale`,
/// `toPortable(v) = v * scale`. Unscaled attributes use 1.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    tail: &'static [(FieldKind, &'static str)],
    scale: f32,
}

impl AttributeRule {
    const fn plain(tail: &'static [(FieldKind, &'static str)]) -> Self {
        Self { tail, scale: 1.0 }
    }

    const fn scaled(tail: &'static [(FieldKind, &'static str)], scale: f32) -> Self {
        Self { tail, scale }
    }

    /// Resolve the template against a block name and element index.
    pub fn path(&self, block: &str, index: usize) -> FieldPath {
        let mut path = FieldPath::element(block, index);
        for &(kind, name) in self.tail {
            path = path.child(kind, name);
        }
        path
    }

    pub fn to_asset(&self, value: f32) -> f32 {
        value / self.scale
    }

    pub fn to_portable(&self, value: f32) -> f32 {
        value * self.scale
    }
}

/// How a dialect lays out the attenuation distance pair.
#[derive(Debug, Clone, Copy)]
pub enum AttenuationLayout {
    /// Both distances in a single two-float bounds field.
    Bounds(AttributeRule),
    /// Start and end as separate scalar fields.
    Split {
        start: AttributeRule,
        end: AttributeRule,
    },
}

/// Per-engine-generation field layout: paths, wire kinds, and numeric
/// transforms for every logical light attribute. Pure data — the codec
/// never branches on which dialect it holds.
#[derive(Debug)]
pub struct SchemaDialect {
    pub name: &'static str,
    pub definition_block: &'static str,
    pub instance_block: &'static str,

    pub light_type: AttributeRule,
    pub flags: AttributeRule,
    /// When set, injection writes this value instead of the record's flags.
    pub flags_sentinel: Option<u32>,
    pub colour: AttributeRule,
    pub intensity: AttributeRule,
    pub attenuation: AttenuationLayout,

    pub definition_index: AttributeRule,
    pub light_mode: AttributeRule,
    /// Enum value meaning "static"; always forced on injection.
    pub light_mode_static: i32,
    pub origin: AttributeRule,
    pub forward: AttributeRule,
    pub up: AttributeRule,
}

impl SchemaDialect {
    /// Look up a dialect by generation name, case-insensitively.
    pub fn by_name(name: &str) -> Result<&'static SchemaDialect> {
        match name.to_ascii_lowercase().as_str() {
            "legacy" => Ok(&LEGACY),
            "modern" => Ok(&MODERN),
            _ => Err(Error::UnknownDialect {
                name: name.to_owned(),
            }),
        }
    }
}

/// Older generation: flat definition layout, short enum type, word-width
/// flags, attenuation as one unscaled bounds pair.
pub static LEGACY: SchemaDialect = SchemaDialect {
    name: "legacy",
    definition_block: "generic light definitions",
    instance_block: "generic light instances",

    light_type: AttributeRule::plain(&[(ShortEnum, "type")]),
    flags: AttributeRule::plain(&[(WordFlags, "flags")]),
    flags_sentinel: None,
    colour: AttributeRule::plain(&[(RealRgbColor, "color")]),
    intensity: AttributeRule::plain(&[(Real, "intensity")]),
    attenuation: AttenuationLayout::Bounds(AttributeRule::plain(&[(
        RealBounds,
        "far attenuation bounds",
    )])),

    definition_index: AttributeRule::plain(&[(LongInteger, "definition index")]),
    light_mode: AttributeRule::plain(&[(LongEnum, "light mode")]),
    light_mode_static: 1,
    origin: AttributeRule::plain(&[(RealPoint3d, "origin")]),
    forward: AttributeRule::plain(&[(RealVector3d, "forward")]),
    up: AttributeRule::plain(&[(RealVector3d, "up")]),
};

/// Newer generation: definition attributes nested under the
/// `Midnight_Light_Parameters` struct, long enum type, long-width flags,
/// attenuation split into two scalars stored at 1/100 scale, with the end
/// distance (and intensity) living behind custom function-editor mappings.
pub static MODERN: SchemaDialect = SchemaDialect {
    name: "modern",
    definition_block: "generic light definitions",
    instance_block: "generic light instances",

    light_type: AttributeRule::plain(&[
        (FieldKind::Struct, "Midnight_Light_Parameters"),
        (LongEnum, "Light Type"),
    ]),
    flags: AttributeRule::plain(&[(Flags, "flags")]),
    // The source injector always wrote 10 here instead of the record's
    // flags. Looks like an unfinished mapping, but it is the observable
    // behavior this dialect preserves.
    flags_sentinel: Some(10),
    colour: AttributeRule::plain(&[
        (FieldKind::Struct, "Midnight_Light_Parameters"),
        (RealRgbColor, "Light Color"),
    ]),
    intensity: AttributeRule::plain(&[
        (FieldKind::Struct, "Midnight_Light_Parameters"),
        (FieldKind::Struct, "Intensity"),
        (Custom, "Mapping"),
    ]),
    attenuation: AttenuationLayout::Split {
        start: AttributeRule::scaled(
            &[
                (FieldKind::Struct, "Midnight_Light_Parameters"),
                (Real, "Distance Attenuation Start"),
            ],
            100.0,
        ),
        end: AttributeRule::scaled(
            &[
                (FieldKind::Struct, "Midnight_Light_Parameters"),
                (FieldKind::Struct, "Distance Attenuation End"),
                (Custom, "Mapping"),
            ],
            100.0,
        ),
    },

    definition_index: AttributeRule::plain(&[(LongInteger, "Light Definition Index")]),
    light_mode: AttributeRule::plain(&[(LongEnum, "light mode")]),
    light_mode_static: 1,
    origin: AttributeRule::plain(&[(RealPoint3d, "origin")]),
    forward: AttributeRule::plain(&[(RealVector3d, "forward")]),
    up: AttributeRule::plain(&[(RealVector3d, "up")]),
};
