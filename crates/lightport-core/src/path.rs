use std::fmt;

/// Field kind token in a tag field path. The token spelling matches the
/// asset's addressing grammar exactly, including its inconsistent casing
/// (`Realbounds`, not `RealBounds`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Block,
    Struct,
    ShortEnum,
    LongEnum,
    WordFlags,
    /// Long-width flags; the modern grammar spells this bare `Flags`.
    Flags,
    Real,
    RealRgbColor,
    RealBounds,
    RealPoint3d,
    RealVector3d,
    LongInteger,
    /// Custom function-editor mapping; its clamp-range minimum is read and
    /// written as a plain scalar.
    Custom,
}

impl FieldKind {
    pub fn token(self) -> &'static str {
        match self {
            FieldKind::Block => "Block",
            FieldKind::Struct => "Struct",
            FieldKind::ShortEnum => "ShortEnum",
            FieldKind::LongEnum => "LongEnum",
            FieldKind::WordFlags => "WordFlags",
            FieldKind::Flags => "Flags",
            FieldKind::Real => "Real",
            FieldKind::RealRgbColor => "RealRgbColor",
            FieldKind::RealBounds => "Realbounds",
            FieldKind::RealPoint3d => "RealPoint3d",
            FieldKind::RealVector3d => "RealVector3d",
            FieldKind::LongInteger => "LongInteger",
            FieldKind::Custom => "Custom",
        }
    }
}

/// One `Kind:name` segment, optionally indexed (`Kind:name[3]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: FieldKind,
    pub name: String,
    pub index: Option<usize>,
}

/// Structured tag field address. Replaces the raw path strings the asset
/// grammar uses with a value that can only be built segment by segment, so
/// kind dispatch is checked where the path is constructed rather than where
/// it is consumed.
///
/// Renders as `Block:generic light definitions[0]/ShortEnum:type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Address of a block field itself (for counting/appending elements).
    pub fn block(name: &str) -> Self {
        Self {
            segments: vec![Segment {
                kind: FieldKind::Block,
                name: name.to_owned(),
                index: None,
            }],
        }
    }

    /// Address of element `index` within a block.
    pub fn element(block: &str, index: usize) -> Self {
        Self {
            segments: vec![Segment {
                kind: FieldKind::Block,
                name: block.to_owned(),
                index: Some(index),
            }],
        }
    }

    /// Extend the path with a child segment.
    pub fn child(mut self, kind: FieldKind, name: &str) -> Self {
        self.segments.push(Segment {
            kind,
            name: name.to_owned(),
            index: None,
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Kind of the final segment — the value kind an accessor call must match.
    pub fn leaf_kind(&self) -> FieldKind {
        self.segments.last().map(|s| s.kind).unwrap_or(FieldKind::Block)
    }

    /// Name of the root block segment.
    pub fn block_name(&self) -> Option<&str> {
        self.segments.first().map(|s| s.name.as_str())
    }

    /// Element index on the root block segment, if addressed.
    pub fn element_index(&self) -> Option<usize> {
        self.segments.first().and_then(|s| s.index)
    }

    /// Rendered path below the block element — the key a field occupies
    /// within its element, independent of which element it is.
    pub fn field_key(&self) -> String {
        self.segments[1..]
            .iter()
            .map(render_segment)
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn render_segment(segment: &Segment) -> String {
    match segment.index {
        Some(i) => format!("{}:{}[{}]", segment.kind.token(), segment.name, i),
        None => format!("{}:{}", segment.kind.token(), segment.name),
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(render_segment).collect();
        write!(f, "{}", rendered.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_block_element_path() {
        let path = FieldPath::element("generic light definitions", 0)
            .child(FieldKind::ShortEnum, "type");
        assert_eq!(
            path.to_string(),
            "Block:generic light definitions[0]/ShortEnum:type"
        );
        assert_eq!(path.leaf_kind(), FieldKind::ShortEnum);
    }

    #[test]
    fn renders_nested_struct_path() {
        let path = FieldPath::element("generic light definitions", 7)
            .child(FieldKind::Struct, "Midnight_Light_Parameters")
            .child(FieldKind::LongEnum, "Light Type");
        assert_eq!(
            path.to_string(),
            "Block:generic light definitions[7]/Struct:Midnight_Light_Parameters/LongEnum:Light Type"
        );
    }

    #[test]
    fn field_key_drops_the_element_prefix() {
        let a = FieldPath::element("generic light instances", 0)
            .child(FieldKind::RealPoint3d, "origin");
        let b = FieldPath::element("generic light instances", 9)
            .child(FieldKind::RealPoint3d, "origin");
        assert_eq!(a.field_key(), "RealPoint3d:origin");
        assert_eq!(a.field_key(), b.field_key());
    }

    #[test]
    fn bare_block_path_has_no_index() {
        let path = FieldPath::block("generic light definitions");
        assert_eq!(path.to_string(), "Block:generic light definitions");
        assert_eq!(path.element_index(), None);
        assert_eq!(path.block_name(), Some("generic light definitions"));
    }
}
