use crate::accessor::FieldAccessor;
use crate::dialect::{AttenuationLayout, SchemaDialect};
use crate::document::{LightDefinition, LightInstance, LightType};
use crate::error::{Error, Result};
use crate::path::FieldPath;

/// Decode/encode of light records against a [`FieldAccessor`], parameterized
/// by a [`SchemaDialect`]. The codec holds no state of its own: all layout
/// differences between generations live in the dialect data.
///
/// Every record is validated in full before its first accessor call, so a
/// rejected record never leaves a half-written element behind. A failure
/// mid-list still aborts the remaining records with earlier elements intact;
/// rollback is the caller's problem (and the driver deliberately has none).
pub struct RecordCodec<'a> {
    dialect: &'a SchemaDialect,
}

impl<'a> RecordCodec<'a> {
    pub fn new(dialect: &'a SchemaDialect) -> Self {
        Self { dialect }
    }

    /// Read every light definition, in index order `0..N`.
    pub fn decode_definitions(&self, tag: &dyn FieldAccessor) -> Result<Vec<LightDefinition>> {
        let d = self.dialect;
        let block = d.definition_block;
        let count = tag.block_count(&FieldPath::block(block))?;
        let mut definitions = Vec::with_capacity(count);
        for i in 0..count {
            let raw_type = tag.get_enum(&d.light_type.path(block, i))?;
            LightType::from_wire(raw_type)?;
            let flags = tag.get_flags(&d.flags.path(block, i))?;
            let colour = tag.get_vector3(&d.colour.path(block, i))?;
            let intensity = d
                .intensity
                .to_portable(tag.get_scalar(&d.intensity.path(block, i))?);
            let atten_bounds = match &d.attenuation {
                AttenuationLayout::Bounds(rule) => {
                    let bounds = tag.get_bounds(&rule.path(block, i))?;
                    vec![rule.to_portable(bounds[0]), rule.to_portable(bounds[1])]
                }
                AttenuationLayout::Split { start, end } => vec![
                    start.to_portable(tag.get_scalar(&start.path(block, i))?),
                    end.to_portable(tag.get_scalar(&end.path(block, i))?),
                ],
            };
            definitions.push(LightDefinition {
                light_type: raw_type,
                flags,
                colour: colour.to_vec(),
                intensity,
                atten_bounds,
            });
        }
        Ok(definitions)
    }

    /// Read every light instance, in index order `0..N`. Instances carry no
    /// flags, and light mode is never read back.
    pub fn decode_instances(&self, tag: &dyn FieldAccessor) -> Result<Vec<LightInstance>> {
        let d = self.dialect;
        let block = d.instance_block;
        let count = tag.block_count(&FieldPath::block(block))?;
        let mut instances = Vec::with_capacity(count);
        for i in 0..count {
            let def_index = tag.get_integer(&d.definition_index.path(block, i))? as i64;
            let origin = tag.get_vector3(&d.origin.path(block, i))?;
            let forward = tag.get_vector3(&d.forward.path(block, i))?;
            let up = tag.get_vector3(&d.up.path(block, i))?;
            instances.push(LightInstance {
                def_index,
                origin: origin.to_vec(),
                forward: forward.to_vec(),
                up: up.to_vec(),
            });
        }
        Ok(instances)
    }

    /// Append every definition to the asset in list order.
    pub fn encode_definitions(
        &self,
        tag: &mut dyn FieldAccessor,
        definitions: &[LightDefinition],
    ) -> Result<()> {
        let d = self.dialect;
        let block = d.definition_block;
        for def in definitions {
            // Validate before touching the asset.
            LightType::from_wire(def.light_type)?;
            let colour = vec3("colour", &def.colour)?;
            let atten = bounds2("attenBounds", &def.atten_bounds)?;

            let i = tag.append_block_element(&FieldPath::block(block))?;
            tag.set_enum(&d.light_type.path(block, i), def.light_type)?;
            let flags = d.flags_sentinel.unwrap_or(def.flags);
            tag.set_flags(&d.flags.path(block, i), flags)?;
            tag.set_vector3(&d.colour.path(block, i), colour)?;
            tag.set_scalar(
                &d.intensity.path(block, i),
                d.intensity.to_asset(def.intensity),
            )?;
            match &d.attenuation {
                AttenuationLayout::Bounds(rule) => {
                    tag.set_bounds(
                        &rule.path(block, i),
                        [rule.to_asset(atten[0]), rule.to_asset(atten[1])],
                    )?;
                }
                AttenuationLayout::Split { start, end } => {
                    tag.set_scalar(&start.path(block, i), start.to_asset(atten[0]))?;
                    tag.set_scalar(&end.path(block, i), end.to_asset(atten[1]))?;
                }
            }
        }
        Ok(())
    }

    /// Append every instance to the asset in list order. `definition_count`
    /// is the number of definitions the same run injected; references
    /// outside `0..definition_count` are rejected before any write.
    pub fn encode_instances(
        &self,
        tag: &mut dyn FieldAccessor,
        instances: &[LightInstance],
        definition_count: usize,
    ) -> Result<()> {
        let d = self.dialect;
        let block = d.instance_block;
        for inst in instances {
            if inst.def_index < 0 || inst.def_index >= definition_count as i64 {
                return Err(Error::DefinitionIndexOutOfRange {
                    index: inst.def_index,
                    count: definition_count,
                });
            }
            let def_index = i32::try_from(inst.def_index)
                .map_err(|_| Error::ValueOutOfRange { attribute: "defIndex" })?;
            let origin = vec3("origin", &inst.origin)?;
            let forward = vec3("forward", &inst.forward)?;
            let up = vec3("up", &inst.up)?;

            let i = tag.append_block_element(&FieldPath::block(block))?;
            tag.set_integer(&d.definition_index.path(block, i), def_index)?;
            tag.set_enum(&d.light_mode.path(block, i), d.light_mode_static)?;
            tag.set_vector3(&d.origin.path(block, i), origin)?;
            tag.set_vector3(&d.forward.path(block, i), forward)?;
            tag.set_vector3(&d.up.path(block, i), up)?;
        }
        Ok(())
    }
}

fn vec3(attribute: &'static str, values: &[f32]) -> Result<[f32; 3]> {
    match values {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(Error::ArrayLengthMismatch {
            attribute,
            expected: 3,
            actual: values.len(),
        }),
    }
}

fn bounds2(attribute: &'static str, values: &[f32]) -> Result<[f32; 2]> {
    match values {
        &[lo, hi] => Ok([lo, hi]),
        _ => Err(Error::ArrayLengthMismatch {
            attribute,
            expected: 2,
            actual: values.len(),
        }),
    }
}
