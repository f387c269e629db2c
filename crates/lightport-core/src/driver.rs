use crate::accessor::{TagHandle, TagStore};
use crate::codec::RecordCodec;
use crate::dialect::SchemaDialect;
use crate::document::LightDataDocument;
use crate::error::Result;

/// Whole-document conversion, one direction per run. The tag handle is
/// acquired once, used for the full pass, and released when it drops —
/// including on the error path.
pub struct ConversionDriver<'a> {
    dialect: &'a SchemaDialect,
}

impl<'a> ConversionDriver<'a> {
    pub fn new(dialect: &'a SchemaDialect) -> Self {
        Self { dialect }
    }

    /// Decode both blocks from the asset into a fresh portable document.
    pub fn extract<S: TagStore>(&self, store: &S, locator: &str) -> Result<LightDataDocument> {
        let tag = store.open(locator)?;
        let codec = RecordCodec::new(self.dialect);
        let light_definitions = codec.decode_definitions(&tag)?;
        let light_instances = codec.decode_instances(&tag)?;
        Ok(LightDataDocument {
            light_definitions,
            light_instances,
        })
    }

    /// Encode both lists into the asset in list order, then persist.
    ///
    /// The save happens regardless of encode success: a failing record
    /// aborts the remaining records, but everything appended before the
    /// failure is kept and written out. No rollback.
    pub fn inject<S: TagStore>(
        &self,
        document: &LightDataDocument,
        store: &S,
        locator: &str,
    ) -> Result<()> {
        let mut tag = store.open(locator)?;
        let codec = RecordCodec::new(self.dialect);
        let encoded = codec
            .encode_definitions(&mut tag, &document.light_definitions)
            .and_then(|()| {
                codec.encode_instances(
                    &mut tag,
                    &document.light_instances,
                    document.light_definitions.len(),
                )
            });
        let saved = tag.save();
        encoded.and(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::FieldAccessor;
    use crate::dialect::LEGACY;
    use crate::document::{LightDefinition, LightInstance};
    use crate::error::{Error, Result};
    use crate::path::FieldPath;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// Shared observable state so tests can inspect what happened to a
    /// handle after the driver is done with it.
    #[derive(Debug, Default)]
    struct StoreState {
        saves: usize,
        appended: usize,
        dropped: bool,
    }

    struct TestTag {
        fields: BTreeMap<String, f32>,
        counts: BTreeMap<String, usize>,
        state: Rc<RefCell<StoreState>>,
    }

    impl Drop for TestTag {
        fn drop(&mut self) {
            self.state.borrow_mut().dropped = true;
        }
    }

    impl FieldAccessor for TestTag {
        fn block_count(&self, block: &FieldPath) -> Result<usize> {
            Ok(*self
                .counts
                .get(block.block_name().unwrap_or_default())
                .unwrap_or(&0))
        }

        fn append_block_element(&mut self, block: &FieldPath) -> Result<usize> {
            self.state.borrow_mut().appended += 1;
            let count = self
                .counts
                .entry(block.block_name().unwrap_or_default().to_owned())
                .or_insert(0);
            *count += 1;
            Ok(*count - 1)
        }

        fn get_enum(&self, path: &FieldPath) -> Result<i32> {
            self.lookup(path).map(|v| v as i32)
        }
        fn set_enum(&mut self, path: &FieldPath, value: i32) -> Result<()> {
            self.fields.insert(path.to_string(), value as f32);
            Ok(())
        }
        fn get_flags(&self, path: &FieldPath) -> Result<u32> {
            self.lookup(path).map(|v| v as u32)
        }
        fn set_flags(&mut self, path: &FieldPath, value: u32) -> Result<()> {
            self.fields.insert(path.to_string(), value as f32);
            Ok(())
        }
        fn get_integer(&self, path: &FieldPath) -> Result<i32> {
            self.lookup(path).map(|v| v as i32)
        }
        fn set_integer(&mut self, path: &FieldPath, value: i32) -> Result<()> {
            self.fields.insert(path.to_string(), value as f32);
            Ok(())
        }
        fn get_scalar(&self, path: &FieldPath) -> Result<f32> {
            self.lookup(path)
        }
        fn set_scalar(&mut self, path: &FieldPath, value: f32) -> Result<()> {
            self.fields.insert(path.to_string(), value);
            Ok(())
        }
        fn get_vector3(&self, path: &FieldPath) -> Result<[f32; 3]> {
            let base = self.lookup(path)?;
            Ok([base, base, base])
        }
        fn set_vector3(&mut self, path: &FieldPath, value: [f32; 3]) -> Result<()> {
            self.fields.insert(path.to_string(), value[0]);
            Ok(())
        }
        fn get_bounds(&self, path: &FieldPath) -> Result<[f32; 2]> {
            let base = self.lookup(path)?;
            Ok([base, base])
        }
        fn set_bounds(&mut self, path: &FieldPath, value: [f32; 2]) -> Result<()> {
            self.fields.insert(path.to_string(), value[0]);
            Ok(())
        }
    }

    impl TestTag {
        fn lookup(&self, path: &FieldPath) -> Result<f32> {
            self.fields
                .get(&path.to_string())
                .copied()
                .ok_or_else(|| Error::FieldNotFound {
                    path: path.to_string(),
                })
        }
    }

    impl TagHandle for TestTag {
        fn save(&mut self) -> Result<()> {
            self.state.borrow_mut().saves += 1;
            Ok(())
        }
    }

    struct TestStore {
        state: Rc<RefCell<StoreState>>,
    }

    impl TagStore for TestStore {
        type Handle = TestTag;

        fn open(&self, _locator: &str) -> Result<TestTag> {
            Ok(TestTag {
                fields: BTreeMap::new(),
                counts: BTreeMap::new(),
                state: Rc::clone(&self.state),
            })
        }
    }

    fn document(defs: Vec<LightDefinition>, insts: Vec<LightInstance>) -> LightDataDocument {
        LightDataDocument {
            light_definitions: defs,
            light_instances: insts,
        }
    }

    fn good_definition() -> LightDefinition {
        LightDefinition {
            light_type: 0,
            flags: 2,
            colour: vec![0.5, 0.5, 0.5],
            intensity: 1.5,
            atten_bounds: vec![1.0, 8.0],
        }
    }

    #[test]
    fn inject_saves_and_releases_on_success() {
        let state = Rc::new(RefCell::new(StoreState::default()));
        let store = TestStore {
            state: Rc::clone(&state),
        };
        let driver = ConversionDriver::new(&LEGACY);
        driver
            .inject(&document(vec![good_definition()], vec![]), &store, "tag")
            .unwrap();

        let state = state.borrow();
        assert_eq!(state.saves, 1);
        assert!(state.dropped);
    }

    #[test]
    fn inject_still_saves_when_a_record_fails() {
        let state = Rc::new(RefCell::new(StoreState::default()));
        let store = TestStore {
            state: Rc::clone(&state),
        };
        let mut bad = good_definition();
        bad.colour = vec![1.0];

        let driver = ConversionDriver::new(&LEGACY);
        let err = driver
            .inject(
                &document(vec![good_definition(), bad], vec![]),
                &store,
                "tag",
            )
            .unwrap_err();
        assert!(matches!(err, Error::ArrayLengthMismatch { .. }));

        let state = state.borrow();
        // The first record was appended, and the partial asset was persisted.
        assert_eq!(state.appended, 1);
        assert_eq!(state.saves, 1);
        assert!(state.dropped);
    }

    /// Store whose handle claims one definition element but holds no
    /// fields, so the first decode read fails.
    struct PhantomStore {
        state: Rc<RefCell<StoreState>>,
    }

    impl TagStore for PhantomStore {
        type Handle = TestTag;

        fn open(&self, _locator: &str) -> Result<TestTag> {
            let mut counts = BTreeMap::new();
            counts.insert("generic light definitions".to_owned(), 1);
            Ok(TestTag {
                fields: BTreeMap::new(),
                counts,
                state: Rc::clone(&self.state),
            })
        }
    }

    #[test]
    fn extract_releases_the_handle_on_failure() {
        let state = Rc::new(RefCell::new(StoreState::default()));
        let store = PhantomStore {
            state: Rc::clone(&state),
        };
        let driver = ConversionDriver::new(&LEGACY);
        let err = driver.extract(&store, "tag").unwrap_err();
        assert!(matches!(err, Error::FieldNotFound { .. }));
        assert!(state.borrow().dropped);
    }

    #[test]
    fn extract_of_an_empty_asset_yields_an_empty_document() {
        let state = Rc::new(RefCell::new(StoreState::default()));
        let store = TestStore {
            state: Rc::clone(&state),
        };
        let driver = ConversionDriver::new(&LEGACY);
        let doc = driver.extract(&store, "tag").unwrap();
        assert!(doc.light_definitions.is_empty());
        assert!(doc.light_instances.is_empty());
        assert!(state.borrow().dropped);
    }
}
