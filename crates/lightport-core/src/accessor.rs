use crate::error::Result;
use crate::path::FieldPath;

/// Typed field access over a structured tag document — the capability the
/// external tag subsystem exposes to the codec. One method pair per value
/// kind, keyed by structured paths rather than raw strings.
///
/// Block fields are append-only: elements are added at the end and never
/// removed or reordered, so element index is a stable identity.
pub trait FieldAccessor {
    /// Number of elements in a block field.
    fn block_count(&self, block: &FieldPath) -> Result<usize>;

    /// Append a fresh element to a block field, returning its index.
    fn append_block_element(&mut self, block: &FieldPath) -> Result<usize>;

    fn get_enum(&self, path: &FieldPath) -> Result<i32>;
    fn set_enum(&mut self, path: &FieldPath, value: i32) -> Result<()>;

    fn get_flags(&self, path: &FieldPath) -> Result<u32>;
    fn set_flags(&mut self, path: &FieldPath, value: u32) -> Result<()>;

    /// Long-integer fields are 32-bit on the wire; narrowing from the
    /// portable 64-bit representation happens before this call.
    fn get_integer(&self, path: &FieldPath) -> Result<i32>;
    fn set_integer(&mut self, path: &FieldPath, value: i32) -> Result<()>;

    fn get_scalar(&self, path: &FieldPath) -> Result<f32>;
    fn set_scalar(&mut self, path: &FieldPath, value: f32) -> Result<()>;

    fn get_vector3(&self, path: &FieldPath) -> Result<[f32; 3]>;
    fn set_vector3(&mut self, path: &FieldPath, value: [f32; 3]) -> Result<()>;

    fn get_bounds(&self, path: &FieldPath) -> Result<[f32; 2]>;
    fn set_bounds(&mut self, path: &FieldPath, value: [f32; 2]) -> Result<()>;
}

/// An opened tag document. Exclusively owned for the duration of one run;
/// dropping the handle releases it on every exit path.
pub trait TagHandle: FieldAccessor {
    /// Persist the document. Injection calls this on success and failure
    /// alike — partially-written state is saved as-is, with no rollback.
    fn save(&mut self) -> Result<()>;
}

/// Opens tag documents by a fully-resolved locator. The locator's meaning
/// belongs to the store; the core never validates it.
pub trait TagStore {
    type Handle: TagHandle;

    fn open(&self, locator: &str) -> Result<Self::Handle>;
}
