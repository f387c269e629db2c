//! Schema-driven conversion between tag-stored level light data and a
//! portable JSON document.
//!
//! Three-layer architecture:
//! - **Layer 1** (`path`/`accessor`): structured field addressing and the
//!   typed capability interface the external tag store exposes
//! - **Layer 2** (`dialect`/`codec`): per-generation field layout data and
//!   the record decode/encode logic parameterized by it
//! - **Layer 3** (`driver`): whole-document extraction/injection with
//!   scoped asset acquisition

pub mod accessor;
pub mod codec;
pub mod dialect;
pub mod document;
pub mod driver;
pub mod error;
pub mod path;

pub use accessor::{FieldAccessor, TagHandle, TagStore};
pub use codec::RecordCodec;
pub use dialect::SchemaDialect;
pub use document::{LightDataDocument, LightDefinition, LightInstance, LightType};
pub use driver::ConversionDriver;
pub use error::{Error, Result};
