//! quire - the boundary between UTF-8 host strings and a PDF library's
//! wide strings, plus the constant tables the library publishes.

pub mod error;
pub mod global;
pub mod registry;
pub mod ustring;

pub use error::{QuireError, Result};
pub use global::{PageBox, Permission, Permissions, Rotation};
pub use registry::{Registry, init};
pub use ustring::{UString, to_external, to_internal};
