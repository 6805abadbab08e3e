pub mod errors;
pub mod id;

pub use errors::{AideError, ConfigError, SurfaceError};
pub use id::{new_id, ViewId};

pub type Result<T> = std::result::Result<T, AideError>;
