pub mod descriptor;
pub mod diff;
pub mod error;
pub mod resource;
pub mod snapshot;

pub use descriptor::{HOST_NAME, OBJECT_ID, WebSignInApp};
pub use diff::{
    ChangeKind, ChangePolicy, DiffResult, FieldChange, TrackedField, WEB_SIGN_IN_FIELDS, diff,
};
pub use error::{ErrorCategory, ProviderError, Result};
pub use resource::{ResourceKind, Urn};
pub use snapshot::{PropertySnapshot, UNKNOWN_VALUE};
