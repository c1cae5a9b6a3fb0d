//! keel-core
//!
//! Pure naming vocabulary: region codes, the naming convention, name
//! resolution, existing-group linting, and resource-path conventions.
//! No async and no I/O. This is the shared vocabulary of the
//! keel workspace.

pub mod convention;
pub mod error;
pub mod inputs;
pub mod naming;
pub mod region;
pub mod resource;
pub mod scopes;
pub mod validate;

pub use crate::convention::{ComponentKind, NameRule, NameStyle, NamingConvention, ResourceKind};
pub use crate::error::{NameError, NameViolation};
pub use crate::inputs::DeploymentInputs;
pub use crate::naming::{ComponentNames, ComponentSpec, NamingContext};
pub use crate::region::RegionCodeTable;
pub use crate::resource::{ExistingRef, ResourceDescriptor, ResourceRef};
pub use crate::validate::{NamingWarning, WarningKind};
