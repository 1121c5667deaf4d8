//! crossplane-spy core types.
//!
//! Everything in this crate is pure: no I/O, no cluster access. Raw objects
//! come in as loosely-typed JSON, leave as [`NormalizedResource`].

#![forbid(unsafe_code)]

pub mod fields;
pub mod gvr;
pub mod kind;
pub mod model;
pub mod normalize;
pub mod raw;

pub use fields::ExtractionError;
pub use gvr::EndpointCoordinate;
pub use kind::ResourceKind;
pub use model::{
    Condition, ConditionStatus, KindSpec, Metadata, NormalizedResource, ResourceStatus, Scope, StatusDetails,
};
pub use normalize::{instance_scope, is_ready, normalize};
pub use raw::RawObject;

pub mod prelude {
    pub use super::{
        EndpointCoordinate, ExtractionError, NormalizedResource, RawObject, ResourceKind, Scope,
    };
}
