//! Low-level document operations shared by the merger and the reducer.

pub mod placeholder;
pub mod serialize;
pub mod transform;

pub use placeholder::build_placeholder;
pub use serialize::{serialize_with_profile, SaveProfile};
