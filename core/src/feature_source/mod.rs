//! Access to eclipse features: the service's REST wire format and an
//! in-memory source that answers the same queries locally.

pub mod memory;
pub mod wire;

pub use crate::prelude::FeatureSource;
pub use memory::MemorySource;
pub use wire::{decode_feature_set, encode_feature_set, from_params, to_params};
