//! # Formats Module
//!
//! Wire dialects exchanged with the configuration authorities.
//!
//! - `kdp`: the external KDP specification and its request seeds
//! - `prins`: the alternate PRINS specification

pub mod kdp;
pub mod prins;

pub use kdp::{
    KdpAssignment, KdpConfiguration, KdpDynamicVehicleData, KdpVariantSpecification, KdpVehicle,
};
pub use prins::PrinsVariantSpecification;
