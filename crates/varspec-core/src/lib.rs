//! # varspec-core
//!
//! The deterministic translation and query engine for vehicle variant
//! specifications - THE LOGIC.
//!
//! A variant specification is the list of configuration option codes assigned
//! to a vehicle build order. This crate owns:
//! - the grouped <-> flat assignment codec (`codec`)
//! - selection of an order's current version (`version`)
//! - composition of order filters from optional criteria (`predicate`)
//! - translation between the KDP, PRINS, legacy and internal dialects (`translator`)
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure: every operation is a synchronous transformation of in-memory data
//! - Holds no shared mutable state; all types are `Send + Sync`
//! - Never performs I/O; transport, tokens and order lookup live in the app
//! - Never panics; failures are returned as `VarspecError`

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod formats;
pub mod model;
pub mod predicate;
pub mod primitives;
pub mod query;
pub mod translator;
pub mod types;
pub mod validation;
pub mod version;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Assignment, VariantSpecificationSource, VariantSpecificationType, VarspecError};

// =============================================================================
// RE-EXPORTS: Model
// =============================================================================

pub use model::{
    LegacyVariantSpecification, LegacyVariantSpecificationVersion, TestObjectOrder,
    VariantSpecification, VariantSpecificationVersion,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use codec::{AssignmentGroups, compact_assignments, flatten, group};
pub use predicate::{OrderPredicate, evaluate, filter_orders};
pub use query::OrderQuery;
pub use translator::{
    DescriptorPolicy, Scalars, SpecificationSource, ensure_downgradable, from_alternate,
    from_external, from_legacy, to_external, to_internal,
};
pub use validation::Validator;
pub use version::{SelectionMode, Versioned, require_current, select_current};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{
    KdpAssignment, KdpConfiguration, KdpDynamicVehicleData, KdpVariantSpecification, KdpVehicle,
    PrinsVariantSpecification,
};
