//! # Domain Model
//!
//! Orders, the versions they own, and the internal flat specification.
//!
//! - `specification`: `VariantSpecification` + `VariantSpecificationVersion`
//! - `legacy`: fixed-field records + `LegacyVariantSpecificationVersion`
//! - `order`: `TestObjectOrder`
//!
//! Wire names are camelCase. Missing fields fall back to their defaults, so a
//! partially populated JSON document still loads.

mod legacy;
mod order;
mod specification;

pub use legacy::{LegacyVariantSpecification, LegacyVariantSpecificationVersion};
pub use order::TestObjectOrder;
pub use specification::{VariantSpecification, VariantSpecificationVersion};
