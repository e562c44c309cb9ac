//! Application layer: services, the spell-catalog cache, and the
//! service-level error type.

pub mod catalog;
pub mod dice_config;
pub mod error;
pub mod services;

pub use catalog::SpellCatalog;
pub use error::ServiceError;
