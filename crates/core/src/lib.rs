pub mod config;
pub mod directory;
pub mod domain;
pub mod envelope;
pub mod errors;

pub use directory::{StaticSupplierDirectory, SupplierDirectory};
pub use domain::strategy::{MarketSignal, NegotiationStrategy};
pub use domain::supplier::{
    PerformanceSnapshot, RiskProfile, SupplierId, SupplierRating, SupplierRecord,
    SupplierSnapshot, SupplierStatus,
};
pub use envelope::{InvocationContext, InvocationEnvelope, ResponseEnvelope};
pub use errors::{DirectoryError, SkillError};
