use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SupplierId(pub String);

impl SupplierId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SupplierId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Master-data status. Backends may report statuses outside the known pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierStatus {
    Active,
    Blocked,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

/// Performance scores as integer percentages in `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRating {
    pub quality: u8,
    pub delivery: u8,
    pub overall: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRecord {
    pub supplier_id: SupplierId,
    pub name: String,
    pub status: SupplierStatus,
    pub rating: SupplierRating,
    pub risk_profile: RiskProfile,
    pub payment_terms: String,
}

/// The part of a supplier record that strategy generation reads.
///
/// Decoding a full [`SupplierRecord`] value into a snapshot drops the fields
/// the strategy prompt does not interpolate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSnapshot {
    pub supplier_id: SupplierId,
    pub name: String,
    pub rating: PerformanceSnapshot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub quality: u8,
    pub delivery: u8,
}

impl From<&SupplierRecord> for SupplierSnapshot {
    fn from(record: &SupplierRecord) -> Self {
        Self {
            supplier_id: record.supplier_id.clone(),
            name: record.name.clone(),
            rating: PerformanceSnapshot {
                quality: record.rating.quality,
                delivery: record.rating.delivery,
            },
        }
    }
}
