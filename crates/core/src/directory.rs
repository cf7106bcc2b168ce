//! Supplier master-data sources.
//!
//! [`SupplierDirectory`] is the seam a real master-data backend plugs into.
//! [`StaticSupplierDirectory`] is the read-only stand-in used by the pilot.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::supplier::{
    RiskProfile, SupplierId, SupplierRating, SupplierRecord, SupplierStatus,
};
use crate::errors::DirectoryError;

#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    async fn find_by_id(&self, id: &SupplierId) -> Result<Option<SupplierRecord>, DirectoryError>;

    /// All records, ordered by supplier id. Lets a backend be enumerated for
    /// consistency checks, since every listed record must resolve through
    /// [`SupplierDirectory::find_by_id`]. Skills only use point lookups.
    async fn list(&self) -> Result<Vec<SupplierRecord>, DirectoryError>;
}

/// Ratings are percentages.
const MAX_RATING: u8 = 100;

#[derive(Clone, Debug)]
pub struct StaticSupplierDirectory {
    suppliers: BTreeMap<SupplierId, SupplierRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    supplier: Vec<SupplierRecord>,
}

impl StaticSupplierDirectory {
    /// Keys every record by its own `supplierId`. Blank or duplicate ids and
    /// ratings above 100 are rejected.
    pub fn from_records(
        records: impl IntoIterator<Item = SupplierRecord>,
    ) -> Result<Self, DirectoryError> {
        let mut suppliers = BTreeMap::new();
        for record in records {
            validate_record(&record)?;
            let id = record.supplier_id.clone();
            if suppliers.insert(id.clone(), record).is_some() {
                return Err(DirectoryError::Decode(format!("duplicate supplier id `{id}`")));
            }
        }
        Ok(Self { suppliers })
    }

    /// Loads `[[supplier]]` tables from a TOML fixture file.
    pub fn from_toml_file(path: &Path) -> Result<Self, DirectoryError> {
        let raw = fs::read_to_string(path).map_err(|error| {
            DirectoryError::Unavailable(format!(
                "could not read fixtures `{}`: {error}",
                path.display()
            ))
        })?;
        let fixtures = toml::from_str::<FixtureFile>(&raw).map_err(|error| {
            DirectoryError::Decode(format!(
                "could not parse fixtures `{}`: {error}",
                path.display()
            ))
        })?;

        debug!(
            event_name = "directory.fixtures.loaded",
            path = %path.display(),
            supplier_count = fixtures.supplier.len(),
            "supplier fixtures loaded"
        );
        Self::from_records(fixtures.supplier)
    }

    /// The two pilot suppliers.
    pub fn pilot() -> Self {
        let suppliers = pilot_records()
            .into_iter()
            .map(|record| (record.supplier_id.clone(), record))
            .collect();
        Self { suppliers }
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

impl Default for StaticSupplierDirectory {
    fn default() -> Self {
        Self::pilot()
    }
}

#[async_trait]
impl SupplierDirectory for StaticSupplierDirectory {
    async fn find_by_id(&self, id: &SupplierId) -> Result<Option<SupplierRecord>, DirectoryError> {
        Ok(self.suppliers.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<SupplierRecord>, DirectoryError> {
        Ok(self.suppliers.values().cloned().collect())
    }
}

fn validate_record(record: &SupplierRecord) -> Result<(), DirectoryError> {
    let id = &record.supplier_id;
    if id.as_str().trim().is_empty() {
        return Err(DirectoryError::Decode(format!(
            "supplier `{}` has a blank supplierId",
            record.name
        )));
    }

    let rating = &record.rating;
    for (field, value) in
        [("quality", rating.quality), ("delivery", rating.delivery), ("overall", rating.overall)]
    {
        if value > MAX_RATING {
            return Err(DirectoryError::Decode(format!(
                "supplier `{id}` has rating.{field} = {value}, expected 0-{MAX_RATING}"
            )));
        }
    }
    Ok(())
}

fn pilot_records() -> Vec<SupplierRecord> {
    vec![
        SupplierRecord {
            supplier_id: SupplierId("1000123".to_string()),
            name: "Acme Corp".to_string(),
            status: SupplierStatus::Active,
            rating: SupplierRating { quality: 95, delivery: 88, overall: 91 },
            risk_profile: RiskProfile::Low,
            payment_terms: "Net 30".to_string(),
        },
        SupplierRecord {
            supplier_id: SupplierId("1000999".to_string()),
            name: "Globex Inc".to_string(),
            status: SupplierStatus::Blocked,
            rating: SupplierRating { quality: 70, delivery: 65, overall: 68 },
            risk_profile: RiskProfile::High,
            payment_terms: "Net 60".to_string(),
        },
    ]
}
