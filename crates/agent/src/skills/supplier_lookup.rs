use std::sync::Arc;

use async_trait::async_trait;
use procura_core::{
    InvocationContext, InvocationEnvelope, ResponseEnvelope, SkillError, SupplierDirectory,
    SupplierId, SupplierRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{decode_request, encode_payload, respond, Skill};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierLookupRequest {
    pub supplier_id: SupplierId,
}

/// Retrieves supplier master data and performance ratings.
pub struct SupplierLookupSkill {
    directory: Arc<dyn SupplierDirectory>,
}

impl SupplierLookupSkill {
    pub const NAME: &'static str = "get-supplier-data";

    pub fn new(directory: Arc<dyn SupplierDirectory>) -> Self {
        Self { directory }
    }

    pub async fn lookup(
        &self,
        request: &SupplierLookupRequest,
    ) -> Result<SupplierRecord, SkillError> {
        self.directory
            .find_by_id(&request.supplier_id)
            .await?
            .ok_or_else(|| SkillError::NotFound { id: request.supplier_id.to_string() })
    }
}

#[async_trait]
impl Skill for SupplierLookupSkill {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Retrieve supplier master data and performance metrics"
    }

    async fn invoke(
        &self,
        envelope: InvocationEnvelope<Value>,
        context: &InvocationContext,
    ) -> ResponseEnvelope {
        let outcome = async {
            let request: SupplierLookupRequest = decode_request(envelope.data)?;
            info!(
                event_name = "skill.supplier_lookup.fetch",
                correlation_id = %context.correlation_id,
                supplier_id = %request.supplier_id,
                "fetching data for supplier"
            );
            let record = self.lookup(&request).await?;
            encode_payload(&record)
        }
        .await;

        respond(Self::NAME, outcome, context, INTERNAL_MESSAGE)
    }
}
