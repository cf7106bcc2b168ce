use procura_agent::{NegotiationStrategySkill, RegistryError, SkillRegistry, SupplierLookupSkill};
use procura_core::{InvocationContext, InvocationEnvelope, ResponseEnvelope};
use serde_json::json;

use crate::commands::{current_thread_runtime, prepare, CommandResult, EXIT_SETUP};

/// Looks the supplier up, then generates a strategy from the returned record.
/// A failed lookup envelope is printed as-is.
pub fn run(supplier_id: &str, trend: &str, objectives: &[String]) -> CommandResult {
    let registry = match prepare("strategy") {
        Ok(registry) => registry,
        Err(result) => return result,
    };

    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "strategy",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_SETUP,
            )
        }
    };

    let context = InvocationContext::default();
    match runtime.block_on(generate(&registry, supplier_id, trend, objectives, &context)) {
        Ok(response) => CommandResult::envelope(&response),
        Err(error) => CommandResult::failure("strategy", "registry", error.to_string(), EXIT_SETUP),
    }
}

async fn generate(
    registry: &SkillRegistry,
    supplier_id: &str,
    trend: &str,
    objectives: &[String],
    context: &InvocationContext,
) -> Result<ResponseEnvelope, RegistryError> {
    let lookup = registry
        .invoke(
            SupplierLookupSkill::NAME,
            InvocationEnvelope::new(json!({ "supplierId": supplier_id })),
            context,
        )
        .await?;

    let Some(supplier) = lookup.data.clone().filter(|_| lookup.is_success()) else {
        return Ok(lookup);
    };

    registry
        .invoke(
            NegotiationStrategySkill::NAME,
            InvocationEnvelope::new(json!({
                "supplierData": supplier,
                "marketData": { "trend": trend },
                "objectives": objectives,
            })),
            context,
        )
        .await
}
