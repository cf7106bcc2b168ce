use procura_agent::SupplierLookupSkill;
use procura_core::{InvocationContext, InvocationEnvelope};
use serde_json::json;

use crate::commands::{current_thread_runtime, prepare, CommandResult, EXIT_SETUP};

pub fn run(supplier_id: &str) -> CommandResult {
    let registry = match prepare("lookup") {
        Ok(registry) => registry,
        Err(result) => return result,
    };

    let runtime = match current_thread_runtime() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "lookup",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_SETUP,
            )
        }
    };

    let context = InvocationContext::default();
    let envelope = InvocationEnvelope::new(json!({ "supplierId": supplier_id }));
    match runtime.block_on(registry.invoke(SupplierLookupSkill::NAME, envelope, &context)) {
        Ok(response) => CommandResult::envelope(&response),
        Err(error) => CommandResult::failure("lookup", "registry", error.to_string(), EXIT_SETUP),
    }
}
