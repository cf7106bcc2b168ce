use crate::commands::{prepare, CommandResult};

pub fn run() -> CommandResult {
    let registry = match prepare("skills") {
        Ok(registry) => registry,
        Err(result) => return result,
    };

    let mut lines = vec![format!("registered skills ({}):", registry.len())];
    for name in registry.names() {
        let description = registry.get(name).map(|skill| skill.description()).unwrap_or_default();
        lines.push(format!("- {name}: {description}"));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}
