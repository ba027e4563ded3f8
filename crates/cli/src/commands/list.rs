use crate::commands::{repository, runtime, CommandResult};
use samalook_core::config::{AppConfig, LoadOptions};
use samalook_store::CatalogRepository;

/// Prints the catalog exactly as `GET /api/products` would return it.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "list",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("list", "runtime_init", message, 3),
    };

    let repository = repository(&config);
    let catalog = match runtime.block_on(repository.list()) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("list", "catalog_read", error.to_string(), 4),
    };

    match serde_json::to_string_pretty(&catalog) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("list", "serialization", error.to_string(), 4),
    }
}
