use crate::commands::{repository, runtime, CommandResult};
use samalook_core::config::{AppConfig, LoadOptions};
use samalook_store::{DemoCatalog, SeedResult, SeededProduct};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(message) => return CommandResult::failure("seed", "runtime_init", message, 3),
    };

    let repository = repository(&config);
    match runtime.block_on(DemoCatalog::load(&repository)) {
        Ok(result) => CommandResult::success("seed", seed_message(&result)),
        Err(error) => CommandResult::failure("seed", "seed_execution", error.to_string(), 5),
    }
}

fn seed_message(result: &SeedResult) -> String {
    match result {
        SeedResult::Seeded(products) => {
            let lines: Vec<String> = products.iter().map(describe).collect();
            format!("demo catalog loaded with {} products:\n{}", products.len(), lines.join("\n"))
        }
        SeedResult::Skipped { existing_products } => format!(
            "catalog already holds {existing_products} products; demo catalog not loaded"
        ),
    }
}

fn describe(product: &SeededProduct) -> String {
    format!("  - {}: #{} {}", product.category, product.id, product.name)
}
