use serde_json::Value;

use rentflow_core::scenario;

pub fn run_templates() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(scenario::builtin_templates())?)
}
