use anyhow::Result;
use serde::Serialize;

/// Pretty-printed JSON for the `--output json` paths. Advise results, KPI
/// rollups and catalog stats all route through here so scripted consumers
/// see one consistent shape.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
