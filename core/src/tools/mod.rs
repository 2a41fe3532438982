use serde_json::Value;

pub mod current_time;
pub mod web_scrape;

pub use current_time::CurrentTimeTool;
pub use web_scrape::WebScrapeTool;

pub fn extract_string_arg(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}
