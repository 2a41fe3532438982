use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;

pub struct CurrentTimeTool {
    offset: FixedOffset,
}

impl CurrentTimeTool {
    pub fn new(utc_offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Self { offset }
    }
}

fn format_time(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S (UTC%:z)")
        .to_string()
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time in the support desk's timezone"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        Ok(ToolResult::success(format_time(Utc::now(), self.offset)))
    }
}
