//! Page content tools: screenshot capture and script evaluation.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::args::{parse_args, EvaluateArgs, ScreenshotArgs};
use crate::response::{success_response, ToolResponse};
use crate::tool::{safe_execute, Tool, ToolContext};

/// Captures a screenshot into the process-wide store under a caller-supplied
/// name, announcing it on the notifier side channel.
pub struct ScreenshotTool {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl ScreenshotTool {
    pub fn new(store: Arc<DashMap<String, Vec<u8>>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ScreenshotTool {
    fn name(&self) -> &'static str {
        "playwright_screenshot"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: ScreenshotArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        let store = self.store.clone();
        let notifier = ctx.notifier.clone();

        safe_execute(ctx, |page| async move {
            let data = page.screenshot(args.full_page).await?;
            store.insert(args.name.clone(), data);
            notifier
                .notify(&format!("Screenshot '{}' captured", args.name))
                .await;
            Ok(success_response(format!("Screenshot saved: {}", args.name)))
        })
        .await
    }
}

pub struct EvaluateTool;

#[async_trait]
impl Tool for EvaluateTool {
    fn name(&self) -> &'static str {
        "playwright_evaluate"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: EvaluateArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        safe_execute(ctx, |page| async move {
            let value = page.evaluate(&args.script).await?;
            let rendered = match &value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Ok(success_response(format!("Execution result: {rendered}")))
        })
        .await
    }
}
