//! Element interaction tools: thin calls into the page handle.

use async_trait::async_trait;

use crate::args::{parse_args, ClickArgs, FillArgs, HoverArgs, SelectArgs};
use crate::response::{success_response, ToolResponse};
use crate::tool::{safe_execute, Tool, ToolContext};

pub struct ClickTool;

#[async_trait]
impl Tool for ClickTool {
    fn name(&self) -> &'static str {
        "playwright_click"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: ClickArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        safe_execute(ctx, |page| async move {
            page.click(&args.selector).await?;
            Ok(success_response(format!("Clicked element: {}", args.selector)))
        })
        .await
    }
}

pub struct FillTool;

#[async_trait]
impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "playwright_fill"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: FillArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        safe_execute(ctx, |page| async move {
            page.fill(&args.selector, &args.value).await?;
            Ok(success_response(format!(
                "Filled {} with: {}",
                args.selector, args.value
            )))
        })
        .await
    }
}

pub struct SelectTool;

#[async_trait]
impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "playwright_select"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: SelectArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        safe_execute(ctx, |page| async move {
            page.select_option(&args.selector, &args.value).await?;
            Ok(success_response(format!(
                "Selected {} in {}",
                args.value, args.selector
            )))
        })
        .await
    }
}

pub struct HoverTool;

#[async_trait]
impl Tool for HoverTool {
    fn name(&self) -> &'static str {
        "playwright_hover"
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResponse {
        let args: HoverArgs = match parse_args(args) {
            Ok(args) => args,
            Err(envelope) => return envelope,
        };

        safe_execute(ctx, |page| async move {
            page.hover(&args.selector).await?;
            Ok(success_response(format!("Hovered {}", args.selector)))
        })
        .await
    }
}
