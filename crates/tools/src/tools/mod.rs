//! Tool implementations, grouped by category.

pub mod api;
pub mod interaction;
pub mod navigation;
pub mod page;

pub use api::HttpRequestTool;
pub use interaction::{ClickTool, FillTool, HoverTool, SelectTool};
pub use navigation::{CloseTool, NavigateTool};
pub use page::{EvaluateTool, ScreenshotTool};
