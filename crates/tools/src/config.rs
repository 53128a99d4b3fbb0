//! Documented defaults for tool behavior.
//!
//! Centralized so the values live in exactly one place instead of being
//! scattered through tool bodies.

use driver::WaitUntil;

#[derive(Debug, Clone)]
pub struct ToolDefaults {
    /// Navigation timeout handed to the engine when the caller omits one.
    pub navigation_timeout_ms: u64,

    /// Lifecycle point navigation waits for when the caller omits one.
    pub wait_until: WaitUntil,

    /// Cookie path applied when a descriptor omits one.
    pub cookie_path: &'static str,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 30_000,
            wait_until: WaitUntil::Load,
            cookie_path: "/",
        }
    }
}
