//! Tool trait — the interface every agent tool implements.
//!
//! Tools have a text-in/text-out contract: one free-text (or JSON string)
//! payload in, one string out. A tool signals failure with an `Err`; the
//! registry converts it to an error description for the model, so a tool
//! fault can never escape into the loop as a crash.

use async_trait::async_trait;

use relaybot_core::types::ToolDescriptor;

/// Every agent tool implements this trait.
///
/// The loop discovers tools via `name()`, advertises them to the model via
/// `descriptor()`, and dispatches calls via `invoke()`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call this tool (e.g. `"calculator"`).
    /// Lookup is a case-sensitive exact match.
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// Execute the tool with the given text payload.
    ///
    /// On failure, return an `Err` — the registry catches it and turns it
    /// into an error string observation.
    async fn invoke(&self, input: &str) -> anyhow::Result<String>;

    /// The name/description pair included in the model's system prompt.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), self.description())
    }
}
