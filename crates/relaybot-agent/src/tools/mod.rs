//! Agent tools — trait, registry, and built-in implementations.

pub mod base;
pub mod calculator;
pub mod clock;
pub mod http;
pub mod knowledge;
pub mod registry;
pub mod weather;

pub use base::Tool;
pub use calculator::CalculatorTool;
pub use clock::ClockTool;
pub use http::HttpRequestTool;
pub use knowledge::KnowledgeSearchTool;
pub use registry::{invoke_tool, ToolRegistry, ToolRegistryError};
pub use weather::WeatherTool;
