pub mod agents;
pub mod cli;
pub mod config;
pub mod llm;
pub mod store;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::Config;
pub use workflow::launch;
