mod prompt;
mod reply;
mod role;
mod runner;

pub use prompt::PromptBuilder;
pub use reply::{AgentReply, UNSTRUCTURED_THOUGHTS};
pub use role::AgentRole;
pub use runner::AgentRunner;
