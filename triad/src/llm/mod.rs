mod client;
mod hosted;
mod key;

pub use client::{ModelClient, ModelRequest};
pub use hosted::{Backend, HostedModelClient, ModelSettings};
pub use key::ApiKey;
