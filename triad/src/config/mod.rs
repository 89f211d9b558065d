mod project;

pub use project::{GLOBAL_CONFIG_DIR, PROJECT_CONFIG_FILE, ProjectConfig};
