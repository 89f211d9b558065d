use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three agents in the pipeline.
///
/// The variant order is the pipeline order; [`AgentRole::PIPELINE`] spells it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Analyzes the task and extracts key points
    Researcher,
    /// Turns the research into structured content
    Writer,
    /// Reviews the written content
    Critic,
}

impl AgentRole {
    /// All roles in the order they run.
    pub const PIPELINE: [AgentRole; 3] = [Self::Researcher, Self::Writer, Self::Critic];

    /// Zero-based position in the pipeline.
    pub fn index(self) -> usize {
        match self {
            Self::Researcher => 0,
            Self::Writer => 1,
            Self::Critic => 2,
        }
    }

    /// Capitalized name used when addressing the agent.
    pub fn title(self) -> &'static str {
        match self {
            Self::Researcher => "Researcher",
            Self::Writer => "Writer",
            Self::Critic => "Critic",
        }
    }

    pub fn expertise(self) -> &'static str {
        match self {
            Self::Researcher => "research and data analysis expert",
            Self::Writer => "content creation expert",
            Self::Critic => "quality control expert",
        }
    }

    /// Progress line shown while the role is working.
    pub fn activity(self) -> &'static str {
        match self {
            Self::Researcher => "Researcher agent is analyzing the task...",
            Self::Writer => "Writer agent is creating content...",
            Self::Critic => "Critic agent is reviewing the content...",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Researcher => write!(f, "researcher"),
            Self::Writer => write!(f, "writer"),
            Self::Critic => write!(f, "critic"),
        }
    }
}

impl FromStr for AgentRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "researcher" => Ok(Self::Researcher),
            "writer" => Ok(Self::Writer),
            "critic" => Ok(Self::Critic),
            _ => anyhow::bail!(
                "invalid agent role '{}' (expected: researcher, writer, critic)",
                s
            ),
        }
    }
}
