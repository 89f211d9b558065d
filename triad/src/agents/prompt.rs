use super::AgentRole;

/// Instruction appended to every user prompt so replies can be split into
/// thoughts and response.
const REPLY_FORMAT: &str = "Provide your response as a single JSON object with 'thoughts' and 'response' fields only. No other text or formatting.";

/// Builds the exact prompts sent to the model for each role.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the user prompt for `role` with `input_text` interpolated verbatim.
    pub fn build(role: AgentRole, input_text: &str) -> String {
        let instruction = match role {
            AgentRole::Researcher => researcher_template(input_text),
            AgentRole::Writer => writer_template(input_text),
            AgentRole::Critic => critic_template(input_text),
        };
        format!("Task input: {}\n\n{}", instruction, REPLY_FORMAT)
    }

    /// Build the system prompt that sets up the agent persona for `role`.
    pub fn system_prompt(role: AgentRole) -> String {
        format!(
            r#"You are {}, a {}.
Work collaboratively with other agents to solve tasks.
Your response must be only a valid JSON string in this exact format, with no additional text or formatting:
{{"thoughts": "your analytical process", "response": "your actual response"}}
Keep all newlines and special characters properly escaped in your JSON."#,
            role.title(),
            role.expertise()
        )
    }
}

fn researcher_template(task: &str) -> String {
    format!(
        "Analyze this topic and provide key points: {}\n\n\
        Extract the key factual points, the constraints, and the open sub-questions \
        that someone completing this task would need to address.",
        task
    )
}

fn writer_template(research: &str) -> String {
    format!(
        "Using these research points:\n{}\n\n\
        Create a coherent, well-structured explanation of the topic they cover. \
        Use the research points as your source material.",
        research
    )
}

fn critic_template(draft: &str) -> String {
    format!(
        "Review this explanation:\n{}\n\n\
        Provide specific, actionable feedback and suggestions. \
        If it helps, include a refined version of the text.",
        draft
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_contain_input_verbatim() {
        let input = "Explain quantum entanglement for a general audience.";
        for role in AgentRole::PIPELINE {
            let prompt = PromptBuilder::build(role, input);
            assert!(prompt.contains(input), "{} prompt lost the input", role);
        }
    }

    #[test]
    fn test_multiline_input_is_not_altered() {
        let input = "line one\n  \"quoted\" {braces}\n\tline three";
        let prompt = PromptBuilder::build(AgentRole::Writer, input);
        assert!(prompt.contains(input));
    }

    #[test]
    fn test_each_role_has_distinct_instructions() {
        let researcher = PromptBuilder::build(AgentRole::Researcher, "x");
        let writer = PromptBuilder::build(AgentRole::Writer, "x");
        let critic = PromptBuilder::build(AgentRole::Critic, "x");

        assert!(researcher.contains("key points"));
        assert!(writer.contains("well-structured"));
        assert!(critic.contains("feedback"));
        assert_ne!(researcher, writer);
        assert_ne!(writer, critic);
    }

    #[test]
    fn test_prompts_request_json_reply() {
        for role in AgentRole::PIPELINE {
            assert!(PromptBuilder::build(role, "x").ends_with(REPLY_FORMAT));
        }
    }

    #[test]
    fn test_system_prompt_names_role_and_expertise() {
        let system = PromptBuilder::system_prompt(AgentRole::Critic);
        assert!(system.starts_with("You are Critic, a quality control expert."));
        assert!(system.contains(r#"{"thoughts": "#));
    }
}
