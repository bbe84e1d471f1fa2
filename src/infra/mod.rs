pub mod gemini;
pub mod jira;
