//! The field-extraction contract handed to the language model: an immutable
//! system instruction plus the typed declaration of the one tool the model is
//! allowed to call. The model is asked to normalize fields, but every value it
//! submits is re-validated authoritatively in `domain::ticket`.

use serde::Serialize;
use serde_json::json;

pub const SUBMIT_TICKET_TOOL: &str = "submit_ticket";

pub const INTAKE_INSTRUCTION: &str = "\
You are the ticket master for a datacenter maintenance tracker. Engineers come \
to you to report failures happening within the datacenter. You are collecting \
the following fields:

LOCATION (must include a floor, hall, pod, aisle, and rack)
SUMMARY (short statement of the issue)
DESCRIPTION (long form of the issue)
PRIORITY (must be exactly one of these 5 values: Lowest, Low, Medium, High, Highest)
LABELS

DESCRIPTION and LABELS may be left blank, but LOCATION, SUMMARY, and PRIORITY \
must be filled.

Keep asking the engineer clarifying questions, one turn at a time, until every \
required field is filled. Once they are filled, do not ask anything further.

Before submitting, normalize LOCATION into the exact format \
FLOOR:HALL:POD:AISLE:RACK (five values separated by colons, no blanks). Using \
the LOCATION, SUMMARY, and DESCRIPTION, generate one-or-two-word tags for this \
task and pass them as LABELS, always as a list of strings and never as a \
single string.

When all required fields are filled, call the submit_ticket tool exactly once \
with the collected fields, and afterwards reply with a short thank-you \
acknowledgement rather than another question.";

/// A function declaration in the shape the model provider expects.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDeclaration {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

pub fn submission_tool() -> ToolDeclaration {
    ToolDeclaration {
        name: SUBMIT_TICKET_TOOL,
        description: "Files the completed failure ticket in the issue tracker. \
            Call exactly once, only after location, summary, and priority are \
            all known.",
        parameters: json!({
            "type": "OBJECT",
            "properties": {
                "summary": {
                    "type": "STRING",
                    "description": "Concise title of the ticket."
                },
                "description": {
                    "type": "STRING",
                    "description": "Detailed body of the ticket."
                },
                "priority": {
                    "type": "STRING",
                    "enum": ["Lowest", "Low", "Medium", "High", "Highest"],
                    "description": "Urgency level."
                },
                "labels": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "One-or-two-word tags categorizing the ticket."
                },
                "location": {
                    "type": "STRING",
                    "description": "Normalized FLOOR:HALL:POD:AISLE:RACK location."
                }
            },
            "required": ["summary", "priority", "location"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_requires_the_mandatory_fields() {
        let tool = submission_tool();
        assert_eq!(tool.name, SUBMIT_TICKET_TOOL);
        let required = tool.parameters["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(required, vec!["summary", "priority", "location"]);
    }

    #[test]
    fn instruction_names_the_allowed_priorities() {
        for priority in ["Lowest", "Low", "Medium", "High", "Highest"] {
            assert!(INTAKE_INSTRUCTION.contains(priority));
        }
        assert!(INTAKE_INSTRUCTION.contains("FLOOR:HALL:POD:AISLE:RACK"));
        assert!(INTAKE_INSTRUCTION.contains(SUBMIT_TICKET_TOOL));
    }
}
