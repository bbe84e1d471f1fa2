use serde::Serialize;
use thiserror::Error;

/// Canonical location shape: `FLOOR:HALL:POD:AISLE:RACK`, five colon-separated
/// non-empty segments.
const LOCATION_SEGMENTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Lowest => "Lowest",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Highest => "Highest",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lowest" => Some(Priority::Lowest),
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "highest" => Some(Priority::Highest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("priority must be one of Lowest, Low, Medium, High, Highest (got '{0}')")]
    InvalidPriority(String),
    #[error("location must be FLOOR:HALL:POD:AISLE:RACK with no empty segments (got '{0}')")]
    InvalidLocationFormat(String),
}

/// Raw field values as extracted by the model, before validation.
#[derive(Debug, Clone, Default)]
pub struct TicketFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub labels: Vec<String>,
    pub location: Option<String>,
}

/// A fully validated ticket, ready to be serialized for the tracker.
///
/// Only constructible through [`Ticket::validate`]; built at most once per
/// completed intake session.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub summary: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub location: String,
    pub project_key: String,
    pub issue_type: String,
}

impl Ticket {
    pub fn validate(
        fields: TicketFields,
        project_key: &str,
        issue_type: &str,
    ) -> Result<Ticket, ValidationError> {
        let summary = required(fields.summary, "summary")?;
        let priority_raw = required(fields.priority, "priority")?;
        let location_raw = required(fields.location, "location")?;

        let priority = Priority::parse(&priority_raw)
            .ok_or_else(|| ValidationError::InvalidPriority(priority_raw.clone()))?;
        let location = normalize_location(&location_raw)?;

        let description = fields
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let labels = fields
            .labels
            .into_iter()
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();

        Ok(Ticket {
            summary,
            description,
            priority,
            labels,
            location,
            project_key: project_key.to_string(),
            issue_type: issue_type.to_string(),
        })
    }

    /// Pure mapping to the tracker's issue-creation payload. The custom field
    /// carrying the location is tracker configuration, so its id is passed in.
    pub fn to_wire(&self, location_field_id: &str) -> CreateIssueBody {
        let mut custom = serde_json::Map::new();
        custom.insert(
            location_field_id.to_string(),
            serde_json::Value::String(self.location.clone()),
        );

        CreateIssueBody {
            fields: IssueFields {
                project: ProjectRef {
                    key: self.project_key.clone(),
                },
                summary: self.summary.clone(),
                description: self.description.clone(),
                priority: NamedRef {
                    name: self.priority.as_str().to_string(),
                },
                labels: self.labels.clone(),
                issuetype: NamedRef {
                    name: self.issue_type.clone(),
                },
                custom,
            },
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn normalize_location(raw: &str) -> Result<String, ValidationError> {
    let segments = raw.trim().split(':').map(str::trim).collect::<Vec<_>>();
    if segments.len() != LOCATION_SEGMENTS || segments.iter().any(|s| s.is_empty()) {
        return Err(ValidationError::InvalidLocationFormat(raw.to_string()));
    }
    Ok(segments.join(":"))
}

/// The issue created by the tracker.
#[derive(Debug, Clone)]
pub struct CreatedIssue {
    pub key: String,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateIssueBody {
    fields: IssueFields,
}

#[derive(Debug, Serialize)]
struct IssueFields {
    project: ProjectRef,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    priority: NamedRef,
    labels: Vec<String>,
    issuetype: NamedRef,
    #[serde(flatten)]
    custom: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct NamedRef {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> TicketFields {
        TicketFields {
            summary: Some("Disk failure".to_string()),
            description: Some("Drive 3 reports SMART errors.".to_string()),
            priority: Some("High".to_string()),
            labels: vec!["disk".to_string(), "hardware".to_string()],
            location: Some("1:2:3:4:5".to_string()),
        }
    }

    #[test]
    fn rejects_missing_required_fields() {
        for field in ["summary", "priority", "location"] {
            let mut fields = complete_fields();
            match field {
                "summary" => fields.summary = None,
                "priority" => fields.priority = Some("   ".to_string()),
                _ => fields.location = None,
            }
            assert_eq!(
                Ticket::validate(fields, "DCM", "Task"),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn rejects_unknown_priority() {
        let mut fields = complete_fields();
        fields.priority = Some("Urgent".to_string());
        assert_eq!(
            Ticket::validate(fields, "DCM", "Task"),
            Err(ValidationError::InvalidPriority("Urgent".to_string()))
        );
    }

    #[test]
    fn parses_priority_case_insensitively() {
        assert_eq!(Priority::parse(" highest "), Some(Priority::Highest));
        assert_eq!(Priority::parse("MEDIUM"), Some(Priority::Medium));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn rejects_malformed_locations() {
        for bad in ["A:B:C", "A:B:C:D:E:F", "A::C:D:E", ":B:C:D:E", "A:B:C:D:"] {
            let mut fields = complete_fields();
            fields.location = Some(bad.to_string());
            assert_eq!(
                Ticket::validate(fields, "DCM", "Task"),
                Err(ValidationError::InvalidLocationFormat(bad.to_string()))
            );
        }
    }

    #[test]
    fn canonicalizes_location_whitespace() {
        let mut fields = complete_fields();
        fields.location = Some(" 1 : 2 :3:4: 5 ".to_string());
        let ticket = Ticket::validate(fields, "DCM", "Task").unwrap();
        assert_eq!(ticket.location, "1:2:3:4:5");
    }

    #[test]
    fn wire_representation_carries_documented_keys() {
        let ticket = Ticket::validate(complete_fields(), "DCM", "Task").unwrap();
        let body = serde_json::to_value(ticket.to_wire("customfield_10001")).unwrap();

        let fields = &body["fields"];
        assert_eq!(fields["project"]["key"], "DCM");
        assert_eq!(fields["summary"], "Disk failure");
        assert_eq!(fields["description"], "Drive 3 reports SMART errors.");
        assert_eq!(fields["priority"]["name"], "High");
        assert_eq!(fields["customfield_10001"], "1:2:3:4:5");
        assert_eq!(
            fields["labels"],
            serde_json::json!(["disk", "hardware"])
        );
        assert_eq!(fields["issuetype"]["name"], "Task");
    }

    #[test]
    fn empty_description_is_omitted_from_wire() {
        let mut fields = complete_fields();
        fields.description = Some("  ".to_string());
        let ticket = Ticket::validate(fields, "DCM", "Task").unwrap();
        let body = serde_json::to_value(ticket.to_wire("customfield_10001")).unwrap();
        assert!(body["fields"].get("description").is_none());
    }
}
