use serde::{Deserialize, Serialize};

/// An issue as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
}

impl Issue {
    /// Build the payload for a full update of this issue
    pub fn to_update(&self) -> IssueUpdate {
        IssueUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
        }
    }
}

/// Payload for `PUT /issues/{id}`; the backend replaces all four fields
#[derive(Debug, Clone, Serialize)]
pub struct IssueUpdate {
    pub title: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
}

/// Workflow state of an issue. New issues start as `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    Done,
}

impl IssueStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Done => "Done",
        }
    }

    /// Next state in the workflow, wrapping from Done back to Open
    pub fn next(&self) -> Self {
        match self {
            IssueStatus::Open => IssueStatus::InProgress,
            IssueStatus::InProgress => IssueStatus::Done,
            IssueStatus::Done => IssueStatus::Open,
        }
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    pub fn label(&self) -> &'static str {
        match self {
            IssuePriority::Low => "Low",
            IssuePriority::Medium => "Medium",
            IssuePriority::High => "High",
            IssuePriority::Critical => "Critical",
        }
    }

    /// Next priority, wrapping from Critical back to Low.
    /// Used by the create form to cycle through choices.
    pub fn next(&self) -> Self {
        match self {
            IssuePriority::Low => IssuePriority::Medium,
            IssuePriority::Medium => IssuePriority::High,
            IssuePriority::High => IssuePriority::Critical,
            IssuePriority::Critical => IssuePriority::Low,
        }
    }

    /// Previous priority, wrapping from Low back to Critical
    pub fn prev(&self) -> Self {
        match self {
            IssuePriority::Low => IssuePriority::Critical,
            IssuePriority::Medium => IssuePriority::Low,
            IssuePriority::High => IssuePriority::Medium,
            IssuePriority::Critical => IssuePriority::High,
        }
    }
}

impl std::fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue() {
        let json = r#"{"id":12,"title":"Fix login","description":"form clears","status":"IN_PROGRESS","priority":"HIGH"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.status, IssueStatus::InProgress);
        assert_eq!(issue.priority, IssuePriority::High);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&IssueStatus::Open).unwrap(), "\"OPEN\"");
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(IssueStatus::Open.next(), IssueStatus::InProgress);
        assert_eq!(IssueStatus::Done.next(), IssueStatus::Open);
    }

    #[test]
    fn test_priority_cycle_wraps() {
        let mut priority = IssuePriority::Low;
        for _ in 0..4 {
            priority = priority.next();
        }
        assert_eq!(priority, IssuePriority::Low);
    }

    #[test]
    fn test_priority_prev_inverts_next() {
        for priority in [
            IssuePriority::Low,
            IssuePriority::Medium,
            IssuePriority::High,
            IssuePriority::Critical,
        ] {
            assert_eq!(priority.next().prev(), priority);
        }
    }
}
