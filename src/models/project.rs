use serde::{Deserialize, Serialize};

/// A project as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Project {
    /// Description for table display, empty when unset
    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_null_description() {
        let json = r#"{"id":3,"name":"Apollo","description":null}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, 3);
        assert_eq!(project.description_display(), "");
    }

    #[test]
    fn test_parse_without_description_field() {
        let json = r#"{"id":3,"name":"Apollo"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.name, "Apollo");
        assert!(project.description.is_none());
    }
}
