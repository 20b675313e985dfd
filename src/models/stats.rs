use serde::Deserialize;

/// Counts shown on the dashboard screen
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalProjects")]
    pub total_projects: i64,
    #[serde(rename = "totalIssues")]
    pub total_issues: i64,
    #[serde(rename = "myIssues")]
    pub my_issues: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_fields() {
        let json = r#"{"totalProjects":4,"totalIssues":17,"myIssues":3}"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_projects, 4);
        assert_eq!(stats.total_issues, 17);
        assert_eq!(stats.my_issues, 3);
    }
}
