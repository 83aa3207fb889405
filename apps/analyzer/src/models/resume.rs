use serde::{Deserialize, Serialize};

/// Column order shared by the HTML table and the CSV export.
pub const COLUMNS: [&str; 8] = [
    "name",
    "email",
    "phone",
    "skills",
    "experience_summary",
    "education",
    "linkedin",
    "github",
];

/// Structured fields extracted from a single resume.
/// Every field is optional; a missing value is `None`, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_summary: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl ResumeRecord {
    /// Flattens the record into display cells, in `COLUMNS` order.
    ///
    /// `None` becomes an empty cell. `skills` is rendered as a JSON array
    /// string so a list survives as a single cell.
    pub fn to_row(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let skills = self
            .skills
            .as_ref()
            .map(|s| serde_json::to_string(s).unwrap_or_default())
            .unwrap_or_default();

        vec![
            text(&self.name),
            text(&self.email),
            text(&self.phone),
            skills,
            text(&self.experience_summary),
            text(&self.education),
            text(&self.linkedin),
            text(&self.github),
        ]
    }
}
