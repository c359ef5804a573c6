use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "My Resume";
pub const DEFAULT_TEMPLATE_ID: &str = "template1";

/// One résumé as stored by the remote API and edited in the studio.
///
/// `id` stays `None` until the store assigns one on first create. Every field defaults so
/// records written before a field existed still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub template_id: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub achievements: Vec<Achievement>,
    pub references: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Default for Resume {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_TITLE.to_string(),
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            personal_info: PersonalInfo::default(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            achievements: Vec::new(),
            references: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Resume {
    /// The request body for create/update: everything except id and timestamps.
    pub fn payload(&self) -> ResumePayload<'_> {
        ResumePayload {
            title: &self.title,
            template_id: &self.template_id,
            personal_info: &self.personal_info,
            experience: &self.experience,
            education: &self.education,
            skills: &self.skills,
            projects: &self.projects,
            achievements: &self.achievements,
            references: &self.references,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResumePayload<'a> {
    pub title: &'a str,
    pub template_id: &'a str,
    pub personal_info: &'a PersonalInfo,
    pub experience: &'a [Experience],
    pub education: &'a [Education],
    pub skills: &'a [String],
    pub projects: &'a [Project],
    pub achievements: &'a [Achievement],
    pub references: &'a [Reference],
}

/// List-view shape returned by `GET /resumes`. Extra fields in the response are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Contact block. `summary` holds rich text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
    pub twitter: String,
    pub summary: String,
    pub photo_url: String,
}

/// `end_date` is kept as entered even while `current` is set; renderers show "Present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    /// Comma-separated free text, e.g. "Rust, Postgres".
    pub technologies: String,
    pub link: String,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub date: String,
    pub organization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub name: String,
    pub position: String,
    pub company: String,
    pub email: String,
    pub phone: String,
}
