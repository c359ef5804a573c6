//! The rendered visual: a résumé laid out into a header block and ordered sections.
//!
//! # Presence rule
//! Every section is optional. A section appears if and only if its collection (or, for the
//! summary, its text) is non-empty, and sections always appear in `SectionKind::ORDER`.
//! Entries inside a section keep collection order and are never filtered.

use serde::Serialize;

use crate::models::resume::Resume;
use crate::templates::{self, TemplateStyle};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const PRESENT: &str = "Present";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    References,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 7] = [
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Achievements,
        SectionKind::References,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Achievements => "achievements",
            SectionKind::References => "references",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Achievements => "Achievements",
            SectionKind::References => "References",
        }
    }

    /// Whether the résumé has anything to show for this section.
    pub fn is_present(&self, resume: &Resume) -> bool {
        match self {
            SectionKind::Summary => !resume.personal_info.summary.is_empty(),
            SectionKind::Experience => !resume.experience.is_empty(),
            SectionKind::Education => !resume.education.is_empty(),
            SectionKind::Skills => !resume.skills.is_empty(),
            SectionKind::Projects => !resume.projects.is_empty(),
            SectionKind::Achievements => !resume.achievements.is_empty(),
            SectionKind::References => !resume.references.is_empty(),
        }
    }
}

/// Inline markup meant for direct display. Never escaped by the HTML writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichText(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    Location,
    Linkedin,
    Github,
    Website,
    Twitter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    pub contacts: Vec<Contact>,
    pub photo_url: Option<String>,
}

/// One item inside an entry-style section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,
    /// Right-aligned date text, e.g. "2021 - Present".
    pub dates: Option<String>,
    /// Secondary line parts, joined with " • " when displayed.
    pub subtitle: Vec<String>,
    pub body: Option<RichText>,
    /// Labelled detail lines such as ("Technologies", "Rust").
    pub details: Vec<(String, String)>,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Prose(RichText),
    Entries(Vec<Entry>),
    Chips(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub style: &'static TemplateStyle,
    pub header: HeaderBlock,
    pub sections: Vec<RenderedSection>,
}

impl RenderedDocument {
    #[cfg(test)]
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `resume` in the style of `template_id`. Unknown ids use the default style.
/// Pure: never fails, never touches the résumé.
pub fn render(resume: &Resume, template_id: &str) -> RenderedDocument {
    let style = templates::resolve(template_id);

    let sections = SectionKind::ORDER
        .iter()
        .filter(|kind| kind.is_present(resume))
        .map(|kind| RenderedSection {
            kind: *kind,
            heading: kind.heading(),
            body: section_body(*kind, resume),
        })
        .collect();

    RenderedDocument {
        style,
        header: header_block(resume),
        sections,
    }
}

fn header_block(resume: &Resume) -> HeaderBlock {
    let info = &resume.personal_info;
    let name = if info.full_name.is_empty() {
        NAME_PLACEHOLDER.to_string()
    } else {
        info.full_name.clone()
    };

    let contacts = [
        (ContactKind::Email, &info.email),
        (ContactKind::Phone, &info.phone),
        (ContactKind::Location, &info.location),
        (ContactKind::Linkedin, &info.linkedin),
        (ContactKind::Github, &info.github),
        (ContactKind::Website, &info.website),
        (ContactKind::Twitter, &info.twitter),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(kind, value)| Contact {
        kind,
        value: value.clone(),
    })
    .collect();

    HeaderBlock {
        name,
        contacts,
        photo_url: non_empty(&info.photo_url),
    }
}

fn section_body(kind: SectionKind, resume: &Resume) -> SectionBody {
    match kind {
        SectionKind::Summary => SectionBody::Prose(RichText(resume.personal_info.summary.clone())),
        SectionKind::Skills => SectionBody::Chips(resume.skills.clone()),
        SectionKind::Experience => SectionBody::Entries(
            resume
                .experience
                .iter()
                .map(|exp| Entry {
                    title: exp.title.clone(),
                    dates: Some(date_range(&exp.start_date, &exp.end_date, exp.current)),
                    subtitle: parts(&[&exp.company, &exp.location]),
                    body: rich(&exp.description),
                    details: Vec::new(),
                    featured: false,
                })
                .collect(),
        ),
        SectionKind::Education => SectionBody::Entries(
            resume
                .education
                .iter()
                .map(|edu| {
                    let mut subtitle = parts(&[&edu.institution, &edu.location]);
                    if !edu.gpa.is_empty() {
                        subtitle.push(format!("GPA: {}", edu.gpa));
                    }
                    Entry {
                        title: edu.degree.clone(),
                        dates: non_empty(&edu.graduation_date),
                        subtitle,
                        body: None,
                        details: Vec::new(),
                        featured: false,
                    }
                })
                .collect(),
        ),
        SectionKind::Projects => SectionBody::Entries(
            resume
                .projects
                .iter()
                .map(|project| Entry {
                    title: project.name.clone(),
                    dates: None,
                    subtitle: Vec::new(),
                    body: rich(&project.description),
                    details: details(&[
                        ("Technologies", &project.technologies),
                        ("Link", &project.link),
                    ]),
                    featured: project.featured,
                })
                .collect(),
        ),
        SectionKind::Achievements => SectionBody::Entries(
            resume
                .achievements
                .iter()
                .map(|a| Entry {
                    title: a.title.clone(),
                    dates: non_empty(&a.date),
                    subtitle: parts(&[&a.organization]),
                    body: rich(&a.description),
                    details: Vec::new(),
                    featured: false,
                })
                .collect(),
        ),
        SectionKind::References => SectionBody::Entries(
            resume
                .references
                .iter()
                .map(|r| Entry {
                    title: r.name.clone(),
                    dates: None,
                    subtitle: parts(&[&r.position, &r.company]),
                    body: None,
                    details: details(&[("Email", &r.email), ("Phone", &r.phone)]),
                    featured: false,
                })
                .collect(),
        ),
    }
}

/// `"{start} - {end}"`, with the end replaced by "Present" for a current position.
/// The stored end date is ignored, not cleared, when `current` is set.
pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let end = if current { PRESENT } else { end };
    format!("{start} - {end}")
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn rich(s: &str) -> Option<RichText> {
    non_empty(s).map(RichText)
}

fn parts(values: &[&String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect()
}

fn details(pairs: &[(&str, &String)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(label, v)| (label.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Achievement, Education, Experience, Project, Reference};
    use crate::templates::registry::known_ids;

    fn full_resume() -> Resume {
        let mut r = Resume::default();
        r.personal_info.full_name = "Ada Lovelace".into();
        r.personal_info.email = "ada@example.com".into();
        r.personal_info.github = "github.com/ada".into();
        r.personal_info.summary = "<p>Led <b>3</b> projects</p>".into();
        r.experience.push(Experience {
            title: "Analyst".into(),
            company: "Engine Co".into(),
            start_date: "1842".into(),
            end_date: "1843".into(),
            ..Default::default()
        });
        r.education.push(Education {
            degree: "Mathematics".into(),
            gpa: "4.0".into(),
            ..Default::default()
        });
        r.skills = vec!["Languages: Notation".into()];
        r.projects.push(Project {
            name: "Note G".into(),
            technologies: "Analytical Engine".into(),
            ..Default::default()
        });
        r.achievements.push(Achievement {
            title: "First program".into(),
            ..Default::default()
        });
        r.references.push(Reference {
            name: "Charles Babbage".into(),
            ..Default::default()
        });
        r
    }

    #[test]
    fn test_empty_resume_renders_header_only_with_placeholder() {
        let doc = render(&Resume::default(), "template1");
        assert_eq!(doc.header.name, NAME_PLACEHOLDER);
        assert!(doc.header.contacts.is_empty());
        assert!(doc.header.photo_url.is_none());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_full_resume_renders_all_sections_in_fixed_order() {
        let doc = render(&full_resume(), "template2");
        assert_eq!(doc.section_kinds(), SectionKind::ORDER.to_vec());
    }

    #[test]
    fn test_section_present_iff_non_empty_for_every_template() {
        let mut resume = full_resume();
        resume.education.clear();
        resume.achievements.clear();
        for id in known_ids().chain(["unknown-template"]) {
            let doc = render(&resume, id);
            let kinds = doc.section_kinds();
            for kind in SectionKind::ORDER {
                assert_eq!(kinds.contains(&kind), kind.is_present(&resume), "{id} {kind:?}");
            }
        }
    }

    #[test]
    fn test_current_position_shows_present_regardless_of_end_date() {
        let mut resume = Resume::default();
        resume.experience.push(Experience {
            start_date: "2020".into(),
            end_date: "2022".into(),
            current: true,
            ..Default::default()
        });
        let doc = render(&resume, "template3");
        let SectionBody::Entries(entries) = &doc.sections[0].body else {
            panic!("experience should render as entries");
        };
        assert_eq!(entries[0].dates.as_deref(), Some("2020 - Present"));
        // The stored value is untouched.
        assert_eq!(resume.experience[0].end_date, "2022");
    }

    #[test]
    fn test_contacts_only_non_empty_in_fixed_order() {
        let doc = render(&full_resume(), "template1");
        let kinds: Vec<_> = doc.header.contacts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ContactKind::Email, ContactKind::Github]);
    }

    #[test]
    fn test_items_render_in_collection_order_including_empty_entries() {
        let mut resume = Resume::default();
        resume.skills = vec!["b".into(), String::new(), "a".into()];
        let doc = render(&resume, "template1");
        assert_eq!(
            doc.sections[0].body,
            SectionBody::Chips(vec!["b".into(), String::new(), "a".into()])
        );
    }

    #[test]
    fn test_unknown_template_uses_default_style() {
        let doc = render(&full_resume(), "nope");
        assert_eq!(doc.style.id, "default");
    }

    #[test]
    fn test_education_gpa_and_project_details() {
        let doc = render(&full_resume(), "template1");
        let education = doc.sections.iter().find(|s| s.kind == SectionKind::Education).unwrap();
        let SectionBody::Entries(entries) = &education.body else {
            panic!("education should render as entries");
        };
        assert_eq!(entries[0].subtitle, vec!["GPA: 4.0".to_string()]);

        let projects = doc.sections.iter().find(|s| s.kind == SectionKind::Projects).unwrap();
        let SectionBody::Entries(entries) = &projects.body else {
            panic!("projects should render as entries");
        };
        assert_eq!(
            entries[0].details,
            vec![("Technologies".to_string(), "Analytical Engine".to_string())]
        );
    }
}
