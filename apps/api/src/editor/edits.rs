use serde::{Deserialize, Serialize};

use crate::editor::sections::{
    insert_item, remove_item, reorder_item, update_item, FieldValue, Section,
};
use crate::editor::EditError;
use crate::models::resume::{PersonalInfo, Resume};

/// One mutation of the current résumé, as sent by the editing surface.
///
/// ```json
/// {"op": "update", "section": "experience", "index": 0, "field": "current", "value": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ResumeEdit {
    SetTitle {
        value: String,
    },
    SetTemplate {
        template_id: String,
    },
    SetPersonal {
        field: String,
        value: String,
    },
    /// Appends a default-valued entry to the section.
    Insert {
        section: Section,
    },
    /// Appends a skill, prefixed with "Category: " when a category is given.
    InsertSkill {
        #[serde(default)]
        category: String,
        name: String,
    },
    Update {
        section: Section,
        index: usize,
        field: String,
        value: FieldValue,
    },
    Remove {
        section: Section,
        index: usize,
    },
    Reorder {
        section: Section,
        from: usize,
        to: usize,
    },
}

/// Expands to `$body` with `$items` bound to the collection named by `$section`.
macro_rules! with_section {
    ($resume:expr, $section:expr, $items:ident => $body:expr) => {
        match $section {
            Section::Experience => {
                let $items = &mut $resume.experience;
                $body
            }
            Section::Education => {
                let $items = &mut $resume.education;
                $body
            }
            Section::Skills => {
                let $items = &mut $resume.skills;
                $body
            }
            Section::Projects => {
                let $items = &mut $resume.projects;
                $body
            }
            Section::Achievements => {
                let $items = &mut $resume.achievements;
                $body
            }
            Section::References => {
                let $items = &mut $resume.references;
                $body
            }
        }
    };
}

impl Resume {
    /// Applies one edit in place. On error the résumé is unchanged.
    pub fn apply(&mut self, edit: ResumeEdit) -> Result<(), EditError> {
        match edit {
            ResumeEdit::SetTitle { value } => self.title = value,
            ResumeEdit::SetTemplate { template_id } => self.template_id = template_id,
            ResumeEdit::SetPersonal { field, value } => {
                set_personal(&mut self.personal_info, &field, value)?
            }
            ResumeEdit::Insert { section } => {
                with_section!(self, section, items => {
                    insert_item(items);
                })
            }
            ResumeEdit::InsertSkill { category, name } => {
                if let Some(label) = skill_label(&category, &name) {
                    self.skills.push(label);
                }
            }
            ResumeEdit::Update {
                section,
                index,
                field,
                value,
            } => with_section!(self, section, items => update_item(items, index, &field, value)?),
            ResumeEdit::Remove { section, index } => {
                with_section!(self, section, items => {
                    remove_item(items, index)?;
                })
            }
            ResumeEdit::Reorder { section, from, to } => {
                with_section!(self, section, items => reorder_item(items, from, to)?)
            }
        }
        Ok(())
    }

    /// Applies a batch in order, stopping at the first failure. Edits before the failing
    /// one stay applied.
    pub fn apply_all(&mut self, edits: Vec<ResumeEdit>) -> Result<usize, EditError> {
        let mut applied = 0;
        for edit in edits {
            self.apply(edit)?;
            applied += 1;
        }
        Ok(applied)
    }
}

/// Builds the stored skill text. Blank names are dropped; the category is baked into the
/// string rather than kept as a separate field.
pub fn skill_label(category: &str, name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let category = category.trim();
    if category.is_empty() {
        Some(name.to_string())
    } else {
        Some(format!("{category}: {name}"))
    }
}

fn set_personal(info: &mut PersonalInfo, field: &str, value: String) -> Result<(), EditError> {
    let slot = match field {
        "full_name" => &mut info.full_name,
        "email" => &mut info.email,
        "phone" => &mut info.phone,
        "location" => &mut info.location,
        "linkedin" => &mut info.linkedin,
        "github" => &mut info.github,
        "website" => &mut info.website,
        "twitter" => &mut info.twitter,
        "summary" => &mut info.summary,
        "photo_url" => &mut info.photo_url,
        _ => {
            return Err(EditError::UnknownField {
                scope: "personal_info",
                field: field.to_string(),
            })
        }
    };
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_deserializes_from_tagged_json() {
        let edit: ResumeEdit = serde_json::from_str(
            r#"{"op": "update", "section": "experience", "index": 0, "field": "current", "value": true}"#,
        )
        .unwrap();
        assert_eq!(
            edit,
            ResumeEdit::Update {
                section: Section::Experience,
                index: 0,
                field: "current".into(),
                value: FieldValue::Flag(true),
            }
        );

        let edit: ResumeEdit =
            serde_json::from_str(r#"{"op": "insert_skill", "name": "Rust"}"#).unwrap();
        assert_eq!(
            edit,
            ResumeEdit::InsertSkill {
                category: String::new(),
                name: "Rust".into()
            }
        );
    }

    #[test]
    fn test_apply_insert_update_every_section() {
        let mut resume = Resume::default();
        for section in [
            Section::Experience,
            Section::Education,
            Section::Skills,
            Section::Projects,
            Section::Achievements,
            Section::References,
        ] {
            resume.apply(ResumeEdit::Insert { section }).unwrap();
        }
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.skills, vec![String::new()]);
        assert_eq!(resume.projects.len(), 1);
        assert_eq!(resume.achievements.len(), 1);
        assert_eq!(resume.references.len(), 1);

        resume
            .apply(ResumeEdit::Update {
                section: Section::References,
                index: 0,
                field: "name".into(),
                value: FieldValue::Text("Grace Hopper".into()),
            })
            .unwrap();
        assert_eq!(resume.references[0].name, "Grace Hopper");
    }

    #[test]
    fn test_apply_set_personal() {
        let mut resume = Resume::default();
        resume
            .apply(ResumeEdit::SetPersonal {
                field: "full_name".into(),
                value: "Ada Lovelace".into(),
            })
            .unwrap();
        assert_eq!(resume.personal_info.full_name, "Ada Lovelace");

        let err = resume
            .apply(ResumeEdit::SetPersonal {
                field: "age".into(),
                value: "36".into(),
            })
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownField { scope: "personal_info", .. }));
    }

    #[test]
    fn test_insert_skill_with_category_prefix() {
        let mut resume = Resume::default();
        resume
            .apply(ResumeEdit::InsertSkill {
                category: "Languages".into(),
                name: " Rust ".into(),
            })
            .unwrap();
        resume
            .apply(ResumeEdit::InsertSkill {
                category: String::new(),
                name: "Docker".into(),
            })
            .unwrap();
        resume
            .apply(ResumeEdit::InsertSkill {
                category: "Tools".into(),
                name: "   ".into(),
            })
            .unwrap();
        assert_eq!(resume.skills, vec!["Languages: Rust", "Docker"]);
    }

    #[test]
    fn test_failed_edit_leaves_resume_unchanged() {
        let mut resume = Resume::default();
        resume.skills = vec!["a".into(), "b".into()];
        let before = resume.clone();
        assert!(resume
            .apply(ResumeEdit::Reorder {
                section: Section::Skills,
                from: 0,
                to: 5
            })
            .is_err());
        assert_eq!(resume, before);
    }

    #[test]
    fn test_apply_all_stops_at_first_failure() {
        let mut resume = Resume::default();
        let err = resume.apply_all(vec![
            ResumeEdit::SetTitle {
                value: "CV 2026".into(),
            },
            ResumeEdit::Remove {
                section: Section::Projects,
                index: 0,
            },
            ResumeEdit::SetTitle {
                value: "never".into(),
            },
        ]);
        assert!(err.is_err());
        assert_eq!(resume.title, "CV 2026");
    }
}
