//! Ordered-collection operations shared by every résumé section.
//!
//! Each collection is a plain `Vec`; the four operations below are generic over the entry
//! type and only differ in how a single field is assigned (`SectionEntry::set_field`).
//! No operation validates field contents: any string is accepted as-is.

use serde::{Deserialize, Serialize};

use crate::editor::EditError;
use crate::models::resume::{Achievement, Education, Experience, Project, Reference};

/// The six ordered collections of a résumé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    References,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Achievements => "achievements",
            Section::References => "references",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value written into a single field. Booleans only apply to flag fields
/// (`experience.current`, `projects.featured`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    fn into_text(self, field: &str) -> Result<String, EditError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Flag(_) => Err(EditError::WrongValueKind {
                field: field.to_string(),
                expected: "text",
            }),
        }
    }

    fn into_flag(self, field: &str) -> Result<bool, EditError> {
        match self {
            FieldValue::Flag(b) => Ok(b),
            FieldValue::Text(_) => Err(EditError::WrongValueKind {
                field: field.to_string(),
                expected: "boolean",
            }),
        }
    }
}

/// An entry in one of the ordered collections.
pub trait SectionEntry: Default {
    const SECTION: Section;

    /// Assigns one named field. Leaves the entry untouched on error.
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError>;
}

fn unknown<T: SectionEntry>(field: &str) -> EditError {
    EditError::UnknownField {
        scope: T::SECTION.as_str(),
        field: field.to_string(),
    }
}

impl SectionEntry for Experience {
    const SECTION: Section = Section::Experience;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        let slot = match field {
            "title" => &mut self.title,
            "company" => &mut self.company,
            "location" => &mut self.location,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "description" => &mut self.description,
            "current" => {
                self.current = value.into_flag(field)?;
                return Ok(());
            }
            _ => return Err(unknown::<Self>(field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

impl SectionEntry for Education {
    const SECTION: Section = Section::Education;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        let slot = match field {
            "degree" => &mut self.degree,
            "institution" => &mut self.institution,
            "location" => &mut self.location,
            "graduation_date" => &mut self.graduation_date,
            "gpa" => &mut self.gpa,
            _ => return Err(unknown::<Self>(field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

/// Skills are bare strings; the only addressable field is the text itself.
impl SectionEntry for String {
    const SECTION: Section = Section::Skills;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        match field {
            "text" | "value" => {
                *self = value.into_text(field)?;
                Ok(())
            }
            _ => Err(unknown::<Self>(field)),
        }
    }
}

impl SectionEntry for Project {
    const SECTION: Section = Section::Projects;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        let slot = match field {
            "name" => &mut self.name,
            "description" => &mut self.description,
            "technologies" => &mut self.technologies,
            "link" => &mut self.link,
            "featured" => {
                self.featured = value.into_flag(field)?;
                return Ok(());
            }
            _ => return Err(unknown::<Self>(field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

impl SectionEntry for Achievement {
    const SECTION: Section = Section::Achievements;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        let slot = match field {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "date" => &mut self.date,
            "organization" => &mut self.organization,
            _ => return Err(unknown::<Self>(field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

impl SectionEntry for Reference {
    const SECTION: Section = Section::References;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditError> {
        let slot = match field {
            "name" => &mut self.name,
            "position" => &mut self.position,
            "company" => &mut self.company,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            _ => return Err(unknown::<Self>(field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collection operations
// ────────────────────────────────────────────────────────────────────────────

fn check_index<T: SectionEntry>(items: &[T], index: usize) -> Result<(), EditError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            section: T::SECTION,
            index,
            len: items.len(),
        })
    }
}

/// Appends a default entry and returns its index (always the last position).
pub fn insert_item<T: SectionEntry>(items: &mut Vec<T>) -> usize {
    items.push(T::default());
    items.len() - 1
}

pub fn update_item<T: SectionEntry>(
    items: &mut [T],
    index: usize,
    field: &str,
    value: FieldValue,
) -> Result<(), EditError> {
    check_index(items, index)?;
    items[index].set_field(field, value)
}

/// Removes the entry at `index`, shifting later entries down.
pub fn remove_item<T: SectionEntry>(items: &mut Vec<T>, index: usize) -> Result<T, EditError> {
    check_index(items, index)?;
    Ok(items.remove(index))
}

/// Moves one entry from `from` to `to`. Extract then reinsert, not a swap: every other
/// entry keeps its relative order.
pub fn reorder_item<T: SectionEntry>(
    items: &mut Vec<T>,
    from: usize,
    to: usize,
) -> Result<(), EditError> {
    check_index(items, from)?;
    check_index(items, to)?;
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insert_appends_default_at_end() {
        let mut items = vec![Experience {
            title: "Engineer".into(),
            ..Default::default()
        }];
        let idx = insert_item(&mut items);
        assert_eq!(idx, 1);
        assert_eq!(items[1], Experience::default());
        assert_eq!(items[0].title, "Engineer");
    }

    #[test]
    fn test_insert_then_remove_restores_collection() {
        let mut items = skills(&["Rust", "Go", "Rust"]);
        let before = items.clone();
        let idx = insert_item(&mut items);
        remove_item(&mut items, idx).unwrap();
        assert_eq!(items, before);

        let mut projects = vec![Project::default(), Project::default()];
        let before = projects.clone();
        let idx = insert_item(&mut projects);
        remove_item(&mut projects, idx).unwrap();
        assert_eq!(projects, before);
    }

    #[test]
    fn test_update_sets_text_and_flag_fields() {
        let mut items = vec![Experience::default()];
        update_item(&mut items, 0, "company", FieldValue::Text("ACME".into())).unwrap();
        update_item(&mut items, 0, "current", FieldValue::Flag(true)).unwrap();
        assert_eq!(items[0].company, "ACME");
        assert!(items[0].current);
    }

    #[test]
    fn test_update_accepts_markup_and_empty_strings() {
        let mut items = vec![Achievement::default()];
        update_item(&mut items, 0, "description", FieldValue::Text("<b>won</b>".into())).unwrap();
        update_item(&mut items, 0, "title", FieldValue::Text(String::new())).unwrap();
        assert_eq!(items[0].description, "<b>won</b>");
        assert_eq!(items[0].title, "");
    }

    #[test]
    fn test_update_out_of_range_is_rejected() {
        let mut items: Vec<Education> = Vec::new();
        let err = update_item(&mut items, 0, "degree", FieldValue::Text("BSc".into())).unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                section: Section::Education,
                index: 0,
                len: 0
            }
        );
    }

    #[test]
    fn test_update_unknown_field_leaves_entry_untouched() {
        let mut items = vec![Reference {
            name: "Grace".into(),
            ..Default::default()
        }];
        let before = items.clone();
        assert!(update_item(&mut items, 0, "salary", FieldValue::Text("x".into())).is_err());
        assert_eq!(items, before);
    }

    #[test]
    fn test_update_wrong_value_kind_rejected() {
        let mut items = vec![Project::default()];
        let err = update_item(&mut items, 0, "featured", FieldValue::Text("yes".into())).unwrap_err();
        assert!(matches!(err, EditError::WrongValueKind { expected: "boolean", .. }));
        let err = update_item(&mut items, 0, "name", FieldValue::Flag(true)).unwrap_err();
        assert!(matches!(err, EditError::WrongValueKind { expected: "text", .. }));
    }

    #[test]
    fn test_remove_shifts_later_items_down() {
        let mut items = skills(&["a", "b", "c"]);
        let removed = remove_item(&mut items, 1).unwrap();
        assert_eq!(removed, "b");
        assert_eq!(items, skills(&["a", "c"]));
    }

    #[test]
    fn test_remove_on_empty_collection_fails() {
        let mut items: Vec<String> = Vec::new();
        assert!(remove_item(&mut items, 0).is_err());
    }

    #[test]
    fn test_reorder_moves_single_item_forward() {
        let mut items = skills(&["a", "b", "c", "d"]);
        reorder_item(&mut items, 0, 2).unwrap();
        assert_eq!(items, skills(&["b", "c", "a", "d"]));
    }

    #[test]
    fn test_reorder_moves_single_item_backward() {
        let mut items = skills(&["a", "b", "c", "d"]);
        reorder_item(&mut items, 3, 1).unwrap();
        assert_eq!(items, skills(&["a", "d", "b", "c"]));
    }

    #[test]
    fn test_reorder_preserves_multiset() {
        let mut items = skills(&["x", "y", "x", "z"]);
        reorder_item(&mut items, 1, 3).unwrap();
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, skills(&["x", "x", "y", "z"]));
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn test_reorder_out_of_range_is_rejected() {
        let mut items = skills(&["a"]);
        assert!(reorder_item(&mut items, 0, 1).is_err());
        assert_eq!(items, skills(&["a"]));
    }
}
