//! Grade tables per school type.
//!
//! Naming conventions differ completely by school type (script, numbering
//! base, count), so a bare numeric grade is meaningless without the owning
//! school's table: boys classes are כיתה א..ט (1-9), yeshivah runs three
//! shiurim, and the girls school starts at Pre1A (0) and runs to Grade 12.

use crate::model::SchoolType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevel {
    pub value: i64,
    pub label: &'static str,
    pub label_en: &'static str,
}

const fn grade(value: i64, label: &'static str, label_en: &'static str) -> GradeLevel {
    GradeLevel {
        value,
        label,
        label_en,
    }
}

pub const BOYS_GRADES: [GradeLevel; 9] = [
    grade(1, "כיתה א", "Grade 1"),
    grade(2, "כיתה ב", "Grade 2"),
    grade(3, "כיתה ג", "Grade 3"),
    grade(4, "כיתה ד", "Grade 4"),
    grade(5, "כיתה ה", "Grade 5"),
    grade(6, "כיתה ו", "Grade 6"),
    grade(7, "כיתה ז", "Grade 7"),
    grade(8, "כיתה ח", "Grade 8"),
    grade(9, "כיתה ט", "Grade 9"),
];

pub const YESHIVAH_SHIURIM: [GradeLevel; 3] = [
    grade(1, "שיעור א", "Shiur 1"),
    grade(2, "שיעור ב", "Shiur 2"),
    grade(3, "שיעור ג", "Shiur 3"),
];

pub const GIRLS_GRADES: [GradeLevel; 13] = [
    grade(0, "Pre1A", "Pre1A"),
    grade(1, "Grade 1", "Grade 1"),
    grade(2, "Grade 2", "Grade 2"),
    grade(3, "Grade 3", "Grade 3"),
    grade(4, "Grade 4", "Grade 4"),
    grade(5, "Grade 5", "Grade 5"),
    grade(6, "Grade 6", "Grade 6"),
    grade(7, "Grade 7", "Grade 7"),
    grade(8, "Grade 8", "Grade 8"),
    grade(9, "Grade 9", "Grade 9"),
    grade(10, "Grade 10", "Grade 10"),
    grade(11, "Grade 11", "Grade 11"),
    grade(12, "Grade 12", "Grade 12"),
];

pub fn grade_set(school_type: SchoolType) -> &'static [GradeLevel] {
    match school_type {
        SchoolType::Boys => &BOYS_GRADES,
        SchoolType::Yeshivah => &YESHIVAH_SHIURIM,
        SchoolType::Girls => &GIRLS_GRADES,
    }
}

pub fn is_valid_grade(school_type: SchoolType, value: i64) -> bool {
    grade_set(school_type).iter().any(|g| g.value == value)
}

/// Canonical class label for a grade value, e.g. the Hebrew letter name for
/// boys grades. None when the value is not in the school type's table.
pub fn default_class_name(school_type: SchoolType, value: i64) -> Option<&'static str> {
    grade_set(school_type)
        .iter()
        .find(|g| g.value == value)
        .map(|g| g.label)
}

/// Reverse lookup: grade value for a canonical class label.
pub fn grade_value_for_name(school_type: SchoolType, name: &str) -> Option<i64> {
    grade_set(school_type)
        .iter()
        .find(|g| g.label == name)
        .map(|g| g.value)
}

pub fn grade_range(school_type: SchoolType) -> (i64, i64) {
    let grades = grade_set(school_type);
    // Tables are non-empty by construction and sorted ascending.
    (grades[0].value, grades[grades.len() - 1].value)
}

pub fn school_type_label(school_type: SchoolType, lang: &str) -> &'static str {
    match (school_type, lang) {
        (SchoolType::Boys, "he") => "בנים",
        (SchoolType::Boys, _) => "Boys",
        (SchoolType::Yeshivah, "he") => "ישיבה",
        (SchoolType::Yeshivah, _) => "Yeshivah",
        (SchoolType::Girls, "he") => "בנות",
        (SchoolType::Girls, _) => "Girls",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_sets_have_expected_shapes() {
        assert_eq!(grade_set(SchoolType::Boys).len(), 9);
        assert_eq!(grade_set(SchoolType::Yeshivah).len(), 3);
        assert_eq!(grade_set(SchoolType::Girls).len(), 13);
        assert_eq!(grade_range(SchoolType::Boys), (1, 9));
        assert_eq!(grade_range(SchoolType::Yeshivah), (1, 3));
        assert_eq!(grade_range(SchoolType::Girls), (0, 12));
    }

    #[test]
    fn girls_pre1a_is_valid_but_13_is_not() {
        assert!(is_valid_grade(SchoolType::Girls, 0));
        assert!(!is_valid_grade(SchoolType::Girls, 13));
        assert!(!is_valid_grade(SchoolType::Yeshivah, 4));
        assert!(!is_valid_grade(SchoolType::Boys, 0));
    }

    #[test]
    fn default_class_names_follow_tables() {
        assert_eq!(default_class_name(SchoolType::Boys, 1), Some("כיתה א"));
        assert_eq!(default_class_name(SchoolType::Yeshivah, 3), Some("שיעור ג"));
        assert_eq!(default_class_name(SchoolType::Girls, 0), Some("Pre1A"));
        assert_eq!(default_class_name(SchoolType::Girls, 13), None);
    }

    #[test]
    fn label_lookup_roundtrips() {
        assert_eq!(grade_value_for_name(SchoolType::Boys, "כיתה ט"), Some(9));
        assert_eq!(grade_value_for_name(SchoolType::Girls, "Pre1A"), Some(0));
        assert_eq!(grade_value_for_name(SchoolType::Girls, "Grade 13"), None);
    }

    #[test]
    fn school_type_labels_are_bilingual() {
        assert_eq!(school_type_label(SchoolType::Boys, "en"), "Boys");
        assert_eq!(school_type_label(SchoolType::Yeshivah, "he"), "ישיבה");
        assert_eq!(school_type_label(SchoolType::Girls, "en"), "Girls");
    }
}
