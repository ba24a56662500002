use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Boys,
    Yeshivah,
    Girls,
}

impl SchoolType {
    pub fn as_str(self) -> &'static str {
        match self {
            SchoolType::Boys => "boys",
            SchoolType::Yeshivah => "yeshivah",
            SchoolType::Girls => "girls",
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Sunday,
    Weekday,
    Friday,
}

impl DayType {
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Sunday => "sunday",
            DayType::Weekday => "weekday",
            DayType::Friday => "friday",
        }
    }
}

/// The full tag vocabulary that appears in schedule templates. Note that the
/// totals engine only buckets the four core tags; the operational tags
/// (bus-start, class-start, end-day) count toward the day total only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubjectType {
    BusStart,
    ClassStart,
    Hebrew,
    English,
    Break,
    EndDay,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_he: Option<String>,
    pub country: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub city_id: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_he: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub community_id: String,
    pub school_type: SchoolType,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_he: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_baseline: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl School {
    pub fn is_baseline(&self) -> bool {
        self.is_baseline.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub school_id: String,
    pub name: String,
    pub grade_level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday_end: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    pub class_id: String,
    pub day_type: DayType,
    pub start_time: String,
    pub end_time: String,
    pub subject_type: SubjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

// Create/update payloads. Updates are full-field: callers resend every field
// and the stored record keeps only its id and createdAt.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInput {
    pub name_en: String,
    #[serde(default)]
    pub name_he: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityInput {
    pub city_id: String,
    pub name_en: String,
    #[serde(default)]
    pub name_he: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolInput {
    pub community_id: String,
    pub school_type: SchoolType,
    pub name_en: String,
    #[serde(default)]
    pub name_he: Option<String>,
    #[serde(default)]
    pub is_baseline: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub school_id: String,
    pub name: String,
    pub grade_level: i64,
    #[serde(default)]
    pub sunday_start: Option<String>,
    #[serde(default)]
    pub sunday_end: Option<String>,
    #[serde(default)]
    pub weekday_start: Option<String>,
    #[serde(default)]
    pub weekday_end: Option<String>,
    #[serde(default)]
    pub friday_start: Option<String>,
    #[serde(default)]
    pub friday_end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlockInput {
    pub class_id: String,
    pub day_type: DayType,
    pub start_time: String,
    pub end_time: String,
    pub subject_type: SubjectType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}
