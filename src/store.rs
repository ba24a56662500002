//! Entity store: five flat collections persisted as one JSON document.
//!
//! Every operation is a full read of the document, an in-memory mutation and
//! a full write-back. A mutex serializes the read-modify-write cycle so two
//! mutating callers cannot clobber each other's writes. Persistence sits
//! behind `StoreBackend`, so the JSON file can be swapped for another medium
//! without touching the domain logic.

use crate::calc::parse_minutes;
use crate::grades;
use crate::model::{
    City, CityInput, Class, ClassInput, Community, CommunityInput, DayType, School, SchoolInput,
    TimeBlock, TimeBlockInput,
};
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

pub const DB_FILE_NAME: &str = "lehavdil.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

impl StoreError {
    fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub communities: Vec<Community>,
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub time_blocks: Vec<TimeBlock>,
}

/// Wholesale load/save of the document. No partial writes, no transactions.
pub trait StoreBackend: Send {
    fn load(&mut self) -> Result<Database, StoreError>;
    fn save(&mut self, db: &Database) -> Result<(), StoreError>;
}

/// The shipped backend: one pretty-printed JSON file in the workspace.
///
/// A missing file initializes an empty document; an unreadable or corrupt
/// file is reported as an empty database rather than an error. That masking
/// matches the original system's behavior and is kept deliberately.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Database, StoreError> {
        if !self.path.exists() {
            let db = Database::default();
            self.save(&db)?;
            return Ok(db);
        }
        let Ok(text) = std::fs::read_to_string(&self.path) else {
            return Ok(Database::default());
        };
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    fn save(&mut self, db: &Database) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(db)
            .context("failed to serialize database")
            .map_err(StoreError::Storage)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.to_string_lossy()))
            .map_err(StoreError::Storage)
    }
}

pub struct Store {
    backend: Mutex<Box<dyn StoreBackend>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn required(value: &str, message: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn optional_name(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Store-level gate for block times: valid HH:MM and end strictly after
/// start on the same day. The totals engine's `duration` is looser (it
/// wraps midnight); the two gates are intentionally independent.
fn validate_block_times(start_time: &str, end_time: &str) -> Result<(), StoreError> {
    let (Some(start), Some(end)) = (parse_minutes(start_time), parse_minutes(end_time)) else {
        return Err(StoreError::validation("invalid time format (HH:MM)"));
    };
    if end <= start {
        return Err(StoreError::validation("end time must be after start time"));
    }
    Ok(())
}

// Explicit cascades, parent removed first, children in stored order.

fn cascade_delete_city(db: &mut Database, city_id: &str) {
    db.cities.retain(|c| c.id != city_id);
    let community_ids: Vec<String> = db
        .communities
        .iter()
        .filter(|c| c.city_id == city_id)
        .map(|c| c.id.clone())
        .collect();
    for id in community_ids {
        cascade_delete_community(db, &id);
    }
}

fn cascade_delete_community(db: &mut Database, community_id: &str) {
    db.communities.retain(|c| c.id != community_id);
    let school_ids: Vec<String> = db
        .schools
        .iter()
        .filter(|s| s.community_id == community_id)
        .map(|s| s.id.clone())
        .collect();
    for id in school_ids {
        cascade_delete_school(db, &id);
    }
}

fn cascade_delete_school(db: &mut Database, school_id: &str) {
    db.schools.retain(|s| s.id != school_id);
    let class_ids: Vec<String> = db
        .classes
        .iter()
        .filter(|c| c.school_id == school_id)
        .map(|c| c.id.clone())
        .collect();
    for id in class_ids {
        cascade_delete_class(db, &id);
    }
}

fn cascade_delete_class(db: &mut Database, class_id: &str) {
    db.classes.retain(|c| c.id != class_id);
    db.time_blocks.retain(|tb| tb.class_id != class_id);
}

impl Store {
    /// Open (or initialize) the store in a workspace directory.
    pub fn open(workspace: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(workspace)
            .with_context(|| format!("failed to create workspace {}", workspace.to_string_lossy()))
            .map_err(StoreError::Storage)?;
        let store = Store::with_backend(Box::new(JsonFileBackend::new(workspace.join(DB_FILE_NAME))));
        // Materialize the file eagerly so an empty workspace is valid on disk.
        store.view(|_| Ok(()))?;
        Ok(store)
    }

    pub fn with_backend(backend: Box<dyn StoreBackend>) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    fn view<T>(&self, f: impl FnOnce(&Database) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        let db = backend.load()?;
        f(&db)
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        let mut db = backend.load()?;
        let value = f(&mut db)?;
        backend.save(&db)?;
        Ok(value)
    }

    /// Clone of the whole document, for read paths that span collections.
    pub fn snapshot(&self) -> Result<Database, StoreError> {
        self.view(|db| Ok(db.clone()))
    }

    // Cities

    pub fn create_city(&self, input: CityInput) -> Result<City, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let country = required(&input.country, "country is required")?;
        let name_he = optional_name(input.name_he);
        self.mutate(move |db| {
            let city = City {
                id: new_id(),
                name_en,
                name_he,
                country,
                created_at: Utc::now(),
            };
            db.cities.push(city.clone());
            Ok(city)
        })
    }

    pub fn get_city(&self, id: &str) -> Result<City, StoreError> {
        self.view(|db| {
            db.cities
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("city"))
        })
    }

    pub fn list_cities(&self) -> Result<Vec<City>, StoreError> {
        self.view(|db| Ok(db.cities.clone()))
    }

    pub fn update_city(&self, id: &str, input: CityInput) -> Result<City, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let country = required(&input.country, "country is required")?;
        let name_he = optional_name(input.name_he);
        self.mutate(move |db| {
            let city = db
                .cities
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::NotFound("city"))?;
            city.name_en = name_en;
            city.name_he = name_he;
            city.country = country;
            Ok(city.clone())
        })
    }

    pub fn delete_city(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|db| {
            if !db.cities.iter().any(|c| c.id == id) {
                return Err(StoreError::NotFound("city"));
            }
            cascade_delete_city(db, id);
            Ok(())
        })
    }

    // Communities

    pub fn create_community(&self, input: CommunityInput) -> Result<Community, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let name_he = optional_name(input.name_he);
        let city_id = input.city_id;
        self.mutate(move |db| {
            if !db.cities.iter().any(|c| c.id == city_id) {
                return Err(StoreError::NotFound("city"));
            }
            let community = Community {
                id: new_id(),
                city_id,
                name_en,
                name_he,
                created_at: Utc::now(),
            };
            db.communities.push(community.clone());
            Ok(community)
        })
    }

    pub fn get_community(&self, id: &str) -> Result<Community, StoreError> {
        self.view(|db| {
            db.communities
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("community"))
        })
    }

    pub fn list_communities(&self, city_id: Option<&str>) -> Result<Vec<Community>, StoreError> {
        self.view(|db| {
            Ok(db
                .communities
                .iter()
                .filter(|c| city_id.map(|id| c.city_id == id).unwrap_or(true))
                .cloned()
                .collect())
        })
    }

    pub fn update_community(&self, id: &str, input: CommunityInput) -> Result<Community, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let name_he = optional_name(input.name_he);
        let city_id = input.city_id;
        self.mutate(move |db| {
            if !db.cities.iter().any(|c| c.id == city_id) {
                return Err(StoreError::NotFound("city"));
            }
            let community = db
                .communities
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::NotFound("community"))?;
            community.city_id = city_id;
            community.name_en = name_en;
            community.name_he = name_he;
            Ok(community.clone())
        })
    }

    pub fn delete_community(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|db| {
            if !db.communities.iter().any(|c| c.id == id) {
                return Err(StoreError::NotFound("community"));
            }
            cascade_delete_community(db, id);
            Ok(())
        })
    }

    // Schools

    pub fn create_school(&self, input: SchoolInput) -> Result<School, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let name_he = optional_name(input.name_he);
        self.mutate(move |db| {
            if !db.communities.iter().any(|c| c.id == input.community_id) {
                return Err(StoreError::NotFound("community"));
            }
            let school = School {
                id: new_id(),
                community_id: input.community_id,
                school_type: input.school_type,
                name_en,
                name_he,
                is_baseline: input.is_baseline,
                created_at: Utc::now(),
            };
            db.schools.push(school.clone());
            Ok(school)
        })
    }

    pub fn get_school(&self, id: &str) -> Result<School, StoreError> {
        self.view(|db| {
            db.schools
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("school"))
        })
    }

    pub fn list_schools(&self, community_id: Option<&str>) -> Result<Vec<School>, StoreError> {
        self.view(|db| {
            Ok(db
                .schools
                .iter()
                .filter(|s| community_id.map(|id| s.community_id == id).unwrap_or(true))
                .cloned()
                .collect())
        })
    }

    pub fn update_school(&self, id: &str, input: SchoolInput) -> Result<School, StoreError> {
        let name_en = required(&input.name_en, "English name is required")?;
        let name_he = optional_name(input.name_he);
        self.mutate(move |db| {
            if !db.communities.iter().any(|c| c.id == input.community_id) {
                return Err(StoreError::NotFound("community"));
            }
            let school = db
                .schools
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound("school"))?;
            school.community_id = input.community_id;
            school.school_type = input.school_type;
            school.name_en = name_en;
            school.name_he = name_he;
            school.is_baseline = input.is_baseline;
            Ok(school.clone())
        })
    }

    pub fn delete_school(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|db| {
            if !db.schools.iter().any(|s| s.id == id) {
                return Err(StoreError::NotFound("school"));
            }
            cascade_delete_school(db, id);
            Ok(())
        })
    }

    // Classes

    pub fn create_class(&self, input: ClassInput) -> Result<Class, StoreError> {
        let name = required(&input.name, "class name is required")?;
        self.mutate(move |db| {
            let school = db
                .schools
                .iter()
                .find(|s| s.id == input.school_id)
                .ok_or(StoreError::NotFound("school"))?;
            if !grades::is_valid_grade(school.school_type, input.grade_level) {
                return Err(StoreError::validation(format!(
                    "invalid grade level {} for {} school",
                    input.grade_level, school.school_type
                )));
            }
            let class = Class {
                id: new_id(),
                school_id: input.school_id,
                name,
                grade_level: input.grade_level,
                sunday_start: input.sunday_start,
                sunday_end: input.sunday_end,
                weekday_start: input.weekday_start,
                weekday_end: input.weekday_end,
                friday_start: input.friday_start,
                friday_end: input.friday_end,
                created_at: Utc::now(),
            };
            db.classes.push(class.clone());
            Ok(class)
        })
    }

    pub fn get_class(&self, id: &str) -> Result<Class, StoreError> {
        self.view(|db| {
            db.classes
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("class"))
        })
    }

    pub fn list_classes(&self, school_id: Option<&str>) -> Result<Vec<Class>, StoreError> {
        self.view(|db| {
            Ok(db
                .classes
                .iter()
                .filter(|c| school_id.map(|id| c.school_id == id).unwrap_or(true))
                .cloned()
                .collect())
        })
    }

    pub fn update_class(&self, id: &str, input: ClassInput) -> Result<Class, StoreError> {
        let name = required(&input.name, "class name is required")?;
        self.mutate(move |db| {
            let school = db
                .schools
                .iter()
                .find(|s| s.id == input.school_id)
                .ok_or(StoreError::NotFound("school"))?;
            if !grades::is_valid_grade(school.school_type, input.grade_level) {
                return Err(StoreError::validation(format!(
                    "invalid grade level {} for {} school",
                    input.grade_level, school.school_type
                )));
            }
            let class = db
                .classes
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(StoreError::NotFound("class"))?;
            class.school_id = input.school_id;
            class.name = name;
            class.grade_level = input.grade_level;
            class.sunday_start = input.sunday_start;
            class.sunday_end = input.sunday_end;
            class.weekday_start = input.weekday_start;
            class.weekday_end = input.weekday_end;
            class.friday_start = input.friday_start;
            class.friday_end = input.friday_end;
            Ok(class.clone())
        })
    }

    pub fn delete_class(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|db| {
            if !db.classes.iter().any(|c| c.id == id) {
                return Err(StoreError::NotFound("class"));
            }
            cascade_delete_class(db, id);
            Ok(())
        })
    }

    // Time blocks

    pub fn create_time_block(&self, input: TimeBlockInput) -> Result<TimeBlock, StoreError> {
        validate_block_times(&input.start_time, &input.end_time)?;
        self.mutate(move |db| {
            if !db.classes.iter().any(|c| c.id == input.class_id) {
                return Err(StoreError::NotFound("class"));
            }
            let block = TimeBlock {
                id: new_id(),
                class_id: input.class_id,
                day_type: input.day_type,
                start_time: input.start_time,
                end_time: input.end_time,
                subject_type: input.subject_type,
                description: input.description,
                teacher: input.teacher,
                sort_order: input.sort_order,
                created_at: Utc::now(),
            };
            db.time_blocks.push(block.clone());
            Ok(block)
        })
    }

    pub fn get_time_block(&self, id: &str) -> Result<TimeBlock, StoreError> {
        self.view(|db| {
            db.time_blocks
                .iter()
                .find(|tb| tb.id == id)
                .cloned()
                .ok_or(StoreError::NotFound("time block"))
        })
    }

    /// Blocks filtered by class and optionally day, ordered by sortOrder.
    /// The sort is stable, so ties keep insertion order.
    pub fn list_time_blocks(
        &self,
        class_id: Option<&str>,
        day_type: Option<DayType>,
    ) -> Result<Vec<TimeBlock>, StoreError> {
        self.view(|db| {
            let mut blocks: Vec<TimeBlock> = db
                .time_blocks
                .iter()
                .filter(|tb| class_id.map(|id| tb.class_id == id).unwrap_or(true))
                .filter(|tb| day_type.map(|d| tb.day_type == d).unwrap_or(true))
                .cloned()
                .collect();
            blocks.sort_by_key(|tb| tb.sort_order);
            Ok(blocks)
        })
    }

    pub fn update_time_block(&self, id: &str, input: TimeBlockInput) -> Result<TimeBlock, StoreError> {
        validate_block_times(&input.start_time, &input.end_time)?;
        self.mutate(move |db| {
            if !db.classes.iter().any(|c| c.id == input.class_id) {
                return Err(StoreError::NotFound("class"));
            }
            let block = db
                .time_blocks
                .iter_mut()
                .find(|tb| tb.id == id)
                .ok_or(StoreError::NotFound("time block"))?;
            block.class_id = input.class_id;
            block.day_type = input.day_type;
            block.start_time = input.start_time;
            block.end_time = input.end_time;
            block.subject_type = input.subject_type;
            block.description = input.description;
            block.teacher = input.teacher;
            block.sort_order = input.sort_order;
            Ok(block.clone())
        })
    }

    pub fn delete_time_block(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|db| {
            let before = db.time_blocks.len();
            db.time_blocks.retain(|tb| tb.id != id);
            if db.time_blocks.len() == before {
                return Err(StoreError::NotFound("time block"));
            }
            Ok(())
        })
    }
}
