pub mod model;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use model::{
    AppItemSpec, Competition, Exercise, ExerciseKind, LeaderboardEntry, QuizBank, QuizQuestion,
    Subject, Tutor, TutorUnit, Unit, VocabularyCategory, Word,
};

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct CatalogAssets;

const EMBEDDED_CATALOG: &str = "catalog.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("embedded catalog is missing")]
    Missing,
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog is inconsistent: {0}")]
    Invalid(String),
}

/// Read-only fixture data. Loaded once at startup, never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
    pub units: Vec<Unit>,
    pub quiz_banks: Vec<QuizBank>,
    pub tutor: Tutor,
    pub apps: Vec<AppItemSpec>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub competitions: Vec<Competition>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        let file = CatalogAssets::get(EMBEDDED_CATALOG).ok_or(CatalogError::Missing)?;
        let catalog: Catalog = serde_json::from_slice(file.data.as_ref())?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the user catalog when a path is given, the embedded one otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::embedded(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if !seen.insert(subject.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate subject id '{}'",
                    subject.id
                )));
            }
        }

        for bank in &self.quiz_banks {
            if self.subject(&bank.subject).is_none() {
                return Err(CatalogError::Invalid(format!(
                    "quiz bank refers to unknown subject '{}'",
                    bank.subject
                )));
            }
            if self.unit(bank.unit).is_none() {
                return Err(CatalogError::Invalid(format!(
                    "quiz bank refers to unknown unit {}",
                    bank.unit
                )));
            }
            if bank.questions.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "quiz bank for {} unit {} has no questions",
                    bank.subject, bank.unit
                )));
            }
            for q in &bank.questions {
                if !q.options.iter().any(|o| o == &q.answer) {
                    return Err(CatalogError::Invalid(format!(
                        "answer '{}' is not among the options of '{}'",
                        q.answer, q.question
                    )));
                }
            }
        }

        if self.tutor.canned_responses.is_empty() {
            return Err(CatalogError::Invalid("tutor has no canned responses".into()));
        }
        if self.tutor.exercises.is_empty() {
            return Err(CatalogError::Invalid("tutor has no exercises".into()));
        }
        if self.tutor.triggers.iter().any(|t| t.to_lowercase() != *t) {
            return Err(CatalogError::Invalid("tutor triggers must be lower-case".into()));
        }

        Ok(())
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn unit(&self, id: u32) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Whether a unit has vocabulary content for the subject.
    pub fn unit_is_open(&self, subject: &str, unit: u32) -> bool {
        self.quiz_banks
            .iter()
            .any(|b| b.subject == subject && b.unit == unit)
    }

    /// Bank for the exact category, falling back to a category-less bank.
    pub fn quiz_bank(
        &self,
        subject: &str,
        unit: u32,
        category: VocabularyCategory,
    ) -> Option<&QuizBank> {
        let mut banks = self
            .quiz_banks
            .iter()
            .filter(|b| b.subject == subject && b.unit == unit);
        let exact = banks.clone().find(|b| b.category == Some(category));
        exact.or_else(|| banks.find(|b| b.category.is_none()))
    }

    pub fn words(&self, subject: &str, unit: u32, category: VocabularyCategory) -> Vec<&Word> {
        self.quiz_banks
            .iter()
            .filter(|b| b.subject == subject && b.unit == unit)
            .flat_map(|b| b.words.iter())
            .filter(|w| w.category == category)
            .collect()
    }

    pub fn tutor_unit(&self, id: u32) -> Option<&TutorUnit> {
        self.tutor.units.iter().find(|u| u.id == id)
    }
}
