use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyCategory {
    Main,
    Additional,
}

impl VocabularyCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            VocabularyCategory::Main => "main",
            VocabularyCategory::Additional => "additional",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VocabularyCategory::Main => "Main vocabulary",
            VocabularyCategory::Additional => "Additional vocabulary",
        }
    }

    pub fn all() -> &'static [VocabularyCategory] {
        &[VocabularyCategory::Main, VocabularyCategory::Additional]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub name_en: String,
    /// Hex colour used for the subject's accents.
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub name: String,
    pub name_ar: String,
    /// Display-only percentage, not derived from activity.
    pub progress: u8,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: u32,
    pub english: String,
    pub arabic: String,
    pub pronunciation: String,
    pub example: String,
    pub category: VocabularyCategory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub image: Option<String>,
    pub options: Vec<String>,
    pub answer: String,
}

/// Questions for one subject unit. A bank without a category serves both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizBank {
    pub subject: String,
    pub unit: u32,
    #[serde(default)]
    pub category: Option<VocabularyCategory>,
    #[serde(default)]
    pub words: Vec<Word>,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    VerbExtraction,
    TenseIdentification,
    SentenceCompletion,
}

impl ExerciseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::VerbExtraction => "verb-extraction",
            ExerciseKind::TenseIdentification => "tense-identification",
            ExerciseKind::SentenceCompletion => "sentence-completion",
        }
    }

    /// Instruction shown ahead of the exercise sentence.
    pub fn instruction(self) -> &'static str {
        match self {
            ExerciseKind::VerbExtraction => "Extract the verb from the following sentence:",
            ExerciseKind::TenseIdentification => "Identify the tense of the following sentence:",
            ExerciseKind::SentenceCompletion => "Complete the following sentence:",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub kind: ExerciseKind,
    pub sentence: String,
    pub correct_answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorUnit {
    pub id: u32,
    pub name: String,
    pub name_ar: String,
    pub topics: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutor {
    /// Subject that offers a unit step before the conversation.
    pub unit_subject: String,
    pub units: Vec<TutorUnit>,
    /// Lower-case phrases that switch the tutor into exercise mode.
    pub triggers: Vec<String>,
    pub exercises: Vec<Exercise>,
    pub canned_responses: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppItemSpec {
    pub name: String,
    pub icon: String,
    pub minutes_spent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub points: u32,
    pub streak: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub title: String,
    pub description: String,
    pub participants: u32,
    pub time_left: String,
    pub prize: String,
}
