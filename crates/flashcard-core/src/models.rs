//! Data models for the flashcard store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::progress::percentage;

/// Store-assigned card identifier.
pub type CardId = i64;

/// Informational difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // Question banks label the lowest tier "Beginner".
            "basic" | "beginner" => Ok(Self::Basic),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mastery state of a card. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    /// Not yet answered, or reset.
    #[default]
    Learning,
    /// Answered incorrectly at least once since the last reset.
    Reviewing,
    /// Answered correctly.
    Mastered,
}

impl CardState {
    pub const ALL: [CardState; 3] = [Self::Learning, Self::Reviewing, Self::Mastered];

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Reviewing => "Reviewing",
            Self::Mastered => "Mastered",
        }
    }

    /// Column value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Mastered => "mastered",
        }
    }

    /// State after the card is answered. Only a category reset leads back to
    /// `Learning`.
    pub fn after_answer(self, knew: bool) -> Self {
        if knew {
            Self::Mastered
        } else {
            Self::Reviewing
        }
    }
}

impl FromStr for CardState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learning" => Ok(Self::Learning),
            "reviewing" => Ok(Self::Reviewing),
            "mastered" => Ok(Self::Mastered),
            other => Err(format!("unknown card state '{other}'")),
        }
    }
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correct/incorrect answer counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub incorrect: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }
}

/// Which bookkeeping an answer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressModel {
    /// Answers move the card between learning, reviewing and mastered.
    #[default]
    Mastery,
    /// Answers bump the correct/incorrect counters.
    Tally,
}

/// A stored flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,
    /// Key in the remote question bank, if imported.
    pub remote_id: Option<String>,
    /// Grouping key.
    pub category: String,
    pub difficulty: Difficulty,
    /// Front of the card (term or question).
    pub term: String,
    /// Back of the card (definition or answer).
    pub definition: String,
    /// Usage example. Empty for imported questions.
    pub example: String,
    /// Current mastery state.
    pub state: CardState,
    pub tally: Tally,
    /// When the card was created.
    pub created_at: DateTime<Utc>,
}

/// A card that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub remote_id: Option<String>,
    pub category: String,
    pub difficulty: Difficulty,
    pub term: String,
    pub definition: String,
    pub example: String,
    pub state: CardState,
    pub tally: Tally,
}

impl NewCard {
    /// Create a new card in the learning state.
    pub fn new(
        category: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            remote_id: None,
            category: category.into(),
            difficulty: Difficulty::default(),
            term: term.into(),
            definition: definition.into(),
            example: String::new(),
            state: CardState::Learning,
            tally: Tally::default(),
        }
    }

    /// Set difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set example.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    /// Set remote key.
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }

    /// Set tally.
    pub fn with_tally(mut self, tally: Tally) -> Self {
        self.tally = tally;
        self
    }
}

/// Per-category counts, derived from stored cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: usize,
    pub learning: usize,
    pub reviewing: usize,
    pub mastered: usize,
}

impl CategorySummary {
    pub fn count(&self, state: CardState) -> usize {
        match state {
            CardState::Learning => self.learning,
            CardState::Reviewing => self.reviewing,
            CardState::Mastered => self.mastered,
        }
    }

    /// Share of the category's cards in `state`.
    pub fn state_percentage(&self, state: CardState) -> u32 {
        percentage(self.count(state), self.total)
    }

    pub fn mastered_percentage(&self) -> u32 {
        percentage(self.mastered, self.total)
    }
}
