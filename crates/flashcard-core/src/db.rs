//! Database operations for the card store.

use crate::models::{Card, CardId, CardState, CategorySummary, Difficulty, NewCard, Tally};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Result as SqlResult};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Bumped when the schema changes. A store at this version has been seeded.
const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        remote_id TEXT UNIQUE,
        category TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        term TEXT NOT NULL,
        definition TEXT NOT NULL,
        example TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT 'learning'
            CHECK (state IN ('learning', 'reviewing', 'mastered')),
        correct_count INTEGER NOT NULL DEFAULT 0,
        incorrect_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_cards_category ON cards(category);
"#;

const CARD_COLUMNS: &str = "id, remote_id, category, difficulty, term, definition, example, \
                            state, correct_count, incorrect_count, created_at";

/// SQLite-backed store of cards and their progress.
pub struct CardStore {
    conn: Connection,
}

impl CardStore {
    /// Open (or create) the store at `path`, seeding it on first creation.
    pub fn open(path: &Path, seed: &[NewCard]) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize(seed)?;
        Ok(store)
    }

    pub fn in_memory(seed: &[NewCard]) -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize(seed)?;
        Ok(store)
    }

    /// Create the schema if absent and seed an empty, never-initialized
    /// store. Returns how many cards were seeded; 0 on every later call.
    pub fn initialize(&mut self, seed: &[NewCard]) -> DbResult<usize> {
        self.conn.execute_batch(SCHEMA)?;

        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version >= SCHEMA_VERSION {
            return Ok(0);
        }

        let existing = self.card_count()?;
        let tx = self.conn.transaction()?;
        let seeded = if existing == 0 {
            let now = Utc::now();
            for card in seed {
                insert_card(&tx, card, now)?;
            }
            seed.len()
        } else {
            0
        };
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;

        info!(seeded, "card store initialized");
        Ok(seeded)
    }

    // Queries

    pub fn card_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn get_card(&self, id: CardId) -> DbResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"))?;
        let card = stmt.query_row(params![id], parse_card_row);

        match card {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Cards in `category` in creation order. A non-empty `states` keeps
    /// only cards in one of those states.
    pub fn list_cards(&self, category: &str, states: &[CardState]) -> DbResult<Vec<Card>> {
        let mut sql = format!("SELECT {CARD_COLUMNS} FROM cards WHERE category = ?1");
        if !states.is_empty() {
            let placeholders = (0..states.len())
                .map(|i| format!("?{}", i + 2))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" AND state IN ({placeholders})"));
        }
        sql.push_str(" ORDER BY id");

        let mut values = vec![category.to_string()];
        values.extend(states.iter().map(|s| s.as_str().to_string()));

        let mut stmt = self.conn.prepare(&sql)?;
        let cards = stmt
            .query_map(params_from_iter(values.iter()), parse_card_row)?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(cards)
    }

    /// One summary per category, ordered by category name.
    pub fn list_category_summaries(&self) -> DbResult<Vec<CategorySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                category,
                COUNT(*) AS total,
                SUM(CASE WHEN state = 'learning' THEN 1 ELSE 0 END) AS learning,
                SUM(CASE WHEN state = 'reviewing' THEN 1 ELSE 0 END) AS reviewing,
                SUM(CASE WHEN state = 'mastered' THEN 1 ELSE 0 END) AS mastered
             FROM cards
             GROUP BY category
             ORDER BY category",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(CategorySummary {
                    category: row.get(0)?,
                    total: row.get::<_, i64>(1)? as usize,
                    learning: row.get::<_, i64>(2)? as usize,
                    reviewing: row.get::<_, i64>(3)? as usize,
                    mastered: row.get::<_, i64>(4)? as usize,
                })
            })?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(summaries)
    }

    pub fn tally(&self, id: CardId) -> DbResult<Option<Tally>> {
        let tally = self.conn.query_row(
            "SELECT correct_count, incorrect_count FROM cards WHERE id = ?1",
            params![id],
            |row| {
                Ok(Tally {
                    correct: row.get(0)?,
                    incorrect: row.get(1)?,
                })
            },
        );

        match tally {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Mutations

    /// Move a card to mastered (`knew`) or reviewing. Returns false when no
    /// card has that id.
    pub fn transition_state(&self, id: CardId, knew: bool) -> DbResult<bool> {
        let state = CardState::Learning.after_answer(knew);
        let changed = self.conn.execute(
            "UPDATE cards SET state = ?2 WHERE id = ?1",
            params![id, state.as_str()],
        )?;
        debug!(id, %state, changed, "card answered");
        Ok(changed > 0)
    }

    /// Put every card of `category` back into learning. Returns the number
    /// of cards touched.
    pub fn reset_category(&self, category: &str) -> DbResult<usize> {
        let changed = self.conn.execute(
            "UPDATE cards SET state = 'learning' WHERE category = ?1",
            params![category],
        )?;
        info!(category, changed, "category progress reset");
        Ok(changed)
    }

    /// Bump the correct or incorrect counter by one. Returns false when no
    /// card has that id.
    pub fn record_answer_tally(&self, id: CardId, correct: bool) -> DbResult<bool> {
        let sql = if correct {
            "UPDATE cards SET correct_count = correct_count + 1 WHERE id = ?1"
        } else {
            "UPDATE cards SET incorrect_count = incorrect_count + 1 WHERE id = ?1"
        };
        let changed = self.conn.execute(sql, params![id])?;
        debug!(id, correct, changed, "answer tallied");
        Ok(changed > 0)
    }

    /// Discard every card and insert `cards` instead, all in one
    /// transaction. On error the previous contents stay untouched.
    pub fn replace_all(&mut self, cards: &[NewCard]) -> DbResult<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM cards", [])?;
        let now = Utc::now();
        for card in cards {
            insert_card(&tx, card, now)?;
        }
        tx.commit()?;

        info!(removed, inserted = cards.len(), "card bank replaced");
        Ok(cards.len())
    }
}

fn insert_card(conn: &Connection, card: &NewCard, created_at: DateTime<Utc>) -> DbResult<CardId> {
    conn.execute(
        "INSERT INTO cards (remote_id, category, difficulty, term, definition, example,
                            state, correct_count, incorrect_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            card.remote_id,
            card.category,
            card.difficulty.to_string(),
            card.term,
            card.definition,
            card.example,
            card.state.as_str(),
            card.tally.correct,
            card.tally.incorrect,
            created_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

fn parse_card_row(row: &rusqlite::Row) -> SqlResult<Card> {
    let difficulty_str: String = row.get("difficulty")?;
    let state_str: String = row.get("state")?;
    let created_str: String = row.get("created_at")?;

    Ok(Card {
        id: row.get("id")?,
        remote_id: row.get("remote_id")?,
        category: row.get("category")?,
        difficulty: difficulty_str
            .parse::<Difficulty>()
            .map_err(|e| conversion_error(3, e))?,
        term: row.get("term")?,
        definition: row.get("definition")?,
        example: row.get("example")?,
        state: state_str
            .parse::<CardState>()
            .map_err(|e| conversion_error(7, e))?,
        tally: Tally {
            correct: row.get("correct_count")?,
            incorrect: row.get("incorrect_count")?,
        },
        created_at: DateTime::parse_from_rfc3339(&created_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(10, e.to_string()))?,
    })
}
