//! Study session selection.
//!
//! A [`SessionSelector`] turns a category into a [`SessionPlan`]: either a
//! ready [`Session`] or one of two distinct empty outcomes, so callers can
//! tell an empty category apart from one that is fully mastered.

use crate::db::{CardStore, DbResult};
use crate::models::{Card, CardState, ProgressModel};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How cards are picked for a study pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Learning cards first; reviewing cards once nothing is left to learn.
    #[default]
    PriorityFiltered,
    /// Every card in the category, in random order.
    RandomDraw,
}

impl SessionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PriorityFiltered => "Priority",
            Self::RandomDraw => "Random",
        }
    }
}

/// Outcome of building a session.
#[derive(Debug, Clone)]
pub enum SessionPlan {
    Ready(Session),
    /// The category has no cards at all.
    NoCards,
    /// Cards exist but every one of them is mastered.
    AllMastered,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionSelector {
    pub mode: SessionMode,
}

impl SessionSelector {
    pub fn new(mode: SessionMode) -> Self {
        Self { mode }
    }

    pub fn build_session(&self, store: &CardStore, category: &str) -> DbResult<SessionPlan> {
        self.build_session_with_rng(store, category, &mut rand::rng())
    }

    pub fn build_session_with_rng<R: Rng + ?Sized>(
        &self,
        store: &CardStore,
        category: &str,
        rng: &mut R,
    ) -> DbResult<SessionPlan> {
        let all = store.list_cards(category, &[])?;
        if all.is_empty() {
            return Ok(SessionPlan::NoCards);
        }

        let cards = match self.mode {
            SessionMode::PriorityFiltered => {
                let learning = filter_state(&all, CardState::Learning);
                if !learning.is_empty() {
                    learning
                } else {
                    filter_state(&all, CardState::Reviewing)
                }
            }
            SessionMode::RandomDraw => {
                let mut cards = all;
                cards.shuffle(rng);
                cards
            }
        };

        if cards.is_empty() {
            return Ok(SessionPlan::AllMastered);
        }
        Ok(SessionPlan::Ready(Session::new(category, self.mode, cards)))
    }
}

fn filter_state(cards: &[Card], state: CardState) -> Vec<Card> {
    cards.iter().filter(|c| c.state == state).cloned().collect()
}

/// A card answered during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub card: Card,
    pub knew: bool,
    /// Whether the store still had the card.
    pub recorded: bool,
}

/// An in-progress study pass over a fixed list of cards.
#[derive(Debug, Clone)]
pub struct Session {
    /// Category being studied.
    pub category: String,
    pub mode: SessionMode,
    /// Cards in presentation order, as loaded when the session began.
    pub cards: Vec<Card>,
    /// Current card index.
    pub current_index: usize,
    /// Whether the back of the current card is shown.
    pub flipped: bool,
    /// Cards answered this session.
    pub answered: usize,
    /// Cards answered with "knew it".
    pub correct: usize,
}

impl Session {
    pub fn new(category: impl Into<String>, mode: SessionMode, cards: Vec<Card>) -> Self {
        Self {
            category: category.into(),
            mode,
            cards,
            current_index: 0,
            flipped: false,
            answered: 0,
            correct: 0,
        }
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.cards.len()
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.current_index)
    }

    pub fn flip(&mut self) {
        if !self.is_complete() {
            self.flipped = true;
        }
    }

    /// Record the answer for the current card and move on. Returns `None`
    /// once the session is complete.
    pub fn answer(
        &mut self,
        store: &CardStore,
        knew: bool,
        model: ProgressModel,
    ) -> DbResult<Option<Answer>> {
        let Some(card) = self.current_card().cloned() else {
            return Ok(None);
        };

        let recorded = match model {
            ProgressModel::Mastery => store.transition_state(card.id, knew)?,
            ProgressModel::Tally => store.record_answer_tally(card.id, knew)?,
        };

        self.answered += 1;
        if knew {
            self.correct += 1;
        }
        self.current_index += 1;
        self.flipped = false;

        Ok(Some(Answer {
            card,
            knew,
            recorded,
        }))
    }

    /// Share of answered cards the user knew, as a whole percentage.
    pub fn accuracy(&self) -> u32 {
        crate::progress::percentage(self.correct, self.answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCard;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn basics_store(n: usize) -> CardStore {
        let cards: Vec<_> = (0..n)
            .map(|i| NewCard::new("Basics", format!("Term {i}"), format!("Definition {i}")))
            .collect();
        CardStore::in_memory(&cards).unwrap()
    }

    fn ready(plan: SessionPlan) -> Session {
        match plan {
            SessionPlan::Ready(session) => session,
            other => panic!("expected a ready session, got {other:?}"),
        }
    }

    #[test]
    fn test_priority_session_lifecycle() {
        let store = basics_store(5);
        let selector = SessionSelector::new(SessionMode::PriorityFiltered);

        let mut session = ready(selector.build_session(&store, "Basics").unwrap());
        assert_eq!(session.total_cards(), 5);

        for knew in [true, true, true, false, false] {
            session.flip();
            let answer = session.answer(&store, knew, ProgressModel::Mastery).unwrap().unwrap();
            assert!(answer.recorded);
        }
        assert!(session.is_complete());
        assert_eq!(session.accuracy(), 60);

        // Learning is empty, so the reviewing cards come back.
        let mut session = ready(selector.build_session(&store, "Basics").unwrap());
        assert_eq!(session.total_cards(), 2);
        assert!(session.cards.iter().all(|c| c.state == CardState::Reviewing));

        while session.answer(&store, true, ProgressModel::Mastery).unwrap().is_some() {}

        let summaries = store.list_category_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        let basics = &summaries[0];
        assert_eq!(basics.category, "Basics");
        assert_eq!(
            (basics.total, basics.mastered, basics.reviewing, basics.learning),
            (5, 5, 0, 0)
        );

        assert!(matches!(
            selector.build_session(&store, "Basics").unwrap(),
            SessionPlan::AllMastered
        ));

        store.reset_category("Basics").unwrap();
        let basics = &store.list_category_summaries().unwrap()[0];
        assert_eq!(
            (basics.total, basics.mastered, basics.reviewing, basics.learning),
            (5, 0, 0, 5)
        );
    }

    #[test]
    fn test_empty_category_is_distinct_from_all_mastered() {
        let store = basics_store(2);
        for mode in [SessionMode::PriorityFiltered, SessionMode::RandomDraw] {
            let plan = SessionSelector::new(mode).build_session(&store, "Nothing").unwrap();
            assert!(matches!(plan, SessionPlan::NoCards));
        }

        for card in store.list_cards("Basics", &[]).unwrap() {
            store.transition_state(card.id, true).unwrap();
        }
        let plan = SessionSelector::new(SessionMode::PriorityFiltered)
            .build_session(&store, "Basics")
            .unwrap();
        assert!(matches!(plan, SessionPlan::AllMastered));
    }

    #[test]
    fn test_priority_prefers_learning_over_reviewing() {
        let store = basics_store(3);
        let cards = store.list_cards("Basics", &[]).unwrap();
        store.transition_state(cards[0].id, false).unwrap();

        let session = ready(
            SessionSelector::default()
                .build_session(&store, "Basics")
                .unwrap(),
        );
        let ids: Vec<_> = session.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![cards[1].id, cards[2].id]);
    }

    #[test]
    fn test_random_draw_takes_every_card_once() {
        let store = basics_store(8);
        let all = store.list_cards("Basics", &[]).unwrap();
        store.transition_state(all[0].id, true).unwrap();
        store.transition_state(all[1].id, false).unwrap();

        let selector = SessionSelector::new(SessionMode::RandomDraw);
        let mut rng = StdRng::seed_from_u64(7);
        let session = ready(
            selector
                .build_session_with_rng(&store, "Basics", &mut rng)
                .unwrap(),
        );

        let mut drawn: Vec<_> = session.cards.iter().map(|c| c.id).collect();
        drawn.sort();
        let mut expected: Vec<_> = all.iter().map(|c| c.id).collect();
        expected.sort();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn test_random_draw_includes_mastered_cards() {
        let store = basics_store(2);
        for card in store.list_cards("Basics", &[]).unwrap() {
            store.transition_state(card.id, true).unwrap();
        }

        let plan = SessionSelector::new(SessionMode::RandomDraw)
            .build_session(&store, "Basics")
            .unwrap();
        assert_eq!(ready(plan).total_cards(), 2);
    }

    #[test]
    fn test_tally_model_leaves_state_alone() {
        let store = basics_store(2);
        let mut session = ready(
            SessionSelector::default()
                .build_session(&store, "Basics")
                .unwrap(),
        );

        let first = session.answer(&store, true, ProgressModel::Tally).unwrap().unwrap();
        let second = session.answer(&store, false, ProgressModel::Tally).unwrap().unwrap();
        assert!(session.answer(&store, true, ProgressModel::Tally).unwrap().is_none());

        assert_eq!(store.tally(first.card.id).unwrap().unwrap().correct, 1);
        assert_eq!(store.tally(second.card.id).unwrap().unwrap().incorrect, 1);
        assert_eq!(store.list_category_summaries().unwrap()[0].learning, 2);
    }

    #[test]
    fn test_answer_after_replace_is_not_recorded() {
        let mut store = basics_store(1);
        let mut session = ready(
            SessionSelector::default()
                .build_session(&store, "Basics")
                .unwrap(),
        );
        store.replace_all(&[]).unwrap();

        let answer = session.answer(&store, true, ProgressModel::Mastery).unwrap().unwrap();
        assert!(!answer.recorded);
        assert!(session.is_complete());
    }

    #[test]
    fn test_flip_resets_on_advance() {
        let store = basics_store(2);
        let mut session = ready(
            SessionSelector::default()
                .build_session(&store, "Basics")
                .unwrap(),
        );
        session.flip();
        assert!(session.flipped);
        session.answer(&store, false, ProgressModel::Mastery).unwrap();
        assert!(!session.flipped);
        assert_eq!(session.remaining(), 1);
    }
}
