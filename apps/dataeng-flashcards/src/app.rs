//! Application state and logic.

use crate::config::Config;
use crossterm::event::{KeyCode, KeyEvent};
use flashcard_core::seed::data_engineering_terms;
use flashcard_core::sync::{apply_fetch, SyncResult};
use flashcard_core::{
    CardStore, CategorySummary, DbResult, HttpRemoteBank, ProgressModel, RemoteBank,
    RemoteQuestion, Session, SessionPlan, SessionSelector, SyncOutcome,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, warn};

type FetchReceiver = oneshot::Receiver<SyncResult<Vec<RemoteQuestion>>>;

pub struct App {
    pub store: CardStore,
    pub config: Config,
    pub view: View,
    pub summaries: Vec<CategorySummary>,
    pub selected: usize,
    pub session: Option<Session>,
    /// Category awaiting reset confirmation.
    pub confirm_reset: Option<String>,
    pub message: Option<String>,
    pub show_help: bool,
    selector: SessionSelector,
    remote: Option<HttpRemoteBank>,
    pending_sync: Option<FetchReceiver>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    CategoryList,
    Study,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let db_path = config.db_path();
        let store = CardStore::open(&db_path, &data_engineering_terms())?;
        info!(path = %db_path.display(), "card store opened");

        let remote = match config.remote_settings() {
            Some(settings) => match HttpRemoteBank::new(settings) {
                Ok(bank) => Some(bank),
                Err(e) => {
                    warn!(error = %e, "remote bank unavailable");
                    None
                }
            },
            None => None,
        };

        let mut app = Self::with_store(config, store)?;
        app.remote = remote;
        Ok(app)
    }

    pub fn with_store(config: Config, store: CardStore) -> DbResult<Self> {
        let selector = SessionSelector::new(config.study.mode);
        let mut app = Self {
            store,
            config,
            view: View::CategoryList,
            summaries: Vec::new(),
            selected: 0,
            session: None,
            confirm_reset: None,
            message: None,
            show_help: false,
            selector,
            remote: None,
            pending_sync: None,
        };
        app.refresh()?;
        Ok(app)
    }

    pub fn refresh(&mut self) -> DbResult<()> {
        self.summaries = self.store.list_category_summaries()?;
        if self.selected >= self.summaries.len() {
            self.selected = self.summaries.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn can_quit(&self) -> bool {
        self.session.is_none() && self.confirm_reset.is_none()
    }

    pub fn is_syncing(&self) -> bool {
        self.pending_sync.is_some()
    }

    pub fn selected_summary(&self) -> Option<&CategorySummary> {
        self.summaries.get(self.selected)
    }

    /// Summary of the category being studied.
    pub fn session_summary(&self) -> Option<&CategorySummary> {
        let session = self.session.as_ref()?;
        self.summaries.iter().find(|s| s.category == session.category)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.confirm_reset.is_some() {
            self.handle_confirm_key(key);
            return;
        }

        match self.view {
            View::CategoryList => self.handle_list_key(key),
            View::Study => self.handle_study_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.summaries.is_empty() {
                    self.selected = (self.selected + 1).min(self.summaries.len() - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.start_study(),
            KeyCode::Char('r') => {
                if let Some(summary) = self.selected_summary() {
                    self.confirm_reset = Some(summary.category.clone());
                }
            }
            KeyCode::Char('s') => self.start_sync(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_study_key(&mut self, key: KeyEvent) {
        let Some(session) = &mut self.session else {
            self.view = View::CategoryList;
            return;
        };

        if !session.flipped {
            match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => session.flip(),
                KeyCode::Char('q') | KeyCode::Esc => self.end_session(None),
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('2') => self.answer(true),
                KeyCode::Char('n') | KeyCode::Char('1') => self.answer(false),
                KeyCode::Char('q') | KeyCode::Esc => self.end_session(None),
                _ => {}
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(category) = self.confirm_reset.take() {
                    self.reset_category(&category);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.confirm_reset = None,
            _ => {}
        }
    }

    fn reset_category(&mut self, category: &str) {
        match self.store.reset_category(category) {
            Ok(_) => self.message = Some(format!("Progress reset for {}", category)),
            Err(e) => self.report_error("reset failed", e),
        }
        let _ = self.refresh();
    }

    pub fn start_study(&mut self) {
        let Some(category) = self.selected_summary().map(|s| s.category.clone()) else {
            return;
        };

        match self.selector.build_session(&self.store, &category) {
            Ok(SessionPlan::Ready(session)) => {
                info!(category = %category, cards = session.total_cards(), "session started");
                self.session = Some(session);
                self.view = View::Study;
            }
            Ok(SessionPlan::AllMastered) => {
                self.message = Some(
                    "All cards in this category are mastered! Press r to reset and practice again."
                        .to_string(),
                );
            }
            Ok(SessionPlan::NoCards) => {
                self.message = Some("No cards available for practice in this category.".to_string());
            }
            Err(e) => self.report_error("could not load cards", e),
        }
    }

    fn answer(&mut self, knew: bool) {
        let model = self.config.progress.model;
        let Some(session) = &mut self.session else { return };

        let answered = match session.answer(&self.store, knew, model) {
            Ok(answered) => answered,
            Err(e) => {
                self.report_error("could not save answer", e);
                return;
            }
        };
        let complete = session.is_complete();

        if let Some(answer) = answered {
            if model == ProgressModel::Tally {
                if let Some(remote_id) = answer.card.remote_id.as_deref() {
                    self.push_tally(answer.card.id, remote_id.to_string());
                }
            }
        }

        let _ = self.refresh();
        if complete {
            self.end_session(Some("Great job! You've completed this session.".to_string()));
        }
    }

    fn push_tally(&self, card_id: flashcard_core::CardId, remote_id: String) {
        let Some(bank) = self.remote.clone() else { return };
        let tally = match self.store.tally(card_id) {
            Ok(Some(tally)) => tally,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, card_id, "could not read tally");
                return;
            }
        };

        tokio::spawn(async move {
            if let Err(e) = bank.push_tally(&remote_id, tally).await {
                warn!(error = %e, remote_id = %remote_id, "tally push failed");
            }
        });
    }

    fn end_session(&mut self, message: Option<String>) {
        if let Some(session) = self.session.take() {
            info!(
                category = %session.category,
                answered = session.answered,
                correct = session.correct,
                "session ended"
            );
        }
        self.view = View::CategoryList;
        self.message = message;
        let _ = self.refresh();
    }

    /// Kick off a background fetch of the remote bank.
    pub fn start_sync(&mut self) {
        if self.pending_sync.is_some() {
            self.message = Some("Sync already in progress".to_string());
            return;
        }
        let Some(bank) = self.remote.clone() else {
            self.message = Some("Sync is not configured".to_string());
            return;
        };

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(bank.fetch().await);
        });
        self.pending_sync = Some(rx);
        self.message = Some("Syncing question bank...".to_string());
    }

    /// Apply a finished fetch. Deferred while a session is running so its
    /// cards are not replaced mid-pass.
    pub fn poll_sync(&mut self) {
        if self.session.is_some() {
            return;
        }
        let Some(rx) = self.pending_sync.as_mut() else { return };

        let fetched = match rx.try_recv() {
            Ok(fetched) => fetched,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => {
                self.pending_sync = None;
                self.message = Some("Sync stopped unexpectedly; showing local cards".to_string());
                return;
            }
        };
        self.pending_sync = None;
        self.finish_sync(fetched);
    }

    fn finish_sync(&mut self, fetched: SyncResult<Vec<RemoteQuestion>>) {
        match apply_fetch(&mut self.store, fetched) {
            Ok(SyncOutcome::Synced { imported }) => {
                self.message = Some(format!("Synced {} questions", imported));
            }
            Ok(SyncOutcome::Offline { local_cards, .. }) => {
                self.message = Some(format!(
                    "Could not reach the question bank; using {} local cards",
                    local_cards
                ));
            }
            Err(e) => self.report_error("sync import failed", e),
        }
        let _ = self.refresh();
    }

    fn report_error(&mut self, context: &str, err: flashcard_core::DbError) {
        warn!(error = %err, "{}", context);
        self.message = Some(format!("Error: {}: {}", context, err));
    }
}
