//! Terminal host: owns the palette, the catalogue it opens with, and the
//! recents list it re-supplies on every open.

use std::sync::Arc;

use tracing::{debug, info};

use crate::actions::Action;
use crate::catalogue::Catalogue;
use crate::config::PaletteConfig;
use crate::controller::{Palette, PaletteEvent};
use crate::offload::BackgroundRanker;

const MAX_RECENTS: usize = 8;

pub struct App {
    pub palette: Palette,
    pub config: PaletteConfig,
    catalogue: Arc<Catalogue>,
    recent_ids: Vec<String>,
    ranker: Option<BackgroundRanker>,
    /// Labels of executed commands, newest last.
    pub executed: Vec<String>,
    pub should_quit: bool,
    /// For spinner animation (incremented each tick).
    pub tick: usize,
}

impl App {
    pub fn new(catalogue: Arc<Catalogue>, recent_ids: Vec<String>, config: PaletteConfig) -> Self {
        Self {
            palette: Palette::new(),
            config,
            catalogue,
            recent_ids,
            ranker: None,
            executed: Vec::new(),
            should_quit: false,
            tick: 0,
        }
    }

    /// Rank off the UI thread once the catalogue reaches the configured size.
    pub fn with_background_ranker(mut self, ranker: BackgroundRanker) -> Self {
        self.ranker = Some(ranker);
        self
    }

    pub fn recent_ids(&self) -> &[String] {
        &self.recent_ids
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Swap the catalogue; an open palette re-ranks in place.
    pub fn set_catalogue(&mut self, catalogue: Arc<Catalogue>) {
        self.catalogue = Arc::clone(&catalogue);
        self.palette.replace_catalogue(catalogue);
    }

    pub fn is_ranking(&self) -> bool {
        self.ranker.as_ref().is_some_and(|r| r.is_busy())
    }

    fn ranks_in_background(&self) -> bool {
        self.ranker.is_some() && self.catalogue.len() >= self.config.background_threshold
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.palette.close();
                self.should_quit = true;
            }
            Action::PaletteShow => {
                self.palette
                    .open(Arc::clone(&self.catalogue), self.recent_ids.clone());
            }
            Action::Char(_) | Action::Backspace | Action::ClearQuery
                if self.palette.is_open() && self.ranks_in_background() =>
            {
                let Some(query) = self.palette.next_query(&action) else {
                    debug!(action = ?action, "query unchanged, nothing to rank");
                    return;
                };
                if let (Some(request), Some(ranker)) =
                    (self.palette.begin_query(query), self.ranker.as_mut())
                {
                    ranker.submit(request);
                }
            }
            other => {
                if !self.palette.handle(&other) {
                    debug!(action = ?other, "action not handled");
                }
            }
        }
        self.drain_palette_events();
    }

    /// Apply any background ranking results that have arrived.
    pub fn poll_results(&mut self) {
        let Some(ranker) = self.ranker.as_mut() else {
            return;
        };
        while let Some(outcome) = ranker.try_recv() {
            self.palette.apply(outcome);
        }
    }

    fn drain_palette_events(&mut self) {
        for event in self.palette.drain_events() {
            match event {
                PaletteEvent::CommandSelected(command) => {
                    info!(command_id = %command.id, "executing command");
                    self.remember(&command.id);
                    self.executed.push(command.label);
                }
                PaletteEvent::Closed => debug!("palette closed"),
            }
        }
    }

    fn remember(&mut self, id: &str) {
        self.recent_ids.retain(|r| r != id);
        self.recent_ids.insert(0, id.to_string());
        self.recent_ids.truncate(MAX_RECENTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Command;

    fn app() -> App {
        let catalogue = Catalogue::load(
            vec![
                Command::new("a", "Alpha"),
                Command::new("b", "Beta"),
                Command::new("c", "Gamma"),
            ],
            vec![],
        );
        App::new(Arc::new(catalogue), vec![], PaletteConfig::default())
    }

    #[test]
    fn selecting_executes_and_promotes_to_recent() {
        let mut app = app();
        app.dispatch(Action::PaletteShow);
        app.dispatch(Action::PaletteDown);
        app.dispatch(Action::PaletteSelect);
        assert!(!app.palette.is_open());
        assert_eq!(app.executed, vec!["Beta".to_string()]);
        assert_eq!(app.recent_ids(), ["b".to_string()]);

        app.dispatch(Action::PaletteShow);
        let first = app.palette.visible_commands().first().map(|c| c.id.clone());
        assert_eq!(first.as_deref(), Some("b"));
    }

    #[test]
    fn recents_deduplicate_and_cap() {
        let mut app = app();
        for id in ["a", "b", "a"] {
            app.remember(id);
        }
        assert_eq!(app.recent_ids(), ["a".to_string(), "b".to_string()]);
        for i in 0..20 {
            app.remember(&format!("x{i}"));
        }
        assert_eq!(app.recent_ids().len(), MAX_RECENTS);
    }

    #[test]
    fn quit_only_sets_flag() {
        let mut app = app();
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
        assert!(app.executed.is_empty());
    }

    #[test]
    fn quit_closes_an_open_palette_without_executing() {
        let mut app = app();
        app.dispatch(Action::PaletteShow);
        app.dispatch(Action::PaletteDown);
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
        assert!(!app.palette.is_open());
        assert!(app.executed.is_empty());
        assert!(app.palette.drain_events().is_empty());
    }

    #[test]
    fn typing_filters_synchronously_without_ranker() {
        let mut app = app();
        app.dispatch(Action::PaletteShow);
        app.dispatch(Action::Char('g'));
        assert_eq!(app.palette.visible().map(|v| v.len()), Some(1));
        app.dispatch(Action::PaletteHide);
        assert!(app.executed.is_empty());
        assert!(app.recent_ids().is_empty());
    }

    fn background_app() -> App {
        let config = PaletteConfig {
            background_threshold: 1,
            ..PaletteConfig::default()
        };
        let catalogue = Catalogue::load(
            vec![Command::new("a", "Alpha"), Command::new("b", "Beta")],
            vec![],
        );
        App::new(Arc::new(catalogue), vec![], config)
            .with_background_ranker(BackgroundRanker::new(tokio::runtime::Handle::current()))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn large_catalogues_rank_in_background() {
        let mut app = background_app();
        app.dispatch(Action::PaletteShow);
        app.dispatch(Action::Char('b'));
        assert_eq!(app.palette.query(), "b");

        for _ in 0..200 {
            app.poll_results();
            if app.palette.visible().map(|v| v.len()) == Some(1) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(app.palette.visible().map(|v| v.len()), Some(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn enter_before_results_arrive_runs_the_typed_query() {
        let mut app = background_app();
        app.dispatch(Action::PaletteShow);
        for c in "bet".chars() {
            app.dispatch(Action::Char(c));
        }
        app.dispatch(Action::PaletteSelect);
        assert_eq!(app.executed, vec!["Beta".to_string()]);
        assert!(!app.palette.is_open());

        // late outcomes land on a closed palette
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        app.poll_results();
        assert!(!app.palette.is_open());
        assert_eq!(app.executed, vec!["Beta".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn edits_that_change_nothing_submit_no_ranking() {
        let mut app = background_app();
        app.dispatch(Action::PaletteShow);
        app.dispatch(Action::Backspace);
        app.dispatch(Action::ClearQuery);
        assert!(!app.is_ranking());
        assert!(!app.palette.is_pending());
        assert_eq!(app.palette.query(), "");
    }
}
