//! Navigation controller: the palette's open/closed state machine.
//!
//! All session state (query, visible list, active selection, the catalogue
//! and recents supplied at open) lives in a `Session` that exists only while
//! the palette is open. Events delivered while closed are ignored. Outbound
//! events queue up until the host drains them; every open session produces
//! exactly one [`PaletteEvent::Closed`], preceded by exactly one
//! [`PaletteEvent::CommandSelected`] when it ended by confirmation.

use std::sync::Arc;

use tracing::debug;

use crate::actions::Action;
use crate::catalogue::Catalogue;
use crate::filter::{rank, RankedList};
use crate::state::{Command, Direction};

/// Palette → host notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteEvent {
    CommandSelected(Command),
    Closed,
}

/// Snapshot of everything one ranking pass needs. Safe to run on any thread.
#[derive(Clone, Debug)]
pub struct RankRequest {
    generation: u64,
    query: String,
    catalogue: Arc<Catalogue>,
    recent_ids: Arc<[String]>,
}

impl RankRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn run(self) -> RankOutcome {
        let list = rank(&self.query, &self.catalogue, &self.recent_ids);
        RankOutcome {
            generation: self.generation,
            list,
        }
    }
}

/// Result of a [`RankRequest`], tagged with the generation that produced it.
#[derive(Clone, Debug)]
pub struct RankOutcome {
    generation: u64,
    list: RankedList,
}

impl RankOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Session {
    query: String,
    catalogue: Arc<Catalogue>,
    recent_ids: Arc<[String]>,
    visible: RankedList,
    /// List position of the active entry.
    active: Option<usize>,
    /// Id of the active command, used to keep the selection across re-ranking.
    active_id: Option<String>,
}

impl Session {
    fn active_command(&self) -> Option<&Command> {
        self.active
            .and_then(|pos| self.visible.get(pos))
            .and_then(|i| self.catalogue.command(i))
    }

    fn is_enabled_at(&self, pos: usize) -> bool {
        self.visible
            .get(pos)
            .and_then(|i| self.catalogue.command(i))
            .is_some_and(|c| !c.disabled)
    }

    fn first_enabled(&self) -> Option<usize> {
        (0..self.visible.len()).find(|&pos| self.is_enabled_at(pos))
    }

    fn last_enabled(&self) -> Option<usize> {
        (0..self.visible.len()).rev().find(|&pos| self.is_enabled_at(pos))
    }

    fn set_active(&mut self, pos: Option<usize>) {
        self.active = pos;
        self.active_id = self.active_command().map(|c| c.id.clone());
    }

    /// Install a freshly ranked list, keeping the previous selection by id
    /// when it is still present and selectable.
    fn install(&mut self, list: RankedList) {
        self.visible = list;
        let kept = self
            .active_id
            .as_deref()
            .and_then(|id| self.catalogue.index_of(id))
            .and_then(|i| self.visible.position_of(i))
            .filter(|&pos| self.is_enabled_at(pos));
        let next = kept.or_else(|| self.first_enabled());
        self.set_active(next);
    }

    fn step(&mut self, direction: Direction) {
        let len = self.visible.len();
        let next = match self.active {
            None => match direction {
                Direction::Next => self.first_enabled(),
                Direction::Previous => self.last_enabled(),
            },
            Some(current) => (1..=len)
                .map(|offset| match direction {
                    Direction::Next => (current + offset) % len,
                    Direction::Previous => (current + len - offset % len) % len,
                })
                .find(|&pos| self.is_enabled_at(pos)),
        };
        self.set_active(next);
    }
}

/// The palette state machine. One instance per palette; nothing is shared.
#[derive(Debug, Default)]
pub struct Palette {
    session: Option<Session>,
    /// Monotonic across sessions so results from an old session never match.
    generation: u64,
    /// Generation of the list currently shown.
    applied: u64,
    events: Vec<PaletteEvent>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Closed → Open. While already open this replaces the catalogue and
    /// recents and re-ranks with the current query.
    pub fn open(&mut self, catalogue: Arc<Catalogue>, recent_ids: Vec<String>) {
        if let Some(session) = self.session.as_mut() {
            debug!("open while open, refreshing catalogue");
            session.catalogue = catalogue;
            session.recent_ids = recent_ids.into();
            self.recompute();
            return;
        }
        debug!(commands = catalogue.len(), recents = recent_ids.len(), "palette opened");
        self.session = Some(Session {
            query: String::new(),
            catalogue,
            recent_ids: recent_ids.into(),
            visible: RankedList::default(),
            active: None,
            active_id: None,
        });
        self.recompute();
    }

    /// Host swapped the catalogue mid-session; the query text is kept.
    pub fn replace_catalogue(&mut self, catalogue: Arc<Catalogue>) {
        let Some(session) = self.session.as_mut() else {
            debug!("catalogue replacement while closed ignored");
            return;
        };
        session.catalogue = catalogue;
        self.recompute();
    }

    /// Escape: close without a selection.
    pub fn cancel(&mut self) {
        if self.session.take().is_none() {
            debug!("cancel while closed ignored");
            return;
        }
        debug!("palette cancelled");
        self.events.push(PaletteEvent::Closed);
    }

    /// Host-initiated close, e.g. on shutdown. Emits `Closed` like `cancel`.
    pub fn close(&mut self) {
        debug!("host closing palette");
        self.cancel();
    }

    /// Emit the active command and close. No-op without an active, enabled
    /// command. A query still ranking elsewhere is ranked here first, so the
    /// selection always comes from the list matching the typed query.
    pub fn confirm(&mut self) {
        if self.is_pending() {
            debug!(generation = self.generation, "confirm while ranking, settling inline");
            self.settle();
        }
        let Some(session) = self.session.as_ref() else {
            debug!("confirm while closed ignored");
            return;
        };
        let Some(command) = session.active_command().filter(|c| !c.disabled).cloned() else {
            debug!("confirm with nothing selectable ignored");
            return;
        };
        debug!(command_id = %command.id, "command selected");
        self.session = None;
        self.events.push(PaletteEvent::CommandSelected(command));
        self.events.push(PaletteEvent::Closed);
    }

    pub fn move_selection(&mut self, direction: Direction) {
        match self.session.as_mut() {
            Some(session) => session.step(direction),
            None => debug!(?direction, "move while closed ignored"),
        }
    }

    /// Replace the query and re-rank synchronously.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if let Some(request) = self.begin_query(query) {
            let outcome = request.run();
            self.apply(outcome);
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(query) = self.next_query(&Action::Char(c)) {
            self.set_query(query);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(query) = self.next_query(&Action::Backspace) {
            self.set_query(query);
        }
    }

    pub fn clear_query(&mut self) {
        if let Some(query) = self.next_query(&Action::ClearQuery) {
            self.set_query(query);
        }
    }

    /// Query text a query-editing action would produce, or `None` when the
    /// palette is closed, the action does not edit the query, or the edit
    /// changes nothing.
    pub fn next_query(&self, action: &Action) -> Option<String> {
        let current = &self.session.as_ref()?.query;
        match action {
            Action::Char(c) => {
                let mut query = current.clone();
                query.push(*c);
                Some(query)
            }
            Action::Backspace => {
                let mut query = current.clone();
                query.pop().map(|_| query)
            }
            Action::ClearQuery if !current.is_empty() => Some(String::new()),
            _ => None,
        }
    }

    /// Whether a query has been issued whose outcome is not shown yet.
    pub fn is_pending(&self) -> bool {
        self.session.is_some() && self.applied != self.generation
    }

    /// Rank the latest issued query inline, without starting a new generation.
    fn settle(&mut self) {
        if let Some(request) = self.request() {
            let outcome = request.run();
            self.apply(outcome);
        }
    }

    fn request(&self) -> Option<RankRequest> {
        let session = self.session.as_ref()?;
        Some(RankRequest {
            generation: self.generation,
            query: session.query.clone(),
            catalogue: Arc::clone(&session.catalogue),
            recent_ids: Arc::clone(&session.recent_ids),
        })
    }

    /// Record a new query and hand back the ranking work for it. The visible
    /// list is untouched until the outcome is [`apply`](Self::apply)'d; any
    /// request issued earlier becomes stale.
    pub fn begin_query(&mut self, query: impl Into<String>) -> Option<RankRequest> {
        let session = self.session.as_mut()?;
        session.query = query.into();
        self.generation += 1;
        self.request()
    }

    /// Install a ranking outcome. Returns `false` (and changes nothing) when
    /// the outcome is stale or the palette has closed since.
    pub fn apply(&mut self, outcome: RankOutcome) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!(generation = outcome.generation, "outcome after close dropped");
            return false;
        };
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                latest = self.generation,
                "stale outcome dropped"
            );
            return false;
        }
        session.install(outcome.list);
        self.applied = outcome.generation;
        true
    }

    fn recompute(&mut self) {
        let query = self.query().to_string();
        self.set_query(query);
    }

    /// Route a keyboard-level action. Returns whether the palette consumed it.
    pub fn handle(&mut self, action: &Action) -> bool {
        if !self.is_open() {
            return false;
        }
        match action {
            Action::Char(c) => self.push_char(*c),
            Action::Backspace => self.backspace(),
            Action::ClearQuery => self.clear_query(),
            Action::PaletteUp => self.move_selection(Direction::Previous),
            Action::PaletteDown => self.move_selection(Direction::Next),
            Action::PaletteSelect => self.confirm(),
            Action::PaletteHide => self.cancel(),
            _ => return false,
        }
        true
    }

    /// Take all queued outbound events, oldest first.
    pub fn drain_events(&mut self) -> Vec<PaletteEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn query(&self) -> &str {
        self.session.as_ref().map(|s| s.query.as_str()).unwrap_or("")
    }

    pub fn visible(&self) -> Option<&RankedList> {
        self.session.as_ref().map(|s| &s.visible)
    }

    pub fn catalogue(&self) -> Option<&Catalogue> {
        self.session.as_ref().map(|s| s.catalogue.as_ref())
    }

    /// List position of the active entry; `None` when closed or nothing is
    /// selectable.
    pub fn active_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.active)
    }

    pub fn active_command(&self) -> Option<&Command> {
        self.session.as_ref().and_then(|s| s.active_command())
    }

    /// Visible commands in navigation order (empty when closed).
    pub fn visible_commands(&self) -> Vec<&Command> {
        match self.session.as_ref() {
            Some(s) => s.visible.commands(&s.catalogue).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Group;

    fn catalogue(commands: Vec<Command>) -> Arc<Catalogue> {
        Arc::new(Catalogue::load(commands, vec![]))
    }

    fn labels(p: &Palette) -> Vec<String> {
        p.visible_commands().iter().map(|c| c.label.clone()).collect()
    }

    fn abc() -> Arc<Catalogue> {
        catalogue(vec![
            Command::new("a", "Alpha"),
            Command::new("b", "Beta"),
            Command::new("c", "Gamma"),
        ])
    }

    #[test]
    fn open_resets_query_and_selects_first() {
        let mut p = Palette::new();
        assert!(!p.is_open());
        p.open(abc(), vec![]);
        assert!(p.is_open());
        assert_eq!(p.query(), "");
        assert_eq!(p.active_index(), Some(0));
        assert_eq!(labels(&p), ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn open_skips_leading_disabled() {
        let mut p = Palette::new();
        p.open(
            catalogue(vec![
                Command::new("a", "Alpha").disabled(),
                Command::new("b", "Beta"),
            ]),
            vec![],
        );
        assert_eq!(p.active_index(), Some(1));
        assert_eq!(p.active_command().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn all_disabled_means_no_selection_and_confirm_noop() {
        let mut p = Palette::new();
        p.open(catalogue(vec![Command::new("a", "Alpha").disabled()]), vec![]);
        assert_eq!(p.active_index(), None);
        p.move_selection(Direction::Next);
        assert_eq!(p.active_index(), None);
        p.confirm();
        assert!(p.is_open());
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn empty_catalogue_has_no_selection() {
        let mut p = Palette::new();
        p.open(catalogue(vec![]), vec![]);
        assert_eq!(p.active_index(), None);
        assert!(p.visible().is_some_and(|v| v.is_empty()));
    }

    #[test]
    fn movement_wraps_and_skips_disabled() {
        let mut p = Palette::new();
        p.open(
            catalogue(vec![
                Command::new("a", "Alpha"),
                Command::new("b", "Beta").disabled(),
                Command::new("c", "Gamma"),
            ]),
            vec![],
        );
        p.move_selection(Direction::Next);
        assert_eq!(p.active_index(), Some(2));
        p.move_selection(Direction::Next);
        assert_eq!(p.active_index(), Some(0));
        p.move_selection(Direction::Previous);
        assert_eq!(p.active_index(), Some(2));
        p.move_selection(Direction::Previous);
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn single_enabled_item_stays_put() {
        let mut p = Palette::new();
        p.open(catalogue(vec![Command::new("a", "Alpha")]), vec![]);
        p.move_selection(Direction::Next);
        assert_eq!(p.active_index(), Some(0));
        p.move_selection(Direction::Previous);
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn confirm_emits_selection_then_close() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.move_selection(Direction::Next);
        p.confirm();
        assert!(!p.is_open());
        let events = p.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], PaletteEvent::CommandSelected(c) if c.id == "b"));
        assert_eq!(events[1], PaletteEvent::Closed);
    }

    #[test]
    fn cancel_emits_only_close_and_later_events_are_ignored() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.cancel();
        p.confirm();
        p.cancel();
        p.move_selection(Direction::Next);
        p.set_query("al");
        assert_eq!(p.drain_events(), vec![PaletteEvent::Closed]);
        assert_eq!(p.active_index(), None);
        assert_eq!(p.query(), "");
    }

    #[test]
    fn selection_survives_refiltering_by_id() {
        let mut p = Palette::new();
        p.open(
            catalogue(vec![
                Command::new("a", "Alpha"),
                Command::new("b", "Beta"),
                Command::new("c", "Alphabet Soup"),
            ]),
            vec![],
        );
        p.move_selection(Direction::Next);
        p.move_selection(Direction::Next);
        assert_eq!(p.active_command().map(|c| c.id.as_str()), Some("c"));
        p.set_query("alph");
        assert_eq!(labels(&p), ["Alpha", "Alphabet Soup"]);
        assert_eq!(p.active_index(), Some(1));
        assert_eq!(p.active_command().map(|c| c.id.as_str()), Some("c"));
    }

    #[test]
    fn lost_selection_falls_back_to_first_enabled() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.move_selection(Direction::Next);
        p.set_query("gam");
        assert_eq!(p.active_command().map(|c| c.id.as_str()), Some("c"));
        p.set_query("zzz");
        assert_eq!(p.active_index(), None);
        p.set_query("");
        assert_eq!(p.active_index(), Some(0));
    }

    #[test]
    fn query_editing_helpers() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.push_char('b');
        p.push_char('e');
        assert_eq!(p.query(), "be");
        assert_eq!(labels(&p), ["Beta"]);
        p.backspace();
        assert_eq!(p.query(), "b");
        p.clear_query();
        assert_eq!(p.query(), "");
        p.backspace();
        assert_eq!(p.query(), "");
        assert_eq!(labels(&p).len(), 3);
    }

    #[test]
    fn replacing_catalogue_keeps_query_and_selection() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.set_query("a");
        p.move_selection(Direction::Next);
        let selected = p.active_command().map(|c| c.id.clone());
        p.replace_catalogue(Arc::new(Catalogue::load(
            vec![
                Command::new("z", "Zeta").with_group("g"),
                Command::new("a", "Alpha"),
                Command::new("b", "Beta"),
                Command::new("c", "Gamma"),
            ],
            vec![Group::new("g", "G")],
        )));
        assert_eq!(p.query(), "a");
        assert_eq!(p.active_command().map(|c| c.id.clone()), selected);

        // the kept command turns disabled: fall back to the first enabled entry
        p.replace_catalogue(Arc::new(Catalogue::load(
            vec![
                Command::new("a", "Alpha").disabled(),
                Command::new("b", "Beta").disabled(),
                Command::new("c", "Gamma"),
            ],
            vec![],
        )));
        assert_eq!(labels(&p), ["Alpha", "Beta", "Gamma"]);
        assert_eq!(p.active_command().map(|c| c.id.as_str()), Some("c"));
    }

    #[test]
    fn reopen_while_open_refreshes_without_resetting_query() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        p.set_query("beta");
        p.open(abc(), vec!["c".to_string()]);
        assert_eq!(p.query(), "beta");
        assert!(p.drain_events().is_empty());
    }

    #[test]
    fn stale_outcomes_never_overwrite_newer_query() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        let old = p.begin_query("al").unwrap();
        let new = p.begin_query("gam").unwrap();
        assert!(new.generation() > old.generation());
        assert!(p.apply(new.run()));
        assert!(!p.apply(old.run()));
        assert_eq!(labels(&p), ["Gamma"]);
    }

    #[test]
    fn outcome_from_previous_session_is_dropped() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        let pending = p.begin_query("al").unwrap();
        p.cancel();
        p.open(abc(), vec![]);
        assert!(!p.apply(pending.run()));
        assert_eq!(labels(&p).len(), 3);
    }

    #[test]
    fn confirm_while_ranking_selects_from_the_typed_query() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        assert!(!p.is_pending());
        let _in_flight = p.begin_query("bet").unwrap();
        assert!(p.is_pending());
        p.confirm();
        let events = p.drain_events();
        assert!(matches!(&events[0], PaletteEvent::CommandSelected(c) if c.id == "b"));
        assert_eq!(events[1], PaletteEvent::Closed);
    }

    #[test]
    fn confirm_while_ranking_a_query_with_no_matches_is_a_noop() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        let _in_flight = p.begin_query("zzz").unwrap();
        p.confirm();
        assert!(p.is_open());
        assert!(!p.is_pending());
        assert!(p.drain_events().is_empty());
        assert_eq!(p.active_index(), None);
    }

    #[test]
    fn late_outcome_after_inline_settle_is_harmless() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        let in_flight = p.begin_query("gam").unwrap();
        p.confirm();
        assert!(!p.apply(in_flight.run()));
        assert_eq!(p.drain_events().len(), 2);
    }

    #[test]
    fn next_query_reports_only_real_edits() {
        let mut p = Palette::new();
        assert_eq!(p.next_query(&Action::Char('a')), None);
        p.open(abc(), vec![]);
        assert_eq!(p.next_query(&Action::Char('a')).as_deref(), Some("a"));
        assert_eq!(p.next_query(&Action::Backspace), None);
        assert_eq!(p.next_query(&Action::ClearQuery), None);
        assert_eq!(p.next_query(&Action::PaletteDown), None);
        p.set_query("ab");
        assert_eq!(p.next_query(&Action::Backspace).as_deref(), Some("a"));
        assert_eq!(p.next_query(&Action::ClearQuery).as_deref(), Some(""));
    }

    #[test]
    fn pending_request_leaves_visible_list_alone() {
        let mut p = Palette::new();
        p.open(abc(), vec![]);
        let _pending = p.begin_query("be");
        assert_eq!(p.query(), "be");
        assert_eq!(labels(&p).len(), 3);
    }

    #[test]
    fn handle_routes_palette_actions_only_when_open() {
        let mut p = Palette::new();
        assert!(!p.handle(&Action::PaletteDown));
        p.open(abc(), vec![]);
        assert!(p.handle(&Action::PaletteDown));
        assert_eq!(p.active_index(), Some(1));
        assert!(p.handle(&Action::Char('g')));
        assert_eq!(p.query(), "g");
        assert!(!p.handle(&Action::Quit));
        assert!(p.handle(&Action::PaletteHide));
        assert!(!p.is_open());
    }
}
