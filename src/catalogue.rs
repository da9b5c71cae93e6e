//! Catalogue store: the commands and groups supplied for one palette session.
//!
//! Loading never fails. Host misconfiguration is normalized away:
//! a repeated command id keeps its first occurrence, a repeated group id keeps
//! its first declaration, and a command pointing at an unknown group is listed
//! as ungrouped. Each normalization is recorded in the [`LoadReport`] and
//! logged at `warn`.

use std::collections::HashMap;

use tracing::warn;

use crate::state::{Command, Group};

/// Lowercased copies of the searchable fields, built once per load.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchKeys {
    pub label: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl SearchKeys {
    fn from_command(cmd: &Command) -> Self {
        Self {
            label: cmd.label.to_lowercase(),
            description: cmd.description.as_ref().map(|d| d.to_lowercase()),
            keywords: cmd.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Normalizations applied while loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Command ids seen more than once; later occurrences were dropped.
    pub duplicate_commands: Vec<String>,
    /// Group ids declared more than once; later declarations were dropped.
    pub duplicate_groups: Vec<String>,
    /// `(command id, group id)` pairs whose group does not exist.
    pub dangling_groups: Vec<(String, String)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_commands.is_empty()
            && self.duplicate_groups.is_empty()
            && self.dangling_groups.is_empty()
    }
}

/// Immutable-per-session set of commands and groups.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    commands: Vec<Command>,
    groups: Vec<Group>,
    by_id: HashMap<String, usize>,
    /// Resolved group position per command; `None` is the ungrouped bucket.
    group_of: Vec<Option<usize>>,
    keys: Vec<SearchKeys>,
}

impl Catalogue {
    /// Load and normalize, logging any anomalies.
    pub fn load(commands: Vec<Command>, groups: Vec<Group>) -> Self {
        Self::load_with_report(commands, groups).0
    }

    pub fn load_with_report(commands: Vec<Command>, groups: Vec<Group>) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let mut group_pos: HashMap<String, usize> = HashMap::with_capacity(groups.len());
        let mut kept_groups = Vec::with_capacity(groups.len());
        for group in groups {
            if group_pos.contains_key(&group.id) {
                warn!(group_id = %group.id, "duplicate group id, keeping first declaration");
                report.duplicate_groups.push(group.id);
                continue;
            }
            group_pos.insert(group.id.clone(), kept_groups.len());
            kept_groups.push(group);
        }

        let mut by_id = HashMap::with_capacity(commands.len());
        let mut kept = Vec::with_capacity(commands.len());
        let mut group_of = Vec::with_capacity(commands.len());
        let mut keys = Vec::with_capacity(commands.len());
        for cmd in commands {
            if by_id.contains_key(&cmd.id) {
                warn!(command_id = %cmd.id, "duplicate command id, keeping first occurrence");
                report.duplicate_commands.push(cmd.id);
                continue;
            }
            let resolved = match cmd.group_id.as_deref() {
                None => None,
                Some(gid) => match group_pos.get(gid) {
                    Some(&pos) => Some(pos),
                    None => {
                        warn!(command_id = %cmd.id, group_id = gid, "unknown group, treating command as ungrouped");
                        report.dangling_groups.push((cmd.id.clone(), gid.to_string()));
                        None
                    }
                },
            };
            by_id.insert(cmd.id.clone(), kept.len());
            group_of.push(resolved);
            keys.push(SearchKeys::from_command(&cmd));
            kept.push(cmd);
        }

        let catalogue = Self {
            commands: kept,
            groups: kept_groups,
            by_id,
            group_of,
            keys,
        };
        (catalogue, report)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Lookup by command id.
    pub fn get(&self, id: &str) -> Option<&Command> {
        self.index_of(id).map(|i| &self.commands[i])
    }

    /// Catalogue position of a command id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Command at a catalogue position.
    pub fn command(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// Commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Resolved group position of the command at `index`, after normalization.
    pub fn group_position(&self, index: usize) -> Option<usize> {
        self.group_of.get(index).copied().flatten()
    }

    pub(crate) fn search_keys(&self, index: usize) -> &SearchKeys {
        &self.keys[index]
    }
}
