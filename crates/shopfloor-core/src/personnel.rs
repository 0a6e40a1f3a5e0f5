//! Personnel directory boundary.
//!
//! Whether a worker holds a position and whether a workplace accepts a
//! position are answered by the personnel service, an external
//! collaborator. The engine only asks; it never mutates personnel data.

use std::collections::{HashMap, HashSet};

use crate::error::Result;

/// Read-only view of the personnel master data.
pub trait PersonnelDirectory: Send + Sync {
    /// Whether the worker holds the given position.
    fn holds_position(&self, worker: &str, position: &str) -> Result<bool>;

    /// Whether the workplace accepts workers of the given position.
    fn workplace_accepts(&self, workplace: &str, position: &str) -> Result<bool>;
}

/// Directory that accepts every assignment. Used when no personnel
/// service is wired up, e.g. the standalone CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRoster;

impl PersonnelDirectory for OpenRoster {
    fn holds_position(&self, _worker: &str, _position: &str) -> Result<bool> {
        Ok(true)
    }

    fn workplace_accepts(&self, _workplace: &str, _position: &str) -> Result<bool> {
        Ok(true)
    }
}

/// In-memory roster for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    positions_by_worker: HashMap<String, HashSet<String>>,
    positions_by_workplace: HashMap<String, HashSet<String>>,
}

impl StaticRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a worker as holding a position.
    pub fn with_worker(mut self, worker: &str, position: &str) -> Self {
        self.positions_by_worker
            .entry(worker.to_string())
            .or_default()
            .insert(position.to_string());
        self
    }

    /// Registers a workplace as accepting a position.
    pub fn with_workplace(mut self, workplace: &str, position: &str) -> Self {
        self.positions_by_workplace
            .entry(workplace.to_string())
            .or_default()
            .insert(position.to_string());
        self
    }
}

impl PersonnelDirectory for StaticRoster {
    fn holds_position(&self, worker: &str, position: &str) -> Result<bool> {
        Ok(self
            .positions_by_worker
            .get(worker)
            .is_some_and(|positions| positions.contains(position)))
    }

    fn workplace_accepts(&self, workplace: &str, position: &str) -> Result<bool> {
        Ok(self
            .positions_by_workplace
            .get(workplace)
            .is_some_and(|positions| positions.contains(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_roster_accepts_everything() {
        let roster = OpenRoster;
        assert!(roster.holds_position("anyone", "anything").unwrap());
        assert!(roster.workplace_accepts("anywhere", "anything").unwrap());
    }

    #[test]
    fn static_roster_checks_membership() {
        let roster = StaticRoster::new()
            .with_worker("ivanov", "printer")
            .with_workplace("press-1", "printer");

        assert!(roster.holds_position("ivanov", "printer").unwrap());
        assert!(!roster.holds_position("ivanov", "cutter").unwrap());
        assert!(!roster.holds_position("petrov", "printer").unwrap());
        assert!(roster.workplace_accepts("press-1", "printer").unwrap());
        assert!(!roster.workplace_accepts("press-1", "gluer").unwrap());
    }
}
