//! Active-borough filter for the rolling chart.
//!
//! The filter only re-selects rows from an already computed snapshot. It
//! never triggers a new aggregation.

use std::collections::BTreeSet;
use tracing::debug;

use crate::aggregators::types::RollingPoint;
use crate::models::Borough;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCommand {
    SetActive(Vec<Borough>),
    Toggle(Borough),
    All,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoroughSelection {
    active: BTreeSet<Borough>,
}

impl Default for BoroughSelection {
    fn default() -> Self {
        BoroughSelection {
            active: Borough::ALL.into_iter().collect(),
        }
    }
}

impl BoroughSelection {
    pub fn apply_command(&mut self, command: SelectionCommand) {
        match command {
            SelectionCommand::SetActive(boroughs) => self.active = boroughs.into_iter().collect(),
            SelectionCommand::Toggle(borough) => {
                if !self.active.remove(&borough) {
                    self.active.insert(borough);
                }
            }
            SelectionCommand::All => self.active = Borough::ALL.into_iter().collect(),
            SelectionCommand::Clear => self.active.clear(),
        }
        debug!(active = ?self.active, "Borough selection updated");
    }

    pub fn is_active(&self, borough: Borough) -> bool {
        self.active.contains(&borough)
    }

    pub fn active(&self) -> impl Iterator<Item = Borough> + '_ {
        self.active.iter().copied()
    }

    pub fn apply<'a>(&self, points: &'a [RollingPoint]) -> Vec<&'a RollingPoint> {
        points.iter().filter(|p| self.is_active(p.borough)).collect()
    }
}
