use serde::{Deserialize, Serialize};

use crate::models::VictimCategory;

/// How many deaths of one kind it takes to label an incident with that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictimRule {
    /// More than one death of the kind (`> 1`). A single pedestrian death
    /// therefore falls through to `Both`.
    Literal,
    /// At least one death of the kind.
    AtLeastOne,
}

impl VictimRule {
    fn threshold(self) -> u32 {
        match self {
            VictimRule::Literal => 1,
            VictimRule::AtLeastOne => 0,
        }
    }
}

/// Labels an incident by who was killed.
///
/// | Condition                                   | Category   |
/// |---------------------------------------------|------------|
/// | pedestrians > t and cyclists == 0           | Pedestrian |
/// | cyclists > t and pedestrians == 0           | Cyclist    |
/// | anything else                               | Both       |
pub fn categorize(pedestrians: u32, cyclists: u32, rule: VictimRule) -> VictimCategory {
    let t = rule.threshold();
    match (pedestrians, cyclists) {
        (p, 0) if p > t => VictimCategory::Pedestrian,
        (0, c) if c > t => VictimCategory::Cyclist,
        _ => VictimCategory::Both,
    }
}
