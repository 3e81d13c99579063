use std::collections::BTreeMap;

use thiserror::Error;

pub type Troops = u32;
pub type Prob = f64;
pub type OutcomeMap = BTreeMap<(Troops, Troops), Prob>;
pub type ForceMap = BTreeMap<Troops, Prob>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidScenario {
    #[error("attackers must be at least 1")]
    NoAttackers,
    #[error("defenders must be at least 1")]
    NoDefenders,
    #[error("retreat threshold {retreat} is not below the attacker count {attackers}")]
    RetreatAboveAttackers { retreat: Troops, attackers: Troops },
    #[error("goal threshold {goal} is not below the defender count {defenders}")]
    GoalAboveDefenders { goal: Troops, defenders: Troops },
    #[error("attacker distribution is empty")]
    EmptySpread,
    #[error("attacker distribution has a count below the retreat threshold {retreat}")]
    SpreadBelowRetreat { retreat: Troops },
}

pub type ScenarioResult<T> = Result<T, InvalidScenario>;

#[inline]
pub fn odds_map() -> OutcomeMap {
    OutcomeMap::new()
}
