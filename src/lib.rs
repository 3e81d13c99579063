//! Exact outcome probabilities for Risk battles, invasions, and
//! campaigns, computed over the full state space rather than sampled.

mod battle;
mod board;
mod campaign;
mod invasion;
mod odds;
mod util;

pub use battle::{resolve_battle, Casualties};
pub use board::{Board, Continent, Territory};
pub use campaign::{Campaign, CampaignBuilder, CampaignOutcome};
pub use invasion::{Attackers, Invasion, InvasionBuilder};
pub use odds::{sum_campaign_odds, sum_invasion_odds};
pub use util::{ForceMap, InvalidScenario, OutcomeMap, Prob, ScenarioResult, Troops};

/// Tolerance for comparing probability totals accumulated across many
/// rounds of floating-point addition.
pub const MASS_TOLERANCE: f64 = 1e-9;
