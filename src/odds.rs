use crate::campaign::CampaignOutcome;
use crate::util::{OutcomeMap, Prob, Troops};

/// Odds that an invasion succeeds: total mass of outcomes with the
/// defender at or below the goal threshold.
pub fn sum_invasion_odds(outcomes: &OutcomeMap, goal: Troops) -> Prob {
    outcomes
        .iter()
        .filter(|((_, d), _)| *d <= goal)
        .map(|(_, p)| p)
        .sum()
}

/// Odds that every territory in a campaign falls.
pub fn sum_campaign_odds(outcome: &CampaignOutcome) -> Prob {
    outcome.successes.values().sum()
}
