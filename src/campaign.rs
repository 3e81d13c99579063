use bon::Builder;
use tracing::debug;

use crate::invasion::Invasion;
use crate::util::{odds_map, ForceMap, InvalidScenario, OutcomeMap, ScenarioResult, Troops};

/// Outcome of a campaign: where the attack can stall, and what survives
/// if it goes all the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignOutcome {
    /// Failure outcomes per target territory, in attack order.
    pub failures: Vec<OutcomeMap>,
    /// Distribution over surviving attacker counts after the last conquest.
    pub successes: ForceMap,
}

/// A chain of invasions against territories in sequence. Surviving
/// attackers carry forward, minus one garrison unit per conquest.
#[derive(Builder, Debug, Clone)]
#[builder(start_fn(name = "new"), finish_fn(vis = ""))]
pub struct Campaign {
    #[builder(start_fn)]
    attackers: Troops,
    #[builder(start_fn)]
    targets: Vec<Troops>,
    #[builder(default = 0)]
    retreat: Troops,
}

impl Campaign {
    pub fn eval(&self) -> ScenarioResult<CampaignOutcome> {
        self.validate()?;

        let mut failures = vec![odds_map(); self.targets.len()];
        let mut advancing = ForceMap::from([(self.attackers, 1.0)]);

        for (origin, &defenders) in self.targets.iter().enumerate() {
            // Mass sitting exactly at the retreat threshold has no spare
            // unit to garrison the origin territory; it cannot attack.
            if let Some(stranded) = advancing.remove(&self.retreat) {
                failures[origin].insert((self.retreat, defenders), stranded);
            }
            if advancing.is_empty() {
                debug!(territory = origin, "campaign exhausted before its last target");
                break;
            }

            // One unit stays behind to hold the territory just taken.
            let forces: ForceMap = advancing.iter().map(|(&a, &p)| (a - 1, p)).collect();

            let results = Invasion::new(forces, defenders)
                .retreat(self.retreat)
                .eval()?;

            advancing.clear();
            for ((a, d), p) in results {
                if d == 0 {
                    *advancing.entry(a).or_insert(0.0) += p;
                } else {
                    // The garrison unit rejoins the survivors on a failure.
                    *failures[origin].entry((a + 1, d)).or_insert(0.0) += p;
                }
            }
        }

        Ok(CampaignOutcome {
            failures,
            successes: advancing,
        })
    }

    fn validate(&self) -> ScenarioResult<()> {
        if self.attackers == 0 {
            return Err(InvalidScenario::NoAttackers);
        }
        if self.retreat >= self.attackers {
            return Err(InvalidScenario::RetreatAboveAttackers {
                retreat: self.retreat,
                attackers: self.attackers,
            });
        }
        if self.targets.iter().any(|&d| d == 0) {
            return Err(InvalidScenario::NoDefenders);
        }
        Ok(())
    }
}

impl<S> CampaignBuilder<S>
where
    S: campaign_builder::State,
    S: campaign_builder::IsComplete,
{
    pub fn eval(self) -> ScenarioResult<CampaignOutcome> {
        self.build().eval()
    }
}
