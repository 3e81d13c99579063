use bon::Builder;
use tracing::{debug, trace};

use crate::battle::resolve_battle;
use crate::util::{odds_map, ForceMap, InvalidScenario, OutcomeMap, ScenarioResult, Troops};

/// Starting attacker strength: a single count, or a distribution over
/// counts when the invasion is chained from an earlier conquest.
#[derive(Debug, Clone, PartialEq)]
pub enum Attackers {
    Exactly(Troops),
    Spread(ForceMap),
}

impl From<Troops> for Attackers {
    fn from(value: Troops) -> Self {
        Self::Exactly(value)
    }
}

impl From<ForceMap> for Attackers {
    fn from(value: ForceMap) -> Self {
        Self::Spread(value)
    }
}

/// An invasion scenario: battle rounds continue until the attacker falls
/// to the retreat threshold or the defender falls to the goal threshold.
#[derive(Builder, Debug, Clone)]
#[builder(start_fn(name = "new"), finish_fn(vis = ""))]
pub struct Invasion {
    #[builder(start_fn, into)]
    attackers: Attackers,
    #[builder(start_fn)]
    defenders: Troops,
    #[builder(default = 0)]
    retreat: Troops,
    #[builder(default = 0)]
    goal: Troops,
}

impl Invasion {
    /// All terminal states of the invasion, keyed `(attackers, defenders)`,
    /// and their odds. The returned masses sum to the seeded mass.
    pub fn eval(&self) -> ScenarioResult<OutcomeMap> {
        let max_attackers = self.validate()?;

        let x_max = (max_attackers - self.retreat) as usize;
        let y_max = (self.defenders - self.goal) as usize;

        // grid[x][y] holds the mass of the state (retreat + x, goal + y).
        let mut grid = vec![vec![0f64; y_max + 1]; x_max + 1];
        match &self.attackers {
            Attackers::Exactly(_) => grid[x_max][y_max] = 1.0,
            Attackers::Spread(spread) => {
                for (&a, &p) in spread {
                    grid[(a - self.retreat) as usize][y_max] += p;
                }
            }
        }
        trace!(x_max, y_max, "seeded invasion grid");

        let mut outcomes = odds_map();

        // Sweep diagonals from the far corner toward the origin. Every
        // battle round removes at least one unit from at least one side,
        // so all successors of a cell sit on a strictly lower diagonal:
        // by the time a cell is visited, no more mass can arrive in it.
        for dist in (0..=x_max + y_max).rev() {
            let x_lo = dist.saturating_sub(y_max);
            let x_hi = dist.min(x_max);
            for x in x_lo..=x_hi {
                let y = dist - x;
                let mass = grid[x][y];
                if mass == 0.0 {
                    continue;
                }

                let attackers = self.retreat + x as Troops;
                let defenders = self.goal + y as Troops;

                // One side at its threshold: the invasion ends here.
                if x == 0 || y == 0 {
                    *outcomes.entry((attackers, defenders)).or_insert(0.0) += mass;
                    continue;
                }

                for (a, d, p) in resolve_battle(attackers, defenders, mass) {
                    // A two-unit loss can overshoot a threshold; such a
                    // state has no grid slot and is terminal outright.
                    if a < self.retreat || d < self.goal {
                        *outcomes.entry((a, d)).or_insert(0.0) += p;
                    } else {
                        grid[(a - self.retreat) as usize][(d - self.goal) as usize] += p;
                    }
                }
            }
        }

        debug!(outcomes = outcomes.len(), "invasion evaluated");
        Ok(outcomes)
    }

    fn validate(&self) -> ScenarioResult<Troops> {
        if self.defenders == 0 {
            return Err(InvalidScenario::NoDefenders);
        }
        if self.goal >= self.defenders {
            return Err(InvalidScenario::GoalAboveDefenders {
                goal: self.goal,
                defenders: self.defenders,
            });
        }
        match &self.attackers {
            Attackers::Exactly(n) => {
                if *n == 0 {
                    return Err(InvalidScenario::NoAttackers);
                }
                if self.retreat >= *n {
                    return Err(InvalidScenario::RetreatAboveAttackers {
                        retreat: self.retreat,
                        attackers: *n,
                    });
                }
                Ok(*n)
            }
            Attackers::Spread(spread) => {
                let (Some((&min, _)), Some((&max, _))) =
                    (spread.first_key_value(), spread.last_key_value())
                else {
                    return Err(InvalidScenario::EmptySpread);
                };
                if min < self.retreat {
                    return Err(InvalidScenario::SpreadBelowRetreat {
                        retreat: self.retreat,
                    });
                }
                Ok(max)
            }
        }
    }
}

impl<S> InvasionBuilder<S>
where
    S: invasion_builder::State,
    S: invasion_builder::IsComplete,
{
    pub fn eval(self) -> ScenarioResult<OutcomeMap> {
        self.build().eval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MASS_TOLERANCE;

    fn total(outcomes: &OutcomeMap) -> f64 {
        outcomes.values().sum()
    }

    #[test]
    fn one_round_invasion() {
        let outcomes = Invasion::new(1u32, 1).eval().unwrap();
        assert_eq!(
            outcomes,
            OutcomeMap::from([((1, 0), 5.0 / 12.0), ((0, 1), 7.0 / 12.0)])
        );
    }

    #[test]
    fn two_on_one_invasion_exact_distribution() {
        // 2 vs. 1 either wins outright or drops to 1 vs. 1 first.
        let outcomes = Invasion::new(2u32, 1).eval().unwrap();
        assert_eq!(
            outcomes,
            OutcomeMap::from([
                ((2, 0), 125.0 / 216.0),
                ((1, 0), 91.0 / 216.0 * (5.0 / 12.0)),
                ((0, 1), 91.0 / 216.0 * (7.0 / 12.0)),
            ])
        );
    }

    #[test]
    fn outcome_mass_is_conserved() {
        for (a, d, r, g) in [(5u32, 5u32, 0u32, 0u32), (12, 8, 3, 2), (30, 25, 1, 0)] {
            let outcomes = Invasion::new(a, d).retreat(r).goal(g).eval().unwrap();
            assert!(
                (total(&outcomes) - 1.0).abs() <= MASS_TOLERANCE,
                "{a} vs. {d}, r {r}, g {g}"
            );
        }
    }

    #[test]
    fn outcomes_stop_at_the_thresholds() {
        let outcomes = Invasion::new(10u32, 10).retreat(3).goal(2).eval().unwrap();
        for &(a, d) in outcomes.keys() {
            assert!(a <= 3 || d <= 2, "({a}, {d}) is not terminal");
        }
    }

    #[test]
    fn spread_seeds_every_starting_count() {
        let spread = ForceMap::from([(2, 0.25), (5, 0.75)]);
        let outcomes = Invasion::new(spread, 3).retreat(2).eval().unwrap();
        // Mass already at the retreat threshold never battles.
        assert_eq!(outcomes[&(2, 3)], 0.25);
        assert!((total(&outcomes) - 1.0).abs() <= MASS_TOLERANCE);
    }

    #[test]
    fn spread_entirely_at_the_retreat_threshold_is_terminal() {
        let spread = ForceMap::from([(4, 1.0)]);
        let outcomes = Invasion::new(spread, 6).retreat(4).eval().unwrap();
        assert_eq!(outcomes, OutcomeMap::from([((4, 6), 1.0)]));
    }

    #[test]
    fn identical_calls_return_identical_maps() {
        let first = Invasion::new(9u32, 7).retreat(2).goal(1).eval().unwrap();
        let second = Invasion::new(9u32, 7).retreat(2).goal(1).eval().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_malformed_scenarios() {
        assert_eq!(
            Invasion::new(0u32, 3).eval(),
            Err(InvalidScenario::NoAttackers)
        );
        assert_eq!(
            Invasion::new(3u32, 0).eval(),
            Err(InvalidScenario::NoDefenders)
        );
        assert_eq!(
            Invasion::new(3u32, 3).retreat(3).eval(),
            Err(InvalidScenario::RetreatAboveAttackers {
                retreat: 3,
                attackers: 3
            })
        );
        assert_eq!(
            Invasion::new(3u32, 3).goal(3).eval(),
            Err(InvalidScenario::GoalAboveDefenders {
                goal: 3,
                defenders: 3
            })
        );
        assert_eq!(
            Invasion::new(ForceMap::new(), 3).eval(),
            Err(InvalidScenario::EmptySpread)
        );
        assert_eq!(
            Invasion::new(ForceMap::from([(1, 1.0)]), 3).retreat(2).eval(),
            Err(InvalidScenario::SpreadBelowRetreat { retreat: 2 })
        );
    }
}
