use std::sync::LazyLock;

use num::rational::Ratio;
use num::ToPrimitive;

use crate::util::{Prob, Troops};

/// Troop losses for one round of battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Casualties {
    pub attackers: Troops,
    pub defenders: Troops,
}

/// Possible casualty splits and their odds for the six dice
/// configurations, indexed by `[attacker dice - 1][defender dice - 1]`.
/// Paired highest dice are compared with ties going to the defender.
static CASUALTY_ODDS: LazyLock<[[Vec<(Casualties, Prob)>; 2]; 3]> = LazyLock::new(|| {
    [
        [
            // 1 attacker die vs. 1 defender die
            vec![(split(0, 1), odds(5, 12)), (split(1, 0), odds(7, 12))],
            // 1 vs. 2
            vec![(split(0, 1), odds(55, 216)), (split(1, 0), odds(161, 216))],
        ],
        [
            // 2 vs. 1
            vec![(split(0, 1), odds(125, 216)), (split(1, 0), odds(91, 216))],
            // 2 vs. 2
            vec![
                (split(0, 2), odds(295, 1296)),
                (split(2, 0), odds(581, 1296)),
                (split(1, 1), odds(420, 1296)),
            ],
        ],
        [
            // 3 vs. 1
            vec![(split(0, 1), odds(855, 1296)), (split(1, 0), odds(441, 1296))],
            // 3 vs. 2
            vec![
                (split(0, 2), odds(2890, 7776)),
                (split(2, 0), odds(2275, 7776)),
                (split(1, 1), odds(2611, 7776)),
            ],
        ],
    ]
});

fn split(attackers: Troops, defenders: Troops) -> Casualties {
    Casualties {
        attackers,
        defenders,
    }
}

fn odds(n: u64, d: u64) -> Prob {
    Ratio::new(n, d).to_f64().unwrap()
}

/// Casualty row for the given troop counts, with dice capped at three
/// for the attacker and two for the defender.
pub(crate) fn casualty_odds(attackers: Troops, defenders: Troops) -> &'static [(Casualties, Prob)] {
    let a = attackers.min(3) as usize;
    let d = defenders.min(2) as usize;
    &CASUALTY_ODDS[a - 1][d - 1]
}

/// Resolves one round of battle, spreading `chance` over the possible
/// successor states `(attackers, defenders, probability)`.
pub fn resolve_battle(
    attackers: Troops,
    defenders: Troops,
    chance: Prob,
) -> Vec<(Troops, Troops, Prob)> {
    debug_assert!(
        attackers >= 1 && defenders >= 1,
        "battle requires troops on both sides"
    );
    casualty_odds(attackers, defenders)
        .iter()
        .map(|&(c, p)| (attackers - c.attackers, defenders - c.defenders, p * chance))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use itertools::Itertools;

    use super::*;
    use crate::MASS_TOLERANCE;

    // Re-derive one table row by enumerating every equally likely roll:
    // sort each side's dice descending, compare paired highest dice,
    // ties to the defender.
    fn derive(a_dice: u32, d_dice: u32) -> Vec<(Casualties, Prob)> {
        let total = 6u64.pow(a_dice + d_dice);
        let mut counts: BTreeMap<(Troops, Troops), u64> = BTreeMap::new();
        for roll in (0..a_dice + d_dice)
            .map(|_| 1..=6u8)
            .multi_cartesian_product()
        {
            let mut att = roll[..a_dice as usize].to_vec();
            let mut def = roll[a_dice as usize..].to_vec();
            att.sort_unstable_by(|x, y| y.cmp(x));
            def.sort_unstable_by(|x, y| y.cmp(x));

            let mut a_loss = 0;
            let mut d_loss = 0;
            for (a, d) in att.iter().zip(&def) {
                if a > d {
                    d_loss += 1;
                } else {
                    a_loss += 1;
                }
            }
            *counts.entry((a_loss, d_loss)).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|((a, d), c)| (split(a, d), Ratio::new(c, total).to_f64().unwrap()))
            .collect()
    }

    #[test]
    fn table_matches_exhaustive_dice_enumeration() {
        for a in 1..=3 {
            for d in 1..=2 {
                let derived = derive(a, d);
                let table = casualty_odds(a, d);
                assert_eq!(derived.len(), table.len(), "{a} vs. {d}");
                for (c, p) in table {
                    let (_, q) = derived
                        .iter()
                        .find(|(dc, _)| dc == c)
                        .expect("casualty split missing from table");
                    assert_eq!(p, q, "{a} vs. {d}, split {c:?}");
                }
            }
        }
    }

    #[test]
    fn one_on_one_round() {
        assert_eq!(
            resolve_battle(1, 1, 1.0),
            vec![(1, 0, 5.0 / 12.0), (0, 1, 7.0 / 12.0)]
        );
    }

    #[test]
    fn two_on_two_round() {
        assert_eq!(
            resolve_battle(2, 2, 1.0),
            vec![
                (2, 0, 295.0 / 1296.0),
                (0, 2, 581.0 / 1296.0),
                (1, 1, 420.0 / 1296.0),
            ]
        );
    }

    #[test]
    fn dice_are_capped_at_three_and_two() {
        let shifted: Vec<_> = resolve_battle(3, 2, 1.0)
            .into_iter()
            .map(|(a, d, p)| (a + 27, d + 18, p))
            .collect();
        assert_eq!(resolve_battle(30, 20, 1.0), shifted);
    }

    #[test]
    fn round_weights_sum_to_the_incoming_chance() {
        for a in 1..=6 {
            for d in 1..=4 {
                for chance in [1.0, 0.35, 1.0 / 3.0] {
                    let total: Prob = resolve_battle(a, d, chance)
                        .iter()
                        .map(|&(_, _, p)| p)
                        .sum();
                    assert!((total - chance).abs() <= MASS_TOLERANCE, "{a} vs. {d}");
                }
            }
        }
    }
}
