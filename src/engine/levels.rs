// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Level tiers mapped from cumulative score.

use serde::Serialize;

use crate::engine::events::LevelUp;

/// A named level tier.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Level {
    pub name: &'static str,
    pub min_score: u32,
}

/// Tier table, ascending by `min_score`.
pub const LEVELS: &[Level] = &[
    Level { name: "Recruit", min_score: 0 },
    Level { name: "Iron Apprentice", min_score: 11 },
    Level { name: "Warm-Up", min_score: 21 },
    Level { name: "Novice Warrior", min_score: 31 },
    Level { name: "Rising Strength", min_score: 41 },
    Level { name: "Conditioned", min_score: 51 },
    Level { name: "Disciplined", min_score: 61 },
    Level { name: "PR Hunter", min_score: 71 },
    Level { name: "Olympus Aspirant", min_score: 101 },
    Level { name: "Beast", min_score: 111 },
    Level { name: "Phoenix", min_score: 121 },
    Level { name: "Titan", min_score: 181 },
    Level { name: "Prime", min_score: 201 },
];

/// Highest tier whose threshold the score has reached.
pub fn level_for_score(score: u32) -> &'static Level {
    let mut current = &LEVELS[0];
    for level in LEVELS {
        if score >= level.min_score {
            current = level;
        } else {
            break;
        }
    }
    current
}

/// Level-up check across an award.
pub fn level_up(old_score: u32, new_score: u32) -> Option<LevelUp> {
    let old_level = level_for_score(old_score);
    let new_level = level_for_score(new_score);
    (old_level.name != new_level.name).then_some(LevelUp {
        old_level,
        new_level,
    })
}
