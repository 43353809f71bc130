//! Quality metric for a finished stack. Lower is better.
//!
//! Items are ranked top-down by their topmost occupied z (ties broken by
//! ascending id) and every item pays `|rank - id|`. The total adds twice the
//! stack height, so short stacks whose removal order follows the ids win.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stack::Stack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub max_z: u32,
    pub order_penalty: u64,
    pub total: u64,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (height {}, order penalty {})",
            self.total, self.max_z, self.order_penalty
        )
    }
}

pub fn score(stack: &Stack) -> Score {
    let mut by_height: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for item in stack.items() {
        by_height.entry(item.z2()).or_default().push(item.id);
    }
    let max_z = by_height.keys().next_back().copied().unwrap_or(0);

    let mut rank: u64 = 0;
    let mut order_penalty: u64 = 0;
    for ids in by_height.values_mut().rev() {
        ids.sort_unstable();
        for &id in ids.iter() {
            rank += 1;
            order_penalty += rank.abs_diff(id as u64);
        }
    }

    Score {
        max_z,
        order_penalty,
        total: 2 * max_z as u64 + order_penalty,
    }
}
