//! Shared bookkeeping for the activities that walk a list of items and
//! handle as many as the per-tick move budget allows.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{ActivityContext, Transition};
use crate::world::ItemLocation;

/// One queued item plus the moves already sunk into it on earlier ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActItem {
    pub item: ItemLocation,
    pub count: i32,
    #[serde(default)]
    pub consumed_moves: i32,
}

impl ActItem {
    pub fn new(item: ItemLocation, count: i32) -> Self {
        Self {
            item,
            count,
            consumed_moves: 0,
        }
    }
}

pub(crate) fn queue_from(items: impl IntoIterator<Item = (ItemLocation, i32)>) -> VecDeque<ActItem> {
    items
        .into_iter()
        .map(|(item, count)| ActItem::new(item, count))
        .collect()
}

/// Hands queued entries to `handle` until this tick's budget is gone.
///
/// An entry costing more than what is left keeps the partial spend and stays
/// at the front. Entries whose item no longer exists are dropped silently.
/// `handle` returning false stops the activity.
pub(crate) fn drain_within_budget(
    queue: &mut VecDeque<ActItem>,
    ctx: &mut ActivityContext<'_>,
    mut handle: impl FnMut(&mut ActivityContext<'_>, &ActItem) -> bool,
) -> Transition {
    let mut budget = ctx.progress.moves_available;
    while budget > 0 {
        let Some(entry) = queue.front_mut() else {
            break;
        };
        if !ctx.world.item_exists(entry.item) {
            debug!(item = entry.item.0, "queued_item_vanished");
            queue.pop_front();
            continue;
        }
        let remaining = ctx.world.handling_cost(entry.item, entry.count) - entry.consumed_moves;
        if remaining > budget {
            entry.consumed_moves += budget;
            break;
        }
        budget -= remaining.max(0);
        let Some(entry) = queue.pop_front() else {
            break;
        };
        if !handle(ctx, &entry) {
            return Transition::Cancel;
        }
    }
    if queue.is_empty() {
        Transition::Complete
    } else {
        Transition::Continue
    }
}
