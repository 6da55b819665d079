use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{
    ActivityActor, ActivityContext, PerTurnWork, Progress, RegisteredActor, TerminalEffect,
    Transition,
};
use crate::agent::Agent;
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_DISASSEMBLE};
use crate::world::ItemLocation;

/// A queue of single-item disassemblies run back to back. The item at the
/// front of `targets` is the one currently being worked on; the envelope
/// timer is re-armed for each new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassembleActor {
    targets: VecDeque<ItemLocation>,
    pos: Tripoint,
    recursive: bool,
    initial_num_targets: usize,
    completed: usize,
}

impl DisassembleActor {
    pub fn new(targets: Vec<ItemLocation>, pos: Tripoint, recursive: bool) -> Self {
        Self {
            initial_num_targets: targets.len(),
            targets: targets.into(),
            pos,
            recursive,
            completed: 0,
        }
    }

    /// Items known so far, including components queued by recursion.
    pub fn calc_num_targets(&self) -> usize {
        self.initial_num_targets
            .max(self.completed + self.targets.len())
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Brings the next disassemblable target to the front and arms the timer
    /// for it, skipping anything that vanished or cannot be taken apart.
    fn try_start_single(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        while let Some(&target) = self.targets.front() {
            if !ctx.world.item_exists(target) {
                debug!(item = target.0, "disassembly_target_vanished");
                self.targets.pop_front();
                continue;
            }
            match ctx.world.disassembly_moves(target) {
                Some(moves) => {
                    return Transition::Wait {
                        moves: moves.max(1),
                    }
                }
                None => {
                    debug!(item = target.0, "disassembly_target_skipped");
                    self.targets.pop_front();
                }
            }
        }

        if self.completed == 0 {
            ctx.agent.add_msg("There is nothing you can disassemble.");
            return Transition::Cancel;
        }
        Transition::Complete
    }
}

impl ActivityActor for DisassembleActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        self.try_start_single(ctx)
    }

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        Some(self)
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }

    fn progress_message(&self, progress: &Progress, _agent: &Agent) -> Option<String> {
        let total = self.calc_num_targets();
        let current = (self.completed + 1).min(total);
        let percent = progress.percent_complete().unwrap_or(0);
        Some(format!(
            "{}: {current} of {total} items, {percent}%",
            Self::ID.verb()
        ))
    }
}

impl PerTurnWork for DisassembleActor {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition {
        let Some(&target) = self.targets.front() else {
            return Transition::Complete;
        };
        if !ctx.world.item_exists(target) {
            debug!(item = target.0, "disassembly_target_vanished");
            self.targets.pop_front();
            return self.try_start_single(ctx);
        }
        if !ctx.progress.timer_elapsed() {
            return Transition::Continue;
        }

        self.targets.pop_front();
        let components = ctx.world.disassemble_item(ctx.agent, target, self.pos);
        self.completed += 1;
        if self.recursive {
            self.targets.extend(components);
        }
        self.try_start_single(ctx)
    }
}

impl TerminalEffect for DisassembleActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        ctx.agent.add_msg(format!(
            "You finish disassembling {} item{}.",
            self.completed,
            if self.completed == 1 { "" } else { "s" }
        ));
    }
}

impl RegisteredActor for DisassembleActor {
    const ID: ActivityId = ACT_DISASSEMBLE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ActivitySlot, TickOutcome};
    use crate::test_support::{test_agent, MockWorld, WorldEvent};

    const BENCH: Tripoint = Tripoint::new(0, 1, 0);

    fn disassembled(world: &MockWorld) -> Vec<ItemLocation> {
        world
            .events
            .iter()
            .filter_map(|event| match event {
                WorldEvent::Disassembled { item, .. } => Some(*item),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn works_through_the_queue_one_item_at_a_time() {
        let mut world = MockWorld::default()
            .with_disassemblable(ItemLocation(1), 200, &[])
            .with_disassemblable(ItemLocation(2), 100, &[]);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DisassembleActor::new(
                vec![ItemLocation(1), ItemLocation(2)],
                BENCH,
                false,
            )),
            &mut agent,
            &mut world,
        );
        slot.tick(&mut agent, &mut world);
        assert_eq!(
            slot.progress_message(&agent).as_deref(),
            Some("disassembling: 1 of 2 items, 50%")
        );
        slot.tick(&mut agent, &mut world);
        assert_eq!(disassembled(&world), vec![ItemLocation(1)]);
        assert_eq!(
            slot.progress_message(&agent).as_deref(),
            Some("disassembling: 2 of 2 items, 0%")
        );
        slot.tick(&mut agent, &mut world);
        assert_eq!(slot.tick(&mut agent, &mut world), TickOutcome::Finished(ACT_DISASSEMBLE));

        assert_eq!(disassembled(&world), vec![ItemLocation(1), ItemLocation(2)]);
        assert_eq!(agent.last_message(), Some("You finish disassembling 2 items."));
    }

    #[test]
    fn recursive_mode_queues_produced_components() {
        let mut world = MockWorld::default()
            .with_disassemblable(ItemLocation(1), 100, &[ItemLocation(10), ItemLocation(11)])
            .with_disassemblable(ItemLocation(10), 100, &[]);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DisassembleActor::new(vec![ItemLocation(1)], BENCH, true)),
            &mut agent,
            &mut world,
        );
        let outcome = slot.run_to_completion(&mut agent, &mut world, 10);

        assert_eq!(outcome, TickOutcome::Finished(ACT_DISASSEMBLE));
        assert_eq!(disassembled(&world), vec![ItemLocation(1), ItemLocation(10)]);
    }

    #[test]
    fn non_recursive_mode_leaves_components_alone() {
        let mut world = MockWorld::default()
            .with_disassemblable(ItemLocation(1), 100, &[ItemLocation(10)])
            .with_disassemblable(ItemLocation(10), 100, &[]);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DisassembleActor::new(vec![ItemLocation(1)], BENCH, false)),
            &mut agent,
            &mut world,
        );
        slot.run_to_completion(&mut agent, &mut world, 10);

        assert_eq!(disassembled(&world), vec![ItemLocation(1)]);
    }

    #[test]
    fn unusable_targets_are_skipped_and_empty_queue_cancels() {
        let mut world = MockWorld::default().with_item(ItemLocation(3), 10);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DisassembleActor::new(
                vec![ItemLocation(3), ItemLocation(4)],
                BENCH,
                false,
            )),
            &mut agent,
            &mut world,
        );

        assert_eq!(
            slot.tick(&mut agent, &mut world),
            TickOutcome::Canceled(ACT_DISASSEMBLE)
        );
        assert_eq!(agent.last_message(), Some("There is nothing you can disassemble."));
    }

    #[test]
    fn target_vanishing_mid_work_moves_on_to_the_next() {
        let mut world = MockWorld::default()
            .with_disassemblable(ItemLocation(1), 300, &[])
            .with_disassemblable(ItemLocation(2), 100, &[]);
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(
            Box::new(DisassembleActor::new(
                vec![ItemLocation(1), ItemLocation(2)],
                BENCH,
                false,
            )),
            &mut agent,
            &mut world,
        );
        slot.tick(&mut agent, &mut world);
        world.items.remove(&ItemLocation(1));
        let outcome = slot.run_to_completion(&mut agent, &mut world, 10);

        assert_eq!(outcome, TickOutcome::Finished(ACT_DISASSEMBLE));
        assert_eq!(disassembled(&world), vec![ItemLocation(2)]);
    }
}
