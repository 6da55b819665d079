use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor::{ActivityActor, ActivityContext, RegisteredActor, TerminalEffect, Transition};
use crate::coords::Tripoint;
use crate::descriptor::{ActivityId, ACT_HACKING};
use crate::world::{Energy, HackResult};

/// Five minutes of agent time.
pub const HACK_MOVES: i32 = 30_000;
pub const BIONIC_HACK_COST: Energy = Energy::from_kilojoules(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HackingActor {
    target: Tripoint,
    using_bionic: bool,
}

impl HackingActor {
    pub fn manual(target: Tripoint) -> Self {
        Self {
            target,
            using_bionic: false,
        }
    }

    pub fn with_bionic(target: Tripoint) -> Self {
        Self {
            target,
            using_bionic: true,
        }
    }

    pub fn using_bionic(&self) -> bool {
        self.using_bionic
    }
}

impl ActivityActor for HackingActor {
    fn activity_id(&self) -> ActivityId {
        Self::ID
    }

    fn start(&mut self, _ctx: &mut ActivityContext<'_>) -> Transition {
        Transition::Wait { moves: HACK_MOVES }
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        Some(self)
    }
}

impl TerminalEffect for HackingActor {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>) {
        let mut using_bionic = self.using_bionic;
        if using_bionic && !ctx.agent.try_spend_bionic_power(BIONIC_HACK_COST) {
            debug!(target = %self.target, "hack_bionic_power_short");
            ctx.agent.add_msg("Your bionic is out of power, so you try by hand.");
            using_bionic = false;
        }

        let result = ctx.world.attempt_hack(ctx.agent, self.target, using_bionic);
        info!(target = %self.target, using_bionic, result = ?result, "hack_attempted");
        match result {
            HackResult::Fail => {
                ctx.world.trigger_alarm(self.target);
                ctx.agent.add_msg("You set off an alarm!");
            }
            HackResult::Nothing => ctx.agent.add_msg("You fail to hack the lock."),
            HackResult::Success => {
                ctx.world.unlock(self.target);
                ctx.agent.add_msg("The lock opens.");
            }
        }
    }
}

impl RegisteredActor for HackingActor {
    const ID: ActivityId = ACT_HACKING;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ActivitySlot, TickOutcome};
    use crate::test_support::{test_agent, MockWorld, WorldEvent};

    const PANEL: Tripoint = Tripoint::new(0, 3, 0);

    fn run(actor: HackingActor, world: &mut MockWorld, agent: &mut crate::agent::Agent) {
        let mut slot = ActivitySlot::default();
        slot.assign(Box::new(actor), agent, world);
        let outcome = slot.run_to_completion(agent, world, 400);
        assert_eq!(outcome, TickOutcome::Finished(ACT_HACKING));
    }

    #[test]
    fn nothing_happens_until_five_minutes_pass() {
        let mut world = MockWorld::default();
        let mut agent = test_agent();
        let mut slot = ActivitySlot::default();

        slot.assign(Box::new(HackingActor::manual(PANEL)), &mut agent, &mut world);
        for _ in 0..299 {
            slot.tick(&mut agent, &mut world);
        }
        assert!(world.events.is_empty());
        assert_eq!(
            slot.progress_message(&agent).as_deref(),
            Some("hacking: 99%")
        );
    }

    #[test]
    fn bionic_attempt_spends_power_and_unlocks() {
        let mut world = MockWorld::default();
        let mut agent = test_agent().with_bionic_power(Energy::from_kilojoules(5));

        run(HackingActor::with_bionic(PANEL), &mut world, &mut agent);

        assert_eq!(agent.bionic_power, Energy::from_kilojoules(3));
        assert_eq!(
            world.events,
            vec![
                WorldEvent::HackAttempted { using_bionic: true },
                WorldEvent::Unlocked(PANEL),
            ]
        );
    }

    #[test]
    fn bionic_attempt_without_power_falls_back_to_manual() {
        let mut world = MockWorld::default();
        let mut agent = test_agent();

        run(HackingActor::with_bionic(PANEL), &mut world, &mut agent);

        assert_eq!(world.events[0], WorldEvent::HackAttempted { using_bionic: false });
    }

    #[test]
    fn failure_triggers_the_alarm() {
        let mut world = MockWorld {
            hack_result: Some(HackResult::Fail),
            ..MockWorld::default()
        };
        let mut agent = test_agent();

        run(HackingActor::manual(PANEL), &mut world, &mut agent);

        assert!(world.events.contains(&WorldEvent::Alarm(PANEL)));
        assert_eq!(agent.last_message(), Some("You set off an alarm!"));
    }

    #[test]
    fn no_effect_result_only_reports() {
        let mut world = MockWorld {
            hack_result: Some(HackResult::Nothing),
            ..MockWorld::default()
        };
        let mut agent = test_agent();

        run(HackingActor::manual(PANEL), &mut world, &mut agent);

        assert_eq!(world.events, vec![WorldEvent::HackAttempted { using_bionic: false }]);
    }
}
