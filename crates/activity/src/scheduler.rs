use tracing::{debug, info, warn};

use crate::actor::{ActivityActor, ActivityContext, Transition};
use crate::agent::Agent;
use crate::descriptor::ActivityId;
use crate::envelope::{ActivityEnvelope, Terminal};
use crate::world::World;

pub const DEFAULT_MOVES_PER_TURN: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub moves_per_turn: i32,
}

impl SchedulerConfig {
    /// A slot always grants at least one move per turn; a zero or negative
    /// budget would stall every timer and item queue.
    pub const MIN_MOVES_PER_TURN: i32 = 1;

    fn sanitized(self) -> Self {
        if self.moves_per_turn >= Self::MIN_MOVES_PER_TURN {
            return self;
        }
        warn!(
            requested = self.moves_per_turn,
            clamped = Self::MIN_MOVES_PER_TURN,
            "moves_per_turn_clamped"
        );
        Self {
            moves_per_turn: Self::MIN_MOVES_PER_TURN,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            moves_per_turn: DEFAULT_MOVES_PER_TURN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Started(ActivityId),
    /// The running activity was equivalent; the request was merged into it.
    Resumed(ActivityId),
    Replaced {
        previous: ActivityId,
        started: ActivityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Running(ActivityId),
    Finished(ActivityId),
    Canceled(ActivityId),
}

/// Per-agent activity slot. Holds at most one envelope and drives it one
/// tick at a time.
#[derive(Debug, Default)]
pub struct ActivitySlot {
    config: SchedulerConfig,
    pub(crate) current: Option<ActivityEnvelope>,
}

impl ActivitySlot {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: config.sanitized(),
            current: None,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn current(&self) -> Option<&ActivityEnvelope> {
        self.current.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn progress_message(&self, agent: &Agent) -> Option<String> {
        self.current
            .as_ref()
            .map(|envelope| envelope.progress_message(agent))
    }

    /// Requests a new activity. An equivalent running activity of the same
    /// kind absorbs the request; anything else is ended and replaced.
    pub fn assign(
        &mut self,
        actor: Box<dyn ActivityActor>,
        agent: &mut Agent,
        world: &mut dyn World,
    ) -> AssignOutcome {
        let started = actor.activity_id();
        let mut previous = None;

        if let Some(current) = self.current.as_mut() {
            if current.activity_id() == started
                && current.pending().is_none()
                && current.actor().can_resume_with(actor.as_ref(), agent)
            {
                current.interrupted = false;
                info!(
                    activity = %started,
                    moves_left = current.moves_left(),
                    "activity_resumed"
                );
                return AssignOutcome::Resumed(started);
            }
        }

        if let Some(mut old) = self.current.take() {
            let terminal = old.pending().unwrap_or(Terminal::Cancel);
            debug!(
                previous = %old.activity_id(),
                requested = %started,
                terminal = ?terminal,
                "activity_replaced"
            );
            old.fire_terminal(terminal, agent, world);
            previous = Some(old.activity_id());
        }

        let mut envelope = ActivityEnvelope::new(actor);
        let progress = envelope.progress(self.config.moves_per_turn);
        let transition = {
            let mut ctx = ActivityContext::new(agent, world, progress);
            envelope.actor.start(&mut ctx)
        };
        envelope.apply(transition);
        info!(
            activity = %started,
            moves_total = envelope.moves_total(),
            transition = ?transition,
            "activity_started"
        );
        self.current = Some(envelope);

        match previous {
            Some(previous) => AssignOutcome::Replaced { previous, started },
            None => AssignOutcome::Started(started),
        }
    }

    pub fn tick(&mut self, agent: &mut Agent, world: &mut dyn World) -> TickOutcome {
        if let Some(terminal) = self.current.as_ref().and_then(ActivityEnvelope::pending) {
            let Some(mut envelope) = self.current.take() else {
                return TickOutcome::Idle;
            };
            let id = envelope.activity_id();
            envelope.fire_terminal(terminal, agent, world);
            return match terminal {
                Terminal::Finish => {
                    info!(activity = %id, turns = envelope.turns(), "activity_finished");
                    TickOutcome::Finished(id)
                }
                Terminal::Cancel => {
                    info!(activity = %id, turns = envelope.turns(), "activity_canceled");
                    TickOutcome::Canceled(id)
                }
            };
        }

        let Some(envelope) = self.current.as_mut() else {
            return TickOutcome::Idle;
        };
        let id = envelope.activity_id();
        let budget = self.config.moves_per_turn;
        envelope.spend_turn(budget);
        let progress = envelope.progress(budget);
        let transition = match envelope.actor.per_turn() {
            Some(work) => {
                let mut ctx = ActivityContext::new(agent, world, progress);
                work.do_turn(&mut ctx)
            }
            None => Transition::Continue,
        };
        envelope.apply(transition);
        if let Some(terminal) = envelope.pending() {
            debug!(activity = %id, terminal = ?terminal, "activity_terminal_pending");
        }
        TickOutcome::Running(id)
    }

    /// External interruption. The terminal callback fires right away since
    /// the caller is the scheduler's owner, not the actor.
    pub fn interrupt(&mut self, agent: &mut Agent, world: &mut dyn World) -> Option<ActivityId> {
        let mut envelope = self.current.take()?;
        envelope.interrupted = true;
        let id = envelope.activity_id();
        let terminal = envelope.pending().unwrap_or(Terminal::Cancel);
        envelope.fire_terminal(terminal, agent, world);
        info!(activity = %id, terminal = ?terminal, "activity_interrupted");
        Some(id)
    }

    /// Runs ticks until the slot is idle or `max_ticks` is reached.
    pub fn run_to_completion(
        &mut self,
        agent: &mut Agent,
        world: &mut dyn World,
        max_ticks: u32,
    ) -> TickOutcome {
        let mut last = TickOutcome::Idle;
        for _ in 0..max_ticks {
            last = self.tick(agent, world);
            if !matches!(last, TickOutcome::Running(_)) {
                break;
            }
        }
        last
    }
}
