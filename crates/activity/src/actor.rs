use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::agent::Agent;
use crate::descriptor::ActivityId;
use crate::world::World;

/// What an actor asks the scheduler to do after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep running. A timed envelope completes once its timer runs out.
    Continue,
    /// Arm (or re-arm) the envelope timer with a fresh duration.
    Wait { moves: i32 },
    /// Done; `finish` fires on the next scheduling pass.
    Complete,
    /// Abort; `canceled` fires on the next scheduling pass.
    Cancel,
}

/// Read-only copy of the envelope bookkeeping handed to every callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub moves_total: i32,
    pub moves_left: i32,
    pub moves_spent: i32,
    pub turns: u32,
    /// Moves the agent may spend on incremental work this tick.
    pub moves_available: i32,
}

impl Progress {
    pub fn is_timed(&self) -> bool {
        self.moves_total > 0
    }

    pub fn timer_elapsed(&self) -> bool {
        self.is_timed() && self.moves_left <= 0
    }

    pub fn percent_complete(&self) -> Option<u8> {
        if !self.is_timed() {
            return None;
        }
        let done = (self.moves_total - self.moves_left.max(0)).clamp(0, self.moves_total);
        Some(((i64::from(done) * 100) / i64::from(self.moves_total)) as u8)
    }
}

pub struct ActivityContext<'a> {
    pub agent: &'a mut Agent,
    pub world: &'a mut dyn World,
    pub progress: Progress,
}

impl<'a> ActivityContext<'a> {
    pub fn new(agent: &'a mut Agent, world: &'a mut dyn World, progress: Progress) -> Self {
        Self {
            agent,
            world,
            progress,
        }
    }
}

/// Incremental work performed once per tick.
pub trait PerTurnWork {
    fn do_turn(&mut self, ctx: &mut ActivityContext<'_>) -> Transition;
}

/// Terminal effect applied once the activity completes.
pub trait TerminalEffect {
    fn finish(&mut self, ctx: &mut ActivityContext<'_>);
}

/// Releases whatever `start` reserved when the activity is cut short.
pub trait ReleaseOnCancel {
    fn canceled(&mut self, ctx: &mut ActivityContext<'_>);
}

/// Object-safe plumbing shared by every actor, provided by a blanket impl.
pub trait ActorObject {
    fn clone_actor(&self) -> Box<dyn ActivityActor>;
    fn to_payload(&self) -> Result<Value, serde_json::Error>;
    fn as_any(&self) -> &dyn Any;
}

impl<T> ActorObject for T
where
    T: ActivityActor + Clone + Serialize + 'static,
{
    fn clone_actor(&self) -> Box<dyn ActivityActor> {
        Box::new(self.clone())
    }

    fn to_payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One in-progress long-running task.
///
/// `start` is the only mandatory callback. Per-turn work, a terminal effect
/// and cancel-time cleanup are capabilities an actor opts into by returning
/// itself from the matching accessor; the scheduler skips absent ones.
pub trait ActivityActor: ActorObject + fmt::Debug {
    fn activity_id(&self) -> ActivityId;

    fn start(&mut self, ctx: &mut ActivityContext<'_>) -> Transition;

    fn per_turn(&mut self) -> Option<&mut dyn PerTurnWork> {
        None
    }

    fn terminal(&mut self) -> Option<&mut dyn TerminalEffect> {
        None
    }

    fn release(&mut self) -> Option<&mut dyn ReleaseOnCancel> {
        None
    }

    /// True when resuming `self` is indistinguishable from starting `other`.
    fn can_resume_with(&self, _other: &dyn ActivityActor, _agent: &Agent) -> bool {
        false
    }

    fn progress_message(&self, _progress: &Progress, _agent: &Agent) -> Option<String> {
        None
    }
}

impl Clone for Box<dyn ActivityActor> {
    fn clone(&self) -> Self {
        self.clone_actor()
    }
}

/// Actor kinds that can be looked up by descriptor and rebuilt from a save.
pub trait RegisteredActor: ActivityActor + DeserializeOwned + Sized + 'static {
    const ID: ActivityId;
}

/// Checked downcast used by resumption tests; `None` for any other kind.
pub fn downcast_actor<T: 'static>(actor: &dyn ActivityActor) -> Option<&T> {
    actor.as_any().downcast_ref::<T>()
}
