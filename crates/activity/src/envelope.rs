use serde::{Deserialize, Serialize};

use crate::actor::{ActivityActor, ActivityContext, Progress, Transition};
use crate::agent::Agent;
use crate::descriptor::ActivityId;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    Finish,
    Cancel,
}

/// The agent's current activity: the owned actor plus the bookkeeping every
/// activity shares.
#[derive(Debug)]
pub struct ActivityEnvelope {
    pub(crate) actor: Box<dyn ActivityActor>,
    pub(crate) moves_total: i32,
    pub(crate) moves_left: i32,
    pub(crate) moves_spent: i32,
    pub(crate) turns: u32,
    pub(crate) interrupted: bool,
    pub(crate) pending: Option<Terminal>,
}

impl ActivityEnvelope {
    pub(crate) fn new(actor: Box<dyn ActivityActor>) -> Self {
        Self {
            actor,
            moves_total: 0,
            moves_left: 0,
            moves_spent: 0,
            turns: 0,
            interrupted: false,
            pending: None,
        }
    }

    pub fn activity_id(&self) -> ActivityId {
        self.actor.activity_id()
    }

    pub fn actor(&self) -> &dyn ActivityActor {
        self.actor.as_ref()
    }

    pub fn moves_total(&self) -> i32 {
        self.moves_total
    }

    pub fn moves_left(&self) -> i32 {
        self.moves_left
    }

    pub fn moves_spent(&self) -> i32 {
        self.moves_spent
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn pending(&self) -> Option<Terminal> {
        self.pending
    }

    pub fn progress(&self, moves_available: i32) -> Progress {
        Progress {
            moves_total: self.moves_total,
            moves_left: self.moves_left,
            moves_spent: self.moves_spent,
            turns: self.turns,
            moves_available,
        }
    }

    pub fn progress_message(&self, agent: &Agent) -> String {
        let progress = self.progress(0);
        if let Some(message) = self.actor.progress_message(&progress, agent) {
            return message;
        }
        let verb = self.activity_id().verb();
        match progress.percent_complete() {
            Some(percent) => format!("{verb}: {percent}%"),
            None => verb.to_string(),
        }
    }

    pub(crate) fn spend_turn(&mut self, moves_per_turn: i32) {
        self.turns = self.turns.saturating_add(1);
        if self.moves_total > 0 {
            let spent = moves_per_turn.min(self.moves_left.max(0));
            self.moves_left = (self.moves_left - moves_per_turn).max(0);
            self.moves_spent = self.moves_spent.saturating_add(spent);
        } else {
            self.moves_spent = self.moves_spent.saturating_add(moves_per_turn);
        }
    }

    /// Folds a callback's transition into the bookkeeping. The first terminal
    /// request wins; later ones are ignored.
    pub(crate) fn apply(&mut self, transition: Transition) {
        if self.pending.is_some() {
            return;
        }
        match transition {
            Transition::Continue => {
                if self.moves_total > 0 && self.moves_left <= 0 {
                    self.pending = Some(Terminal::Finish);
                }
            }
            Transition::Wait { moves } => {
                self.moves_total = moves.max(0);
                self.moves_left = self.moves_total;
                if self.moves_total == 0 {
                    self.pending = Some(Terminal::Finish);
                }
            }
            Transition::Complete => self.pending = Some(Terminal::Finish),
            Transition::Cancel => self.pending = Some(Terminal::Cancel),
        }
    }

    pub(crate) fn fire_terminal(
        &mut self,
        terminal: Terminal,
        agent: &mut Agent,
        world: &mut dyn World,
    ) {
        let progress = self.progress(0);
        let mut ctx = ActivityContext::new(agent, world, progress);
        match terminal {
            Terminal::Finish => {
                if let Some(effect) = self.actor.terminal() {
                    effect.finish(&mut ctx);
                }
            }
            Terminal::Cancel => {
                if let Some(release) = self.actor.release() {
                    release.canceled(&mut ctx);
                }
            }
        }
    }
}
