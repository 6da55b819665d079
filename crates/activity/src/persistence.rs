//! Save data for an agent's activity slot.
//!
//! The running actor is stored as its descriptor name plus a JSON payload
//! next to the shared envelope bookkeeping. A save file wraps that record
//! with a format version and a SHA-256 of the record so a truncated or
//! hand-edited save is caught before it is decoded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::actor::ActivityActor;
use crate::agent::Agent;
use crate::atomic_io::write_bytes_atomic;
use crate::envelope::{ActivityEnvelope, Terminal};
use crate::registry::{ActivityRegistry, RegistryError};
use crate::scheduler::ActivitySlot;
use crate::world::World;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode {activity} actor: {source}")]
    Encode {
        activity: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to read/write save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file {path} is malformed at {json_path}: {source}")]
    SaveFormat {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("save file {path} has version {found}, expected {expected}")]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("save file {path} failed its checksum")]
    ChecksumMismatch { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedActivity {
    pub activity: String,
    pub actor: Value,
    pub moves_total: i32,
    pub moves_left: i32,
    pub moves_spent: i32,
    pub turns: u32,
    pub interrupted: bool,
    #[serde(default)]
    pub pending: Option<Terminal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySaveFile {
    pub save_version: u32,
    pub payload_sha256_hex: String,
    pub activity: Option<SavedActivity>,
}

impl ActivitySaveFile {
    pub fn new(activity: Option<SavedActivity>) -> Result<Self, PersistenceError> {
        let payload_sha256_hex = payload_digest(&activity)?;
        Ok(Self {
            save_version: SAVE_VERSION,
            payload_sha256_hex,
            activity,
        })
    }

    pub fn from_slot(slot: &ActivitySlot) -> Result<Self, PersistenceError> {
        Self::new(slot.save()?)
    }
}

impl ActivityEnvelope {
    pub fn to_saved(&self) -> Result<SavedActivity, PersistenceError> {
        let activity = self.activity_id();
        let actor = self
            .actor
            .to_payload()
            .map_err(|source| PersistenceError::Encode {
                activity: activity.to_string(),
                source,
            })?;
        Ok(SavedActivity {
            activity: activity.as_str().to_string(),
            actor,
            moves_total: self.moves_total,
            moves_left: self.moves_left,
            moves_spent: self.moves_spent,
            turns: self.turns,
            interrupted: self.interrupted,
            pending: self.pending,
        })
    }

    /// Strict rebuild: a payload that does not fit its registered type is an
    /// error. Unknown and obsolete descriptors still come back as a fresh
    /// migration cancel.
    pub fn from_saved(
        saved: &SavedActivity,
        registry: &ActivityRegistry,
    ) -> Result<Self, PersistenceError> {
        let actor = registry.decode(&saved.activity, &saved.actor)?;
        Ok(Self::with_bookkeeping(actor, saved))
    }

    /// Lenient rebuild used on load: whatever cannot be decoded becomes a
    /// migration cancel so the rest of the save still loads.
    pub fn restore_or_cancel(saved: &SavedActivity, registry: &ActivityRegistry) -> Self {
        let actor = registry.decode_or_cancel(&saved.activity, &saved.actor);
        Self::with_bookkeeping(actor, saved)
    }

    fn with_bookkeeping(actor: Box<dyn ActivityActor>, saved: &SavedActivity) -> Self {
        let mut envelope = Self::new(actor);
        // A substituted actor starts from scratch; the old counters belong to
        // a different kind.
        if envelope.activity_id().as_str() == saved.activity {
            envelope.moves_total = saved.moves_total;
            envelope.moves_left = saved.moves_left;
            envelope.moves_spent = saved.moves_spent;
            envelope.turns = saved.turns;
            envelope.interrupted = saved.interrupted;
            envelope.pending = saved.pending;
        }
        envelope
    }
}

impl ActivitySlot {
    pub fn save(&self) -> Result<Option<SavedActivity>, PersistenceError> {
        self.current().map(ActivityEnvelope::to_saved).transpose()
    }

    /// Replaces whatever the slot holds with the saved activity. A displaced
    /// activity gets its terminal callback (`canceled` unless a finish was
    /// already pending). The restored actor gets none: `start` already ran
    /// before the save was taken.
    pub fn restore(
        &mut self,
        saved: Option<&SavedActivity>,
        registry: &ActivityRegistry,
        agent: &mut Agent,
        world: &mut dyn World,
    ) {
        if let Some(mut displaced) = self.current.take() {
            let terminal = displaced.pending().unwrap_or(Terminal::Cancel);
            debug!(
                displaced = %displaced.activity_id(),
                terminal = ?terminal,
                "activity_displaced_by_restore"
            );
            displaced.fire_terminal(terminal, agent, world);
        }
        self.current = saved.map(|saved| {
            let envelope = ActivityEnvelope::restore_or_cancel(saved, registry);
            info!(
                saved = %saved.activity,
                restored = %envelope.activity_id(),
                moves_left = envelope.moves_left(),
                "activity_restored"
            );
            envelope
        });
    }
}

pub fn write_save_file(path: &Path, slot: &ActivitySlot) -> Result<(), PersistenceError> {
    let file = ActivitySaveFile::from_slot(slot)?;
    let bytes = serde_json::to_vec_pretty(&file).map_err(|source| PersistenceError::Encode {
        activity: activity_label(&file.activity),
        source,
    })?;
    write_bytes_atomic(path, &bytes).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "activity_save_written");
    Ok(())
}

pub fn read_save_file(path: &Path) -> Result<ActivitySaveFile, PersistenceError> {
    let bytes = fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_save_file(path, &bytes)
}

pub fn parse_save_file(path: &Path, bytes: &[u8]) -> Result<ActivitySaveFile, PersistenceError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let file: ActivitySaveFile =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            PersistenceError::SaveFormat {
                path: path.to_path_buf(),
                json_path: error.path().to_string(),
                source: error.into_inner(),
            }
        })?;

    if file.save_version != SAVE_VERSION {
        return Err(PersistenceError::VersionMismatch {
            path: path.to_path_buf(),
            found: file.save_version,
            expected: SAVE_VERSION,
        });
    }
    if payload_digest(&file.activity)? != file.payload_sha256_hex {
        warn!(path = %path.display(), "activity_save_checksum_mismatch");
        return Err(PersistenceError::ChecksumMismatch {
            path: path.to_path_buf(),
        });
    }
    Ok(file)
}

fn payload_digest(activity: &Option<SavedActivity>) -> Result<String, PersistenceError> {
    let payload = serde_json::to_vec(activity).map_err(|source| PersistenceError::Encode {
        activity: activity_label(activity),
        source,
    })?;
    Ok(to_hex_lower(&Sha256::digest(&payload)))
}

fn activity_label(activity: &Option<SavedActivity>) -> String {
    activity
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |saved| saved.activity.clone())
}

fn to_hex_lower(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        use std::fmt::Write as _;
        let _ = write!(&mut output, "{byte:02x}");
    }
    output
}
