//! Batch edits over a selection of animation sequences.
//!
//! Every operation takes the selection as a mutable slice and marks the
//! sequences it changes as dirty.

use log::{error, info, warn};

use crate::error::SequenceError;
use crate::modifier::AnimModifier;
use crate::sequence::AnimSequence;
use crate::settings::SimpleAnimSettings;

pub fn set_root_lock(sequences: &mut [AnimSequence], lock: bool) {
    for seq in sequences {
        seq.force_root_lock = lock;
        seq.mark_dirty();
    }
}

pub fn set_enable_root_motion(sequences: &mut [AnimSequence], enable: bool) {
    for seq in sequences {
        seq.enable_root_motion = enable;
        seq.mark_dirty();
    }
}

/// Point every sequence at `settings`. Returns the names of the sequences
/// whose setting actually changed, without duplicates.
pub fn set_curve_compression(
    sequences: &mut [AnimSequence],
    settings: Option<&str>,
) -> Vec<String> {
    let mut changed: Vec<String> = Vec::new();
    for seq in sequences {
        if seq.curve_compression.as_deref() != settings {
            seq.curve_compression = settings.map(str::to_string);
            seq.mark_dirty();
            if !changed.contains(&seq.name) {
                changed.push(seq.name.clone());
            }
        }
    }
    changed
}

pub fn remove_all_curves(sequences: &mut [AnimSequence]) {
    for seq in sequences {
        if !seq.curves.is_empty() {
            seq.curves.clear();
            seq.mark_dirty();
        }
    }
}

pub fn remove_all_notifies(sequences: &mut [AnimSequence]) {
    for seq in sequences {
        if !seq.notifies.is_empty() {
            seq.notifies.clear();
            seq.mark_dirty();
        }
    }
}

/// Strip every modifier. Returns how many were removed in total.
pub fn remove_all_modifiers(sequences: &mut [AnimSequence]) -> usize {
    let mut removed = 0;
    for seq in sequences {
        if !seq.modifiers.is_empty() {
            removed += seq.modifiers.len();
            seq.modifiers.clear();
            seq.mark_dirty();
        }
    }
    info!("Removed {} modifiers", removed);
    removed
}

/// Attach a clone of each template to every sequence that does not already
/// carry a modifier of the same kind.
pub fn add_modifiers(sequences: &mut [AnimSequence], templates: &[AnimModifier]) {
    if sequences.is_empty() || templates.is_empty() {
        return;
    }
    for template in templates {
        let kind = template.kind();
        for seq in sequences.iter_mut() {
            if seq.modifiers.iter().any(|m| m.kind() == kind) {
                continue;
            }
            seq.modifiers.push(template.clone());
            seq.mark_dirty();
        }
    }
}

/// Run each sequence's modifier stack in order. Stops at the first failure.
pub fn apply_modifiers(sequences: &mut [AnimSequence]) -> Result<(), SequenceError> {
    for seq in sequences {
        let stack = std::mem::take(&mut seq.modifiers);
        let result = stack.iter().try_for_each(|m| m.apply(seq));
        seq.modifiers = stack;
        if let Err(err) = result {
            error!("Applying modifiers to '{}' failed: {}", seq.name, err);
            return Err(err);
        }
    }
    Ok(())
}

/// Assign the configured default skeletal mesh as preview mesh. Returns the
/// number of sequences updated; nothing happens without a configured mesh.
pub fn assign_preview_mesh(sequences: &mut [AnimSequence], settings: &SimpleAnimSettings) -> usize {
    let Some(mesh) = settings.default_skeletal_mesh.as_deref() else {
        warn!("No default skeletal mesh configured; preview mesh not assigned");
        return 0;
    };
    let mut updated = 0;
    for seq in sequences {
        if seq.preview_mesh.as_deref() != Some(mesh) {
            seq.preview_mesh = Some(mesh.to_string());
            seq.mark_dirty();
            updated += 1;
        }
    }
    updated
}

/// Print each asset name to the message log under `log_name`.
pub fn log_assets<'a, I>(names: I, log_name: &str)
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        warn!("[{}] {}", log_name, name);
    }
}
