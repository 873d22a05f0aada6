//! simple-anim sequence core (engine-agnostic)
//!
//! Skeletal animation sequences and the editor tooling built on them: pose
//! evaluation with root lock, looping detection, the copy-bones modifier,
//! batch asset edits and physics debug-draw primitives.

pub mod assets;
#[cfg(feature = "debug_draw")]
pub mod debug_draw;
pub mod error;
pub mod modifier;
pub mod pose;
pub mod sequence;
pub mod settings;
pub mod skeleton;
pub mod transform;

// Re-exports for consumers
pub use error::SequenceError;
pub use modifier::{AnimModifier, CopyBonePair, CopyBonesModifier, ModifierKind};
pub use pose::{compare_bone_transforms, AnimPose, PoseSpace};
pub use sequence::{is_looping_animation, AnimSequence, Notify};
pub use settings::SimpleAnimSettings;
pub use skeleton::{Bone, Skeleton};
pub use transform::{Quat, Transform, Vec3, QUAT_IDENTITY};

/// Sequence result type
pub type Result<T> = core::result::Result<T, SequenceError>;
