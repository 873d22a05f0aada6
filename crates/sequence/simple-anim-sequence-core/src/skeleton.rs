//! Reference skeleton: bone hierarchy plus reference (bind) pose.
//!
//! Bone 0 is the root. Every other bone names a parent with a lower index, so
//! iterating bones in index order always visits parents before children.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::transform::Transform;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<usize>,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }
}

/// Serialized shape of a [`Skeleton`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SkeletonDef {
    bones: Vec<Bone>,
    ref_pose: Vec<Transform>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "SkeletonDef", into = "SkeletonDef")]
pub struct Skeleton {
    bones: Vec<Bone>,
    ref_pose: Vec<Transform>,
    index: HashMap<String, usize>,
}

impl PartialEq for Skeleton {
    fn eq(&self, other: &Self) -> bool {
        self.bones == other.bones && self.ref_pose == other.ref_pose
    }
}

impl TryFrom<SkeletonDef> for Skeleton {
    type Error = SequenceError;

    fn try_from(def: SkeletonDef) -> Result<Self, Self::Error> {
        Skeleton::new(def.bones, def.ref_pose)
    }
}

impl From<Skeleton> for SkeletonDef {
    fn from(skeleton: Skeleton) -> Self {
        SkeletonDef {
            bones: skeleton.bones,
            ref_pose: skeleton.ref_pose,
        }
    }
}

fn invalid(reason: String) -> SequenceError {
    SequenceError::InvalidSkeleton { reason }
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>, ref_pose: Vec<Transform>) -> Result<Self, SequenceError> {
        if bones.is_empty() {
            return Err(invalid("skeleton has no bones".into()));
        }
        if bones.len() != ref_pose.len() {
            return Err(invalid(format!(
                "{} bones but {} reference transforms",
                bones.len(),
                ref_pose.len()
            )));
        }

        let mut index = HashMap::with_capacity(bones.len());
        for (i, bone) in bones.iter().enumerate() {
            match (i, bone.parent) {
                (0, None) => {}
                (0, Some(_)) => {
                    return Err(invalid(format!("root bone '{}' has a parent", bone.name)))
                }
                (_, None) => {
                    return Err(invalid(format!(
                        "bone '{}' has no parent; only bone 0 may be a root",
                        bone.name
                    )))
                }
                (_, Some(p)) if p >= i => {
                    return Err(invalid(format!(
                        "bone '{}' (index {i}) has parent {p}; parents must precede children",
                        bone.name
                    )))
                }
                _ => {}
            }
            if index.insert(bone.name.clone(), i).is_some() {
                return Err(invalid(format!("duplicate bone name '{}'", bone.name)));
            }
        }

        Ok(Self {
            bones,
            ref_pose,
            index,
        })
    }

    #[inline]
    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    pub fn ref_pose(&self) -> &[Transform] {
        &self.ref_pose
    }

    #[inline]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn bone_name(&self, bone: usize) -> Option<&str> {
        self.bones.get(bone).map(|b| b.name.as_str())
    }

    #[inline]
    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.bones.get(bone).and_then(|b| b.parent)
    }
}
