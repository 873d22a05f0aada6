//! Bone transforms: translation, rotation (quaternion x,y,z,w) and scale.
//!
//! Composition follows the usual parent-then-child convention:
//! `world = parent.compose(&local)`, and `local = world.relative_to(&parent)`.

use serde::{Deserialize, Serialize};

pub type Vec3 = [f32; 3];
pub type Quat = [f32; 4];

pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

#[inline]
fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
fn add3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
fn sub3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn mul3(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

#[inline]
fn cross3(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

// Zero scale components collapse to zero rather than producing infinities.
#[inline]
fn safe_div3(a: Vec3, b: Vec3) -> Vec3 {
    let div = |x: f32, y: f32| if y.abs() <= f32::EPSILON { 0.0 } else { x / y };
    [div(a[0], b[0]), div(a[1], b[1]), div(a[2], b[2])]
}

#[inline]
fn dot4(a: Quat, b: Quat) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
pub fn quat_normalize(mut q: Quat) -> Quat {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

#[inline]
pub fn quat_conjugate(q: Quat) -> Quat {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Hamilton product `a * b` (apply `b`, then `a`).
#[inline]
pub fn quat_mul(a: Quat, b: Quat) -> Quat {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

/// Rotate `v` by unit quaternion `q`.
#[inline]
pub fn quat_rotate(q: Quat, v: Vec3) -> Vec3 {
    let u = [q[0], q[1], q[2]];
    let w = q[3];
    let t = cross3(u, v);
    let t = [2.0 * t[0], 2.0 * t[1], 2.0 * t[2]];
    let c = cross3(u, t);
    [
        v[0] + w * t[0] + c[0],
        v[1] + w * t[1] + c[1],
        v[2] + w * t[2] + c[2],
    ]
}

/// Quaternion NLERP with shortest-arc correction.
#[inline]
pub fn quat_nlerp(a: Quat, mut b: Quat, t: f32) -> Quat {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    quat_normalize([
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ])
}

/// Rotation of `angle` radians about the unit `axis`.
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    let (s, c) = (angle * 0.5).sin_cos();
    quat_normalize([axis[0] * s, axis[1] * s, axis[2] * s, c])
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default = "default_rotation")]
    pub rotation: Quat,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_rotation() -> Quat {
    QUAT_IDENTITY
}

fn default_scale() -> Vec3 {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation: QUAT_IDENTITY,
        scale: [1.0, 1.0, 1.0],
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = quat_normalize(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Apply this transform to a point (scale, rotate, translate).
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        add3(self.translation, quat_rotate(self.rotation, mul3(self.scale, p)))
    }

    /// Express a child-local transform in this transform's space.
    pub fn compose(&self, local: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(local.translation),
            rotation: quat_normalize(quat_mul(self.rotation, local.rotation)),
            scale: mul3(self.scale, local.scale),
        }
    }

    /// Inverse of [`Transform::compose`]: the local transform that places
    /// `self` under `parent`.
    pub fn relative_to(&self, parent: &Transform) -> Transform {
        let inv_rot = quat_conjugate(parent.rotation);
        let local_t = quat_rotate(inv_rot, sub3(self.translation, parent.translation));
        Transform {
            translation: safe_div3(local_t, parent.scale),
            rotation: quat_normalize(quat_mul(inv_rot, self.rotation)),
            scale: safe_div3(self.scale, parent.scale),
        }
    }

    /// Component-wise blend with rotation NLERP.
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            translation: lerp_vec3(self.translation, other.translation, t),
            rotation: quat_nlerp(self.rotation, other.rotation, t),
            scale: lerp_vec3(self.scale, other.scale, t),
        }
    }

    /// Every component within `tolerance`. Rotations match up to sign.
    pub fn equals(&self, other: &Transform, tolerance: f32) -> bool {
        let near = |a: &[f32], b: &[f32]| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance);
        let negated = [
            -other.rotation[0],
            -other.rotation[1],
            -other.rotation[2],
            -other.rotation[3],
        ];
        let rotation_ok =
            near(&self.rotation[..], &other.rotation[..]) || near(&self.rotation[..], &negated[..]);
        rotation_ok
            && near(&self.translation[..], &other.translation[..])
            && near(&self.scale[..], &other.scale[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotate_quarter_turn_about_z() {
        let q = quat_from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_2);
        let v = quat_rotate(q, [1.0, 0.0, 0.0]);
        assert!((v[0]).abs() < 1e-6);
        assert!((v[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn compose_then_relative_round_trips() {
        let parent = Transform::from_translation([1.0, 2.0, 3.0])
            .with_rotation(quat_from_axis_angle([0.0, 1.0, 0.0], 0.7))
            .with_scale([2.0, 2.0, 2.0]);
        let local = Transform::from_translation([0.5, -1.0, 0.25])
            .with_rotation(quat_from_axis_angle([1.0, 0.0, 0.0], -0.3));
        let world = parent.compose(&local);
        let back = world.relative_to(&parent);
        assert!(back.equals(&local, 1e-5));
    }

    #[test]
    fn equals_accepts_negated_rotation() {
        let a = Transform::IDENTITY;
        let mut b = Transform::IDENTITY;
        b.rotation = [0.0, 0.0, 0.0, -1.0];
        assert!(a.equals(&b, 1e-6));
        b.translation[0] = 0.1;
        assert!(!a.equals(&b, 0.05));
    }
}
