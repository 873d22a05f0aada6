//! Debug-draw primitives for physics bodies and capsule components.
//!
//! Nothing is rendered here: callers receive [`DebugPrimitive`]s in world
//! space and hand them to whatever line renderer the host provides.

use serde::{Deserialize, Serialize};

use crate::transform::{quat_mul, quat_normalize, quat_rotate, Quat, Transform, Vec3, QUAT_IDENTITY};

/// Segment count used for debug spheres.
pub const SPHERE_SEGMENTS: u32 = 12;

/// Linear-space RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "one")]
    pub a: f32,
}

fn one() -> f32 {
    1.0
}

/// 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.999).floor() as u8
}

impl LinearColor {
    pub const ORANGE: LinearColor = LinearColor::rgb(1.0, 0.5, 0.0);
    pub const CYAN: LinearColor = LinearColor::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: LinearColor = LinearColor::rgb(1.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Gamma-encode to 8-bit sRGB; alpha stays linear.
    pub fn to_srgb(self) -> Color {
        Color {
            r: quantize(linear_to_srgb(self.r)),
            g: quantize(linear_to_srgb(self.g)),
            b: quantize(linear_to_srgb(self.b)),
            a: quantize(self.a),
        }
    }
}

/// Line settings shared by every primitive of one draw call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugDrawSettings {
    pub persistent: bool,
    /// Seconds; negative means a single frame.
    pub duration: f32,
    pub thickness: f32,
}

impl Default for DebugDrawSettings {
    fn default() -> Self {
        Self {
            persistent: false,
            duration: -1.0,
            thickness: 0.0,
        }
    }
}

/// Network role of the pawn being drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetRole {
    #[default]
    None,
    SimulatedProxy,
    AutonomousProxy,
    Authority,
}

/// Which roles get drawn, and in which color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDrawSettings {
    pub draw_authority: bool,
    pub draw_local: bool,
    pub draw_simulated: bool,
    pub authority_color: LinearColor,
    pub local_color: LinearColor,
    pub simulated_color: LinearColor,
}

impl Default for RoleDrawSettings {
    fn default() -> Self {
        Self {
            draw_authority: false,
            draw_local: true,
            draw_simulated: false,
            authority_color: LinearColor::ORANGE,
            local_color: LinearColor::CYAN,
            simulated_color: LinearColor::MAGENTA,
        }
    }
}

impl RoleDrawSettings {
    /// Color to draw `role` with, or `None` when that role is filtered out.
    pub fn color_for(&self, role: NetRole) -> Option<LinearColor> {
        match role {
            NetRole::SimulatedProxy if self.draw_simulated => Some(self.simulated_color),
            NetRole::AutonomousProxy if self.draw_local => Some(self.local_color),
            NetRole::Authority if self.draw_authority => Some(self.authority_color),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereElem {
    #[serde(default)]
    pub center: Vec3,
    pub radius: f32,
}

/// Box with full edge lengths `x`, `y`, `z`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxElem {
    #[serde(default)]
    pub center: Vec3,
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Capsule along local Z; `length` excludes the hemispherical caps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleElem {
    #[serde(default)]
    pub center: Vec3,
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
    pub radius: f32,
    pub length: f32,
}

fn identity_rotation() -> Quat {
    QUAT_IDENTITY
}

/// Collision geometry of one physics body, in body space.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySetup {
    pub spheres: Vec<SphereElem>,
    pub boxes: Vec<BoxElem>,
    pub capsules: Vec<CapsuleElem>,
}

/// A simulated body: its geometry (if any) and world transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyInstance {
    #[serde(default)]
    pub setup: Option<BodySetup>,
    #[serde(default)]
    pub world_transform: Transform,
}

/// Standalone capsule; `half_height` includes the cap radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleComponent {
    #[serde(default)]
    pub world_transform: Transform,
    pub radius: f32,
    pub half_height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DebugShape {
    Sphere {
        center: Vec3,
        radius: f32,
        segments: u32,
    },
    Box {
        center: Vec3,
        extent: Vec3,
        rotation: Quat,
    },
    Capsule {
        center: Vec3,
        half_height: f32,
        radius: f32,
        rotation: Quat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DebugPrimitive {
    pub shape: DebugShape,
    pub color: Color,
    pub persistent: bool,
    pub duration: f32,
    pub thickness: f32,
}

impl DebugPrimitive {
    fn new(shape: DebugShape, color: Color, settings: &DebugDrawSettings) -> Self {
        Self {
            shape,
            color,
            persistent: settings.persistent,
            duration: settings.duration,
            thickness: settings.thickness,
        }
    }
}

// Element center scaled by the body, then placed in world space.
fn element_center(body: &Transform, center: Vec3) -> Vec3 {
    let s = body.scale;
    let scaled = [center[0] * s[0], center[1] * s[1], center[2] * s[2]];
    let r = quat_rotate(body.rotation, scaled);
    [
        body.translation[0] + r[0],
        body.translation[1] + r[1],
        body.translation[2] + r[2],
    ]
}

fn element_rotation(body: &Transform, rotation: Quat) -> Quat {
    quat_normalize(quat_mul(body.rotation, rotation))
}

/// World-space primitives for every shape of every body with geometry.
pub fn physics_body_primitives(
    bodies: &[BodyInstance],
    color: LinearColor,
    settings: &DebugDrawSettings,
) -> Vec<DebugPrimitive> {
    let color = color.to_srgb();
    let mut out = Vec::new();
    for body in bodies {
        let Some(setup) = &body.setup else {
            continue;
        };
        let tm = &body.world_transform;
        let scale = tm.scale;

        for sphere in &setup.spheres {
            let shape = DebugShape::Sphere {
                center: element_center(tm, sphere.center),
                radius: sphere.radius * scale[0],
                segments: SPHERE_SEGMENTS,
            };
            out.push(DebugPrimitive::new(shape, color, settings));
        }
        for b in &setup.boxes {
            let shape = DebugShape::Box {
                center: element_center(tm, b.center),
                extent: [
                    b.x * scale[0] * 0.5,
                    b.y * scale[1] * 0.5,
                    b.z * scale[2] * 0.5,
                ],
                rotation: element_rotation(tm, b.rotation),
            };
            out.push(DebugPrimitive::new(shape, color, settings));
        }
        for c in &setup.capsules {
            let radius = c.radius * scale[0];
            let shape = DebugShape::Capsule {
                center: element_center(tm, c.center),
                half_height: c.length * 0.5 * scale[2] + radius,
                radius,
                rotation: element_rotation(tm, c.rotation),
            };
            out.push(DebugPrimitive::new(shape, color, settings));
        }
    }
    out
}

/// [`physics_body_primitives`] filtered and colored by the pawn's role.
pub fn pawn_physics_body_primitives(
    role: NetRole,
    bodies: &[BodyInstance],
    roles: &RoleDrawSettings,
    settings: &DebugDrawSettings,
) -> Vec<DebugPrimitive> {
    match roles.color_for(role) {
        Some(color) => physics_body_primitives(bodies, color, settings),
        None => Vec::new(),
    }
}

pub fn capsule_primitive(
    capsule: &CapsuleComponent,
    color: LinearColor,
    settings: &DebugDrawSettings,
) -> DebugPrimitive {
    let tm = &capsule.world_transform;
    let radius = capsule.radius * tm.scale[0].abs().min(tm.scale[1].abs());
    let shape = DebugShape::Capsule {
        center: tm.translation,
        half_height: capsule.half_height * tm.scale[2].abs(),
        radius,
        rotation: tm.rotation,
    };
    DebugPrimitive::new(shape, color.to_srgb(), settings)
}

pub fn pawn_capsule_primitive(
    role: NetRole,
    capsule: &CapsuleComponent,
    roles: &RoleDrawSettings,
    settings: &DebugDrawSettings,
) -> Option<DebugPrimitive> {
    roles
        .color_for(role)
        .map(|color| capsule_primitive(capsule, color, settings))
}
