// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Value types spoken over the physics-world interface.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Opaque handle to a body living in a physics world.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// Index of a link within a multi-link body. Engines report `-1` for the base.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LinkIndex(pub i32);

/// Index of a joint within a multi-link body.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct JointIndex(pub usize);

/// Opaque handle to a constraint created in a physics world.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(pub u64);

/// Reference to a body description (URDF or similar) loadable by the engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BodyDescription {
    /// Path to the description file.
    pub path: PathBuf,
}

impl BodyDescription {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        BodyDescription { path: path.into() }
    }
}

/// Contact material parameters of one link.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct LinkDynamics {
    pub lateral_friction: f64,
    pub spinning_friction: f64,
    pub rolling_friction: f64,
    /// Anchor friction forces to avoid drift of grasped objects.
    pub friction_anchor: bool,
}

impl LinkDynamics {
    /// The high-friction material applied to every gripper link, so grasped
    /// objects do not slip between the finger pads.
    pub fn high_friction() -> Self {
        LinkDynamics {
            lateral_friction: 10.0,
            spinning_friction: 1.0,
            rolling_friction: 1.0,
            friction_anchor: true,
        }
    }
}

/// A motor command for one joint.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum MotorCommand {
    /// Servo the joint towards `target` with proportional gain `gain`.
    Position { target: f64, gain: f64 },
    /// Spin the joint at `target` velocity, applying at most `max_force`.
    Velocity { target: f64, max_force: f64 },
}

/// One contact point reported by the engine, with `body_a` being the queried body.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ContactPoint {
    pub body_a: BodyHandle,
    pub link_a: LinkIndex,
    pub body_b: BodyHandle,
    pub link_b: LinkIndex,
}

/// Result of a ray cast.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct RayHit {
    /// The first body hit, or `None` if the ray traversed fully.
    pub body: Option<BodyHandle>,
    /// Link of the hit body that was struck, `-1` for its base.
    pub link: LinkIndex,
    /// Fraction of the ray length at which the hit occurred, in `[0, 1]`.
    /// `1.0` means the ray was not stopped short.
    pub fraction: f64,
}

impl RayHit {
    /// A ray that traversed its full length without hitting anything.
    pub fn miss() -> Self {
        RayHit {
            body: None,
            link: LinkIndex(-1),
            fraction: 1.0,
        }
    }
}
