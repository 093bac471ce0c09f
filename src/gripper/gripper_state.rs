// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the robotiq_sim::GripperState type.

use serde::Deserialize;
use serde::Serialize;

/// Describes the gripper state.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct GripperState {
    /// Current opening width between the finger pads. Unit: \[m\].
    ///
    /// Approximates the width of an object held between the jaws; near zero or slightly
    /// negative when the gripper is fully closed on nothing.
    pub width: f64,

    /// Whether the last command drove the jaws towards closing.
    ///
    /// Reflects the last commanded direction, not a measured physical state. It does not
    /// guarantee the jaws have reached any position.
    pub activated: bool,
}
