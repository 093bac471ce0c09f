// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! # robotiq-sim
//! robotiq-sim models a [Robotiq 2F-85](https://robotiq.com/products/2f85-140-adaptive-robot-gripper)
//! parallel-jaw gripper mounted on a robot arm inside a rigid-body physics simulation.
//!
//! The physics engine itself is an external collaborator reached through the narrow
//! [`PhysicsWorld`](`crate::world::PhysicsWorld`) trait; this crate only issues queries and
//! commands against it. Rigid-body dynamics, collision detection, constraint solving and
//! ray casting all stay inside the engine.
//!
//! ## Design
//! The library is divided into three main modules:
//! * [gripper](`crate::gripper`) - the gripper controller, its state snapshot and the
//! background joint-mimicry task.
//! * [world](`crate::world`) - the physics-engine interface and the value types spoken
//! over it.
//! * [exception](`crate::exception`) - error and Result definitions.
//!
//! # Example:
//!```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use robotiq_sim::{BodyDescription, BodyHandle, Gripper, LinkIndex, PhysicsWorld, SimResult};
//!
//! fn grasp<W: PhysicsWorld + 'static>(
//!     world: Arc<W>,
//!     robot: BodyHandle,
//!     tool: LinkIndex,
//! ) -> SimResult<()> {
//!     let description = BodyDescription::new("assets/robotiq_2f_85.urdf");
//!     let mut gripper = Gripper::new(world, robot, tool, &description)?;
//!     gripper.activate()?;
//!     std::thread::sleep(Duration::from_secs(1));
//!     if gripper.detect_contact()? {
//!         println!("holding an object {:.3} m wide", gripper.grasp_width()?);
//!     } else {
//!         gripper.release()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`Gripper::new`](`crate::Gripper::new`) loads the gripper body into the world, mounts
//! it to the arm's tool link and starts the mimicry task that keeps the finger linkage
//! consistent. [`activate`](`crate::Gripper::activate`) and
//! [`release`](`crate::Gripper::release`) only command the driven joint's motor and
//! return immediately; the physical result has to be polled through
//! [`grasp_width`](`crate::Gripper::grasp_width`) and
//! [`detect_contact`](`crate::Gripper::detect_contact`).
pub mod exception;
pub mod gripper;
pub mod world;

pub use exception::{SimException, SimResult};
pub use gripper::gripper_state::GripperState;
pub use gripper::{Gripper, GripperConfig};
pub use world::types::{
    BodyDescription, BodyHandle, ConstraintHandle, ContactPoint, JointIndex, LinkDynamics,
    LinkIndex, MotorCommand, RayHit,
};
pub use world::PhysicsWorld;
