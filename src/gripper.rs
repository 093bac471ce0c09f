// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//!  Contains the robotiq_sim::Gripper type.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use std::time::Duration;

use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use tracing::debug;

use crate::exception::SimResult;
use crate::gripper::gripper_state::GripperState;
use crate::gripper::mimic::{MimicTask, DRIVEN_JOINT};
use crate::world::types::{
    BodyDescription, BodyHandle, ConstraintHandle, LinkDynamics, LinkIndex, MotorCommand, RayHit,
};
use crate::world::PhysicsWorld;

pub mod gripper_state;
pub(crate) mod mimic;

/// Base link of the gripper body, the side mounted to the arm.
const BASE_LINK: LinkIndex = LinkIndex(0);
/// Left and right finger pad links.
const LEFT_PAD_LINK: LinkIndex = LinkIndex(4);
const RIGHT_PAD_LINK: LinkIndex = LinkIndex(9);
/// Pad-to-pad distance when fully closed on nothing. \[m\]
const CLOSED_WIDTH_OFFSET: f64 = 0.047813;
/// Width below which an activated gripper counts as closed on nothing. \[m\]
const EMPTY_WIDTH_THRESHOLD: f64 = 0.01;
/// Driven-joint motor velocities for closing and opening. \[rad/s\]
const CLOSING_VELOCITY: f64 = 1.0;
const OPENING_VELOCITY: f64 = -1.0;
/// Force cap of the driven joint's motor. \[N\]
const MOTOR_FORCE: f64 = 10.0;

/// Construction parameters of a [`Gripper`].
///
/// The defaults spawn the body at its nominal pose and mount it 7 cm below the tool
/// frame, rotated 90° about Z, with the high-friction pad material on every link.
#[derive(Debug, Clone)]
pub struct GripperConfig {
    /// World pose the body description is loaded at.
    pub spawn_pose: Isometry3<f64>,
    /// Pose of the mount constraint in the gripper base frame, relative to the tool link.
    pub mount_frame: Isometry3<f64>,
    /// Contact material applied to every link.
    pub dynamics: LinkDynamics,
    /// Polling interval of the joint-mimicry task.
    pub poll_interval: Duration,
}

impl Default for GripperConfig {
    fn default() -> Self {
        GripperConfig {
            spawn_pose: Isometry3::from_parts(
                Translation3::new(0.1339999999999999, -0.49199999999872496, 0.5),
                UnitQuaternion::from_euler_angles(PI, 0., PI),
            ),
            mount_frame: Isometry3::from_parts(
                Translation3::new(0., 0., -0.07),
                UnitQuaternion::from_euler_angles(0., 0., FRAC_PI_2),
            ),
            dynamics: LinkDynamics::high_friction(),
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Controls a simulated Robotiq 2F-85 mounted on a robot arm, provides contact and
/// grasp-width queries, and keeps the finger linkage consistent through a background
/// joint-mimicry task for as long as it exists.
pub struct Gripper<W: PhysicsWorld + 'static> {
    world: Arc<W>,
    robot: BodyHandle,
    tool: LinkIndex,
    body: BodyHandle,
    n_joints: usize,
    activated: bool,
    _mount: ConstraintHandle,
    _mimic: MimicTask,
}

impl<W: PhysicsWorld + 'static> Gripper<W> {
    /// Loads the gripper body into the world, mounts it to the robot arm and starts the
    /// joint-mimicry task.
    /// # Arguments
    /// * `world` - Physics world the gripper lives in.
    /// * `robot` - Body of the robot arm the gripper is mounted to.
    /// * `tool` - Link of the robot arm serving as the tool point.
    /// * `description` - Body description of the Robotiq 2F-85.
    /// # Errors
    /// * [`BodyLoadException`](`crate::exception::SimException::BodyLoadException`) if the
    /// body description cannot be loaded. This is fatal.
    /// * [`CommandException`](`crate::exception::SimException::CommandException`) if the
    /// engine rejects the mount constraint or a dynamics override.
    pub fn new(
        world: Arc<W>,
        robot: BodyHandle,
        tool: LinkIndex,
        description: &BodyDescription,
    ) -> SimResult<Gripper<W>> {
        Gripper::with_config(world, robot, tool, description, GripperConfig::default())
    }

    /// Like [`new`](`Gripper::new`) but with explicit construction parameters.
    pub fn with_config(
        world: Arc<W>,
        robot: BodyHandle,
        tool: LinkIndex,
        description: &BodyDescription,
        config: GripperConfig,
    ) -> SimResult<Gripper<W>> {
        let body = world.load_body(description, &config.spawn_pose)?;
        let n_joints = world.num_joints(body)?;
        let mount = world.create_fixed_constraint(robot, tool, body, BASE_LINK, &config.mount_frame)?;
        for joint in 0..n_joints {
            world.set_link_dynamics(body, LinkIndex(joint as i32), &config.dynamics)?;
        }
        let mimic = MimicTask::spawn(Arc::clone(&world), body, config.poll_interval);
        debug!("gripper body {:?} mounted on {:?}", body, robot);
        Ok(Gripper {
            world,
            robot,
            tool,
            body,
            n_joints,
            activated: false,
            _mount: mount,
            _mimic: mimic,
        })
    }

    /// Closes the gripper fingers.
    ///
    /// Returns immediately; closing continues in the background through the mimicry task.
    /// Poll [`grasp_width`](`Gripper::grasp_width`) or
    /// [`detect_contact`](`Gripper::detect_contact`) to learn the physical result.
    /// Calling this while already activated re-issues the same command.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn activate(&mut self) -> SimResult<()> {
        self.world.set_joint_motor(
            self.body,
            DRIVEN_JOINT,
            &MotorCommand::Velocity {
                target: CLOSING_VELOCITY,
                max_force: MOTOR_FORCE,
            },
        )?;
        self.activated = true;
        debug!("gripper {:?} closing", self.body);
        Ok(())
    }

    /// Opens the gripper fingers.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn release(&mut self) -> SimResult<()> {
        self.world.set_joint_motor(
            self.body,
            DRIVEN_JOINT,
            &MotorCommand::Velocity {
                target: OPENING_VELOCITY,
                max_force: MOTOR_FORCE,
            },
        )?;
        self.activated = false;
        debug!("gripper {:?} opening", self.body);
        Ok(())
    }

    /// Whether the last command drove the jaws towards closing.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Number of joints of the loaded gripper body.
    pub fn num_joints(&self) -> usize {
        self.n_joints
    }

    /// Returns the current opening width between the finger pads.
    ///
    /// Measured as the distance between the two pad links minus the nominal
    /// pad-to-pad distance of the fully closed gripper, so it approximates the width
    /// of an object held between the jaws. Near zero or slightly negative when fully
    /// closed on nothing.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn grasp_width(&self) -> SimResult<f64> {
        let lpad = self.world.link_position(self.body, LEFT_PAD_LINK)?;
        let rpad = self.world.link_position(self.body, RIGHT_PAD_LINK)?;
        Ok((lpad - rpad).norm() - CLOSED_WIDTH_OFFSET)
    }

    /// Casts a ray from the arm's tool point through the gripper and reports what it hits.
    ///
    /// The ray runs along the unit vector from the tool point towards the gripper base
    /// and ends one unit length past the base, probing whatever lies beyond the gripper
    /// on that line. Coincident tool and base positions leave the ray direction undefined.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn check_proximity(&self) -> SimResult<RayHit> {
        let ee_pos = self.world.link_position(self.robot, self.tool)?;
        let base_pos = self.world.link_position(self.body, BASE_LINK)?;
        let vec = (base_pos - ee_pos).normalize();
        let target = base_pos + vec;
        self.world.ray_test(&ee_pos, &target)
    }

    /// Returns whether `body` touches anything other than the gripper.
    ///
    /// Contact points whose other participant is the gripper body itself are discarded.
    /// # Arguments
    /// * `body` - Body to query; the gripper's own body if `None`.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn external_contact(&self, body: Option<BodyHandle>) -> SimResult<bool> {
        let body = body.unwrap_or(self.body);
        let points = self.world.contact_points(body)?;
        Ok(points.iter().any(|point| point.body_b != self.body))
    }

    /// Returns whether the gripper currently holds something against the world.
    ///
    /// Only meaningful while activated; a released gripper reports no contact. When the
    /// jaws are closed on nothing the gripper body itself is checked for external
    /// contact, otherwise the object found along the proximity ray is. A ray that
    /// resolves to the gripper itself or to nothing reports no contact.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn detect_contact(&self) -> SimResult<bool> {
        if !self.activated {
            return Ok(false);
        }
        let hit = self.check_proximity()?;
        let empty = self.grasp_width()? < EMPTY_WIDTH_THRESHOLD;
        match hit.body {
            None => Ok(false),
            Some(body) if body == self.body => Ok(false),
            Some(body) => {
                let candidate = if empty { self.body } else { body };
                self.external_contact(Some(candidate))
            }
        }
    }

    /// Takes a snapshot of the gripper state.
    /// # Errors
    /// * [`WorldException`](`crate::exception::SimException::WorldException`) if the body
    /// is no longer part of the world.
    pub fn state(&self) -> SimResult<GripperState> {
        Ok(GripperState {
            width: self.grasp_width()?,
            activated: self.activated,
        })
    }
}
