// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the physics-world collaborator interface.

use nalgebra::{Isometry3, Vector3};

use crate::exception::SimResult;
use crate::world::types::{
    BodyDescription, BodyHandle, ConstraintHandle, ContactPoint, JointIndex, LinkDynamics,
    LinkIndex, MotorCommand, RayHit,
};

pub mod types;

#[cfg(test)]
use mockall::automock;

/// Narrow interface to an external rigid-body physics engine.
///
/// The gripper only ever issues these queries and commands; rigid-body dynamics, collision
/// detection, constraint solving and ray casting all happen inside the engine. Implement this
/// trait once per engine to drive the gripper from that engine's world.
///
/// All methods take `&self`: the engine is expected to serialize its own internal stepping
/// against these calls, the way simulation servers already do for their client APIs.
#[cfg_attr(test, automock)]
pub trait PhysicsWorld: Send + Sync {
    /// Loads a multi-link body into the world at the given pose and returns its handle.
    /// # Errors
    /// * [`BodyLoadException`](`crate::exception::SimException::BodyLoadException`) if the
    /// description cannot be loaded.
    fn load_body(&self, description: &BodyDescription, pose: &Isometry3<f64>)
        -> SimResult<BodyHandle>;

    /// Returns the number of joints of a body.
    fn num_joints(&self, body: BodyHandle) -> SimResult<usize>;

    /// Creates a rigid fixed constraint between a link of `parent` and a link of `child`.
    ///
    /// `child_frame` is the pose of the constraint in the child frame, relative to the
    /// parent link.
    fn create_fixed_constraint(
        &self,
        parent: BodyHandle,
        parent_link: LinkIndex,
        child: BodyHandle,
        child_link: LinkIndex,
        child_frame: &Isometry3<f64>,
    ) -> SimResult<ConstraintHandle>;

    /// Overrides the contact material of one link.
    fn set_link_dynamics(
        &self,
        body: BodyHandle,
        link: LinkIndex,
        dynamics: &LinkDynamics,
    ) -> SimResult<()>;

    /// Reads the current measured position (angle) of one joint.
    fn joint_position(&self, body: BodyHandle, joint: JointIndex) -> SimResult<f64>;

    /// Sends a motor command to one joint.
    fn set_joint_motor(
        &self,
        body: BodyHandle,
        joint: JointIndex,
        command: &MotorCommand,
    ) -> SimResult<()>;

    /// Sends motor commands to several joints of one body in a single call.
    ///
    /// `joints` and `commands` must have the same length.
    fn set_joint_motor_array(
        &self,
        body: BodyHandle,
        joints: &[JointIndex],
        commands: &[MotorCommand],
    ) -> SimResult<()>;

    /// Reads the world position of one link's frame.
    fn link_position(&self, body: BodyHandle, link: LinkIndex) -> SimResult<Vector3<f64>>;

    /// Enumerates all contact points currently touching `body`, with `body` as the
    /// first participant of every returned point.
    fn contact_points(&self, body: BodyHandle) -> SimResult<Vec<ContactPoint>>;

    /// Casts a ray from `from` to `to` and reports the first hit.
    ///
    /// A ray that traverses fully without stopping short reports
    /// [`RayHit::miss`](`crate::world::types::RayHit::miss`).
    fn ray_test(&self, from: &Vector3<f64>, to: &Vector3<f64>) -> SimResult<RayHit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn _accepts_boxed(_: Box<dyn PhysicsWorld>) {}
    }

    #[test]
    fn mock_world_is_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<MockPhysicsWorld>();
    }
}
