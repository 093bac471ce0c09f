// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Background task mirroring the driven joint onto the passive finger joints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::exception::SimResult;
use crate::world::types::{BodyHandle, JointIndex, MotorCommand};
use crate::world::PhysicsWorld;

/// The one joint whose motor is commanded directly. All finger motion derives from it.
pub(crate) const DRIVEN_JOINT: JointIndex = JointIndex(1);

/// The controlled joints of the finger linkage, in the order they are commanded.
const MIMIC_JOINTS: [JointIndex; 5] = [
    JointIndex(6),
    JointIndex(3),
    JointIndex(8),
    JointIndex(5),
    JointIndex(10),
];

/// Sign applied to the driven position for each entry of [`MIMIC_JOINTS`], so the
/// two fingers close and open symmetrically.
const MIMIC_SIGNS: [f64; 5] = [1.0, -1.0, -1.0, 1.0, 1.0];

const MIMIC_GAIN: f64 = 1.0;

/// Reads the driven joint and commands the five linkage joints once.
///
/// The body does not have a true closed kinematic loop in the engine, so the linkage
/// constraint is enforced by servoing each passive joint to the driven position every cycle.
pub(crate) fn mimic_cycle<W: PhysicsWorld + ?Sized>(world: &W, body: BodyHandle) -> SimResult<()> {
    let driven = world.joint_position(body, DRIVEN_JOINT)?;
    let mut commands = [MotorCommand::Position {
        target: 0.,
        gain: MIMIC_GAIN,
    }; 5];
    for (command, sign) in commands.iter_mut().zip(MIMIC_SIGNS.iter()) {
        *command = MotorCommand::Position {
            target: sign * driven,
            gain: MIMIC_GAIN,
        };
    }
    world.set_joint_motor_array(body, &MIMIC_JOINTS, &commands)
}

/// Owns the background thread running [`mimic_cycle`] at a fixed cadence.
///
/// Dropping the task raises its cancellation flag and joins the thread. A failing world
/// query also ends the thread, permanently; the gripper is then assumed to be gone along
/// with its world, so nobody is told.
pub(crate) struct MimicTask {
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MimicTask {
    pub(crate) fn spawn<W: PhysicsWorld + 'static>(
        world: Arc<W>,
        body: BodyHandle,
        poll_interval: Duration,
    ) -> MimicTask {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let thread = std::thread::spawn(move || {
            debug!("mimic task started for body {:?}", body);
            while !cancel_flag.load(Ordering::Relaxed) {
                if let Err(error) = mimic_cycle(world.as_ref(), body) {
                    debug!("mimic task stopped: {}", error);
                    return;
                }
                std::thread::sleep(poll_interval);
            }
            debug!("mimic task cancelled");
        });
        MimicTask {
            cancel,
            thread: Some(thread),
        }
    }
}

impl Drop for MimicTask {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use crate::exception::SimException;
    use crate::gripper::mimic::{mimic_cycle, MimicTask, DRIVEN_JOINT, MIMIC_JOINTS};
    use crate::world::types::{BodyHandle, MotorCommand};
    use crate::world::MockPhysicsWorld;
    use mockall::predicate::*;

    const BODY: BodyHandle = BodyHandle(2);

    #[test]
    fn cycle_mirrors_driven_joint_with_unit_gain() {
        let driven = 0.42;
        let mut world = MockPhysicsWorld::new();
        world
            .expect_joint_position()
            .with(eq(BODY), eq(DRIVEN_JOINT))
            .times(1)
            .returning(move |_, _| Ok(driven));
        world
            .expect_set_joint_motor_array()
            .withf(move |body, joints, commands| {
                let expected_targets = [driven, -driven, -driven, driven, driven];
                *body == BODY
                    && joints == &MIMIC_JOINTS[..]
                    && commands.len() == 5
                    && commands.iter().zip(expected_targets.iter()).all(
                        |(command, target)| {
                            *command
                                == MotorCommand::Position {
                                    target: *target,
                                    gain: 1.0,
                                }
                        },
                    )
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        mimic_cycle(&world, BODY).unwrap();
    }

    #[test]
    fn cycle_propagates_write_failure() {
        let mut world = MockPhysicsWorld::new();
        world.expect_joint_position().returning(|_, _| Ok(0.1));
        world.expect_set_joint_motor_array().returning(|_, _, _| {
            Err(SimException::WorldException {
                message: "body gone".to_string(),
            })
        });
        assert!(mimic_cycle(&world, BODY).is_err());
    }

    #[test]
    fn task_stops_on_world_error() {
        let mut world = MockPhysicsWorld::new();
        world.expect_joint_position().returning(|_, _| {
            Err(SimException::WorldException {
                message: "body gone".to_string(),
            })
        });
        let task = MimicTask::spawn(Arc::new(world), BODY, Duration::from_millis(1));
        let start = Instant::now();
        while !task.thread.as_ref().unwrap().is_finished() {
            assert!(start.elapsed() < Duration::from_secs(1));
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn task_joins_on_drop() {
        let mut world = MockPhysicsWorld::new();
        world.expect_joint_position().returning(|_, _| Ok(0.0));
        world
            .expect_set_joint_motor_array()
            .returning(|_, _, _| Ok(()));
        let task = MimicTask::spawn(Arc::new(world), BODY, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        // joins inside drop; the test hangs if cancellation is broken
        drop(task);
    }
}
