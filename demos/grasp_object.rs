// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use nalgebra::{Isometry3, Vector3};
use robotiq_sim::{
    BodyDescription, BodyHandle, ConstraintHandle, ContactPoint, Gripper, JointIndex, LinkDynamics,
    LinkIndex, MotorCommand, PhysicsWorld, RayHit, SimResult,
};

/// An example showing how to drive the simulated gripper. A tiny kinematic world stands
/// in for a real physics engine: the driven joint integrates its commanded velocity and
/// the jaws stop on an object of the given width resting on a table.
#[derive(Parser, Debug)]
#[clap(author, version, name = "grasp_object")]
struct CommandLineArguments {
    /// Width of the object between the jaws in meter
    #[clap(long, default_value = "0.03")]
    pub object_width: f64,
    /// How long to keep closing before checking the grasp, in milliseconds
    #[clap(long, default_value = "800")]
    pub settle_ms: u64,
}

const ROBOT: BodyHandle = BodyHandle(1);
const GRIPPER_BODY: BodyHandle = BodyHandle(2);
const OBJECT: BodyHandle = BodyHandle(3);
const TABLE: BodyHandle = BodyHandle(4);
const TOOL: LinkIndex = LinkIndex(11);

/// Fully open jaw width of the 2F-85. [m]
const MAX_WIDTH: f64 = 0.085;
/// Driven joint angle at which the jaws would touch each other. [rad]
const DRIVEN_CLOSED: f64 = 0.8;
/// Pad-to-pad distance of the fully closed gripper. [m]
const CLOSED_WIDTH_OFFSET: f64 = 0.047813;
/// Integration step per joint read, matching the mimic poll interval. [s]
const TIME_STEP: f64 = 0.001;

struct ToyState {
    driven_pos: f64,
    driven_velocity: f64,
}

/// Kinematic stand-in for a physics engine, just expressive enough for this demo.
struct ToyWorld {
    object_width: f64,
    state: Mutex<ToyState>,
}

impl ToyWorld {
    fn new(object_width: f64) -> Self {
        ToyWorld {
            object_width,
            state: Mutex::new(ToyState {
                driven_pos: 0.,
                driven_velocity: 0.,
            }),
        }
    }

    /// Driven angle at which the jaws rest on the object.
    fn driven_limit(&self) -> f64 {
        DRIVEN_CLOSED * (1. - self.object_width / MAX_WIDTH)
    }

    fn width(&self) -> f64 {
        let pos = self.state.lock().unwrap().driven_pos;
        MAX_WIDTH * (1. - pos / DRIVEN_CLOSED)
    }
}

impl PhysicsWorld for ToyWorld {
    fn load_body(
        &self,
        _description: &BodyDescription,
        _pose: &Isometry3<f64>,
    ) -> SimResult<BodyHandle> {
        Ok(GRIPPER_BODY)
    }

    fn num_joints(&self, _body: BodyHandle) -> SimResult<usize> {
        Ok(12)
    }

    fn create_fixed_constraint(
        &self,
        _parent: BodyHandle,
        _parent_link: LinkIndex,
        _child: BodyHandle,
        _child_link: LinkIndex,
        _child_frame: &Isometry3<f64>,
    ) -> SimResult<ConstraintHandle> {
        Ok(ConstraintHandle(1))
    }

    fn set_link_dynamics(
        &self,
        _body: BodyHandle,
        _link: LinkIndex,
        _dynamics: &LinkDynamics,
    ) -> SimResult<()> {
        Ok(())
    }

    fn joint_position(&self, _body: BodyHandle, _joint: JointIndex) -> SimResult<f64> {
        let mut state = self.state.lock().unwrap();
        let limit = self.driven_limit();
        state.driven_pos = (state.driven_pos + state.driven_velocity * TIME_STEP)
            .max(0.)
            .min(limit);
        Ok(state.driven_pos)
    }

    fn set_joint_motor(
        &self,
        _body: BodyHandle,
        _joint: JointIndex,
        command: &MotorCommand,
    ) -> SimResult<()> {
        if let MotorCommand::Velocity { target, .. } = command {
            self.state.lock().unwrap().driven_velocity = *target;
        }
        Ok(())
    }

    fn set_joint_motor_array(
        &self,
        _body: BodyHandle,
        _joints: &[JointIndex],
        _commands: &[MotorCommand],
    ) -> SimResult<()> {
        // the linkage is implicit in this toy; position targets are accepted and dropped
        Ok(())
    }

    fn link_position(&self, body: BodyHandle, link: LinkIndex) -> SimResult<Vector3<f64>> {
        if body == ROBOT && link == TOOL {
            return Ok(Vector3::new(0., 0., 0.6));
        }
        let pad_offset = (self.width() + CLOSED_WIDTH_OFFSET) / 2.;
        match link {
            LinkIndex(0) => Ok(Vector3::new(0., 0., 0.5)),
            LinkIndex(4) => Ok(Vector3::new(-pad_offset, 0., 0.45)),
            LinkIndex(9) => Ok(Vector3::new(pad_offset, 0., 0.45)),
            _ => Ok(Vector3::new(0., 0., 0.5)),
        }
    }

    fn contact_points(&self, body: BodyHandle) -> SimResult<Vec<ContactPoint>> {
        // the object always rests on the table; the jaws touch it once closed down
        let mut points = Vec::new();
        if body == OBJECT {
            points.push(ContactPoint {
                body_a: OBJECT,
                link_a: LinkIndex(-1),
                body_b: TABLE,
                link_b: LinkIndex(-1),
            });
            if self.width() <= self.object_width + 1e-9 {
                points.push(ContactPoint {
                    body_a: OBJECT,
                    link_a: LinkIndex(-1),
                    body_b: GRIPPER_BODY,
                    link_b: LinkIndex(4),
                });
            }
        }
        Ok(points)
    }

    fn ray_test(&self, _from: &Vector3<f64>, _to: &Vector3<f64>) -> SimResult<RayHit> {
        Ok(RayHit {
            body: Some(OBJECT),
            link: LinkIndex(-1),
            fraction: 0.8,
        })
    }
}

fn main() -> SimResult<()> {
    tracing_subscriber::fmt::init();
    let args: CommandLineArguments = CommandLineArguments::parse();
    let world = Arc::new(ToyWorld::new(args.object_width));
    let description = BodyDescription::new("assets/robotiq_2f_85.urdf");
    let mut gripper = Gripper::new(world, ROBOT, TOOL, &description)?;
    println!("jaws open at {:.4} m", gripper.grasp_width()?);

    gripper.activate()?;
    std::thread::sleep(Duration::from_millis(args.settle_ms));
    let state = gripper.state()?;
    println!(
        "jaws settled at {:.4} m (activated: {})",
        state.width, state.activated
    );
    if gripper.detect_contact()? {
        println!("grasped the object, releasing it again");
    } else {
        eprintln!("nothing grasped");
    }

    gripper.release()?;
    std::thread::sleep(Duration::from_millis(args.settle_ms));
    println!("jaws back at {:.4} m", gripper.grasp_width()?);
    Ok(())
}
