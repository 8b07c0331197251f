use clap::Args;
use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vlarm_client::{AbsolutePose, PhosphobotClient, TeleopCommand};

use crate::{CommandDescriptor, Error};

/// Magnitude of the fixed up/down/left/right moves.
pub const ARM_STEP: i64 = 20;

/// Arguments of commands that take none.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoArguments {}

/// Teleoperation message passed through to `/move/teleop` unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Args)]
pub struct FineTunedControl {
    #[arg(long, allow_hyphen_values = true)]
    pub x: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub y: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub z: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub rx: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub ry: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub rz: i64,
    /// Gripper opening.
    #[arg(long, allow_hyphen_values = true)]
    pub open: i64,
    /// Name of the sender.
    #[arg(long)]
    pub source: String,
    #[arg(long, allow_hyphen_values = true)]
    pub timestamp: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub direction_x: i64,
    #[arg(long, allow_hyphen_values = true)]
    pub direction_y: i64,
}

impl From<&FineTunedControl> for TeleopCommand {
    fn from(args: &FineTunedControl) -> Self {
        TeleopCommand {
            x: Some(args.x),
            y: Some(args.y),
            z: Some(args.z),
            rx: Some(args.rx),
            ry: Some(args.ry),
            rz: Some(args.rz),
            open: Some(args.open),
            source: Some(args.source.clone()),
            timestamp: Some(args.timestamp),
            direction_x: Some(args.direction_x),
            direction_y: Some(args.direction_y),
        }
    }
}

fn no_arguments_schema() -> RootSchema {
    schema_for!(NoArguments)
}

fn fine_tuned_control_schema() -> RootSchema {
    schema_for!(FineTunedControl)
}

fn initialize_bot(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    Ok(client.init()?)
}

fn move_to_absolute(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    Ok(client.move_absolute(&AbsolutePose::default())?)
}

fn say_hello(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    Ok(client.hello()?)
}

fn fine_tuned_control(client: &PhosphobotClient, arguments: Value) -> Result<(), Error> {
    let args: FineTunedControl = serde_json::from_value(arguments)
        .map_err(|e| Error::InvalidArguments("fine_tuned_control".to_owned(), e))?;
    Ok(client.teleop(&TeleopCommand::from(&args))?)
}

fn teleop(client: &PhosphobotClient, command: TeleopCommand) -> Result<(), Error> {
    Ok(client.teleop(&command)?)
}

fn open_gripper(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            open: Some(1),
            ..Default::default()
        },
    )
}

fn close_gripper(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            open: Some(0),
            ..Default::default()
        },
    )
}

fn move_arm_up(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            z: Some(ARM_STEP),
            ..Default::default()
        },
    )
}

fn move_arm_down(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            z: Some(-ARM_STEP),
            ..Default::default()
        },
    )
}

fn move_arm_left(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            y: Some(-ARM_STEP),
            ..Default::default()
        },
    )
}

fn move_arm_right(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    teleop(
        client,
        TeleopCommand {
            y: Some(ARM_STEP),
            ..Default::default()
        },
    )
}

fn gravity_compensation_on(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    Ok(client.gravity_start()?)
}

fn gravity_compensation_off(client: &PhosphobotClient, _: Value) -> Result<(), Error> {
    Ok(client.gravity_stop()?)
}

/// All commands, in the order they are registered.
pub fn catalogue() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            name: "initialize_bot",
            description: "**NECESSARY STARTING COMMAND** Initialize the robot to its initial position. Necessary before starting any series of actions and before running move_to_absolute.",
            success_message: "Success: Robot initialized to its initial position.",
            error_message: "Error: Unable to initialize the robot to its initial position.",
            schema: no_arguments_schema,
            handler: initialize_bot,
        },
        CommandDescriptor {
            name: "move_to_absolute",
            description: "**NECESSARY STARTING COMMAND** Move the robot to its absolute position. Should be called after initialize_bot.",
            success_message: "Success: Robot moved to absolute position.",
            error_message: "Error: Unable to move the robot to absolute position.",
            schema: no_arguments_schema,
            handler: move_to_absolute,
        },
        CommandDescriptor {
            name: "say_hello",
            description: "Make the robot move its gripper to say hello. Useful as a testing command.",
            success_message: "Success: Robot said hello.",
            error_message: "Error: Unable to say hello.",
            schema: no_arguments_schema,
            handler: say_hello,
        },
        CommandDescriptor {
            name: "fine_tuned_control",
            description: "Move the robot's arm with fine-tuned control using specified parameters.",
            success_message: "Success: Moved arm as specified.",
            error_message: "Error: Unable to move arm.",
            schema: fine_tuned_control_schema,
            handler: fine_tuned_control,
        },
        CommandDescriptor {
            name: "open_gripper",
            description: "Open the robot's gripper.",
            success_message: "Success: Gripper opened.",
            error_message: "Error: Unable to open gripper.",
            schema: no_arguments_schema,
            handler: open_gripper,
        },
        CommandDescriptor {
            name: "close_gripper",
            description: "Close the robot's gripper.",
            success_message: "Success: Gripper closed.",
            error_message: "Error: Unable to close gripper.",
            schema: no_arguments_schema,
            handler: close_gripper,
        },
        CommandDescriptor {
            name: "move_arm_up",
            description: "Move the robot's arm up by 20 units.",
            success_message: "Success: Arm moved up.",
            error_message: "Error: Unable to move arm up.",
            schema: no_arguments_schema,
            handler: move_arm_up,
        },
        CommandDescriptor {
            name: "move_arm_down",
            description: "Move the robot's arm down by 20 units.",
            success_message: "Success: Arm moved down.",
            error_message: "Error: Unable to move arm down.",
            schema: no_arguments_schema,
            handler: move_arm_down,
        },
        CommandDescriptor {
            name: "move_arm_left",
            description: "Move the robot's arm left by 20 units.",
            success_message: "Success: Arm moved left.",
            error_message: "Error: Unable to move arm left.",
            schema: no_arguments_schema,
            handler: move_arm_left,
        },
        CommandDescriptor {
            name: "move_arm_right",
            description: "Move the robot's arm right by 20 units.",
            success_message: "Success: Arm moved right.",
            error_message: "Error: Unable to move arm right.",
            schema: no_arguments_schema,
            handler: move_arm_right,
        },
        CommandDescriptor {
            name: "gravity_compensation_on",
            description: "Enable gravity compensation for the robot's arm.",
            success_message: "Success: Gravity compensation enabled.",
            error_message: "Error: Unable to enable gravity compensation.",
            schema: no_arguments_schema,
            handler: gravity_compensation_on,
        },
        CommandDescriptor {
            name: "gravity_compensation_off",
            description: "Disable gravity compensation for the robot's arm.",
            success_message: "Success: Gravity compensation disabled.",
            error_message: "Error: Unable to disable gravity compensation.",
            schema: no_arguments_schema,
            handler: gravity_compensation_off,
        },
    ]
}
