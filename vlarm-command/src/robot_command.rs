use clap::Subcommand;
use serde_json::Value;
use vlarm_client::{PhosphobotClient, PhosphobotClientConfig};

use crate::{CommandRegistry, Error, FineTunedControl, Outcome};

/// Commands of the catalogue as command line subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
#[command(rename_all = "snake_case")]
pub enum RobotCommand {
    /// Initialize the robot to its initial position.
    InitializeBot,
    /// Move the robot to its absolute position.
    MoveToAbsolute,
    /// Open and close the gripper.
    SayHello,
    /// Send a teleoperation message.
    FineTunedControl(FineTunedControl),
    OpenGripper,
    CloseGripper,
    MoveArmUp,
    MoveArmDown,
    MoveArmLeft,
    MoveArmRight,
    GravityCompensationOn,
    GravityCompensationOff,
}

impl RobotCommand {
    /// Registered name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeBot => "initialize_bot",
            Self::MoveToAbsolute => "move_to_absolute",
            Self::SayHello => "say_hello",
            Self::FineTunedControl(_) => "fine_tuned_control",
            Self::OpenGripper => "open_gripper",
            Self::CloseGripper => "close_gripper",
            Self::MoveArmUp => "move_arm_up",
            Self::MoveArmDown => "move_arm_down",
            Self::MoveArmLeft => "move_arm_left",
            Self::MoveArmRight => "move_arm_right",
            Self::GravityCompensationOn => "gravity_compensation_on",
            Self::GravityCompensationOff => "gravity_compensation_off",
        }
    }

    pub fn arguments(&self) -> Result<Value, Error> {
        match self {
            Self::FineTunedControl(args) => serde_json::to_value(args)
                .map_err(|e| Error::InvalidArguments(self.name().to_owned(), e)),
            _ => Ok(Value::Object(Default::default())),
        }
    }
}

/// Runs registered commands against one robot.
#[derive(Debug)]
pub struct CommandExecutor {
    client: PhosphobotClient,
    registry: CommandRegistry,
}

impl CommandExecutor {
    pub fn new(client: PhosphobotClient, registry: CommandRegistry) -> Self {
        Self { client, registry }
    }

    /// Executor with the standard registry.
    pub fn try_from_config(config: PhosphobotClientConfig) -> Result<Self, Error> {
        Ok(Self::new(
            PhosphobotClient::new(config)?,
            CommandRegistry::standard()?,
        ))
    }

    pub fn client(&self) -> &PhosphobotClient {
        &self.client
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn invoke(&self, name: &str, arguments: Value) -> Result<Outcome, Error> {
        self.registry.invoke(&self.client, name, arguments)
    }

    pub fn execute(&self, command: &RobotCommand) -> Result<Outcome, Error> {
        self.invoke(command.name(), command.arguments()?)
    }
}
