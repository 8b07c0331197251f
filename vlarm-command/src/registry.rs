use indexmap::{map::Entry, IndexMap};
use schemars::schema::RootSchema;
use serde_json::Value;
use tracing::{debug, info, warn};
use vlarm_client::PhosphobotClient;

use crate::{catalogue, Error, Outcome};

/// Sends the request of a command. Request failures are returned as [`Error::Request`].
pub type Handler = fn(&PhosphobotClient, Value) -> Result<(), Error>;

/// A named command exposed to the host.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub success_message: &'static str,
    pub error_message: &'static str,
    pub schema: fn() -> RootSchema,
    pub handler: Handler,
}

impl CommandDescriptor {
    /// JSON schema of the command arguments.
    pub fn input_schema(&self) -> RootSchema {
        (self.schema)()
    }
}

/// Commands in registration order, keyed by unique name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<&'static str, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every command of [`catalogue`].
    pub fn standard() -> Result<Self, Error> {
        let mut registry = Self::new();
        for descriptor in catalogue() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), Error> {
        match self.commands.entry(descriptor.name) {
            Entry::Occupied(_) => Err(Error::DuplicateCommand(descriptor.name.to_owned())),
            Entry::Vacant(entry) => {
                debug!(name = descriptor.name, "register command");
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs a command.
    ///
    /// Request failures become [`Outcome::Error`]. Only an unknown name or
    /// malformed arguments return `Err`.
    pub fn invoke(
        &self,
        client: &PhosphobotClient,
        name: &str,
        arguments: Value,
    ) -> Result<Outcome, Error> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_owned()))?;
        debug!(name, ?arguments, "invoke command");
        match (descriptor.handler)(client, arguments) {
            Ok(()) => {
                info!(name, "command succeeded");
                Ok(Outcome::Success {
                    message: descriptor.success_message,
                })
            }
            Err(Error::Request(cause)) => {
                warn!(name, kind = %cause.kind(), error = %cause, "command failed");
                Ok(Outcome::Error {
                    message: descriptor.error_message,
                    cause,
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use schemars::schema_for;

    use super::*;
    use crate::NoArguments;

    fn failing_handler(_: &PhosphobotClient, _: Value) -> Result<(), Error> {
        Err(vlarm_client::Error::Network {
            url: "http://localhost/".to_owned(),
            message: "connection refused".to_owned(),
        }
        .into())
    }

    fn descriptor(name: &'static str) -> CommandDescriptor {
        CommandDescriptor {
            name,
            description: "test",
            success_message: "Success: ok.",
            error_message: "Error: not ok.",
            schema: || schema_for!(NoArguments),
            handler: |_, _| Ok(()),
        }
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor("a")).unwrap();
        registry.register(descriptor("b")).unwrap();
        assert!(matches!(
            registry.register(descriptor("a")),
            Err(Error::DuplicateCommand(name)) if name == "a"
        ));
        assert_eq!(registry.names(), ["a", "b"]);
    }

    #[test]
    fn test_invoke() {
        let client = PhosphobotClient::new(Default::default()).unwrap();
        let mut registry = CommandRegistry::new();
        registry.register(descriptor("ok")).unwrap();
        registry
            .register(CommandDescriptor {
                handler: failing_handler,
                ..descriptor("fail")
            })
            .unwrap();

        let outcome = registry.invoke(&client, "ok", Value::Null).unwrap();
        assert_eq!(outcome.message(), "Success: ok.");
        let outcome = registry.invoke(&client, "fail", Value::Null).unwrap();
        assert_eq!(outcome.message(), "Error: not ok.");
        assert!(matches!(
            registry.invoke(&client, "missing", Value::Null),
            Err(Error::UnknownCommand(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_standard_registry() {
        let registry = CommandRegistry::standard().unwrap();
        assert_eq!(registry.len(), 12);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.names(),
            [
                "initialize_bot",
                "move_to_absolute",
                "say_hello",
                "fine_tuned_control",
                "open_gripper",
                "close_gripper",
                "move_arm_up",
                "move_arm_down",
                "move_arm_left",
                "move_arm_right",
                "gravity_compensation_on",
                "gravity_compensation_off",
            ]
        );
    }
}
