#![doc = include_str!("../README.md")]

mod catalogue;
mod error;
mod outcome;
mod registry;
mod robot_command;

pub use crate::{catalogue::*, error::*, outcome::*, registry::*, robot_command::*};
