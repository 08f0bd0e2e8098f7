//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod add_instruction;
pub mod common;
pub mod delete_instruction;
pub mod get_instructions;
pub mod update_instruction;

pub use add_instruction::{AddInstructionParams, AddInstructionTool};
pub use delete_instruction::{DeleteInstructionParams, DeleteInstructionTool};
pub use get_instructions::{GetInstructionsParams, GetInstructionsTool};
pub use update_instruction::{UpdateInstructionParams, UpdateInstructionTool};
