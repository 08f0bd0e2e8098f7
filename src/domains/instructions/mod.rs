//! Instructions domain module.
//!
//! Instructions are short pieces of user-scoped guidance with an optional
//! category and a priority from 1 to 5. This module holds the record model and
//! the repository that applies the business rules on top of the record store.
//!
//! - `model.rs` - record shape, priority rules, inputs and outputs
//! - `repository.rs` - list/add/update/delete and aggregation operations
//! - `error.rs` - validation, not-found and store errors

mod error;
pub mod model;
mod repository;

pub use error::{InstructionError, InstructionResult};
pub use model::{
    DeleteConfirmation, Instruction, InstructionList, InstructionPatch, NewInstruction, Priority,
};
pub use repository::InstructionRepository;
