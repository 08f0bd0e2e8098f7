//! Instruction repository.
//!
//! Business rules over the record store: defaults and validation on add,
//! owner/category filtering and priority ordering on list, merge semantics on
//! update, and category aggregation. The repository holds no state besides
//! the store handle, so clones are cheap and share the same table.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::{InstructionError, InstructionResult};
use super::model::{
    DeleteConfirmation, Instruction, InstructionList, InstructionPatch, NewInstruction, Priority,
    fields, next_update_timestamp, now, sort_by_priority, timestamp,
};
use crate::core::store::{
    PRIMARY_KEY, Record, RecordStore, ScanFilter, StoreError, UpdateExpression,
};

const ADDING: &str = "adding instruction";
const UPDATING: &str = "updating instruction";

/// Repository of instruction records.
#[derive(Clone)]
pub struct InstructionRepository {
    store: Arc<dyn RecordStore>,
}

impl InstructionRepository {
    /// Create a repository over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// List the instructions of `user_id`, highest priority first.
    ///
    /// When `category` is given (and non-empty) only instructions with exactly
    /// that category are returned. Instructions of equal priority keep the
    /// order the store returned them in.
    pub async fn list(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> InstructionResult<InstructionList> {
        let mut filter = ScanFilter::all().eq(fields::USER_ID, user_id);
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            filter = filter.eq(fields::CATEGORY, category);
        }

        let records = self
            .store
            .scan(&filter)
            .await
            .map_err(InstructionError::during("getting instructions"))?;

        let mut instructions = decode_all(records);
        sort_by_priority(&mut instructions);

        debug!(user_id, count = instructions.len(), "listed instructions");
        Ok(InstructionList::from(instructions))
    }

    /// Create and persist a new instruction.
    ///
    /// Empty content is rejected before anything is written. An out-of-range
    /// priority is replaced with the default rather than rejected.
    pub async fn add(&self, new: NewInstruction) -> InstructionResult<Instruction> {
        if new.content.is_empty() {
            return Err(InstructionError::validation(
                ADDING,
                "Instruction content cannot be empty",
            ));
        }

        let instruction = Instruction::new(new.user_id, new.content, new.category, new.priority);
        let record = instruction
            .to_record()
            .map_err(|e| InstructionError::store(ADDING, StoreError::from(e)))?;

        self.store
            .put(record)
            .await
            .map_err(InstructionError::during(ADDING))?;

        info!(
            "Added instruction {} for user {} (priority {})",
            instruction.id, instruction.user_id, instruction.priority
        );
        Ok(instruction)
    }

    /// Apply `patch` to an existing instruction and return the updated record.
    ///
    /// Only the fields present in the patch change; `updated_at` is refreshed
    /// on every call. Concurrent updates of the same id are last-write-wins.
    pub async fn update(
        &self,
        instruction_id: &str,
        patch: InstructionPatch,
    ) -> InstructionResult<Instruction> {
        if patch.content.as_deref() == Some("") {
            return Err(InstructionError::validation(
                UPDATING,
                "Instruction content cannot be empty",
            ));
        }

        let existing = self
            .store
            .get(instruction_id)
            .await
            .map_err(InstructionError::during(UPDATING))?
            .ok_or_else(|| InstructionError::not_found(UPDATING, instruction_id))?;
        let existing = Instruction::from_record(existing)?;

        let updated_at = next_update_timestamp(existing.updated_at, now());
        let mut expression =
            UpdateExpression::new().set(fields::UPDATED_AT, timestamp::format(&updated_at));

        if let Some(content) = patch.content {
            expression = expression.set(fields::CONTENT, content);
        }
        if let Some(category) = patch.category {
            expression = expression.set(fields::CATEGORY, category);
        }
        if let Some(priority) = patch.priority {
            expression = expression.set(fields::PRIORITY, Priority::coerce(priority).value());
        }

        let record = self
            .store
            .update(instruction_id, &expression)
            .await
            .map_err(InstructionError::during(UPDATING))?;

        match Instruction::from_record(record) {
            Ok(instruction) => {
                info!("Updated instruction {}", instruction_id);
                Ok(instruction)
            }
            Err(e) => {
                // Deleted between the read and the write: the upsert left a
                // partial record behind.
                warn!(
                    "Instruction {} disappeared during update ({}), removing partial record",
                    instruction_id, e
                );
                self.store
                    .delete(instruction_id)
                    .await
                    .map_err(InstructionError::during(UPDATING))?;
                Err(InstructionError::not_found(UPDATING, instruction_id))
            }
        }
    }

    /// Delete an instruction.
    ///
    /// There is no existence check: deleting an unknown id succeeds.
    pub async fn delete(&self, instruction_id: &str) -> InstructionResult<DeleteConfirmation> {
        self.store
            .delete(instruction_id)
            .await
            .map_err(InstructionError::during("deleting instruction"))?;

        info!("Deleted instruction {}", instruction_id);
        Ok(DeleteConfirmation::new(instruction_id))
    }

    /// Every instruction across all owners, in store order.
    pub async fn list_all(&self) -> InstructionResult<Vec<Instruction>> {
        let records = self
            .store
            .scan(&ScanFilter::all())
            .await
            .map_err(InstructionError::during("getting all instructions"))?;

        Ok(decode_all(records))
    }

    /// Distinct non-empty categories across all instructions, in first-seen order.
    pub async fn list_categories(&self) -> InstructionResult<Vec<String>> {
        let records = self
            .store
            .scan(&ScanFilter::all())
            .await
            .map_err(InstructionError::during("getting categories"))?;

        let mut categories: Vec<String> = Vec::new();
        for record in &records {
            let Some(category) = record.get(fields::CATEGORY).and_then(|v| v.as_str()) else {
                continue;
            };
            if !category.is_empty() && !categories.iter().any(|c| c == category) {
                categories.push(category.to_string());
            }
        }

        Ok(categories)
    }
}

/// Decode scanned records, skipping any that are not valid instructions.
fn decode_all(records: Vec<Record>) -> Vec<Instruction> {
    records
        .into_iter()
        .filter_map(|record| {
            let key = record
                .get(PRIMARY_KEY)
                .and_then(|v| v.as_str())
                .unwrap_or("<no id>")
                .to_string();
            match Instruction::from_record(record) {
                Ok(instruction) => Some(instruction),
                Err(e) => {
                    warn!("Skipping malformed instruction record {}: {}", key, e);
                    None
                }
            }
        })
        .collect()
}
