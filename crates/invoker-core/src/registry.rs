//! Explicit build step registration.
//!
//! Embedding applications build a [`StepRegistry`], call
//! [`register_builtin_steps`], and create configured steps by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::StepConfig;
use crate::error::{InvokerError, Result};
use crate::step::InvokerReportStep;

/// Id of the Maven Invoker report step.
pub const INVOKER_STEP_ID: &str = "maven-invoker-report";

/// Static description of a registrable step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub id: String,
    pub display_name: String,
}

impl StepDescriptor {
    pub fn invoker_report() -> Self {
        Self {
            id: INVOKER_STEP_ID.to_string(),
            display_name: "Maven Invoker Plugin Report".to_string(),
        }
    }
}

/// Creates a configured step.
pub type StepFactory = fn(StepConfig) -> InvokerReportStep;

#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    steps: BTreeMap<String, (StepDescriptor, StepFactory)>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: StepDescriptor, factory: StepFactory) -> Result<()> {
        if self.steps.contains_key(&descriptor.id) {
            return Err(InvokerError::DuplicateStep(descriptor.id));
        }
        self.steps.insert(descriptor.id.clone(), (descriptor, factory));
        Ok(())
    }

    pub fn descriptor(&self, id: &str) -> Option<&StepDescriptor> {
        self.steps.get(id).map(|(descriptor, _)| descriptor)
    }

    /// Registered descriptors, ordered by id.
    pub fn descriptors(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.values().map(|(descriptor, _)| descriptor)
    }

    pub fn create(&self, id: &str, config: StepConfig) -> Result<InvokerReportStep> {
        let (_, factory) = self
            .steps
            .get(id)
            .ok_or_else(|| InvokerError::UnknownStep(id.to_string()))?;
        Ok(factory(config))
    }
}

/// Register every step this crate provides.
pub fn register_builtin_steps(registry: &mut StepRegistry) -> Result<()> {
    registry.register(StepDescriptor::invoker_report(), InvokerReportStep::new)
}
