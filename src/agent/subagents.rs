//! Delegates the runtime may hand work to
//!
//! These are configuration only. The runtime decides when to invoke them,
//! based on each definition's description.

use std::collections::BTreeMap;

use crate::config::{AgentDefinition, Model};
use crate::tools::Tool;

pub const EXPLAINER: &str = "explainer";
pub const REVIEWER: &str = "reviewer";

pub fn explainer() -> AgentDefinition {
    AgentDefinition::new(
        "Use for explaining any concepts to beginners.",
        "You are a patient, detailed explainer that uses simple language and analogies to explain concepts to beginners.",
    )
    .with_tools([Tool::Read, Tool::Edit])
    .with_model(Model::Haiku)
}

/// Inherits the parent's tools
pub fn reviewer() -> AgentDefinition {
    AgentDefinition::new(
        "Use for reviewing my responses.",
        "You are a friendly and helpful assistant that reviews my responses and provides feedback.",
    )
    .with_model(Model::Haiku)
}

/// All subagents, keyed by name
pub fn subagents() -> BTreeMap<String, AgentDefinition> {
    BTreeMap::from([
        (EXPLAINER.to_string(), explainer()),
        (REVIEWER.to_string(), reviewer()),
    ])
}
