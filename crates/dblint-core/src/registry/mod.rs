//! Declarative rule specs, validation, and the rule registry.
//!
//! Follows a DTO → domain-model split: [`RuleSpecRaw`] is what serde
//! produces from a rule file, [`Rule`] is the validated form, and
//! [`RuleRegistry`] is the immutable aggregate handed to the engine.

mod dto;
mod loader;
mod model;

pub use dto::{RuleFileDto, RuleSpecRaw};
pub use loader::{load, load_with_config, RegistryError};
pub use model::{
    AttrConstraint, AttrExpectation, LiteralPattern, PatternSpec, Rule, RuleCategory, RuleRegistry,
};

impl RuleRegistry {
    /// Convenience wrapper around [`load`].
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if any spec is invalid.
    pub fn load(specs: Vec<RuleSpecRaw>) -> Result<Self, RegistryError> {
        load(specs)
    }
}
