//! Cross-field validation.
//!
//! Rules implement [`Validate`] and are listed in [`ConfigSchema::validations`](crate::ConfigSchema::validations).
//! Each rule is an independent predicate over a fully resolved config producing zero or one error;
//! rules run only after every field has resolved successfully.

use std::fmt;

use crate::{
    ResolvedConfig,
    error::ValidationError,
    resolved::ResolvedValue,
};

/// Cross-field rule checked on a resolved config.
pub trait Validate: 'static + Send + Sync {
    /// Describes this rule.
    ///
    /// # Errors
    ///
    /// Should propagate formatting errors.
    fn describe(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Should return an error if the rule is violated.
    fn validate(&self, config: &ResolvedConfig) -> Result<(), ValidationError>;
}

impl fmt::Debug for dyn Validate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Validate")
            .field(&self.to_string())
            .finish()
    }
}

impl fmt::Display for dyn Validate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(formatter)
    }
}

/// Requires an optional `field` to be non-null if the enumerated `when_field` resolves
/// to the member with symbolic name `equals`.
#[derive(Debug)]
pub struct RequiredWhen {
    /// Optional field that becomes mandatory.
    pub field: &'static str,
    /// Enumerated field the requirement depends on.
    pub when_field: &'static str,
    /// Symbolic name of the member activating the requirement.
    pub equals: &'static str,
}

impl Validate for RequiredWhen {
    fn describe(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "`{}` is required if `{}` is {}",
            self.field, self.when_field, self.equals
        )
    }

    fn validate(&self, config: &ResolvedConfig) -> Result<(), ValidationError> {
        let Some(trigger) = config.enum_value(self.when_field) else {
            return Ok(());
        };
        if trigger.name() != self.equals {
            return Ok(());
        }
        match config.get(self.field) {
            None | Some(ResolvedValue::Null) => Err(ValidationError::missing_required_combination(
                format!("{} required for {} `{}`", self.field, self.when_field, trigger.value()),
            )),
            Some(_) => Ok(()),
        }
    }
}
