//! Errors raised by the traversal engine.
//!
//! Authorization outcomes are never errors: an unauthorized field is simply
//! withheld. The only failures are mismatches between a type's declared field
//! table and its actual fields, which are configuration defects.

use thiserror::Error;

/// A field table that does not match the data it describes.
///
/// Raised at the first offending field. The value being redacted may already
/// be partially mutated and must be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A field requires a capability but is not wrapped in `Redactable`, so it
    /// cannot be withheld.
    #[error(
        "field `{shape}.{field}` requires capability `{capability}` but is not a `Redactable`"
    )]
    UnwrappedCapability {
        /// Shape declaring the field.
        shape: &'static str,
        /// Field name.
        field: &'static str,
        /// Capability the field requires.
        capability: &'static str,
    },
    /// A declared field has no accessor.
    #[error("field `{shape}.{field}` is declared but has no accessor")]
    MissingAccessor {
        /// Shape declaring the field.
        shape: &'static str,
        /// Field name.
        field: &'static str,
    },
    /// A sequence element does not declare the first element's field table.
    #[error(
        "sequence element {index} (`{found}`) declares a different field table than `{expected}`"
    )]
    MixedSequence {
        /// Shape of the first element.
        expected: &'static str,
        /// Shape of the offending element.
        found: &'static str,
        /// Position of the offending element among the walked elements.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::ConfigurationError;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigurationError::UnwrappedCapability {
            shape: "User",
            field: "password",
            capability: "pwd:read",
        };
        assert_eq!(
            err.to_string(),
            "field `User.password` requires capability `pwd:read` but is not a `Redactable`"
        );

        let err = ConfigurationError::MixedSequence {
            expected: "Employee",
            found: "Contractor",
            index: 2,
        };
        assert_eq!(
            err.to_string(),
            "sequence element 2 (`Contractor`) declares a different field table than `Employee`"
        );
    }

    #[test]
    fn errors_are_copied_out_of_the_walk() {
        let err = ConfigurationError::MissingAccessor {
            shape: "Truncated",
            field: "pin",
        };
        let logged = err;
        assert_eq!(logged, err);
        assert_eq!(
            err.to_string(),
            "field `Truncated.pin` is declared but has no accessor"
        );
    }
}
