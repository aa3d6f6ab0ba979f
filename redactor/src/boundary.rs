//! Entry points: the [`Redactor`] boundary and the [`Redact`] extension trait.
//!
//! Both take exclusive ownership of the value for the duration of the walk and
//! redact it in place. Keep a copy if you need the original.

use slog::Logger;

use crate::{
    capability::{CapabilityPredicate, DenyAll},
    engine::{Applicator, Context, Traverse},
    error::ConfigurationError,
};

/// A configured redaction boundary: one caller's predicate plus an optional
/// logger.
///
/// ```rust
/// use redactor::{CapabilitySet, Redact, Redactable, Redactor};
///
/// #[derive(Redact)]
/// struct User {
///     name: String,
///     #[redact("user:password:read")]
///     password: Redactable<String>,
/// }
///
/// let grants: CapabilitySet = ["user:email:read"].into_iter().collect();
/// let redactor = Redactor::with_predicate(grants);
///
/// let user = redactor
///     .apply(|| User {
///         name: "John Doe".into(),
///         password: Redactable::new("catsaredumb".into()),
///     })
///     .unwrap();
///
/// assert_eq!(user.name, "John Doe");
/// assert!(user.password.is_withheld());
/// ```
#[derive(Clone, Debug)]
pub struct Redactor<P = DenyAll> {
    predicate: P,
    logger: Option<Logger>,
}

impl Redactor<DenyAll> {
    /// A fail-closed redactor that withholds every gated field.
    #[must_use]
    pub fn new() -> Self {
        Self::with_predicate(DenyAll)
    }
}

impl Default for Redactor<DenyAll> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Redactor<P>
where
    P: CapabilityPredicate,
{
    /// A redactor that consults `predicate` for every gated field.
    #[must_use]
    pub fn with_predicate(predicate: P) -> Self {
        Self {
            predicate,
            logger: None,
        }
    }

    /// Logs withheld fields and configuration errors to `logger` at debug level.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Returns the predicate this redactor consults.
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// Redacts `value` in place.
    pub fn redact<T>(&self, value: &mut T) -> Result<(), ConfigurationError>
    where
        T: Traverse + ?Sized,
    {
        let context = Context::new(&self.predicate, self.logger.as_ref());
        Applicator::from_shape(value.shape(), context).redact()
    }

    /// Takes ownership of `value`, redacts it, and hands it back.
    pub fn redact_owned<T>(&self, mut value: T) -> Result<T, ConfigurationError>
    where
        T: Traverse,
    {
        self.redact(&mut value)?;
        Ok(value)
    }

    /// Runs `produce` to completion and redacts its result before returning it.
    ///
    /// This is the boundary a service method's result crosses on its way to
    /// the caller.
    pub fn apply<T, F>(&self, produce: F) -> Result<T, ConfigurationError>
    where
        T: Traverse,
        F: FnOnce() -> T,
    {
        self.redact_owned(produce())
    }
}

/// Public entrypoint for redaction on traversable types.
///
/// This trait is blanket-implemented for all [`Traverse`] types, which
/// includes every type deriving `Redact` and the standard containers of them.
pub trait Redact: Traverse {
    /// Redacts in place with the fail-closed predicate: every gated field is
    /// withheld.
    fn redact(&mut self) -> Result<(), ConfigurationError> {
        self.redact_with(&DenyAll)
    }

    /// Redacts in place, withholding the fields `predicate` does not grant.
    fn redact_with(&mut self, predicate: &dyn CapabilityPredicate) -> Result<(), ConfigurationError> {
        Applicator::create(self, predicate).redact()
    }

    /// Consumes `self` and returns the redacted value.
    fn redacted_with(mut self, predicate: &dyn CapabilityPredicate) -> Result<Self, ConfigurationError>
    where
        Self: Sized,
    {
        self.redact_with(predicate)?;
        Ok(self)
    }
}

impl<T> Redact for T where T: Traverse + ?Sized {}
