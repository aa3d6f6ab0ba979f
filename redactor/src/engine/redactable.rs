//! The visibility container for capability-gated fields.
//!
//! A [`Redactable`] is either *present* (holding the value the producer put in
//! it) or *withheld* (cleared by the engine because the caller lacked the
//! field's capability). The transition is one-way: nothing in this crate ever
//! turns a withheld value back into a present one.

use std::fmt;

use super::metadata::Traverse;

/// A field value that may be withheld from the caller.
///
/// The state is a single `Option<T>`, so "withheld" and "empty" are the same
/// thing. A present value that is itself nullable is spelled
/// `Redactable<Option<T>>`.
///
/// ```rust
/// use redactor::Redactable;
///
/// let mut password = Redactable::new("catsaredumb".to_string());
/// assert_eq!(password.value().map(String::as_str), Some("catsaredumb"));
///
/// password.withhold();
/// assert!(password.is_withheld());
/// assert_eq!(password.value(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Redactable<T> {
    value: Option<T>,
}

impl<T> Redactable<T> {
    /// Wraps `value` in the present state.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Alias for [`Redactable::new`].
    #[must_use]
    pub fn of(value: T) -> Self {
        Self::new(value)
    }

    /// Constructs a container that is already withheld.
    #[must_use]
    pub fn withheld() -> Self {
        Self { value: None }
    }

    /// Returns the value, or `None` once withheld.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns the value mutably, or `None` once withheld.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Consumes the container, returning the value if it is still present.
    pub fn into_inner(self) -> Option<T> {
        self.value
    }

    /// Returns `true` once the value has been withheld.
    pub fn is_withheld(&self) -> bool {
        self.value.is_none()
    }

    /// Clears the value. Calling this on a withheld container is a no-op.
    pub fn withhold(&mut self) {
        self.value = None;
    }
}

impl<T> From<T> for Redactable<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Redactable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Redactable").field(value).finish(),
            None => f.write_str("Redactable(<withheld>)"),
        }
    }
}

/// Object-safe view of a [`Redactable`] used by the traversal engine.
///
/// The engine never needs to know `T` to withhold the container. This is all
/// an opaque field offers.
pub trait Withhold {
    /// Clears the wrapped value in place.
    fn withhold(&mut self);
    /// Returns `true` once the wrapped value has been cleared.
    fn is_withheld(&self) -> bool;
}

impl<T> Withhold for Redactable<T> {
    fn withhold(&mut self) {
        Redactable::withhold(self);
    }

    fn is_withheld(&self) -> bool {
        Redactable::is_withheld(self)
    }
}

/// A [`Withhold`] container whose contents the engine can also walk.
pub trait Descend: Withhold {
    /// Returns the wrapped value for further traversal, if present.
    fn inner_mut(&mut self) -> Option<&mut dyn Traverse>;
}

impl<T> Descend for Redactable<T>
where
    T: Traverse,
{
    fn inner_mut(&mut self) -> Option<&mut dyn Traverse> {
        match &mut self.value {
            Some(value) => Some(value),
            None => None,
        }
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Redactable<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Redactable", 2)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("withheld", &self.is_withheld())?;
        state.end()
    }
}
