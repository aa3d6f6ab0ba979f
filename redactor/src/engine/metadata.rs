//! The field metadata contract consumed by the traversal engine.
//!
//! Every type the engine can walk answers two questions:
//!
//! - [`Traverse`]: *what shape is this value right now?* Absent, a graph of
//!   described fields, or a sequence of further values.
//! - [`Describe`]: *which fields does this graph declare?* An ordered, static
//!   table of [`FieldMetadata`] plus accessors that hand out a [`Slot`] per field.
//!
//! `#[derive(Redact)]` generates both for structs and enums. The impls below
//! cover the standard containers and leaf types.
//!
//! | Type | Shape |
//! |------|-------|
//! | `Option<T>` | `Empty` when `None`, otherwise the shape of `T` |
//! | `Box<T>` | The shape of `T` |
//! | `Redactable<T>` | `Empty` when withheld, otherwise the shape of `T` |
//! | `Vec<T>`, `VecDeque<T>`, `[T]`, `[T; N]` | Ordered `Sequence` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | Unordered `Sequence` of values |
//! | Primitives, `String`, `&str`, `Cow<str>`, `()`, `Duration`, `Instant`, `SystemTime` | `Graph` with no fields |
//! | `HashSet<T>`, `BTreeSet<T>`, `Rc<T>`, `Arc<T>`, tuples | `Empty` |
//!
//! Map keys are never walked. Set elements and shared pointees cannot be
//! mutated in place, and tuples declare no fields, so their contents pass
//! through untouched. Gate them with a `Redactable` to withhold them whole.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use super::redactable::{Descend, Redactable, Withhold};

/// One declared field of a described type.
///
/// Tables are built with `const fn`s so they can live in `static` memory:
///
/// ```rust
/// use redactor::FieldMetadata;
///
/// const FIELDS: &[FieldMetadata] = &[
///     FieldMetadata::new("name", 0),
///     FieldMetadata::new("password", 1).wrapped().requires("pwd:read"),
/// ];
/// assert_eq!(FIELDS[1].capability(), Some("pwd:read"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMetadata {
    name: &'static str,
    accessor: usize,
    capability: Option<&'static str>,
    wrapped: bool,
}

impl FieldMetadata {
    /// Declares an unrestricted, unwrapped field reachable through `accessor`.
    #[must_use]
    pub const fn new(name: &'static str, accessor: usize) -> Self {
        Self {
            name,
            accessor,
            capability: None,
            wrapped: false,
        }
    }

    /// Marks the field's declared type as a [`Redactable`].
    #[must_use]
    pub const fn wrapped(self) -> Self {
        Self {
            wrapped: true,
            ..self
        }
    }

    /// Requires `capability` to see the field. An empty string means unrestricted.
    #[must_use]
    pub const fn requires(self, capability: &'static str) -> Self {
        Self {
            capability: Some(capability),
            ..self
        }
    }

    /// Field name, for diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Index passed to [`Describe::field_mut`].
    pub const fn accessor(&self) -> usize {
        self.accessor
    }

    /// The capability required to see this field, if any.
    ///
    /// Empty strings are normalized to `None`.
    pub fn capability(&self) -> Option<&'static str> {
        self.capability.filter(|capability| !capability.is_empty())
    }

    /// Whether the field's declared type is a [`Redactable`].
    pub const fn is_wrapped(&self) -> bool {
        self.wrapped
    }
}

/// Mutable access to one field of a described value.
pub enum Slot<'a> {
    /// The field is a [`Redactable`] and can be withheld or walked into.
    Wrapped(&'a mut dyn Descend),
    /// The field is a [`Redactable`] that can only be withheld. Its contents
    /// are never walked.
    Opaque(&'a mut dyn Withhold),
    /// The field is a plain value that can only be walked into.
    Plain(&'a mut dyn Traverse),
}

impl<'a> Slot<'a> {
    /// Returns the value to descend into, unwrapping a [`Redactable`].
    ///
    /// A withheld container and an opaque field yield `None`.
    pub fn into_inner(self) -> Option<&'a mut dyn Traverse> {
        match self {
            Slot::Wrapped(wrapped) => wrapped.inner_mut(),
            Slot::Opaque(_) => None,
            Slot::Plain(plain) => Some(plain),
        }
    }
}

/// The runtime shape of a value, as classified by [`Traverse::shape`].
pub enum Shape<'a> {
    /// Nothing to walk.
    Empty,
    /// A value with a field table.
    Graph(&'a mut dyn Describe),
    /// A homogeneous collection of further values.
    Sequence(Vec<&'a mut dyn Traverse>),
}

/// A type whose field-level visibility is described by a static table.
///
/// Implement this with `#[derive(Redact)]`. Hand-written impls must return the
/// same table for every value of a given shape and must answer `field_mut` for
/// every accessor in that table.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not describe its fields",
    label = "this type has no field visibility table",
    note = "use `#[derive(Redact)]` on the type definition"
)]
pub trait Describe {
    /// Name of the runtime shape. Sequence elements must agree on it.
    fn shape_name(&self) -> &'static str;

    /// Declared fields, in declaration order.
    fn describe_fields(&self) -> &'static [FieldMetadata];

    /// Returns the field behind `accessor`, or `None` if there is no such field.
    fn field_mut(&mut self, accessor: usize) -> Option<Slot<'_>>;
}

/// A value the engine can classify and walk.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be walked for field visibility",
    label = "this type does not implement `Traverse`",
    note = "use `#[derive(Redact)]` on the type definition",
    note = "or remove `#[redact]` from the field so it passes through unchanged"
)]
pub trait Traverse {
    /// Classifies the current value.
    fn shape(&mut self) -> Shape<'_>;
}

// =============================================================================
// Leaf types
// =============================================================================

macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape_name(&self) -> &'static str {
                    stringify!($ty)
                }

                fn describe_fields(&self) -> &'static [FieldMetadata] {
                    &[]
                }

                fn field_mut(&mut self, _accessor: usize) -> Option<Slot<'_>> {
                    None
                }
            }

            impl Traverse for $ty {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Graph(self)
                }
            }
        )*
    };
}

impl_leaf!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64, (), Duration, Instant, SystemTime,
);

impl Describe for &str {
    fn shape_name(&self) -> &'static str {
        "&str"
    }

    fn describe_fields(&self) -> &'static [FieldMetadata] {
        &[]
    }

    fn field_mut(&mut self, _accessor: usize) -> Option<Slot<'_>> {
        None
    }
}

impl Traverse for &str {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Graph(self)
    }
}

impl Describe for Cow<'_, str> {
    fn shape_name(&self) -> &'static str {
        "Cow<str>"
    }

    fn describe_fields(&self) -> &'static [FieldMetadata] {
        &[]
    }

    fn field_mut(&mut self, _accessor: usize) -> Option<Slot<'_>> {
        None
    }
}

impl Traverse for Cow<'_, str> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::Graph(self)
    }
}

// =============================================================================
// Wrappers
// =============================================================================

impl<T> Traverse for Option<T>
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Empty,
        }
    }
}

impl<T> Traverse for Box<T>
where
    T: Traverse + ?Sized,
{
    fn shape(&mut self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T> Traverse for Redactable<T>
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        match self.value_mut() {
            Some(value) => value.shape(),
            None => Shape::Empty,
        }
    }
}

// =============================================================================
// Pass-through
// =============================================================================

macro_rules! impl_pass_through {
    ($($ty:ident<$($param:ident),+>),* $(,)?) => {
        $(
            impl<$($param),+> Traverse for $ty<$($param),+> {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Empty
                }
            }
        )*
    };
}

impl_pass_through!(HashSet<T, S>, BTreeSet<T>, Rc<T>, Arc<T>);

macro_rules! impl_pass_through_tuple {
    ($(($($param:ident),+)),* $(,)?) => {
        $(
            impl<$($param),+> Traverse for ($($param,)+) {
                fn shape(&mut self) -> Shape<'_> {
                    Shape::Empty
                }
            }
        )*
    };
}

impl_pass_through_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

// =============================================================================
// Sequences
// =============================================================================

fn erase<'v, T>(value: &'v mut T) -> &'v mut dyn Traverse
where
    T: Traverse + 'v,
{
    value
}

impl<T> Traverse for [T]
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        Shape::Sequence(self.iter_mut().map(erase).collect())
    }
}

impl<T, const N: usize> Traverse for [T; N]
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        self.as_mut_slice().shape()
    }
}

impl<T> Traverse for Vec<T>
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        self.as_mut_slice().shape()
    }
}

impl<T> Traverse for VecDeque<T>
where
    T: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        Shape::Sequence(self.iter_mut().map(erase).collect())
    }
}

impl<K, V, S> Traverse for HashMap<K, V, S>
where
    V: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        Shape::Sequence(self.values_mut().map(erase).collect())
    }
}

impl<K, V> Traverse for BTreeMap<K, V>
where
    V: Traverse,
{
    fn shape(&mut self) -> Shape<'_> {
        Shape::Sequence(self.values_mut().map(erase).collect())
    }
}
