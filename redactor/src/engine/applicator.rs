//! The redaction traversal engine.
//!
//! [`Applicator`] is a sum type over the three traversal strategies. Every
//! level of nesting re-classifies its own value through [`Applicator::create`],
//! so a visible field is walked with the same rules as the top-level object:
//! authorization on an outer field never implies authorization on the fields
//! inside it.
//!
//! The walk mutates its input in place and cannot be undone. Callers who need
//! the unredacted original must pass in a copy.

use slog::{debug, Logger};

use super::metadata::{Describe, FieldMetadata, Shape, Slot, Traverse};
use crate::{
    capability::{CapabilityPredicate, DenyAll},
    error::ConfigurationError,
};

/// Per-traversal state shared by every applicator in one walk.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    predicate: &'a dyn CapabilityPredicate,
    logger: Option<&'a Logger>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(predicate: &'a dyn CapabilityPredicate, logger: Option<&'a Logger>) -> Self {
        Self { predicate, logger }
    }

    /// Fields without a capability are granted without asking the predicate.
    fn permits(&self, field: &FieldMetadata) -> bool {
        field
            .capability()
            .map_or(true, |capability| self.predicate.has_capability(capability))
    }

    fn fail(&self, error: ConfigurationError) -> ConfigurationError {
        if let Some(logger) = self.logger {
            debug!(logger, "redaction aborted"; "error" => %error);
        }
        error
    }

    fn withheld(&self, shape: &'static str, field: &FieldMetadata, elements: usize) {
        if let Some(logger) = self.logger {
            debug!(logger, "field withheld";
                "shape" => shape,
                "field" => field.name(),
                "capability" => field.capability().unwrap_or_default(),
                "elements" => elements
            );
        }
    }
}

/// One traversal strategy bound to one value.
///
/// Build it with [`Applicator::create`] and consume it with
/// [`Applicator::redact`].
pub enum Applicator<'a> {
    /// Nothing to do. Absent values and withheld containers land here.
    Empty,
    /// A single value with a field table.
    Graph(GraphApplicator<'a>),
    /// A collection whose elements share one field table.
    Sequence(SequenceApplicator<'a>),
}

/// The [`Applicator::Graph`] strategy: one described value.
pub struct GraphApplicator<'a> {
    target: &'a mut dyn Describe,
    context: Context<'a>,
}

impl GraphApplicator<'_> {
    /// Shape name of the value being walked.
    pub fn shape_name(&self) -> &'static str {
        self.target.shape_name()
    }

    /// The field table the walk will apply.
    pub fn fields(&self) -> &'static [FieldMetadata] {
        self.target.describe_fields()
    }
}

/// The [`Applicator::Sequence`] strategy: the elements of one collection.
pub struct SequenceApplicator<'a> {
    elements: Vec<&'a mut dyn Traverse>,
    context: Context<'a>,
}

impl SequenceApplicator<'_> {
    /// Number of direct elements, before flattening and skipping absent ones.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the collection has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> Applicator<'a> {
    /// Classifies `value` and builds the matching applicator.
    ///
    /// Absent values (`None`, withheld containers) produce [`Applicator::Empty`],
    /// collections produce [`Applicator::Sequence`], and everything else
    /// produces [`Applicator::Graph`].
    pub fn create<T>(value: &'a mut T, predicate: &'a dyn CapabilityPredicate) -> Self
    where
        T: Traverse + ?Sized,
    {
        Self::from_shape(value.shape(), Context::new(predicate, None))
    }

    /// Like [`Applicator::create`], with the fail-closed [`DenyAll`] predicate.
    pub fn fail_closed<T>(value: &'a mut T) -> Self
    where
        T: Traverse + ?Sized,
    {
        Self::create(value, &DenyAll)
    }

    pub(crate) fn with_context(value: Option<&'a mut dyn Traverse>, context: Context<'a>) -> Self {
        match value {
            Some(value) => Self::from_shape(value.shape(), context),
            None => Self::Empty,
        }
    }

    pub(crate) fn from_shape(shape: Shape<'a>, context: Context<'a>) -> Self {
        match shape {
            Shape::Empty => Self::Empty,
            Shape::Graph(target) => Self::Graph(GraphApplicator { target, context }),
            Shape::Sequence(elements) => Self::Sequence(SequenceApplicator { elements, context }),
        }
    }

    /// Walks the value, withholding every field the predicate does not grant.
    ///
    /// On error the value may already be partially redacted and must be
    /// discarded.
    pub fn redact(self) -> Result<(), ConfigurationError> {
        match self {
            Self::Empty => Ok(()),
            Self::Graph(GraphApplicator { target, context }) => redact_graph(target, context),
            Self::Sequence(SequenceApplicator { elements, context }) => {
                redact_sequence(elements, context)
            }
        }
    }
}

fn require_wrapped(
    shape: &'static str,
    field: &FieldMetadata,
    context: Context<'_>,
) -> Result<(), ConfigurationError> {
    if field.is_wrapped() {
        return Ok(());
    }
    Err(context.fail(ConfigurationError::UnwrappedCapability {
        shape,
        field: field.name(),
        capability: field.capability().unwrap_or_default(),
    }))
}

fn field_slot<'g>(
    graph: &'g mut dyn Describe,
    field: &FieldMetadata,
    context: Context<'_>,
) -> Result<Slot<'g>, ConfigurationError> {
    let shape = graph.shape_name();
    graph.field_mut(field.accessor()).ok_or_else(|| {
        context.fail(ConfigurationError::MissingAccessor {
            shape,
            field: field.name(),
        })
    })
}

fn withhold_slot(
    shape: &'static str,
    field: &FieldMetadata,
    slot: Slot<'_>,
    context: Context<'_>,
) -> Result<(), ConfigurationError> {
    match slot {
        Slot::Wrapped(wrapped) => {
            wrapped.withhold();
            Ok(())
        }
        Slot::Opaque(opaque) => {
            opaque.withhold();
            Ok(())
        }
        Slot::Plain(_) => Err(context.fail(ConfigurationError::UnwrappedCapability {
            shape,
            field: field.name(),
            capability: field.capability().unwrap_or_default(),
        })),
    }
}

fn redact_graph(target: &mut dyn Describe, context: Context<'_>) -> Result<(), ConfigurationError> {
    let shape = target.shape_name();

    for field in target.describe_fields() {
        if !context.permits(field) {
            require_wrapped(shape, field, context)?;
            let slot = field_slot(target, field, context)?;
            // A withheld field's contents are dropped, not walked.
            withhold_slot(shape, field, slot, context)?;
            context.withheld(shape, field, 1);
            continue;
        }

        let slot = field_slot(target, field, context)?;
        Applicator::with_context(slot.into_inner(), context).redact()?;
    }

    Ok(())
}

/// Collects the graphs of a sequence, flattening nested sequences and
/// skipping absent elements.
fn flatten<'a>(elements: Vec<&'a mut dyn Traverse>, graphs: &mut Vec<&'a mut dyn Describe>) {
    for element in elements {
        match element.shape() {
            Shape::Empty => {}
            Shape::Graph(graph) => graphs.push(graph),
            Shape::Sequence(nested) => flatten(nested, graphs),
        }
    }
}

fn same_table(a: &'static [FieldMetadata], b: &'static [FieldMetadata]) -> bool {
    std::ptr::eq(a, b) || a == b
}

fn redact_sequence(
    elements: Vec<&mut dyn Traverse>,
    context: Context<'_>,
) -> Result<(), ConfigurationError> {
    let mut graphs = Vec::with_capacity(elements.len());
    flatten(elements, &mut graphs);

    let Some(first) = graphs.first() else {
        return Ok(());
    };
    let shape = first.shape_name();
    let fields = first.describe_fields();

    // Metadata comes from the first element, so every other element must
    // declare the same table. Enum variants with equal tables mix freely.
    if let Some((index, other)) = graphs
        .iter()
        .enumerate()
        .find(|(_, graph)| !same_table(graph.describe_fields(), fields))
    {
        return Err(context.fail(ConfigurationError::MixedSequence {
            expected: shape,
            found: other.shape_name(),
            index,
        }));
    }

    for field in fields {
        if !context.permits(field) {
            require_wrapped(shape, field, context)?;
            for graph in &mut graphs {
                let slot = field_slot(&mut **graph, field, context)?;
                withhold_slot(shape, field, slot, context)?;
            }
            context.withheld(shape, field, graphs.len());
            continue;
        }

        let mut projected: Vec<&mut dyn Traverse> = Vec::with_capacity(graphs.len());
        for graph in &mut graphs {
            if let Some(value) = field_slot(&mut **graph, field, context)?.into_inner() {
                projected.push(value);
            }
        }
        Applicator::from_shape(Shape::Sequence(projected), context).redact()?;
    }

    Ok(())
}
