//! Structural events emitted by the scanner.

use crate::Location;

/// What a struct-shaped syntax node does with its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A struct expression builds a value.
    Construction,
    /// A struct pattern, destructuring-assignment target or `matches!`
    /// pattern takes a value apart.
    Decomposition,
}

/// One struct-shaped node naming a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Construction or decomposition.
    pub kind: EventKind,
    /// Simple name of the type, with `Self` resolved.
    pub type_id: String,
    /// Position of the node.
    pub location: Location,
}

impl Event {
    /// Whether the event builds a value.
    #[must_use]
    pub fn is_construction(&self) -> bool {
        self.kind == EventKind::Construction
    }
}
