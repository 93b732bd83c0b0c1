//! Handle-bearing slot descriptions and the values read from them.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ObjectHandle;

/// Structural shape of a handle-bearing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotShape {
    /// A single handle, possibly null.
    Single,
    /// A growable sequence of handles.
    Sequence,
    /// A fixed-size array of handles.
    Array { len: usize },
    /// A derived value computed on read rather than stored.
    Computed,
}

impl SlotShape {
    pub fn is_computed(self) -> bool {
        matches!(self, SlotShape::Computed)
    }

    /// Whether values of this shape hold a list rather than a single handle.
    pub fn is_many(self) -> bool {
        matches!(self, SlotShape::Sequence | SlotShape::Array { .. })
    }
}

/// Describes one handle-bearing slot exposed by a behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotDescriptor {
    /// Slot name, unique within its behavior.
    pub name: Cow<'static, str>,
    /// Declared shape.
    pub shape: SlotShape,
    /// Computed slots with this flag cleared are never read, since evaluating
    /// them is expensive or has side effects. Ignored for stored slots.
    #[serde(default = "default_safe")]
    pub safe_to_evaluate: bool,
}

fn default_safe() -> bool {
    true
}

impl SlotDescriptor {
    pub const fn new(name: &'static str, shape: SlotShape) -> Self {
        Self {
            name: Cow::Borrowed(name),
            shape,
            safe_to_evaluate: true,
        }
    }

    /// Create a descriptor with an owned name.
    pub fn named(name: impl Into<String>, shape: SlotShape) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            shape,
            safe_to_evaluate: true,
        }
    }

    /// Mark the slot as unsafe to evaluate.
    pub fn unsafe_to_evaluate(mut self) -> Self {
        self.safe_to_evaluate = false;
        self
    }

    /// Whether the extractor may read this slot at all.
    pub fn is_readable(&self) -> bool {
        !self.shape.is_computed() || self.safe_to_evaluate
    }

    /// Check that a value read from this slot has the declared shape.
    pub fn accepts(&self, value: &SlotValue) -> bool {
        match (self.shape, value) {
            (SlotShape::Single | SlotShape::Computed, SlotValue::Single(_)) => true,
            (SlotShape::Sequence, SlotValue::Many(_)) => true,
            (SlotShape::Array { len }, SlotValue::Many(items)) => items.len() == len,
            _ => false,
        }
    }
}

/// Value read from a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// Value of a single or computed slot.
    Single(Option<ObjectHandle>),
    /// Value of a sequence or array slot. Entries may be null.
    Many(Vec<Option<ObjectHandle>>),
}

impl SlotValue {
    /// Iterate over every non-null handle in the value.
    pub fn handles(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        let items: &[Option<ObjectHandle>] = match self {
            SlotValue::Single(handle) => std::slice::from_ref(handle),
            SlotValue::Many(items) => items,
        };
        items.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.handles().next().is_none()
    }
}
