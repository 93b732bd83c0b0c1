//! Behaviors attached to scene nodes.
//!
//! The [`Behavior`] trait is the visitor seam: instead of reflecting over
//! fields at runtime, every behavior lists its handle-bearing slots and
//! answers reads for them.

use std::collections::HashMap;
use std::fmt;

use crate::error::SlotAccessError;
use crate::slot::{SlotDescriptor, SlotShape, SlotValue};
use crate::{NodeId, ObjectHandle};

/// Kind name reported by [`Transform`].
pub const TRANSFORM_KIND: &str = "Transform";

/// Structured data attached to a node.
pub trait Behavior: fmt::Debug {
    /// Human readable kind, e.g. `"Turret"`.
    fn kind(&self) -> &str;

    /// Whether this is the implicit spatial transform. The transform carries
    /// the parent/child hierarchy, which never counts as a reference.
    fn is_spatial_transform(&self) -> bool {
        false
    }

    /// Handle-bearing slots exposed by this behavior.
    fn slots(&self) -> &[SlotDescriptor];

    /// Read one slot. Failures are reported, not panicked.
    fn try_read_slot(&self, slot: &SlotDescriptor) -> Result<SlotValue, SlotAccessError>;
}

static TRANSFORM_SLOTS: [SlotDescriptor; 2] = [
    SlotDescriptor::new("parent", SlotShape::Single),
    SlotDescriptor::new("children", SlotShape::Sequence),
];

/// The spatial transform every node owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Transform {
    pub fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}

impl Behavior for Transform {
    fn kind(&self) -> &str {
        TRANSFORM_KIND
    }

    fn is_spatial_transform(&self) -> bool {
        true
    }

    fn slots(&self) -> &[SlotDescriptor] {
        &TRANSFORM_SLOTS
    }

    fn try_read_slot(&self, slot: &SlotDescriptor) -> Result<SlotValue, SlotAccessError> {
        match slot.name.as_ref() {
            "parent" => Ok(SlotValue::Single(self.parent.map(ObjectHandle::Node))),
            "children" => Ok(SlotValue::Many(
                self.children
                    .iter()
                    .map(|&child| Some(ObjectHandle::Node(child)))
                    .collect(),
            )),
            other => Err(SlotAccessError::UnknownSlot {
                slot: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
enum StoredValue {
    Value(SlotValue),
    Failing(String),
}

/// A data-driven behavior: a kind name plus named handle slots.
///
/// Used for behaviors described in scene documents and in tests. Each slot
/// may also be configured to fail on read.
#[derive(Debug, Clone)]
pub struct Record {
    kind: String,
    slots: Vec<SlotDescriptor>,
    values: HashMap<String, StoredValue>,
}

impl Record {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            slots: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Add a single-handle slot.
    pub fn with_single(self, name: &str, handle: Option<ObjectHandle>) -> Self {
        self.with_slot(
            SlotDescriptor::named(name, SlotShape::Single),
            SlotValue::Single(handle),
        )
    }

    /// Add a sequence slot.
    pub fn with_sequence(self, name: &str, handles: Vec<Option<ObjectHandle>>) -> Self {
        self.with_slot(
            SlotDescriptor::named(name, SlotShape::Sequence),
            SlotValue::Many(handles),
        )
    }

    /// Add a fixed-size array slot sized to `handles`.
    pub fn with_array<const N: usize>(self, name: &str, handles: [Option<ObjectHandle>; N]) -> Self {
        self.with_slot(
            SlotDescriptor::named(name, SlotShape::Array { len: N }),
            SlotValue::Many(handles.to_vec()),
        )
    }

    /// Add a computed slot that is safe to evaluate.
    pub fn with_computed(self, name: &str, handle: Option<ObjectHandle>) -> Self {
        self.with_slot(
            SlotDescriptor::named(name, SlotShape::Computed),
            SlotValue::Single(handle),
        )
    }

    /// Add a computed slot the extractor must not evaluate.
    pub fn with_unsafe_computed(self, name: &str, handle: Option<ObjectHandle>) -> Self {
        self.with_slot(
            SlotDescriptor::named(name, SlotShape::Computed).unsafe_to_evaluate(),
            SlotValue::Single(handle),
        )
    }

    /// Add a slot with an explicit descriptor. A later slot with the same
    /// name replaces the earlier one.
    pub fn with_slot(mut self, descriptor: SlotDescriptor, value: SlotValue) -> Self {
        self.insert(descriptor, StoredValue::Value(value));
        self
    }

    /// Add a slot whose reads always fail with `reason`.
    pub fn with_failing(mut self, descriptor: SlotDescriptor, reason: impl Into<String>) -> Self {
        self.insert(descriptor, StoredValue::Failing(reason.into()));
        self
    }

    fn insert(&mut self, descriptor: SlotDescriptor, value: StoredValue) {
        let name = descriptor.name.to_string();
        self.slots.retain(|slot| slot.name != descriptor.name);
        self.slots.push(descriptor);
        self.values.insert(name, value);
    }
}

impl Behavior for Record {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    fn try_read_slot(&self, slot: &SlotDescriptor) -> Result<SlotValue, SlotAccessError> {
        match self.values.get(slot.name.as_ref()) {
            None => Err(SlotAccessError::UnknownSlot {
                slot: slot.name.to_string(),
            }),
            Some(StoredValue::Failing(reason)) => Err(SlotAccessError::Unreadable {
                slot: slot.name.to_string(),
                reason: reason.clone(),
            }),
            Some(StoredValue::Value(value)) if slot.accepts(value) => Ok(value.clone()),
            Some(StoredValue::Value(_)) => Err(SlotAccessError::ShapeMismatch {
                slot: slot.name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_exposes_hierarchy_slots() {
        let mut transform = Transform::new(Some(NodeId(1)));
        transform.push_child(NodeId(3));

        let slots = transform.slots();
        assert_eq!(slots.len(), 2);
        assert_eq!(
            transform.try_read_slot(&slots[0]).unwrap(),
            SlotValue::Single(Some(ObjectHandle::Node(NodeId(1))))
        );
        assert_eq!(
            transform.try_read_slot(&slots[1]).unwrap(),
            SlotValue::Many(vec![Some(ObjectHandle::Node(NodeId(3)))])
        );
        assert!(transform.is_spatial_transform());
    }

    #[test]
    fn record_reports_failing_slot() {
        let record = Record::new("Broken").with_failing(
            SlotDescriptor::named("target", SlotShape::Computed),
            "not initialised",
        );
        let err = record.try_read_slot(&record.slots()[0]).unwrap_err();
        assert_eq!(
            err,
            SlotAccessError::Unreadable {
                slot: "target".into(),
                reason: "not initialised".into(),
            }
        );
    }

    #[test]
    fn record_rejects_mismatched_shape() {
        let record = Record::new("Odd").with_slot(
            SlotDescriptor::named("pair", SlotShape::Array { len: 2 }),
            SlotValue::Many(vec![None]),
        );
        assert!(matches!(
            record.try_read_slot(&record.slots()[0]),
            Err(SlotAccessError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn record_replaces_slot_with_same_name() {
        let record = Record::new("Turret")
            .with_single("target", None)
            .with_single("target", Some(ObjectHandle::Node(NodeId(4))));
        assert_eq!(record.slots().len(), 1);
        assert_eq!(
            record.try_read_slot(&record.slots()[0]).unwrap(),
            SlotValue::Single(Some(ObjectHandle::Node(NodeId(4))))
        );
    }

    #[test]
    fn array_slot_is_sized_from_input() {
        let record = Record::new("Waypoints").with_array("points", [None, None, None]);
        assert_eq!(record.slots()[0].shape, SlotShape::Array { len: 3 });
    }
}
