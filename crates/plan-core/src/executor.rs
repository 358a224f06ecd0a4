//! Turning a planned action into a concrete order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ExecuteError;
use crate::{ActionId, ActionLibrary, BlackboardView, EntityKey, EntityRef, IntKey};

/// Number of integer argument slots on an [`Order`].
pub const ORDER_ARGS: usize = 4;

/// How an action is carried out. Closed set; new kinds extend the enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutorKind {
    #[default]
    SubmitOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TagId(pub u32);

/// How the order queue should treat orders already pending for the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubmitMode {
    /// Drop pending orders and run this one now.
    #[default]
    Replace,
    /// Run after pending orders.
    Append,
    /// Run before pending orders.
    Prepend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderSpec {
    pub tag: TagId,
    pub mode: SubmitMode,
    pub player: u32,
}

/// Copies one blackboard value into an order field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ParamBinding {
    /// Int value into `args[slot]` (slot < [`ORDER_ARGS`]).
    IntToArg { key: IntKey, slot: u8 },
    EntityToTarget { key: EntityKey },
    EntityToTargetContext { key: EntityKey },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub tag: TagId,
    pub mode: SubmitMode,
    pub player: u32,
    pub actor: EntityRef,
    pub target: Option<EntityRef>,
    pub target_context: Option<EntityRef>,
    pub args: [i32; ORDER_ARGS],
}

impl Order {
    pub fn new(spec: &OrderSpec, actor: EntityRef) -> Self {
        Self {
            tag: spec.tag,
            mode: spec.mode,
            player: spec.player,
            actor,
            target: None,
            target_context: None,
            args: [0; ORDER_ARGS],
        }
    }

    /// Apply bindings in order; later bindings overwrite earlier ones writing the same field.
    /// Missing blackboard values leave the field at its default.
    pub fn bind(&mut self, bindings: &[ParamBinding], blackboard: &dyn BlackboardView) {
        for binding in bindings {
            match *binding {
                ParamBinding::IntToArg { key, slot } => {
                    let Some(arg) = self.args.get_mut(slot as usize) else {
                        continue;
                    };
                    match blackboard.int(key) {
                        Some(value) => *arg = value,
                        None => tracing::debug!(key = key.id(), slot, "int binding has no value"),
                    }
                }
                ParamBinding::EntityToTarget { key } => match blackboard.entity(key) {
                    Some(entity) => self.target = Some(entity),
                    None => tracing::debug!(key = key.id(), "target binding has no value"),
                },
                ParamBinding::EntityToTargetContext { key } => match blackboard.entity(key) {
                    Some(entity) => self.target_context = Some(entity),
                    None => tracing::debug!(key = key.id(), "target context binding has no value"),
                },
            }
        }
    }
}

/// Backpressure signal from an [`OrderQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

/// Transport that carries orders to gameplay. Implementations must not block.
pub trait OrderQueue {
    fn try_enqueue(&mut self, order: Order) -> Result<(), QueueFull>;
}

/// Fixed-capacity in-memory queue.
#[derive(Debug, Clone, Default)]
pub struct BoundedOrderQueue {
    capacity: usize,
    orders: Vec<Order>,
}

impl BoundedOrderQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            orders: Vec::with_capacity(capacity),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Order> {
        self.orders.drain(..)
    }
}

impl OrderQueue for BoundedOrderQueue {
    fn try_enqueue(&mut self, order: Order) -> Result<(), QueueFull> {
        if self.orders.len() >= self.capacity {
            return Err(QueueFull);
        }
        self.orders.push(order);
        Ok(())
    }
}

/// Build the order for `action` and hand it to `queue`.
///
/// A full queue drops the order; retrying is up to the caller.
pub fn execute_action(
    library: &ActionLibrary,
    action: ActionId,
    actor: EntityRef,
    blackboard: &dyn BlackboardView,
    queue: &mut dyn OrderQueue,
) -> Result<Order, ExecuteError> {
    let (Some(kind), Some(spec)) = (library.executor(action), library.order(action)) else {
        return Err(ExecuteError::UnknownAction { action: action.0 });
    };

    match kind {
        ExecutorKind::SubmitOrder => {
            let mut order = Order::new(spec, actor);
            order.bind(library.bindings(action), blackboard);
            queue
                .try_enqueue(order)
                .map_err(|QueueFull| ExecuteError::QueueFull { action: action.0 })?;
            tracing::trace!(action = action.0, tag = order.tag.0, "order submitted");
            Ok(order)
        }
    }
}
