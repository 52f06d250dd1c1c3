use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use crate::renderer::core::device::{ObjectKind, RawHandle, TextureTarget, TextureUnit};
use crate::renderer::core::error::GlError;
use crate::renderer::core::object::GlObject;

/// Position in the driver's current-binding state that at most one object may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindSlot {
    /// Keyed on the resource kind. Every resource naming the same target
    /// contends for the same slot.
    Target(&'static str),
    /// Keyed on an explicit texture target and unit pair
    TextureUnit {
        target: TextureTarget,
        unit: TextureUnit,
    },
}

impl fmt::Display for BindSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(name) => write!(f, "`{name}`"),
            Self::TextureUnit { target, unit } => write!(f, "`{target}.{unit}`"),
        }
    }
}

/// The object currently holding a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOccupant {
    pub kind: ObjectKind,
    pub handle: RawHandle,
}

impl fmt::Display for SlotOccupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.handle)
    }
}

/// Registry of held bind slots.
///
/// An entry exists exactly while a [`BindGuard`] for that slot is alive.
/// Guards are expected to nest like a stack on a single thread; releasing an
/// outer guard while an inner one for the same slot is held is not detected.
#[derive(Debug, Default)]
pub struct BindingContext {
    slots: RefCell<HashMap<BindSlot, SlotOccupant>>,
}

impl BindingContext {
    pub fn occupant(&self, slot: &BindSlot) -> Option<SlotOccupant> {
        self.slots.borrow().get(slot).copied()
    }

    pub fn is_occupied(&self, slot: &BindSlot) -> bool {
        self.slots.borrow().contains_key(slot)
    }

    /// True iff `object` is the current occupant of `slot`
    pub fn is_bound(&self, slot: &BindSlot, object: &GlObject) -> bool {
        object.has_valid_handle()
            && self
                .occupant(slot)
                .is_some_and(|occupant| occupant.handle == object.handle())
    }

    /// Number of slots currently held
    pub fn held_count(&self) -> usize {
        self.slots.borrow().len()
    }

    fn acquire(&self, slot: BindSlot, occupant: SlotOccupant) {
        self.slots.borrow_mut().insert(slot, occupant);
    }

    fn release(&self, slot: &BindSlot) {
        self.slots.borrow_mut().remove(slot);
    }
}

/// A resource that can occupy a bind slot.
pub trait Bindable {
    fn object(&self) -> &GlObject;

    /// Issue the driver call that makes this object current in `slot`
    fn bind_primitive(&self, slot: &BindSlot) -> Result<(), GlError>;

    /// Issue the driver call that clears `slot`
    fn unbind_primitive(&self, slot: &BindSlot);
}

/// A resource whose slot is derived from its kind alone.
pub trait SlotBindable: Bindable + Sized {
    const SLOT: BindSlot;

    fn bind(&self) -> Result<BindGuard<'_>, GlError> {
        BindGuard::acquire(self, Self::SLOT)
    }

    fn is_bound(&self) -> bool {
        self.object().context().bindings().is_bound(&Self::SLOT, self.object())
    }

    fn can_bind(&self) -> bool {
        !self.object().context().bindings().is_occupied(&Self::SLOT)
    }
}

/// Proof that a resource holds a bind slot. Dropping the guard releases the
/// slot and unbinds the resource, whichever way the enclosing scope exits.
#[must_use = "the resource is unbound as soon as the guard is dropped"]
pub struct BindGuard<'a> {
    resource: &'a dyn Bindable,
    slot: BindSlot,
}

impl<'a> BindGuard<'a> {
    pub fn acquire(resource: &'a dyn Bindable, slot: BindSlot) -> Result<Self, GlError> {
        let object = resource.object();
        if !object.has_valid_handle() {
            return Err(GlError::HandleInvalid { kind: object.kind() });
        }

        let bindings = object.context().bindings();
        if let Some(occupant) = bindings.occupant(&slot) {
            return Err(GlError::SlotOccupied { slot, occupant });
        }

        resource.bind_primitive(&slot)?;
        bindings.acquire(slot, SlotOccupant {
            kind: object.kind(),
            handle: object.handle(),
        });
        log::trace!("Bound {} {} to {}", object.kind(), object.handle(), slot);

        Ok(Self { resource, slot })
    }

    pub fn slot(&self) -> BindSlot {
        self.slot
    }

    /// True iff this guard holds `slot` on behalf of `object`
    pub fn holds(&self, slot: &BindSlot, object: &GlObject) -> bool {
        let held = self.resource.object();
        self.slot == *slot && held.kind() == object.kind() && held.handle() == object.handle()
    }
}

impl Drop for BindGuard<'_> {
    fn drop(&mut self) {
        let object = self.resource.object();
        object.context().bindings().release(&self.slot);
        self.resource.unbind_primitive(&self.slot);
        log::trace!("Released {} from {} {}", self.slot, object.kind(), object.handle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::core::context::RenderContext;
    use crate::renderer::core::recording::RecordingDevice;
    use std::cell::Cell;

    struct Slotted {
        object: GlObject,
        binds: Cell<u32>,
        unbinds: Cell<u32>,
        refuse: bool,
    }

    impl Slotted {
        fn new(ctx: &RenderContext) -> Self {
            Self {
                object: GlObject::new(ctx, ObjectKind::Buffer).unwrap(),
                binds: Cell::new(0),
                unbinds: Cell::new(0),
                refuse: false,
            }
        }
    }

    impl Bindable for Slotted {
        fn object(&self) -> &GlObject {
            &self.object
        }

        fn bind_primitive(&self, _slot: &BindSlot) -> Result<(), GlError> {
            if self.refuse {
                return Err(GlError::NotCompiled { program: self.object.handle() });
            }
            self.binds.set(self.binds.get() + 1);
            Ok(())
        }

        fn unbind_primitive(&self, _slot: &BindSlot) {
            self.unbinds.set(self.unbinds.get() + 1);
        }
    }

    impl SlotBindable for Slotted {
        const SLOT: BindSlot = BindSlot::Target("slotted");
    }

    fn context() -> RenderContext {
        RenderContext::new(RecordingDevice::new())
    }

    #[test]
    fn bind_then_release_clears_slot() {
        let ctx = context();
        let slotted = Slotted::new(&ctx);

        {
            let guard = slotted.bind().unwrap();
            assert_eq!(guard.slot(), Slotted::SLOT);
            assert!(slotted.is_bound());
            assert!(!slotted.can_bind());
        }

        assert!(!slotted.is_bound());
        assert!(ctx.bindings().occupant(&Slotted::SLOT).is_none());
        assert_eq!(ctx.bindings().held_count(), 0);
        assert_eq!((slotted.binds.get(), slotted.unbinds.get()), (1, 1));
    }

    #[test]
    fn rebinding_same_resource_fails() {
        let ctx = context();
        let slotted = Slotted::new(&ctx);

        let _guard = slotted.bind().unwrap();
        let err = slotted.bind().err().unwrap();

        assert_eq!(err, GlError::SlotOccupied {
            slot: Slotted::SLOT,
            occupant: SlotOccupant { kind: ObjectKind::Buffer, handle: slotted.object.handle() },
        });
        // The failed attempt must not have touched the driver
        assert_eq!(slotted.binds.get(), 1);
    }

    #[test]
    fn sibling_waits_for_release() {
        let ctx = context();
        let first = Slotted::new(&ctx);
        let second = Slotted::new(&ctx);

        let guard = first.bind().unwrap();
        assert!(matches!(second.bind(), Err(GlError::SlotOccupied { .. })));
        assert!(!second.is_bound());

        drop(guard);
        let _guard = second.bind().unwrap();
        assert!(second.is_bound());
        assert!(!first.is_bound());
    }

    #[test]
    fn disposed_resource_cannot_bind() {
        let ctx = context();
        let mut slotted = Slotted::new(&ctx);
        slotted.object.dispose();

        assert_eq!(
            slotted.bind().err(),
            Some(GlError::HandleInvalid { kind: ObjectKind::Buffer })
        );
        assert!(!slotted.is_bound());
    }

    #[test]
    fn failed_bind_primitive_leaves_slot_free() {
        let ctx = context();
        let mut slotted = Slotted::new(&ctx);
        slotted.refuse = true;

        assert!(matches!(slotted.bind(), Err(GlError::NotCompiled { .. })));
        assert!(slotted.can_bind());
        assert_eq!(slotted.unbinds.get(), 0);
    }

    #[test]
    fn guard_released_on_error_path() {
        fn failing_step(slotted: &Slotted, sibling: &Slotted) -> Result<(), GlError> {
            let _outer = slotted.bind()?;
            let _inner = sibling.bind()?;
            Ok(())
        }

        let ctx = context();
        let slotted = Slotted::new(&ctx);
        let sibling = Slotted::new(&ctx);

        assert!(failing_step(&slotted, &sibling).is_err());
        assert_eq!(ctx.bindings().held_count(), 0);
        assert_eq!(slotted.unbinds.get(), 1);
    }

    #[test]
    fn distinct_slots_coexist() {
        let ctx = context();
        let slotted = Slotted::new(&ctx);
        let other = Slotted::new(&ctx);

        let a = slotted.bind().unwrap();
        let b = BindGuard::acquire(&other, BindSlot::Target("other")).unwrap();

        assert_eq!(ctx.bindings().held_count(), 2);
        assert!(ctx.bindings().is_bound(&BindSlot::Target("other"), &other.object));
        assert!(!ctx.bindings().is_bound(&BindSlot::Target("other"), &slotted.object));
        assert!(b.holds(&BindSlot::Target("other"), &other.object));
        assert!(!b.holds(&Slotted::SLOT, &other.object));
        assert!(!a.holds(&Slotted::SLOT, &other.object));
    }
}
