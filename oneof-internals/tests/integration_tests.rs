//! Integration tests for the oneof-internals crate.
//!
//! These tests drive [`RawSlot`] and the vtables together the way the public
//! crate does: a hand-written two-alternative "set" whose discriminant 0 is
//! paired with `u32` and discriminant 1 with `String`, with a dispatch table
//! built once as `&'static` data.
//!
//! Covered here:
//! - Occupancy lifecycle: vacant → occupied → vacated, with the discriminant
//!   tracking each step
//! - Dispatch through `AltVtable` (destruction, type identity) selected by
//!   the runtime discriminant
//! - Clone construction and clone assignment through `CloneVtable`,
//!   including the staged-storage commit used for strong-guarantee
//!   assignment
//! - Drop accounting: each occupant is destroyed exactly once, and a vacated
//!   slot is never destroyed

use std::sync::atomic::{AtomicUsize, Ordering};

use oneof_internals::{AltVtable, CloneVtable, NPOS, RawSlot, storage_ptr};

/// Storage fitting either a `u32` or a `String`.
#[repr(C)]
union Storage {
    small: std::mem::ManuallyDrop<u32>,
    text: std::mem::ManuallyDrop<String>,
}

/// Dispatch table pairing discriminant 0 with `u32` and 1 with `String`.
static VTABLES: [&AltVtable; 2] = [AltVtable::new::<u32>(), AltVtable::new::<String>()];

/// Clone table with the same pairing.
static CLONE_VTABLES: [&CloneVtable; 2] = [CloneVtable::new::<u32>(), CloneVtable::new::<String>()];

/// Destroys the occupant, if any, with vacate-before-destroy ordering.
fn destroy(slot: &mut RawSlot<Storage>) {
    let discriminant = slot.discriminant();
    if discriminant != NPOS {
        slot.vacate();
        // SAFETY: `discriminant` named the live occupant before `vacate`,
        // which does not touch the bytes; the occupant is never used again.
        unsafe {
            VTABLES[discriminant].drop_in_place(slot.value_ptr_mut());
        }
    }
}

#[test]
fn occupancy_lifecycle() {
    let mut slot: RawSlot<Storage> = RawSlot::vacant();
    assert_eq!(slot.discriminant(), NPOS);

    // SAFETY: The slot is vacant; `String` fits `Storage`; discriminant 1 is
    // paired with `String` by `VTABLES`.
    unsafe {
        slot.write::<String>(1, String::from("occupant"));
    }
    assert_eq!(slot.discriminant(), 1);
    assert_eq!(
        VTABLES[slot.discriminant()].type_id(),
        std::any::TypeId::of::<String>()
    );

    // SAFETY: Discriminant 1 holds a live `String`.
    assert_eq!(unsafe { slot.assume_ref::<String>() }, "occupant");

    destroy(&mut slot);
    assert!(slot.is_vacant());
}

#[test]
fn dispatch_follows_discriminant() {
    // SAFETY: `u32` fits `Storage` and discriminant 0 is paired with `u32`.
    let mut slot: RawSlot<Storage> = unsafe { RawSlot::occupied::<u32>(0, 17) };
    assert_eq!(VTABLES[slot.discriminant()].type_name(), "u32");

    destroy(&mut slot);

    // Reuse the same slot for the other alternative.
    // SAFETY: The slot is vacant again; discriminant 1 is paired with
    // `String`.
    unsafe {
        slot.write::<String>(1, String::from("second life"));
    }
    assert!(VTABLES[slot.discriminant()].type_name().contains("String"));
    destroy(&mut slot);
}

#[test]
fn clone_into_staged_storage_commits() {
    // SAFETY: Discriminant 1 is paired with `String`.
    let mut source: RawSlot<Storage> = unsafe { RawSlot::occupied::<String>(1, String::from("kept")) };

    // Stage the clone outside any slot, then adopt it wholesale: this is the
    // strong-guarantee assignment sequence.
    let mut staged: std::mem::MaybeUninit<Storage> = std::mem::MaybeUninit::uninit();
    // SAFETY: `source` holds a live `String`; `staged` is distinct storage
    // fitting a `String`, holding no live value.
    unsafe {
        CLONE_VTABLES[1].clone_into(source.value_ptr(), storage_ptr(&mut staged));
    }

    let mut target: RawSlot<Storage> = RawSlot::vacant();
    // SAFETY: `target` is vacant and `staged` now holds a live `String`
    // paired with discriminant 1.
    unsafe {
        target.adopt(1, staged);
    }
    assert_eq!(target.discriminant(), 1);
    // SAFETY: Discriminant 1 holds a live `String`.
    assert_eq!(unsafe { target.assume_ref::<String>() }, "kept");

    destroy(&mut source);
    destroy(&mut target);
}

#[test]
fn clone_assign_reuses_the_occupant() {
    // SAFETY: Discriminant 1 is paired with `String`.
    let source: RawSlot<Storage> = unsafe { RawSlot::occupied::<String>(1, String::from("new text")) };
    // SAFETY: Discriminant 1 is paired with `String`.
    let mut target: RawSlot<Storage> =
        unsafe { RawSlot::occupied::<String>(1, String::from("old text")) };

    // SAFETY: Both slots hold live, distinct `String`s; `target` is
    // exclusively borrowed.
    unsafe {
        CLONE_VTABLES[1].clone_assign(source.value_ptr(), target.value_ptr_mut());
    }
    assert_eq!(target.discriminant(), 1);
    // SAFETY: Discriminant 1 holds a live `String`.
    assert_eq!(unsafe { target.assume_ref::<String>() }, "new text");

    let mut source = source;
    destroy(&mut source);
    destroy(&mut target);
}

#[test]
fn occupants_are_destroyed_exactly_once() {
    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Tracked;
    impl Drop for Tracked {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    static TRACKED_VTABLE: [&AltVtable; 1] = [AltVtable::new::<Tracked>()];

    let mut slot: RawSlot<Tracked> = RawSlot::vacant();
    // SAFETY: The slot is vacant; `Tracked` trivially fits itself;
    // discriminant 0 is paired with `Tracked` by `TRACKED_VTABLE`.
    unsafe {
        slot.write::<Tracked>(0, Tracked);
    }

    let discriminant = slot.discriminant();
    slot.vacate();
    // SAFETY: Discriminant 0 named the live `Tracked` before `vacate`; it is
    // never used again.
    unsafe {
        TRACKED_VTABLE[discriminant].drop_in_place(slot.value_ptr_mut());
    }
    assert_eq!(DROPS.load(Ordering::SeqCst), 1);

    // Dropping the vacated slot must not run the destructor again.
    drop(slot);
    assert_eq!(DROPS.load(Ordering::SeqCst), 1);
}
