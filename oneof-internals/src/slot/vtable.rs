//! Vtables for type-erased operations on a slot's occupant.
//!
//! This module contains the per-alternative dispatch tables. Each table
//! stores function pointers that dispatch to the correct typed implementation
//! once the concrete alternative type `T` has been erased behind a
//! [`NonNull<Erased>`] pointer.
//!
//! This module encapsulates the fields of every vtable so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **a vtable's function pointers always belong to the single type
//! `T` the vtable was created for.**
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via the `new` constructors, which pair the function pointers
//! with a specific type `T` at compile time. The pairing between a vtable and
//! the bytes it is invoked on is the *caller's* obligation, stated on every
//! method below.
//!
//! [`NonNull<Erased>`]: NonNull

use core::{any::TypeId, fmt, ptr::NonNull};

use crate::util::Erased;

/// Vtable of the operations every alternative supports.
///
/// Contains function pointers for destroying an erased occupant and for
/// identifying its type at runtime.
///
/// # Safety
///
/// The following safety invariants are guaranteed to be upheld as long as
/// this struct exists:
///
/// * The fields `type_id`, `type_name` and `drop_in_place` all point to the
///   functions defined below.
/// * The function pointers are all instantiated with the same type `T` that
///   was used to create this `AltVtable`.
pub struct AltVtable {
    /// Gets the [`TypeId`] of the type that was used to create this vtable.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of that type.
    type_name: fn() -> &'static str,
    /// Runs that type's destructor on the erased occupant.
    drop_in_place: unsafe fn(NonNull<Erased>),
}

impl AltVtable {
    /// Creates the `AltVtable` for the type `T`.
    pub const fn new<T: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                drop_in_place: drop_in_place::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the type that was used to create this vtable.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the type that was used to create
    /// this vtable.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Runs `T`'s destructor on the occupant behind `value`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `value` points to a live value of the type `T` this vtable was
    ///    created for, valid for reads and writes.
    /// 2. The value is not used after this call; in particular the slot
    ///    holding it must already read as vacant, so that unwinding from a
    ///    panicking destructor cannot destroy it twice.
    #[inline]
    pub unsafe fn drop_in_place(&self, value: NonNull<Erased>) {
        // SAFETY: We know that `self.drop_in_place` points to the function
        // `drop_in_place::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.drop_in_place)(value);
        }
    }
}

/// Vtable of the operations an alternative supports when it is [`Clone`].
///
/// # Safety
///
/// The following safety invariants are guaranteed to be upheld as long as
/// this struct exists:
///
/// * The fields `clone_into` and `clone_assign` point to the functions
///   defined below, instantiated with the same type `T` that was used to
///   create this `CloneVtable`.
pub struct CloneVtable {
    /// Clone-constructs a fresh occupant from an existing one.
    clone_into: unsafe fn(NonNull<Erased>, NonNull<Erased>),
    /// Clone-assigns one live occupant onto another of the same type.
    clone_assign: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl CloneVtable {
    /// Creates the `CloneVtable` for the type `T`.
    pub const fn new<T: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                clone_into: clone_into::<T>,
                clone_assign: clone_assign::<T>,
            }
        }
    }

    /// Clones the `T` behind `source` into the uninitialized storage behind
    /// `target`.
    ///
    /// May panic if `T::clone` panics; on panic, nothing has been written to
    /// `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` points to a live value of the type `T` this vtable was
    ///    created for.
    /// 2. `target` points to storage valid for a write of `T` that holds no
    ///    live value, and does not overlap `source`.
    #[inline]
    pub unsafe fn clone_into(&self, source: NonNull<Erased>, target: NonNull<Erased>) {
        // SAFETY: We know that `self.clone_into` points to the function
        // `clone_into::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.clone_into)(source, target);
        }
    }

    /// Clone-assigns the `T` behind `source` onto the live `T` behind
    /// `target`, via `T::clone_from`.
    ///
    /// May panic if `T::clone_from` panics; the target then holds whatever
    /// state `T::clone_from` itself guarantees, and remains live.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` and `target` both point to live values of the type `T`
    ///    this vtable was created for, and do not overlap.
    /// 2. `target` is valid for reads and writes and not aliased elsewhere.
    #[inline]
    pub unsafe fn clone_assign(&self, source: NonNull<Erased>, target: NonNull<Erased>) {
        // SAFETY: We know that `self.clone_assign` points to the function
        // `clone_assign::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.clone_assign)(source, target);
        }
    }
}

/// Vtable of the operations an alternative supports when it is
/// [`Debug`](fmt::Debug).
pub struct DebugVtable {
    /// Formats the erased occupant with its `Debug` implementation.
    debug: unsafe fn(NonNull<Erased>, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl DebugVtable {
    /// Creates the `DebugVtable` for the type `T`.
    pub const fn new<T: fmt::Debug + 'static>() -> &'static Self {
        const {
            &Self {
                debug: debug::<T>,
            }
        }
    }

    /// Formats the `T` behind `value` using [`fmt::Debug`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `value` points to a live value of the type `T` this vtable was
    ///    created for.
    #[inline]
    pub unsafe fn debug(
        &self,
        value: NonNull<Erased>,
        formatter: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // SAFETY: We know that `self.debug` points to the function
        // `debug::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.debug)(value, formatter) }
    }
}

/// Vtable of the operations an alternative supports when it is
/// [`PartialEq`].
pub struct EqVtable {
    /// Compares two erased occupants of the same type for equality.
    eq: unsafe fn(NonNull<Erased>, NonNull<Erased>) -> bool,
}

impl EqVtable {
    /// Creates the `EqVtable` for the type `T`.
    pub const fn new<T: PartialEq + 'static>() -> &'static Self {
        const {
            &Self { eq: eq::<T> }
        }
    }

    /// Compares the two `T`s behind `lhs` and `rhs` with `==`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `lhs` and `rhs` both point to live values of the type `T` this
    ///    vtable was created for.
    #[inline]
    pub unsafe fn eq(&self, lhs: NonNull<Erased>, rhs: NonNull<Erased>) -> bool {
        // SAFETY: We know that `self.eq` points to the function `eq::<T>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.eq)(lhs, rhs) }
    }
}

/// Runs `T`'s destructor on the value behind `value`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` points to a live `T`, valid for reads and writes.
/// 2. The value is not used after this call.
unsafe fn drop_in_place<T>(value: NonNull<Erased>) {
    let value: *mut T = value.cast::<T>().as_ptr();
    // SAFETY: The pointer is valid for reads and writes of a live `T` that
    // is never used again (guaranteed by the caller).
    unsafe {
        core::ptr::drop_in_place(value);
    }
}

/// Clones the `T` behind `source` into the storage behind `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` points to a live `T`.
/// 2. `target` is valid for a write of `T`, holds no live value, and does
///    not overlap `source`.
unsafe fn clone_into<T: Clone>(source: NonNull<Erased>, target: NonNull<Erased>) {
    // SAFETY: `source` points to a live `T` (guaranteed by the caller), and
    // the reference does not outlive this call.
    let source: &T = unsafe { source.cast::<T>().as_ref() };
    let value = source.clone();
    // SAFETY: `target` is valid for a write of `T` and holds no live value
    // the write could clobber (guaranteed by the caller).
    unsafe {
        target.cast::<T>().as_ptr().write(value);
    }
}

/// Clone-assigns the `T` behind `source` onto the live `T` behind `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` and `target` both point to live `T`s and do not overlap.
/// 2. `target` is valid for reads and writes and not aliased elsewhere.
unsafe fn clone_assign<T: Clone>(source: NonNull<Erased>, target: NonNull<Erased>) {
    // SAFETY: `source` points to a live `T` (guaranteed by the caller).
    let source: &T = unsafe { source.cast::<T>().as_ref() };
    let mut target: NonNull<T> = target.cast::<T>();
    // SAFETY: `target` points to a live `T` with exclusive access
    // (guaranteed by the caller).
    let target: &mut T = unsafe { target.as_mut() };
    target.clone_from(source);
}

/// Formats the `T` behind `value` with its [`fmt::Debug`] implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `value` points to a live `T`.
unsafe fn debug<T: fmt::Debug>(
    value: NonNull<Erased>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    // SAFETY: `value` points to a live `T` (guaranteed by the caller).
    let value: &T = unsafe { value.cast::<T>().as_ref() };
    fmt::Debug::fmt(value, formatter)
}

/// Compares the two `T`s behind `lhs` and `rhs` for equality.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `lhs` and `rhs` both point to live `T`s.
unsafe fn eq<T: PartialEq>(lhs: NonNull<Erased>, rhs: NonNull<Erased>) -> bool {
    // SAFETY: `lhs` points to a live `T` (guaranteed by the caller).
    let lhs: &T = unsafe { lhs.cast::<T>().as_ref() };
    // SAFETY: `rhs` points to a live `T` (guaranteed by the caller).
    let rhs: &T = unsafe { rhs.cast::<T>().as_ref() };
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn vtables_are_shared_statics() {
        // Vtables for the same type must be the exact same static instance.
        let a = AltVtable::new::<i32>();
        let b = AltVtable::new::<i32>();
        assert!(core::ptr::eq(a, b));

        // Vtables for different types must not be.
        let c = AltVtable::new::<u32>();
        assert!(!core::ptr::eq(a, c));
    }

    #[test]
    fn type_identity() {
        let vtable = AltVtable::new::<i32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert_eq!(vtable.type_name(), core::any::type_name::<i32>());
    }

    #[test]
    fn drop_in_place_runs_destructor() {
        static DROPS: AtomicUsize = AtomicUsize::new(0);

        struct Tracked;
        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let vtable = AltVtable::new::<Tracked>();
        let mut value = core::mem::ManuallyDrop::new(Tracked);
        let ptr = NonNull::from(&mut *value).cast::<Erased>();
        // SAFETY: `ptr` points to a live `Tracked` that is never used again.
        unsafe {
            vtable.drop_in_place(ptr);
        }
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clone_vtable_round_trips() {
        let vtable = CloneVtable::new::<u64>();
        let source: u64 = 41;
        let mut target = core::mem::MaybeUninit::<u64>::uninit();
        let source_ptr = NonNull::from(&source).cast::<Erased>();
        let target_ptr = NonNull::from(&mut target).cast::<Erased>();
        // SAFETY: `source_ptr` points to a live `u64`; `target_ptr` points to
        // distinct storage valid for a `u64` write with no live value.
        unsafe {
            vtable.clone_into(source_ptr, target_ptr);
        }
        // SAFETY: `clone_into` initialized `target` above.
        assert_eq!(unsafe { target.assume_init() }, 41);

        let mut assigned: u64 = 0;
        let assigned_ptr = NonNull::from(&mut assigned).cast::<Erased>();
        // SAFETY: Both pointers reference distinct live `u64`s; `assigned` is
        // exclusively borrowed.
        unsafe {
            vtable.clone_assign(source_ptr, assigned_ptr);
        }
        assert_eq!(assigned, 41);
    }

    #[test]
    fn eq_vtable_compares_values() {
        let vtable = EqVtable::new::<&str>();
        let a = "same";
        let b = "same";
        let c = "different";
        // SAFETY: All pointers reference live `&str`s.
        unsafe {
            assert!(vtable.eq(
                NonNull::from(&a).cast::<Erased>(),
                NonNull::from(&b).cast::<Erased>()
            ));
        }
        // SAFETY: All pointers reference live `&str`s.
        unsafe {
            assert!(!vtable.eq(
                NonNull::from(&a).cast::<Erased>(),
                NonNull::from(&c).cast::<Erased>()
            ));
        }
    }
}
