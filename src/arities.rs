//! Per-arity implementations of the alternative-set traits.
//!
//! This module is the single place where the unsafe contract of
//! [`AlternativeSet`] and its companions is established. For every supported
//! arity it generates:
//!
//! - a `#[repr(C)]` storage union of [`ManuallyDrop`] fields, one per
//!   alternative, so the compiler derives the maximum size and alignment and
//!   places every field at offset zero;
//! - the [`AlternativeSet`] implementation whose dispatch table pairs entry
//!   `i` with the `i`-th tuple type;
//! - the capability tables ([`CloneSet`], [`DebugSet`], [`EqSet`]), present
//!   only when every alternative implements the matching trait;
//! - the visitation dispatch ([`VisitRef`], [`VisitMut`]) as a compile-time
//!   generated switch over the discriminant;
//! - the position lookups ([`Nth`], [`Select`]), one pair per position.
//!
//! Raising the supported arity is a matter of adding one `alternative_set!`
//! invocation and its `alternative_at!` rows.

use core::mem::ManuallyDrop;

use oneof_internals::{AltVtable, CloneVtable, DebugVtable, EqVtable, RawSlot};

use crate::{
    set::{
        AlternativeSet, CloneSet, DebugSet, EqSet, Index0, Index1, Index2, Index3, Index4, Index5,
        Index6, Index7, Nth, Select,
    },
    visit::{VisitMut, VisitRef, Visitor, VisitorMut},
};

/// Generates the storage union and the set-level trait implementations for
/// one arity.
///
/// The first alternative is matched separately so the visitation traits can
/// anchor their common `Output` on it without a self-referential bound.
macro_rules! alternative_set {
    (
        $union:ident, $len:tt =>
        ($fidx:tt, $first:ident, $ffield:ident)
        $(, ($idx:tt, $ty:ident, $field:ident) )* $(,)?
    ) => {
        /// Storage union for one arity of alternative set: sized and aligned
        /// for every field, each of which lives at offset zero.
        #[doc(hidden)]
        #[repr(C)]
        pub union $union<$first: 'static $(, $ty: 'static)*> {
            /// Storage for one alternative.
            $ffield: ManuallyDrop<$first>,
            $(
                /// Storage for one alternative.
                $field: ManuallyDrop<$ty>,
            )*
        }

        // SAFETY: The storage union is `#[repr(C)]` with one `ManuallyDrop`
        // field per alternative, so it is sized and aligned for every listed
        // type and every field lives at offset zero. `LEN` matches the table
        // length, and table entry `i` is created for the `i`-th tuple type.
        unsafe impl<$first: 'static $(, $ty: 'static)*> AlternativeSet for ($first, $($ty,)*) {
            type Storage = $union<$first $(, $ty)*>;
            const LEN: usize = $len;
            const VTABLES: &'static [&'static AltVtable] = &[
                AltVtable::new::<$first>()
                $(, AltVtable::new::<$ty>())*
            ];
        }

        // SAFETY: Entry `i` is created for the `i`-th tuple type.
        unsafe impl<$first: Clone + 'static $(, $ty: Clone + 'static)*> CloneSet
            for ($first, $($ty,)*)
        {
            const CLONE_VTABLES: &'static [&'static CloneVtable] = &[
                CloneVtable::new::<$first>()
                $(, CloneVtable::new::<$ty>())*
            ];
        }

        // SAFETY: Entry `i` is created for the `i`-th tuple type.
        unsafe impl<$first: core::fmt::Debug + 'static $(, $ty: core::fmt::Debug + 'static)*>
            DebugSet for ($first, $($ty,)*)
        {
            const DEBUG_VTABLES: &'static [&'static DebugVtable] = &[
                DebugVtable::new::<$first>()
                $(, DebugVtable::new::<$ty>())*
            ];
        }

        // SAFETY: Entry `i` is created for the `i`-th tuple type.
        unsafe impl<$first: PartialEq + 'static $(, $ty: PartialEq + 'static)*> EqSet
            for ($first, $($ty,)*)
        {
            const EQ_VTABLES: &'static [&'static EqVtable] = &[
                EqVtable::new::<$first>()
                $(, EqVtable::new::<$ty>())*
            ];
        }

        // SAFETY: Each dispatch arm projects the storage as the alternative
        // type that the `AlternativeSet` implementation above pairs with that
        // arm's discriminant.
        unsafe impl<Vis, $first: 'static $(, $ty: 'static)*> VisitRef<Vis> for ($first, $($ty,)*)
        where
            Vis: Visitor<$first>,
            $( Vis: Visitor<$ty, Output = <Vis as Visitor<$first>>::Output>, )*
        {
            type Output = <Vis as Visitor<$first>>::Output;

            unsafe fn dispatch_ref(
                slot: &RawSlot<Self::Storage>,
                visitor: Vis,
            ) -> Self::Output {
                match slot.discriminant() {
                    $fidx => {
                        // SAFETY: The caller guarantees the discriminant
                        // names the live alternative; this arm's index is
                        // paired with this type.
                        let value = unsafe { slot.assume_ref::<$first>() };
                        visitor.visit(value)
                    }
                    $(
                        $idx => {
                            // SAFETY: The caller guarantees the discriminant
                            // names the live alternative; this arm's index is
                            // paired with this type.
                            let value = unsafe { slot.assume_ref::<$ty>() };
                            visitor.visit(value)
                        }
                    )*
                    // SAFETY: The caller guarantees the discriminant is a
                    // valid alternative index of this set.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }

        // SAFETY: Each dispatch arm projects the storage as the alternative
        // type that the `AlternativeSet` implementation above pairs with that
        // arm's discriminant.
        unsafe impl<Vis, $first: 'static $(, $ty: 'static)*> VisitMut<Vis> for ($first, $($ty,)*)
        where
            Vis: VisitorMut<$first>,
            $( Vis: VisitorMut<$ty, Output = <Vis as VisitorMut<$first>>::Output>, )*
        {
            type Output = <Vis as VisitorMut<$first>>::Output;

            unsafe fn dispatch_mut(
                slot: &mut RawSlot<Self::Storage>,
                visitor: Vis,
            ) -> Self::Output {
                match slot.discriminant() {
                    $fidx => {
                        // SAFETY: The caller guarantees the discriminant
                        // names the live alternative; this arm's index is
                        // paired with this type.
                        let value = unsafe { slot.assume_mut::<$first>() };
                        visitor.visit_mut(value)
                    }
                    $(
                        $idx => {
                            // SAFETY: The caller guarantees the discriminant
                            // names the live alternative; this arm's index is
                            // paired with this type.
                            let value = unsafe { slot.assume_mut::<$ty>() };
                            visitor.visit_mut(value)
                        }
                    )*
                    // SAFETY: The caller guarantees the discriminant is a
                    // valid alternative index of this set.
                    _ => unsafe { core::hint::unreachable_unchecked() },
                }
            }
        }
    };
}

/// Generates the position lookups ([`Nth`] and [`Select`]) for one position
/// of one arity.
macro_rules! alternative_at {
    ($idx:tt, $ty:ident, $marker:ident, [ $($all:ident),+ ]) => {
        // SAFETY: `$ty` is the alternative at this position of the tuple, and
        // the position is within the tuple's length.
        unsafe impl<$($all: 'static),+> Nth<$idx> for ($($all,)+) {
            type Alternative = $ty;
        }

        // SAFETY: This position is where `$ty` occurs in the tuple, and it is
        // within the tuple's length.
        unsafe impl<$($all: 'static),+> Select<$ty, $marker> for ($($all,)+) {
            const INDEX: usize = $idx;
        }
    };
}

alternative_set!(Storage1, 1 => (0, T0, _t0));
alternative_set!(Storage2, 2 => (0, T0, _t0), (1, T1, _t1));
alternative_set!(Storage3, 3 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2));
alternative_set!(Storage4, 4 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2), (3, T3, _t3));
alternative_set!(Storage5, 5 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2), (3, T3, _t3), (4, T4, _t4));
alternative_set!(Storage6, 6 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2), (3, T3, _t3), (4, T4, _t4), (5, T5, _t5));
alternative_set!(Storage7, 7 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2), (3, T3, _t3), (4, T4, _t4), (5, T5, _t5), (6, T6, _t6));
alternative_set!(Storage8, 8 => (0, T0, _t0), (1, T1, _t1), (2, T2, _t2), (3, T3, _t3), (4, T4, _t4), (5, T5, _t5), (6, T6, _t6), (7, T7, _t7));

alternative_at!(0, T0, Index0, [T0]);

alternative_at!(0, T0, Index0, [T0, T1]);
alternative_at!(1, T1, Index1, [T0, T1]);

alternative_at!(0, T0, Index0, [T0, T1, T2]);
alternative_at!(1, T1, Index1, [T0, T1, T2]);
alternative_at!(2, T2, Index2, [T0, T1, T2]);

alternative_at!(0, T0, Index0, [T0, T1, T2, T3]);
alternative_at!(1, T1, Index1, [T0, T1, T2, T3]);
alternative_at!(2, T2, Index2, [T0, T1, T2, T3]);
alternative_at!(3, T3, Index3, [T0, T1, T2, T3]);

alternative_at!(0, T0, Index0, [T0, T1, T2, T3, T4]);
alternative_at!(1, T1, Index1, [T0, T1, T2, T3, T4]);
alternative_at!(2, T2, Index2, [T0, T1, T2, T3, T4]);
alternative_at!(3, T3, Index3, [T0, T1, T2, T3, T4]);
alternative_at!(4, T4, Index4, [T0, T1, T2, T3, T4]);

alternative_at!(0, T0, Index0, [T0, T1, T2, T3, T4, T5]);
alternative_at!(1, T1, Index1, [T0, T1, T2, T3, T4, T5]);
alternative_at!(2, T2, Index2, [T0, T1, T2, T3, T4, T5]);
alternative_at!(3, T3, Index3, [T0, T1, T2, T3, T4, T5]);
alternative_at!(4, T4, Index4, [T0, T1, T2, T3, T4, T5]);
alternative_at!(5, T5, Index5, [T0, T1, T2, T3, T4, T5]);

alternative_at!(0, T0, Index0, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(1, T1, Index1, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(2, T2, Index2, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(3, T3, Index3, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(4, T4, Index4, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(5, T5, Index5, [T0, T1, T2, T3, T4, T5, T6]);
alternative_at!(6, T6, Index6, [T0, T1, T2, T3, T4, T5, T6]);

alternative_at!(0, T0, Index0, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(1, T1, Index1, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(2, T2, Index2, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(3, T3, Index3, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(4, T4, Index4, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(5, T5, Index5, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(6, T6, Index6, [T0, T1, T2, T3, T4, T5, T6, T7]);
alternative_at!(7, T7, Index7, [T0, T1, T2, T3, T4, T5, T6, T7]);
