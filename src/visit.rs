//! Uniform dispatch over whichever alternative is live.
//!
//! A visitor is a value implementing [`Visitor<T>`] (or [`VisitorMut<T>`])
//! for *every* alternative type `T` of the set, with one common `Output`
//! across all of them. [`Variant::visit`] then runs the single matching
//! implementation for the live alternative, selected by the discriminant.
//!
//! Two-variant visitation ([`Variant::visit_with`]) covers the cartesian
//! product of both discriminants by nesting the same dispatch: the outer
//! variant is visited with an adapter ([`WithSecond`]) that, knowing the
//! outer alternative, visits the inner variant with a second adapter
//! ([`WithFirst`]) that finally calls the caller's [`PairVisitor`].

use core::marker::PhantomData;

use oneof_internals::RawSlot;

use crate::{
    access::BadVariantAccess,
    set::AlternativeSet,
    variant::Variant,
};

/// A visitor over shared references to the alternatives.
///
/// Implement this for every alternative type of the sets you intend to
/// visit, with the same `Output` for each.
///
/// # Examples
///
/// ```
/// use oneof::{Variant, Visitor};
///
/// struct Describe;
///
/// impl Visitor<i32> for Describe {
///     type Output = String;
///     fn visit(self, value: &i32) -> String {
///         format!("the number {value}")
///     }
/// }
///
/// impl Visitor<String> for Describe {
///     type Output = String;
///     fn visit(self, value: &String) -> String {
///         format!("the text {value:?}")
///     }
/// }
///
/// let value: Variant<(i32, String)> = Variant::new(7);
/// assert_eq!(value.visit(Describe).unwrap(), "the number 7");
/// ```
pub trait Visitor<T>: Sized {
    /// The result of visiting any alternative.
    type Output;

    /// Visits the live alternative.
    fn visit(self, value: &T) -> Self::Output;
}

/// A visitor over mutable references to the alternatives.
pub trait VisitorMut<T>: Sized {
    /// The result of visiting any alternative.
    type Output;

    /// Visits the live alternative mutably.
    fn visit_mut(self, value: &mut T) -> Self::Output;
}

/// A visitor over one alternative from each of two variants.
///
/// Implement this for every pair of alternative types (first variant's ×
/// second variant's), with the same `Output` for each pair.
pub trait PairVisitor<A, B>: Sized {
    /// The result of visiting any pair of alternatives.
    type Output;

    /// Visits the two live alternatives.
    fn visit_pair(self, first: &A, second: &B) -> Self::Output;
}

/// Dispatch of a [`Visitor`] over an alternative set.
///
/// Implemented by this crate for every supported tuple arity as a
/// compile-time generated switch over the discriminant; not meant to be
/// implemented downstream.
///
/// # Safety
///
/// Implementations must guarantee that the dispatch arm for each
/// discriminant value projects the slot as exactly the alternative type the
/// set's [`AlternativeSet`] implementation pairs with that discriminant.
pub unsafe trait VisitRef<V>: AlternativeSet {
    /// The visitor's common output type.
    type Output;

    /// Runs `visitor` on the live alternative.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot's discriminant is a valid index of this set (not
    ///    [`NPOS`](oneof_internals::NPOS)) and names the live alternative,
    ///    per the variant invariant.
    unsafe fn dispatch_ref(slot: &RawSlot<Self::Storage>, visitor: V) -> Self::Output;
}

/// Dispatch of a [`VisitorMut`] over an alternative set.
///
/// # Safety
///
/// As for [`VisitRef`].
pub unsafe trait VisitMut<V>: AlternativeSet {
    /// The visitor's common output type.
    type Output;

    /// Runs `visitor` on the live alternative mutably.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The slot's discriminant is a valid index of this set (not
    ///    [`NPOS`](oneof_internals::NPOS)) and names the live alternative,
    ///    per the variant invariant.
    unsafe fn dispatch_mut(slot: &mut RawSlot<Self::Storage>, visitor: V) -> Self::Output;
}

impl<L: AlternativeSet> Variant<L> {
    /// Runs `visitor` on the live alternative and returns its output.
    ///
    /// Fails with [`BadVariantAccess::Valueless`] when no alternative is
    /// live; the visitor is dropped unused in that case.
    pub fn visit<V>(&self, visitor: V) -> Result<<L as VisitRef<V>>::Output, BadVariantAccess>
    where
        L: VisitRef<V>,
    {
        if self.is_valueless() {
            return Err(BadVariantAccess::Valueless);
        }
        // SAFETY:
        // 1. The discriminant is not NPOS (checked above), so by the variant
        //    invariant it is a valid index naming the live alternative.
        Ok(unsafe { <L as VisitRef<V>>::dispatch_ref(self.raw(), visitor) })
    }

    /// Runs `visitor` on the live alternative mutably and returns its
    /// output.
    ///
    /// Fails with [`BadVariantAccess::Valueless`] when no alternative is
    /// live.
    pub fn visit_mut<V>(&mut self, visitor: V) -> Result<<L as VisitMut<V>>::Output, BadVariantAccess>
    where
        L: VisitMut<V>,
    {
        if self.is_valueless() {
            return Err(BadVariantAccess::Valueless);
        }
        // SAFETY:
        // 1. The discriminant is not NPOS (checked above), so by the variant
        //    invariant it is a valid index naming the live alternative.
        Ok(unsafe { <L as VisitMut<V>>::dispatch_mut(self.raw_mut(), visitor) })
    }

    /// Runs `visitor` on the pair of live alternatives of `self` and
    /// `other`, covering the cartesian product of both sets.
    ///
    /// Fails with [`BadVariantAccess::Valueless`] when either variant is
    /// valueless.
    pub fn visit_with<'other, V, R, O>(
        &self,
        other: &'other Variant<R>,
        visitor: V,
    ) -> Result<O, BadVariantAccess>
    where
        R: AlternativeSet,
        L: VisitRef<WithSecond<'other, R, V, O>, Output = O>,
    {
        if self.is_valueless() || other.is_valueless() {
            return Err(BadVariantAccess::Valueless);
        }
        let adapter = WithSecond {
            second: other,
            visitor,
            output: PhantomData,
        };
        // SAFETY:
        // 1. The discriminant is not NPOS (checked above), so by the variant
        //    invariant it is a valid index naming the live alternative.
        Ok(unsafe { <L as VisitRef<WithSecond<'other, R, V, O>>>::dispatch_ref(self.raw(), adapter) })
    }
}

/// Adapter visitor for [`Variant::visit_with`]: visits the first variant,
/// then dispatches into the second.
///
/// Only constructed by `visit_with`, which has already verified that the
/// second variant is not valueless.
pub struct WithSecond<'a, R: AlternativeSet, V, O> {
    /// The second variant, dispatched into once the first alternative is
    /// known.
    second: &'a Variant<R>,
    /// The caller's pair visitor.
    visitor: V,
    /// Pins down the common output type.
    output: PhantomData<fn() -> O>,
}

impl<'a, T, R, V, O> Visitor<T> for WithSecond<'a, R, V, O>
where
    R: AlternativeSet + for<'t> VisitRef<WithFirst<'t, T, V>, Output = O>,
{
    type Output = O;

    fn visit(self, value: &T) -> O {
        debug_assert!(!self.second.is_valueless());
        let adapter = WithFirst {
            first: value,
            visitor: self.visitor,
        };
        // SAFETY:
        // 1. `visit_with` verified the second variant is not valueless
        //    before constructing this adapter, and the shared borrows it
        //    holds keep the variant unchanged until dispatch; so the
        //    discriminant is a valid index naming the live alternative.
        unsafe { <R as VisitRef<WithFirst<'_, T, V>>>::dispatch_ref(self.second.raw(), adapter) }
    }
}

/// Adapter visitor for [`Variant::visit_with`]: carries the first variant's
/// live alternative into the second dispatch.
pub struct WithFirst<'t, T, V> {
    /// The first variant's live alternative.
    first: &'t T,
    /// The caller's pair visitor.
    visitor: V,
}

impl<'t, T, U, V> Visitor<U> for WithFirst<'t, T, V>
where
    V: PairVisitor<T, U>,
{
    type Output = <V as PairVisitor<T, U>>::Output;

    fn visit(self, value: &U) -> Self::Output {
        self.visitor.visit_pair(self.first, value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;

    struct Describe;

    impl Visitor<i32> for Describe {
        type Output = String;
        fn visit(self, value: &i32) -> String {
            format!("int {value}")
        }
    }

    impl Visitor<String> for Describe {
        type Output = String;
        fn visit(self, value: &String) -> String {
            format!("text {value}")
        }
    }

    struct Reset;

    impl VisitorMut<i32> for Reset {
        type Output = ();
        fn visit_mut(self, value: &mut i32) {
            *value = 0;
        }
    }

    impl VisitorMut<String> for Reset {
        type Output = ();
        fn visit_mut(self, value: &mut String) {
            value.clear();
        }
    }

    #[test]
    fn visit_dispatches_on_the_live_alternative() {
        let number: Variant<(i32, String)> = Variant::new(7);
        assert_eq!(number.visit(Describe).unwrap(), "int 7");

        let text: Variant<(i32, String)> = Variant::new(String::from("abc"));
        assert_eq!(text.visit(Describe).unwrap(), "text abc");
    }

    #[test]
    fn visit_mut_mutates_in_place() {
        let mut value: Variant<(i32, String)> = Variant::new(String::from("abc"));
        value.visit_mut(Reset).unwrap();
        assert_eq!(value.get::<1>().unwrap(), "");
    }

    #[test]
    fn visit_fails_on_a_valueless_variant() {
        let mut value: Variant<(i32, String)> = Variant::new(1);
        let _ = value.try_emplace_with::<1, _, _>(|| Err(()));
        assert_eq!(value.visit(Describe), Err(BadVariantAccess::Valueless));
    }

    struct DescribePair;

    impl PairVisitor<i32, i32> for DescribePair {
        type Output = String;
        fn visit_pair(self, first: &i32, second: &i32) -> String {
            format!("ii {first} {second}")
        }
    }

    impl PairVisitor<i32, bool> for DescribePair {
        type Output = String;
        fn visit_pair(self, first: &i32, second: &bool) -> String {
            format!("ib {first} {second}")
        }
    }

    impl PairVisitor<bool, i32> for DescribePair {
        type Output = String;
        fn visit_pair(self, first: &bool, second: &i32) -> String {
            format!("bi {first} {second}")
        }
    }

    impl PairVisitor<bool, bool> for DescribePair {
        type Output = String;
        fn visit_pair(self, first: &bool, second: &bool) -> String {
            format!("bb {first} {second}")
        }
    }

    #[test]
    fn visit_with_covers_the_cartesian_product() {
        let number: Variant<(i32, bool)> = Variant::new(3);
        let flag: Variant<(i32, bool)> = Variant::new(true);

        assert_eq!(number.visit_with(&flag, DescribePair).unwrap(), "ib 3 true");
        assert_eq!(flag.visit_with(&number, DescribePair).unwrap(), "bi true 3");
        assert_eq!(number.visit_with(&number, DescribePair).unwrap(), "ii 3 3");
        assert_eq!(flag.visit_with(&flag, DescribePair).unwrap(), "bb true true");
    }

    #[test]
    fn visit_with_fails_when_either_side_is_valueless() {
        let mut broken: Variant<(i32, bool)> = Variant::new(1);
        let _ = broken.try_emplace_with::<0, _, _>(|| Err(()));
        let fine: Variant<(i32, bool)> = Variant::new(2);

        assert_eq!(
            fine.visit_with(&broken, DescribePair),
            Err(BadVariantAccess::Valueless)
        );
        assert_eq!(
            broken.visit_with(&fine, DescribePair),
            Err(BadVariantAccess::Valueless)
        );
    }
}
