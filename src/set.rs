//! Traits describing a closed set of alternatives.
//!
//! An *alternative set* is a Rust tuple type `(T0, ..., Tn-1)` listing, in
//! order, the types a [`Variant`](crate::Variant) may hold. The traits in
//! this module are the compile-time description of such a set:
//!
//! - [`AlternativeSet`] supplies the storage union and the base dispatch
//!   table every set has.
//! - [`CloneSet`], [`DebugSet`] and [`EqSet`] supply additional dispatch
//!   tables that only exist when *every* alternative implements the matching
//!   trait, mirroring how the corresponding `Variant` impls are gated.
//! - [`Nth`] resolves a position to its alternative type.
//! - [`Select`] resolves an alternative type to its position. The resolution
//!   happens entirely at compile time: a type that occurs at two positions
//!   matches two `Select` implementations, which makes any by-type operation
//!   on it ambiguous and therefore a compile error, never a runtime fault.
//!
//! All implementations are provided by this crate for tuples of arity 1
//! through 8; the traits are not meant to be implemented downstream.

use oneof_internals::{AltVtable, CloneVtable, DebugVtable, EqVtable};

/// A closed, ordered set of alternative types.
///
/// Implemented by this crate for tuples `(T0,)` through `(T0, ..., T7)`.
///
/// # Safety
///
/// Implementations must guarantee:
///
/// 1. [`Storage`](AlternativeSet::Storage) is sized and aligned to fit every
///    alternative in the set, with each alternative's bytes starting at
///    offset zero.
/// 2. [`LEN`](AlternativeSet::LEN) equals the number of alternatives, and
///    [`VTABLES`](AlternativeSet::VTABLES) has exactly that many entries.
/// 3. `VTABLES[i]` is created for the `i`-th alternative type of the set.
///
/// The `Variant` operations rely on these guarantees to pair discriminant
/// values with typed reads, writes and destructor calls.
pub unsafe trait AlternativeSet: Sized + 'static {
    /// Storage fitting any one alternative of the set.
    type Storage;

    /// The number of alternatives in the set.
    const LEN: usize;

    /// The base dispatch table: entry `i` destroys and identifies the `i`-th
    /// alternative.
    const VTABLES: &'static [&'static AltVtable];
}

/// An alternative set whose alternatives are all [`Clone`].
///
/// # Safety
///
/// Implementations must guarantee that
/// [`CLONE_VTABLES`](CloneSet::CLONE_VTABLES) has
/// [`LEN`](AlternativeSet::LEN) entries and that entry `i` is created for the
/// `i`-th alternative type of the set.
pub unsafe trait CloneSet: AlternativeSet {
    /// The clone dispatch table: entry `i` clone-constructs or clone-assigns
    /// the `i`-th alternative.
    const CLONE_VTABLES: &'static [&'static CloneVtable];
}

/// An alternative set whose alternatives are all [`Debug`](core::fmt::Debug).
///
/// # Safety
///
/// Implementations must guarantee that
/// [`DEBUG_VTABLES`](DebugSet::DEBUG_VTABLES) has
/// [`LEN`](AlternativeSet::LEN) entries and that entry `i` is created for the
/// `i`-th alternative type of the set.
pub unsafe trait DebugSet: AlternativeSet {
    /// The debug dispatch table: entry `i` formats the `i`-th alternative.
    const DEBUG_VTABLES: &'static [&'static DebugVtable];
}

/// An alternative set whose alternatives are all [`PartialEq`].
///
/// # Safety
///
/// Implementations must guarantee that [`EQ_VTABLES`](EqSet::EQ_VTABLES) has
/// [`LEN`](AlternativeSet::LEN) entries and that entry `i` is created for the
/// `i`-th alternative type of the set.
pub unsafe trait EqSet: AlternativeSet {
    /// The equality dispatch table: entry `i` compares two values of the
    /// `i`-th alternative.
    const EQ_VTABLES: &'static [&'static EqVtable];
}

/// Position-to-type lookup: the alternative at position `I` of the set.
///
/// # Safety
///
/// Implementations must guarantee that `I` is a valid position
/// (`I < LEN`) and that [`Alternative`](Nth::Alternative) is exactly the
/// `I`-th alternative type of the set.
pub unsafe trait Nth<const I: usize>: AlternativeSet {
    /// The type of the alternative at position `I`.
    type Alternative: 'static;
}

/// Type-to-position lookup: the unique position of `T` within the set.
///
/// The `Position` parameter is one of the uninhabited markers
/// ([`Index0`]..[`Index7`]) and is always inferred; it exists so that each
/// position is a distinct implementation. When `T` occurs at exactly one
/// position, inference finds exactly one implementation. When `T` occurs
/// twice (duplicate alternatives are legal), inference finds two and the
/// by-type operation fails to compile, which is the intended behavior:
/// ambiguity is a compile error, and by-index access remains fully defined.
///
/// # Safety
///
/// Implementations must guarantee that [`INDEX`](Select::INDEX) is a valid
/// position (`INDEX < LEN`) and that `T` is exactly the `INDEX`-th
/// alternative type of the set.
pub unsafe trait Select<T, Position>: AlternativeSet {
    /// The position of `T` within the set.
    const INDEX: usize;
}

/// The alternative type at position `I` of the set `L`.
///
/// ```
/// use oneof::AlternativeAt;
///
/// let text: AlternativeAt<1, (bool, String)> = String::from("second");
/// assert_eq!(text, "second");
/// ```
pub type AlternativeAt<const I: usize, L> = <L as Nth<I>>::Alternative;

/// Position marker for [`Select`]: the first alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index0 {}
/// Position marker for [`Select`]: the second alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index1 {}
/// Position marker for [`Select`]: the third alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index2 {}
/// Position marker for [`Select`]: the fourth alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index3 {}
/// Position marker for [`Select`]: the fifth alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index4 {}
/// Position marker for [`Select`]: the sixth alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index5 {}
/// Position marker for [`Select`]: the seventh alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index6 {}
/// Position marker for [`Select`]: the eighth alternative.
#[derive(Clone, Copy, Debug)]
pub enum Index7 {}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn select_positions() {
        assert_eq!(<(bool, String) as Select<bool, Index0>>::INDEX, 0);
        assert_eq!(<(bool, String) as Select<String, Index1>>::INDEX, 1);
        assert_eq!(
            <(u8, u16, u32, u64) as Select<u64, Index3>>::INDEX,
            3
        );
    }

    #[test]
    fn table_lengths_match() {
        assert_eq!(<(u8,) as AlternativeSet>::LEN, 1);
        assert_eq!(<(u8,) as AlternativeSet>::VTABLES.len(), 1);
        assert_eq!(<(u8, u16, u32) as AlternativeSet>::LEN, 3);
        assert_eq!(<(u8, u16, u32) as AlternativeSet>::VTABLES.len(), 3);
        assert_eq!(<(u8, u16, u32) as CloneSet>::CLONE_VTABLES.len(), 3);
        assert_eq!(<(u8, u16, u32) as DebugSet>::DEBUG_VTABLES.len(), 3);
        assert_eq!(<(u8, u16, u32) as EqSet>::EQ_VTABLES.len(), 3);
    }

    #[test]
    fn vtable_entries_identify_their_types() {
        use core::any::TypeId;

        let tables = <(bool, String) as AlternativeSet>::VTABLES;
        assert_eq!(tables[0].type_id(), TypeId::of::<bool>());
        assert_eq!(tables[1].type_id(), TypeId::of::<String>());
    }

    #[test]
    fn alternative_at_resolves_positions() {
        let first: AlternativeAt<0, (bool, String)> = true;
        let second: AlternativeAt<1, (bool, String)> = String::from("text");
        assert!(first);
        assert_eq!(second, "text");
    }
}
