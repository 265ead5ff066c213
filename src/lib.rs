#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! A closed-set discriminated union: one value out of a fixed list of types.
//!
//! ## Overview
//!
//! [`Variant<L>`] holds exactly one object drawn from the compile-time list
//! of alternative types `L`, written as a tuple: `Variant<(bool, String)>` is
//! either a `bool` or a `String`, never both, never neither (with one
//! documented exception, see below). The value is stored inline, with no
//! allocation, in storage sized for the largest alternative, and a runtime
//! discriminant records which alternative is live.
//!
//! Unlike an `enum`, the set of alternatives is assembled from existing
//! types, positions can be addressed generically, and the same machinery
//! works for any combination of types, including duplicates.
//!
//! ## Quick Example
//!
//! ```
//! use oneof::Variant;
//!
//! let mut value: Variant<(bool, String)> = Variant::new(String::from("hello world"));
//! assert_eq!(value.index(), 1);
//! assert_eq!(value.get::<1>().unwrap(), "hello world");
//! assert!(value.holds::<String, _>());
//!
//! value.set(true);
//! assert_eq!(value.index(), 0);
//! assert_eq!(value.get_as::<bool, _>(), Ok(&true));
//! ```
//!
//! ## Core Concepts
//!
//! - **Alternative set**: a tuple type listing the alternatives in order.
//!   The traits in [`AlternativeSet`]'s family describe the set at compile
//!   time; implementations are provided for arities 1 through 8.
//! - **Discriminant**: [`Variant::index`] names the live alternative, or
//!   equals [`NPOS`] in the valueless state.
//! - **By-index vs. by-type access**: positions (`get::<I>`) always work;
//!   types (`get_as::<T, _>`) are resolved at compile time and refuse to
//!   compile when `T` is absent or duplicated.
//! - **Visitation**: a [`Visitor`] implements one method per alternative
//!   type; [`Variant::visit`] dispatches to the right one in O(1).
//!
//! ## The valueless state
//!
//! [`Variant::emplace_with`] and [`Variant::try_emplace_with`] rebuild the
//! value in place: the old value is destroyed *before* the new one is
//! constructed. If that construction fails (a panic, or `Err` from the
//! closure), there is nothing left to restore, and the variant is
//! *valueless* until the next successful mutation. Every other operation
//! either mutates in place or stages the new value before destroying the old
//! one, and therefore never produces a valueless variant. See
//! [`Variant::is_valueless`] and [`BadVariantAccess`].
//!
//! For implementation details, see the [`oneof-internals`] crate.
//!
//! [`oneof-internals`]: oneof_internals

#[cfg(test)]
extern crate alloc;

mod access;
mod arities;
mod set;
mod variant;
mod visit;

pub use oneof_internals::NPOS;

#[doc(hidden)]
pub use crate::arities::{
    Storage1, Storage2, Storage3, Storage4, Storage5, Storage6, Storage7, Storage8,
};
pub use crate::{
    access::BadVariantAccess,
    set::{
        AlternativeAt, AlternativeSet, CloneSet, DebugSet, EqSet, Index0, Index1, Index2, Index3,
        Index4, Index5, Index6, Index7, Nth, Select,
    },
    variant::Variant,
    visit::{PairVisitor, VisitMut, VisitRef, Visitor, VisitorMut, WithFirst, WithSecond},
};

/// Commonly used items, for glob import.
///
/// ```
/// use oneof::prelude::*;
///
/// let value: Variant<(u8, String)> = Variant::new(7u8);
/// assert!(value.holds::<u8, _>());
/// ```
pub mod prelude {
    pub use crate::{
        BadVariantAccess, NPOS, PairVisitor, Variant, Visitor, VisitorMut,
        set::{AlternativeAt, AlternativeSet},
    };
}
