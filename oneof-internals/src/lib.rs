#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`oneof`].
//!
//! # Overview
//!
//! This crate contains the low-level storage and dispatch primitives that
//! power the [`oneof`] discriminated-union library. It provides the raw slot
//! that holds the bytes of exactly one alternative, and the vtables that turn
//! a runtime discriminant into a statically-typed operation on those bytes.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`oneof`] crate, not
//! this one.
//!
//! # Architecture
//!
//! The crate is organized around two concerns:
//!
//! - **[`slot`]**: Untyped alternative storage
//!   - [`RawSlot`]: A `MaybeUninit` storage block paired with a discriminant
//!   - [`NPOS`]: The sentinel discriminant meaning "no alternative is live"
//!
//! - **Vtables**: Per-alternative dispatch tables
//!   - [`AltVtable`]: Function pointers every alternative provides
//!     (destruction and type identity)
//!   - [`CloneVtable`], [`DebugVtable`], [`EqVtable`]: Function pointers
//!     available only when an alternative implements the matching trait
//!
//! # Safety Strategy
//!
//! A [`RawSlot`] never knows which types may occupy it; the pairing between
//! the discriminant value and the type of the live bytes is established by
//! the caller (the `oneof` crate's alternative-set implementations) and
//! consumed through [`NonNull<Erased>`] pointers. This crate keeps that
//! pairing sound through:
//!
//! - **Module-based encapsulation**: The slot's fields and every vtable's
//!   fields are module-private, so the invariants can be verified within a
//!   single file
//! - **Documented vtable contracts**: Each vtable method specifies exactly
//!   which type pairing the caller must guarantee
//! - **Vacate-before-destroy ordering**: The slot is marked vacant before its
//!   occupant's destructor runs, so a panicking destructor can leak the bytes
//!   but can never leave a stale discriminant behind
//!
//! [`oneof`]: https://docs.rs/oneof/latest/oneof/
//! [`NonNull<Erased>`]: core::ptr::NonNull

mod slot;
mod util;

pub use slot::{AltVtable, CloneVtable, DebugVtable, EqVtable, NPOS, RawSlot, storage_ptr};
pub use util::Erased;
