//! Alternative storage and the vtables that operate on it.

mod raw;
mod vtable;

pub use self::{
    raw::{NPOS, RawSlot, storage_ptr},
    vtable::{AltVtable, CloneVtable, DebugVtable, EqVtable},
};
