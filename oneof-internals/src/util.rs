//! Internal utility types.

/// Marker type used when type-erasing a slot's occupant.
///
/// This uninhabited type serves as a placeholder pointee in
/// [`NonNull<Erased>`](core::ptr::NonNull) pointers when the concrete
/// alternative type has been erased. A pointer to `Erased` is never
/// dereferenced as-is; it is always cast back to the concrete alternative
/// type recorded by the vtable that travels with it.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and rules out accidental reads through the erased
/// pointer.
#[derive(Clone, Copy, Debug)]
pub enum Erased {}
