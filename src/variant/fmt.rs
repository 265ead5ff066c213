//! Formatting for variants.

use core::fmt;

use oneof_internals::NPOS;

use crate::{set::DebugSet, variant::Variant};

impl<L: DebugSet> fmt::Debug for Variant<L> {
    /// Formats as `Variant[index](value)`, or `Variant(<valueless>)` when no
    /// alternative is live.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw().discriminant() {
            NPOS => formatter.write_str("Variant(<valueless>)"),
            discriminant => {
                write!(formatter, "Variant[{discriminant}](")?;
                // SAFETY:
                // 1. The slot holds a live value of the type that
                //    `DEBUG_VTABLES[discriminant]` was created for (type
                //    invariant).
                unsafe {
                    L::DEBUG_VTABLES[discriminant].debug(self.raw().value_ptr(), formatter)?;
                }
                formatter.write_str(")")
            }
        }
    }
}
