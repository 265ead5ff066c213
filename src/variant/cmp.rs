//! Equality between variants.

use oneof_internals::NPOS;

use crate::{set::EqSet, variant::Variant};

impl<L: EqSet> PartialEq for Variant<L> {
    /// Two variants are equal when they hold the same alternative with equal
    /// values. Two valueless variants compare equal; a valueless variant
    /// never equals an occupied one.
    fn eq(&self, other: &Self) -> bool {
        let discriminant = self.raw().discriminant();
        if discriminant != other.raw().discriminant() {
            return false;
        }
        if discriminant == NPOS {
            return true;
        }
        // SAFETY:
        // 1. Both slots hold live values of the type that
        //    `EQ_VTABLES[discriminant]` was created for (type invariant).
        unsafe { L::EQ_VTABLES[discriminant].eq(self.raw().value_ptr(), other.raw().value_ptr()) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::variant::Variant;

    #[test]
    fn equal_alternative_and_value() {
        let a: Variant<(bool, String)> = Variant::new(String::from("same"));
        let b: Variant<(bool, String)> = Variant::new(String::from("same"));
        assert_eq!(a, b);
    }

    #[test]
    fn equal_alternative_different_value() {
        let a: Variant<(bool, String)> = Variant::new(String::from("one"));
        let b: Variant<(bool, String)> = Variant::new(String::from("two"));
        assert_ne!(a, b);
    }

    #[test]
    fn different_alternatives_are_never_equal() {
        let a: Variant<(bool, String)> = Variant::new(true);
        let b: Variant<(bool, String)> = Variant::new(String::from("true"));
        assert_ne!(a, b);
    }

    #[test]
    fn valueless_variants_compare_equal() {
        let mut a: Variant<(u8, String)> = Variant::new(1u8);
        let mut b: Variant<(u8, String)> = Variant::new(2u8);
        let occupied: Variant<(u8, String)> = Variant::new(3u8);
        let _ = a.try_emplace_with::<1, _, _>(|| Err(()));
        let _ = b.try_emplace_with::<1, _, _>(|| Err(()));
        assert_eq!(a, b);
        assert_ne!(a, occupied);
    }
}
