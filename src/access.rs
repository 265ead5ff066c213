//! Checked projection of the live alternative.
//!
//! Every accessor here is non-panicking: failures are reported through
//! [`BadVariantAccess`] (for the `Result`-returning family) or as `None` (for
//! the `get_if` family). Which failures are *possible* is decided at compile
//! time: asking for a type that is not in the set, or that occurs twice,
//! does not compile at all.

use core::fmt;

use oneof_internals::NPOS;

use crate::{
    set::{AlternativeSet, Nth, Select},
    variant::Variant,
};

/// Error returned when a projection does not match the live alternative.
///
/// Carries enough context to produce a useful message: which alternative the
/// caller asked for, and which one (if any) was live instead. Always
/// recoverable; the variant is never modified by a failed access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadVariantAccess {
    /// The requested alternative exists but is not the live one.
    WrongAlternative {
        /// Position of the requested alternative.
        requested_index: usize,
        /// Type name of the requested alternative.
        requested_type: &'static str,
        /// Position of the live alternative.
        active_index: usize,
        /// Type name of the live alternative.
        active_type: &'static str,
    },
    /// The variant is valueless: no alternative is live at all.
    Valueless,
}

impl fmt::Display for BadVariantAccess {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongAlternative {
                requested_index,
                requested_type,
                active_index,
                active_type,
            } => write!(
                formatter,
                "requested alternative {requested_index} ({requested_type}), \
                 but alternative {active_index} ({active_type}) is active"
            ),
            Self::Valueless => formatter.write_str("the variant is valueless: no alternative is active"),
        }
    }
}

impl core::error::Error for BadVariantAccess {}

impl<L: AlternativeSet> Variant<L> {
    /// Builds the error for a projection that asked for `requested_index`.
    fn mismatch(&self, requested_index: usize, requested_type: &'static str) -> BadVariantAccess {
        match self.raw().discriminant() {
            NPOS => BadVariantAccess::Valueless,
            active_index => BadVariantAccess::WrongAlternative {
                requested_index,
                requested_type,
                active_index,
                active_type: L::VTABLES[active_index].type_name(),
            },
        }
    }

    /// Returns a reference to the alternative at position `I`, or an error
    /// describing what is live instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(bool, String)> = Variant::new(String::from("live"));
    /// assert_eq!(value.get::<1>().unwrap(), "live");
    /// assert!(value.get::<0>().is_err());
    /// ```
    pub fn get<const I: usize>(&self) -> Result<&<L as Nth<I>>::Alternative, BadVariantAccess>
    where
        L: Nth<I>,
    {
        if self.raw().discriminant() == I {
            // SAFETY:
            // 1. The discriminant equals `I`, and `Nth` guarantees the
            //    alternative at `I` has this type, so a live value of it
            //    occupies the slot.
            Ok(unsafe { self.raw().assume_ref() })
        } else {
            Err(self.mismatch(I, core::any::type_name::<<L as Nth<I>>::Alternative>()))
        }
    }

    /// Returns a mutable reference to the alternative at position `I`, or an
    /// error describing what is live instead.
    pub fn get_mut<const I: usize>(
        &mut self,
    ) -> Result<&mut <L as Nth<I>>::Alternative, BadVariantAccess>
    where
        L: Nth<I>,
    {
        if self.raw().discriminant() == I {
            // SAFETY:
            // 1. The discriminant equals `I`, and `Nth` guarantees the
            //    alternative at `I` has this type, so a live value of it
            //    occupies the slot.
            Ok(unsafe { self.raw_mut().assume_mut() })
        } else {
            Err(self.mismatch(I, core::any::type_name::<<L as Nth<I>>::Alternative>()))
        }
    }

    /// Returns a reference to the alternative at position `I`, or `None` when
    /// it is not the live one.
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(bool, String)> = Variant::new(true);
    /// assert_eq!(value.get_if::<0>(), Some(&true));
    /// assert_eq!(value.get_if::<1>(), None);
    /// ```
    #[inline]
    pub fn get_if<const I: usize>(&self) -> Option<&<L as Nth<I>>::Alternative>
    where
        L: Nth<I>,
    {
        self.get::<I>().ok()
    }

    /// Returns a mutable reference to the alternative at position `I`, or
    /// `None` when it is not the live one.
    #[inline]
    pub fn get_if_mut<const I: usize>(&mut self) -> Option<&mut <L as Nth<I>>::Alternative>
    where
        L: Nth<I>,
    {
        self.get_mut::<I>().ok()
    }

    /// Returns a reference to the alternative whose type is `T`, or an error
    /// describing what is live instead.
    ///
    /// The position of `T` is resolved at compile time; a `T` that is absent
    /// from the set, or occurs twice, does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(bool, String)> = Variant::new(true);
    /// assert_eq!(value.get_as::<bool, _>(), Ok(&true));
    /// assert!(value.get_as::<String, _>().is_err());
    /// ```
    pub fn get_as<T, P>(&self) -> Result<&T, BadVariantAccess>
    where
        L: Select<T, P>,
    {
        let index = <L as Select<T, P>>::INDEX;
        if self.raw().discriminant() == index {
            // SAFETY:
            // 1. The discriminant equals `INDEX`, and `Select` guarantees the
            //    alternative at `INDEX` has type `T`, so a live `T` occupies
            //    the slot.
            Ok(unsafe { self.raw().assume_ref() })
        } else {
            Err(self.mismatch(index, core::any::type_name::<T>()))
        }
    }

    /// Returns a mutable reference to the alternative whose type is `T`, or
    /// an error describing what is live instead.
    pub fn get_as_mut<T, P>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        L: Select<T, P>,
    {
        let index = <L as Select<T, P>>::INDEX;
        if self.raw().discriminant() == index {
            // SAFETY:
            // 1. The discriminant equals `INDEX`, and `Select` guarantees the
            //    alternative at `INDEX` has type `T`, so a live `T` occupies
            //    the slot.
            Ok(unsafe { self.raw_mut().assume_mut() })
        } else {
            Err(self.mismatch(index, core::any::type_name::<T>()))
        }
    }

    /// Returns a reference to the alternative whose type is `T`, or `None`
    /// when it is not the live one.
    #[inline]
    pub fn get_if_as<T, P>(&self) -> Option<&T>
    where
        L: Select<T, P>,
    {
        self.get_as::<T, P>().ok()
    }

    /// Returns a mutable reference to the alternative whose type is `T`, or
    /// `None` when it is not the live one.
    #[inline]
    pub fn get_if_as_mut<T, P>(&mut self) -> Option<&mut T>
    where
        L: Select<T, P>,
    {
        self.get_as_mut::<T, P>().ok()
    }

    /// Returns `true` when the live alternative is the one whose type is `T`.
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let value: Variant<(bool, String)> = Variant::new(true);
    /// assert!(value.holds::<bool, _>());
    /// assert!(!value.holds::<String, _>());
    /// ```
    #[inline]
    pub fn holds<T, P>(&self) -> bool
    where
        L: Select<T, P>,
    {
        self.raw().discriminant() == <L as Select<T, P>>::INDEX
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;

    #[test]
    fn wrong_alternative_reports_both_sides() {
        let value: Variant<(bool, String)> = Variant::new(true);
        let error = value.get::<1>().unwrap_err();
        assert_eq!(
            error,
            BadVariantAccess::WrongAlternative {
                requested_index: 1,
                requested_type: core::any::type_name::<String>(),
                active_index: 0,
                active_type: "bool",
            }
        );
        let message = error.to_string();
        assert!(message.contains("requested alternative 1"));
        assert!(message.contains("alternative 0"));
    }

    #[test]
    fn valueless_access_reports_valueless() {
        let mut value: Variant<(u8, String)> = Variant::new(1u8);
        let _ = value.try_emplace_with::<1, _, _>(|| Err(()));
        assert_eq!(value.get::<0>(), Err(BadVariantAccess::Valueless));
        assert_eq!(value.get_if::<0>(), None);
        assert_eq!(value.get_as::<u8, _>(), Err(BadVariantAccess::Valueless));
        assert!(!value.holds::<u8, _>());
    }

    #[test]
    fn mutable_projection_writes_through() {
        let mut value: Variant<(u8, String)> = Variant::new(String::from("before"));
        value.get_mut::<1>().unwrap().push_str(" and after");
        assert_eq!(value.get::<1>().unwrap(), "before and after");

        *value.get_as_mut::<String, _>().unwrap() = String::from("replaced");
        assert_eq!(value.get_if_as::<String, _>().unwrap(), "replaced");
    }

    #[test]
    fn by_index_access_resolves_duplicates() {
        let value = Variant::<(u32, u32)>::with::<1>(9);
        assert_eq!(value.get::<1>(), Ok(&9));
        assert!(value.get::<0>().is_err());
    }
}
