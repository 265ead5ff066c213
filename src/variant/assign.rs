//! Assignment, emplacement and swap.
//!
//! Every mutation below picks one of three strategies, chosen so that each
//! failure mode leaves the variant in a state its destructor can handle:
//!
//! - **Mutate in place**: when the new value has the same alternative as the
//!   old one. Nothing is destroyed; a panic leaves whatever state the
//!   alternative's own operation guarantees, and the variant never becomes
//!   valueless on this path.
//! - **Stage, destroy, commit**: when the alternative changes and the new
//!   value must be produced by fallible user code ([`Clone`]). The new value
//!   is built in detached storage first; only once nothing can fail anymore
//!   is the old value destroyed and the staged bytes adopted. A panic while
//!   staging leaves the variant untouched (strong guarantee).
//! - **Destroy, then build**: when the caller explicitly asks for in-place
//!   reconstruction (`emplace_with`/`try_emplace_with`). The old value is
//!   gone before the constructor runs, so there is nothing to restore: a
//!   failure leaves the variant valueless, and that is the documented
//!   contract.
//!
//! Plain moves (`emplace`, `set` with a changed alternative, `swap`, and
//! Rust's own move assignment) are bitwise and infallible, so they never
//! produce a valueless variant.

use core::mem::MaybeUninit;

use oneof_internals::{NPOS, storage_ptr};

use crate::{
    set::{AlternativeSet, CloneSet, Nth, Select},
    variant::Variant,
};

impl<L: AlternativeSet> Variant<L> {
    /// Replaces the value with `value` as the alternative at position `I`,
    /// destroying the old value first.
    ///
    /// Moving `value` in cannot fail, so the variant is never left valueless
    /// by this method. Returns a reference to the new value.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut value: Variant<(bool, String)> = Variant::new(true);
    /// value.emplace::<1>(String::from("rebuilt"));
    /// assert_eq!(value.index(), 1);
    /// assert_eq!(value.get::<1>().unwrap(), "rebuilt");
    /// ```
    pub fn emplace<const I: usize>(
        &mut self,
        value: <L as Nth<I>>::Alternative,
    ) -> &mut <L as Nth<I>>::Alternative
    where
        L: Nth<I>,
    {
        self.unset();
        // SAFETY:
        // 1. `unset` left the slot vacant.
        // 2. `Nth` guarantees its `Alternative` is the type at position `I`,
        //    so the storage union fits it.
        // 3. `I` pairs with that type in `L`'s dispatch tables.
        unsafe {
            self.raw_mut().write(I, value);
        }
        // SAFETY:
        // 1. Alternative `I` was just written and is live.
        unsafe { self.raw_mut().assume_mut() }
    }

    /// Replaces the value with one built in place by `build`, as the
    /// alternative at position `I`.
    ///
    /// The old value is destroyed *before* `build` runs; that is the point
    /// of in-place reconstruction. If `build` panics there is no prior
    /// value to fall back to: the variant stays valueless and the panic
    /// propagates. Callers that need the old value preserved on failure
    /// should build the new value first and use [`emplace`](Variant::emplace).
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut value: Variant<(bool, String)> = Variant::new(true);
    /// value.emplace_with::<1, _>(|| String::from("built in place"));
    /// assert_eq!(value.index(), 1);
    /// ```
    pub fn emplace_with<const I: usize, F>(&mut self, build: F) -> &mut <L as Nth<I>>::Alternative
    where
        L: Nth<I>,
        F: FnOnce() -> <L as Nth<I>>::Alternative,
    {
        self.unset();
        let value = build();
        // SAFETY:
        // 1. `unset` left the slot vacant, and `build` cannot have touched
        //    it.
        // 2. `Nth` guarantees its `Alternative` is the type at position `I`,
        //    so the storage union fits it.
        // 3. `I` pairs with that type in `L`'s dispatch tables.
        unsafe {
            self.raw_mut().write(I, value);
        }
        // SAFETY:
        // 1. Alternative `I` was just written and is live.
        unsafe { self.raw_mut().assume_mut() }
    }

    /// Replaces the value with one built in place by `build`, as the
    /// alternative at position `I`, where construction may fail.
    ///
    /// As with [`emplace_with`](Variant::emplace_with), the old value is
    /// destroyed before `build` runs; on `Err` the variant stays valueless
    /// and the error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::{NPOS, Variant};
    ///
    /// let mut value: Variant<(u8, String)> = Variant::new(5u8);
    /// let err = value
    ///     .try_emplace_with::<1, _, _>(|| Err("construction failed"))
    ///     .unwrap_err();
    /// assert_eq!(err, "construction failed");
    /// assert!(value.is_valueless());
    /// assert_eq!(value.index(), NPOS);
    ///
    /// // Recovery is a new assignment or emplacement.
    /// value.set(7u8);
    /// assert_eq!(value.index(), 0);
    /// ```
    pub fn try_emplace_with<const I: usize, F, E>(
        &mut self,
        build: F,
    ) -> Result<&mut <L as Nth<I>>::Alternative, E>
    where
        L: Nth<I>,
        F: FnOnce() -> Result<<L as Nth<I>>::Alternative, E>,
    {
        self.unset();
        let value = build()?;
        // SAFETY:
        // 1. `unset` left the slot vacant, and `build` cannot have touched
        //    it.
        // 2. `Nth` guarantees its `Alternative` is the type at position `I`,
        //    so the storage union fits it.
        // 3. `I` pairs with that type in `L`'s dispatch tables.
        unsafe {
            self.raw_mut().write(I, value);
        }
        // SAFETY:
        // 1. Alternative `I` was just written and is live.
        Ok(unsafe { self.raw_mut().assume_mut() })
    }

    /// Replaces the value with `value` as the alternative whose type is `T`,
    /// destroying the old value first.
    ///
    /// The by-type counterpart of [`emplace`](Variant::emplace): the old
    /// value is always destroyed, even when it already holds the `T`
    /// alternative. Use [`set`](Variant::set) to assign onto a live `T` in
    /// place instead. Moving `value` in cannot fail, so the variant is never
    /// left valueless by this method.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut value: Variant<(bool, String)> = Variant::new(true);
    /// value.emplace_as(String::from("rebuilt by type"));
    /// assert_eq!(value.index(), 1);
    /// ```
    pub fn emplace_as<T, P>(&mut self, value: T) -> &mut T
    where
        L: Select<T, P>,
    {
        self.unset();
        // SAFETY:
        // 1. `unset` left the slot vacant.
        // 2. `Select` guarantees `T` is the alternative at `INDEX`, so the
        //    storage union fits it.
        // 3. `INDEX` pairs with `T` in `L`'s dispatch tables.
        unsafe {
            self.raw_mut().write(<L as Select<T, P>>::INDEX, value);
        }
        // SAFETY:
        // 1. Alternative `INDEX` was just written and is live.
        unsafe { self.raw_mut().assume_mut() }
    }

    /// Assigns `value` to the alternative whose type is `T`.
    ///
    /// If `T` is already the live alternative, the value is assigned onto the
    /// existing one in place (the alternative keeps its allocation reuse
    /// semantics). Otherwise the old alternative is destroyed and `value` is
    /// moved in; the move cannot fail, so the variant is never left valueless
    /// by this method. Returns a reference to the new value.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut value: Variant<(bool, String)> = Variant::new(true);
    /// value.set(String::from("now a string"));
    /// assert_eq!(value.index(), 1);
    /// value.set(false);
    /// assert_eq!(value.index(), 0);
    /// ```
    pub fn set<T, P>(&mut self, value: T) -> &mut T
    where
        L: Select<T, P>,
    {
        let index = <L as Select<T, P>>::INDEX;
        if self.raw().discriminant() == index {
            // SAFETY:
            // 1. The discriminant equals `INDEX`, and `Select` guarantees the
            //    alternative at `INDEX` has type `T`, so a live `T` occupies
            //    the slot.
            let target = unsafe { self.raw_mut().assume_mut::<T>() };
            *target = value;
            target
        } else {
            self.unset();
            // SAFETY:
            // 1. `unset` left the slot vacant.
            // 2. `Select` guarantees `T` is the alternative at `INDEX`, so
            //    the storage union fits it.
            // 3. `INDEX` pairs with `T` in `L`'s dispatch tables.
            unsafe {
                self.raw_mut().write(index, value);
            }
            // SAFETY:
            // 1. Alternative `INDEX` was just written and is live.
            unsafe { self.raw_mut().assume_mut() }
        }
    }

    /// Exchanges the contents of two variants.
    ///
    /// Both the values and the discriminants are exchanged as bitwise moves,
    /// so the swap is infallible and atomic across both operands even when
    /// the two sides hold different alternatives.
    ///
    /// # Examples
    ///
    /// ```
    /// use oneof::Variant;
    ///
    /// let mut a: Variant<(bool, String)> = Variant::new(true);
    /// let mut b: Variant<(bool, String)> = Variant::new(String::from("other"));
    /// a.swap(&mut b);
    /// assert_eq!(a.index(), 1);
    /// assert_eq!(b.index(), 0);
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl<L: CloneSet> Clone for Variant<L> {
    /// Clones the live alternative into a fresh variant.
    ///
    /// Cloning a valueless variant yields a valueless variant.
    fn clone(&self) -> Self {
        let discriminant = self.raw().discriminant();
        let mut slot = oneof_internals::RawSlot::vacant();
        if discriminant != NPOS {
            // SAFETY:
            // 1. The source slot holds a live value of the type that
            //    `CLONE_VTABLES[discriminant]` was created for (type
            //    invariant).
            // 2. `slot` is detached vacant storage of the same union type,
            //    so it fits the clone and cannot overlap the source.
            unsafe {
                L::CLONE_VTABLES[discriminant].clone_into(self.raw().value_ptr(), slot.value_ptr_mut());
            }
            // SAFETY:
            // 1. The clone of alternative `discriminant` was just written and
            //    is live.
            unsafe {
                slot.set_discriminant(discriminant);
            }
        }
        // SAFETY:
        // 1. `slot` is either vacant or holds alternative `discriminant`,
        //    matching `L`'s dispatch tables.
        unsafe { Self::from_raw(slot) }
    }

    /// Copy-assigns `source` onto `self`.
    ///
    /// Three cases, chosen by the discriminants:
    ///
    /// - Same alternative on both sides: the alternative's own `clone_from`
    ///   runs on the live values. The discriminant never changes, so even a
    ///   panicking `clone_from` cannot leave `self` valueless.
    /// - Different alternatives: the source's value is cloned into detached
    ///   storage first; only after that succeeds is the old value destroyed
    ///   and the staged clone committed. A panicking clone leaves `self`
    ///   completely unchanged.
    /// - Valueless source: `self`'s value is destroyed and `self` becomes
    ///   valueless too.
    fn clone_from(&mut self, source: &Self) {
        let source_discriminant = source.raw().discriminant();
        if source_discriminant == NPOS {
            self.unset();
            return;
        }
        if self.raw().discriminant() == source_discriminant {
            let from = source.raw().value_ptr();
            let to = self.raw_mut().value_ptr_mut();
            // SAFETY:
            // 1. Both slots hold live values of the type that
            //    `CLONE_VTABLES[source_discriminant]` was created for (type
            //    invariant), and `self` and `source` are distinct objects.
            // 2. `to` comes from an exclusive borrow of `self`.
            unsafe {
                L::CLONE_VTABLES[source_discriminant].clone_assign(from, to);
            }
        } else {
            let mut staged: MaybeUninit<L::Storage> = MaybeUninit::uninit();
            // SAFETY:
            // 1. The source slot holds a live value of the type that
            //    `CLONE_VTABLES[source_discriminant]` was created for (type
            //    invariant).
            // 2. `staged` is detached storage of the union type, fitting the
            //    clone, holding no live value, not overlapping the source.
            unsafe {
                L::CLONE_VTABLES[source_discriminant]
                    .clone_into(source.raw().value_ptr(), storage_ptr(&mut staged));
            }
            // Nothing can fail from here on: destroy the old value and
            // commit the staged bytes.
            self.unset();
            // SAFETY:
            // 1. `unset` left the slot vacant.
            // 2. `staged` holds a live value of alternative
            //    `source_discriminant`, which is not `NPOS`.
            unsafe {
                self.raw_mut().adopt(source_discriminant, staged);
            }
        }
    }
}
