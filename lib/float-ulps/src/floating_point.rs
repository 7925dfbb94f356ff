use std::fmt;

use num_traits::{WrappingAdd, WrappingSub};

use crate::{BitLayout, UnsignedBits};

/// A floating-point number viewed through its IEEE-754 representation.
///
/// `FloatingPoint` holds the raw bits of a value, obtained without any numeric conversion, and provides access to the
/// individual fields of the representation as well as to the biased form used to measure the distance between two
/// numbers in ULPs (units in the last place).
pub struct FloatingPoint<F: BitLayout> {
    bits: F::Bits,
}

impl<F: BitLayout> Clone for FloatingPoint<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: BitLayout> Copy for FloatingPoint<F> {}

// Equality is bitwise: two NaNs with identical bits are equal, and the two zeros are not.
impl<F: BitLayout> PartialEq for FloatingPoint<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: BitLayout> Eq for FloatingPoint<F> {}

impl<F: BitLayout> FloatingPoint<F> {
    /// Creates a new `FloatingPoint` from the given value.
    pub fn new(value: F) -> Self {
        Self { bits: value.to_bits() }
    }

    /// Creates a new `FloatingPoint` from the given raw bits.
    pub fn from_bits(bits: F::Bits) -> Self {
        Self { bits }
    }

    /// Returns the value as a number.
    pub fn value(&self) -> F {
        F::from_bits(self.bits)
    }

    /// Returns the raw bits of the number.
    pub fn bits(&self) -> F::Bits {
        self.bits
    }

    /// Returns the sign bit of the number, in place.
    pub fn sign_bit(&self) -> F::Bits {
        F::SIGN_MASK & self.bits
    }

    /// Returns the exponent bits of the number, in place.
    pub fn exponent_bits(&self) -> F::Bits {
        F::EXPONENT_MASK & self.bits
    }

    /// Returns the fraction bits of the number.
    pub fn fraction_bits(&self) -> F::Bits {
        F::FRACTION_MASK & self.bits
    }

    /// Returns `true` if the sign bit is set.
    ///
    /// This is also true for negative zero and for NaNs with the sign bit set.
    pub fn is_sign_negative(&self) -> bool {
        self.sign_bit() != <F::Bits as UnsignedBits>::ZERO
    }

    /// Returns `true` if the number is a NaN: all exponent bits set, and a non-zero fraction.
    pub fn is_nan(&self) -> bool {
        self.exponent_bits() == F::EXPONENT_MASK && self.fraction_bits() != <F::Bits as UnsignedBits>::ZERO
    }

    /// Returns the biased representation of the number.
    ///
    /// See [`sign_and_magnitude_to_biased`][Self::sign_and_magnitude_to_biased] for details.
    pub fn biased(&self) -> F::Bits {
        Self::sign_and_magnitude_to_biased(self.bits)
    }

    /// Returns the distance between this number and `other`, in ULPs.
    pub fn distance_to(&self, other: &Self) -> F::Bits {
        Self::distance_between_sign_and_magnitude(self.bits, other.bits)
    }

    /// Converts an integer from the sign-and-magnitude representation to the biased representation.
    ///
    /// Let `N` be 2 to the power of `BIT_COUNT - 1`. An integer `x` is then represented by the unsigned number `x + N`:
    ///
    /// - `-N + 1`, the most negative number representable in sign-and-magnitude, is represented by 1
    /// - 0 is represented by `N`
    /// - `N - 1`, the largest number representable in sign-and-magnitude, is represented by `2N - 1`
    ///
    /// Both positive and negative zero map to `N`, and the ordering of biased values matches the numeric ordering of
    /// the numbers they came from.
    pub fn sign_and_magnitude_to_biased(sam: F::Bits) -> F::Bits {
        if F::SIGN_MASK & sam != <F::Bits as UnsignedBits>::ZERO {
            // Negative: two's complement negation, in the native width.
            WrappingAdd::wrapping_add(&!sam, &<F::Bits as UnsignedBits>::ONE)
        } else {
            F::SIGN_MASK | sam
        }
    }

    /// Returns the distance between two numbers in the sign-and-magnitude representation, as an unsigned number.
    pub fn distance_between_sign_and_magnitude(sam1: F::Bits, sam2: F::Bits) -> F::Bits {
        let biased1 = Self::sign_and_magnitude_to_biased(sam1);
        let biased2 = Self::sign_and_magnitude_to_biased(sam2);
        if biased1 >= biased2 {
            WrappingSub::wrapping_sub(&biased1, &biased2)
        } else {
            WrappingSub::wrapping_sub(&biased2, &biased1)
        }
    }
}

impl<F: BitLayout> From<F> for FloatingPoint<F> {
    fn from(value: F) -> Self {
        Self::new(value)
    }
}

impl<F: BitLayout> fmt::Debug for FloatingPoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingPoint")
            .field("value", &self.value())
            .field("bits", &format_args!("{:#b}", self.bits))
            .finish()
    }
}
