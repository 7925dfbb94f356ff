use std::fmt;

use num_traits::{PrimInt, Unsigned, WrappingAdd, WrappingSub};

mod private {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// An unsigned integer that holds the raw bits of a floating-point number.
///
/// Implemented for `u32` and `u64`, the storage types of `f32` and `f64`.
pub trait UnsignedBits:
    PrimInt + Unsigned + WrappingAdd + WrappingSub + fmt::Debug + fmt::Binary + Send + Sync + private::Sealed + 'static
{
    /// The additive identity of the bits type.
    const ZERO: Self;

    /// The multiplicative identity of the bits type.
    const ONE: Self;

    /// Converts `Self` into `u64`, losslessly.
    fn into_u64(self) -> u64;
}

impl UnsignedBits for u32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn into_u64(self) -> u64 {
        u64::from(self)
    }
}

impl UnsignedBits for u64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn into_u64(self) -> u64 {
        self
    }
}

/// The IEEE-754 bit layout of a floating-point type.
///
/// An IEEE floating-point number is laid out, from the most significant bit to the least significant bit, as:
///
/// ```text
/// sign_bit exponent_bits fraction_bits
/// ```
///
/// `f32` has 8 exponent bits and 23 fraction bits, while `f64` has 11 exponent bits and 52 fraction bits. All of the
/// constants here are derived from the size of the type and the number of significant digits in its mantissa, as
/// reported by the standard library.
///
/// This trait is sealed, and only implemented for `f32` and `f64`. Any other type is rejected at compile time:
///
/// ```compile_fail
/// use float_ulps::BitLayout;
///
/// fn fraction_bits<F: BitLayout>() -> u32 {
///     F::FRACTION_BIT_COUNT
/// }
///
/// fraction_bits::<u16>();
/// ```
pub trait BitLayout: Copy + PartialEq + PartialOrd + fmt::Debug + Send + Sync + private::Sealed + 'static {
    /// The unsigned integer type with the same size as `Self`.
    type Bits: UnsignedBits;

    /// Number of bits in the number.
    const BIT_COUNT: u32;

    /// Number of fraction bits in the number.
    const FRACTION_BIT_COUNT: u32;

    /// Number of exponent bits in the number.
    const EXPONENT_BIT_COUNT: u32;

    /// Mask for the sign bit.
    const SIGN_MASK: Self::Bits;

    /// Mask for the fraction bits.
    const FRACTION_MASK: Self::Bits;

    /// Mask for the exponent bits.
    const EXPONENT_MASK: Self::Bits;

    /// Default number of ULPs tolerated when comparing two numbers of this type.
    const DEFAULT_MAX_ULPS: u64;

    /// Returns the raw bits of `self`, without any numeric conversion.
    fn to_bits(self) -> Self::Bits;

    /// Creates a number from its raw bits, without any numeric conversion.
    fn from_bits(bits: Self::Bits) -> Self;
}

macro_rules! impl_bit_layout {
    ($float:ty, $bits:ty) => {
        impl BitLayout for $float {
            type Bits = $bits;

            const BIT_COUNT: u32 = (8 * std::mem::size_of::<$float>()) as u32;
            const FRACTION_BIT_COUNT: u32 = <$float>::MANTISSA_DIGITS - 1;
            const EXPONENT_BIT_COUNT: u32 = Self::BIT_COUNT - 1 - Self::FRACTION_BIT_COUNT;
            const SIGN_MASK: $bits = 1 << (Self::BIT_COUNT - 1);
            const FRACTION_MASK: $bits = !0 >> (Self::EXPONENT_BIT_COUNT + 1);
            const EXPONENT_MASK: $bits = !(Self::SIGN_MASK | Self::FRACTION_MASK);
            const DEFAULT_MAX_ULPS: u64 = crate::DBL_DEFAULT_MAX_ULPS;

            #[inline]
            fn to_bits(self) -> $bits {
                <$float>::to_bits(self)
            }

            #[inline]
            fn from_bits(bits: $bits) -> Self {
                <$float>::from_bits(bits)
            }
        }
    };
}

impl_bit_layout!(f32, u32);
impl_bit_layout!(f64, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_precision_layout() {
        assert_eq!(f64::BIT_COUNT, 64);
        assert_eq!(f64::FRACTION_BIT_COUNT, 52);
        assert_eq!(f64::EXPONENT_BIT_COUNT, 11);
        assert_eq!(f64::SIGN_MASK, 0x8000_0000_0000_0000);
        assert_eq!(f64::FRACTION_MASK, 0x000F_FFFF_FFFF_FFFF);
        assert_eq!(f64::EXPONENT_MASK, 0x7FF0_0000_0000_0000);
    }

    #[test]
    fn single_precision_layout() {
        assert_eq!(f32::BIT_COUNT, 32);
        assert_eq!(f32::FRACTION_BIT_COUNT, 23);
        assert_eq!(f32::EXPONENT_BIT_COUNT, 8);
        assert_eq!(f32::SIGN_MASK, 0x8000_0000);
        assert_eq!(f32::FRACTION_MASK, 0x007F_FFFF);
        assert_eq!(f32::EXPONENT_MASK, 0x7F80_0000);
    }

    #[test]
    fn masks_partition_all_bits() {
        // Every bit belongs to exactly one of the three fields.
        assert_eq!(f64::SIGN_MASK & f64::FRACTION_MASK, 0);
        assert_eq!(f64::SIGN_MASK & f64::EXPONENT_MASK, 0);
        assert_eq!(f64::EXPONENT_MASK & f64::FRACTION_MASK, 0);
        assert_eq!(f64::SIGN_MASK | f64::EXPONENT_MASK | f64::FRACTION_MASK, u64::MAX);

        assert_eq!(f32::SIGN_MASK & f32::FRACTION_MASK, 0);
        assert_eq!(f32::SIGN_MASK & f32::EXPONENT_MASK, 0);
        assert_eq!(f32::EXPONENT_MASK & f32::FRACTION_MASK, 0);
        assert_eq!(f32::SIGN_MASK | f32::EXPONENT_MASK | f32::FRACTION_MASK, u32::MAX);
    }

    #[test]
    fn exponent_mask_matches_infinity() {
        assert_eq!(f64::INFINITY.to_bits(), f64::EXPONENT_MASK);
        assert_eq!(f32::INFINITY.to_bits(), f32::EXPONENT_MASK);
    }

    fn negate<B: UnsignedBits>(bits: B) -> B {
        WrappingAdd::wrapping_add(&!bits, &B::ONE)
    }

    #[test]
    fn unsigned_bits_wrap_at_native_width() {
        assert_eq!(negate(0u32), 0);
        assert_eq!(negate(1u32), u32::MAX);
        assert_eq!(negate(f32::SIGN_MASK), f32::SIGN_MASK);
        assert_eq!(negate(1u64), u64::MAX);
        assert_eq!(WrappingSub::wrapping_sub(&0u64, &1), u64::MAX);
        assert_eq!(u32::MAX.into_u64(), 0xFFFF_FFFF);
    }

    #[test]
    fn bits_round_trip_special_values() {
        let values = [0.0, -0.0, f64::INFINITY, f64::NEG_INFINITY, f64::MIN_POSITIVE, f64::MAX];
        for value in values {
            let bits = BitLayout::to_bits(value);
            assert_eq!(bits, value.to_bits());
            assert_eq!(<f64 as BitLayout>::from_bits(bits).to_bits(), bits);
        }

        // NaN payloads must survive the reinterpretation untouched.
        let nan_bits = f64::NAN.to_bits() | 0x1234;
        assert_eq!(BitLayout::to_bits(<f64 as BitLayout>::from_bits(nan_bits)), nan_bits);
    }
}
