use std::{fmt, marker::PhantomData};

use crate::{BitLayout, FloatingPoint, UnsignedBits};

/// Default number of ULPs tolerated when comparing double-precision numbers.
///
/// This is also used as the default for any other supported width.
pub const DBL_DEFAULT_MAX_ULPS: u64 = 10;

/// Default relative tolerance for double-precision comparisons in tests.
///
/// This is not used by the ULP-based comparisons. It is provided for callers that would rather compare two numbers `x`
/// and `y` with a relative tolerance `ε`, such that `|x - y| <= ε * |x + y|`. See
/// [`is_close_relative`][crate::is_close_relative].
pub const DBL_DEFAULT_TEST_TOLERANCE: f64 = 1.0e-10;

/// Returns the default number of ULPs tolerated when comparing numbers of type `F`.
pub const fn default_max_ulps<F: BitLayout>() -> u64 {
    F::DEFAULT_MAX_ULPS
}

/// Returns the distance between `left` and `right`, in ULPs (units in the last place).
///
/// The distance is the number of representable values of type `F` that must be stepped over to get from one value to
/// the other. Positive and negative zero are zero ULPs apart.
pub fn ulp_distance<F: BitLayout>(left: F, right: F) -> u64 {
    let distance = FloatingPoint::new(left).distance_to(&FloatingPoint::new(right));
    UnsignedBits::into_u64(distance)
}

/// Returns `true` if `left` and `right` are within the default number of ULPs of each other.
///
/// See [`is_equal_within`] for details.
///
/// Both values must be of the same type:
///
/// ```compile_fail
/// float_ulps::is_equal(1.0f32, 1.0f64);
/// ```
pub fn is_equal<F: BitLayout>(left: F, right: F) -> bool {
    is_equal_within(left, right, default_max_ulps::<F>())
}

/// Returns `true` if `left` and `right` are no more than `max_ulps` ULPs apart.
///
/// Due to round-off error, it is unlikely that two floating-point numbers computed in different ways will be exactly
/// equal, so comparing them with `==` is often too strict. Comparing by the number of representable values between
/// them tolerates that error while scaling with the magnitude of the numbers, unlike a fixed epsilon.
///
/// The maximum error of a single floating-point operation is 0.5 ULPs, so small tolerances are usually enough.
///
/// # Special values
///
/// - identical bit patterns are always equal, whatever the tolerance
/// - positive and negative zero are always equal
/// - NaNs are not special-cased: they are compared by the distance between their bit patterns, like any other number,
///   so a NaN is equal to itself and may be equal to a NaN with a nearby payload
/// - infinities are compared in the same way, and are equal only to infinities of the same sign (or to values within
///   `max_ulps` of them)
///
/// # Examples
///
/// ```
/// use float_ulps::is_equal_within;
///
/// let next = f64::from_bits(1.0f64.to_bits() + 1);
/// assert!(!is_equal_within(1.0, next, 0));
/// assert!(is_equal_within(1.0, next, 1));
/// assert!(is_equal_within(0.0, -0.0, 0));
/// ```
pub fn is_equal_within<F: BitLayout>(left: F, right: F, max_ulps: u64) -> bool {
    ulp_distance(left, right) <= max_ulps
}

/// Returns `true` if `left` and `right` are no more than `MAX_ULPS` ULPs apart.
///
/// This is [`is_equal_within`] with the tolerance fixed at compile time.
///
/// ```
/// assert!(float_ulps::is_equal_const::<4, _>(0.1 + 0.2, 0.3));
/// ```
pub fn is_equal_const<const MAX_ULPS: u64, F: BitLayout>(left: F, right: F) -> bool {
    is_equal_within(left, right, MAX_ULPS)
}

/// A ULP-based comparator for floating-point numbers of type `F`.
///
/// The comparator carries nothing but its tolerance, and can be freely copied and shared between threads.
pub struct UlpComparator<F> {
    max_ulps: u64,
    _float: PhantomData<fn() -> F>,
}

impl<F: BitLayout> UlpComparator<F> {
    /// Creates a new `UlpComparator` that tolerates up to `max_ulps` ULPs.
    pub const fn new(max_ulps: u64) -> Self {
        Self {
            max_ulps,
            _float: PhantomData,
        }
    }

    /// Returns the number of ULPs tolerated by this comparator.
    pub const fn max_ulps(&self) -> u64 {
        self.max_ulps
    }

    /// Returns the distance between `left` and `right`, in ULPs.
    pub fn distance(&self, left: F, right: F) -> u64 {
        ulp_distance(left, right)
    }

    /// Returns `true` if `left` and `right` are within the tolerance of this comparator.
    pub fn is_equal(&self, left: F, right: F) -> bool {
        is_equal_within(left, right, self.max_ulps)
    }
}

impl<F: BitLayout> Default for UlpComparator<F> {
    fn default() -> Self {
        Self::new(default_max_ulps::<F>())
    }
}

impl<F> Clone for UlpComparator<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for UlpComparator<F> {}

impl<F> PartialEq for UlpComparator<F> {
    fn eq(&self, other: &Self) -> bool {
        self.max_ulps == other.max_ulps
    }
}

impl<F> Eq for UlpComparator<F> {}

impl<F> fmt::Debug for UlpComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UlpComparator")
            .field("float", &std::any::type_name::<F>())
            .field("max_ulps", &self.max_ulps)
            .finish()
    }
}
