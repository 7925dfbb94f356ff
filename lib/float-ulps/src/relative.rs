use crate::{BitLayout, DBL_DEFAULT_TEST_TOLERANCE};

/// A floating-point number that can be compared with a relative tolerance.
pub trait RelativeEq: BitLayout {
    /// Returns `true` if `|self - other| <= epsilon * |self + other|`.
    fn relative_eq(self, other: Self, epsilon: Self) -> bool;
}

macro_rules! impl_relative_eq {
    ($float:ty) => {
        impl RelativeEq for $float {
            #[inline]
            fn relative_eq(self, other: Self, epsilon: Self) -> bool {
                (self - other).abs() <= epsilon * (self + other).abs()
            }
        }
    };
}

impl_relative_eq!(f32);
impl_relative_eq!(f64);

/// Returns `true` if `x` and `y` are equal within the relative tolerance `epsilon`.
///
/// The comparison is `|x - y| <= epsilon * |x + y|`. Two zeros are always equal, while a zero is never equal to a
/// non-zero number. Any NaN operand makes the comparison false.
///
/// Prefer [`is_equal`][crate::is_equal] for general use: the relative comparison breaks down for numbers of opposite
/// signs and around zero, where `|x + y|` vanishes.
pub fn is_close_relative<F: RelativeEq>(x: F, y: F, epsilon: F) -> bool {
    x.relative_eq(y, epsilon)
}

/// Returns `true` if `x` and `y` are equal within [`DBL_DEFAULT_TEST_TOLERANCE`].
pub fn is_close(x: f64, y: f64) -> bool {
    is_close_relative(x, y, DBL_DEFAULT_TEST_TOLERANCE)
}
