//! Representation-aware equality tests for floating-point numbers.
//!
//! Comparing floating-point numbers with `==` is usually too strict: two computations of the same quantity rarely
//! round in exactly the same way. This crate compares numbers by their distance in ULPs (units in the last place),
//! which is the number of representable values lying between them. Unlike a fixed epsilon, a tolerance expressed in
//! ULPs scales with the magnitude of the numbers being compared.
//!
//! ```
//! use float_ulps::{is_equal, is_equal_within};
//!
//! let mut sum = 0.0f64;
//! for _ in 0..10 {
//!     sum += 0.1;
//! }
//!
//! assert_ne!(sum, 1.0);
//! assert!(is_equal(sum, 1.0));
//! assert!(is_equal_within(1.0e10, 1.0e10 + 1.0e-6, 1));
//! ```
//!
//! Only `f32` and `f64` are supported. Comparing values of different widths, or of any other type, does not compile.
#![deny(warnings)]
#![deny(missing_docs)]

mod comparator;
pub use self::comparator::{
    default_max_ulps, is_equal, is_equal_const, is_equal_within, ulp_distance, UlpComparator, DBL_DEFAULT_MAX_ULPS,
    DBL_DEFAULT_TEST_TOLERANCE,
};

mod config;
pub use self::config::{ComparisonConfiguration, ConfigurationError};

mod floating_point;
pub use self::floating_point::FloatingPoint;

mod layout;
pub use self::layout::{BitLayout, UnsignedBits};

mod relative;
pub use self::relative::{is_close, is_close_relative, RelativeEq};
