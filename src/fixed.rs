//! 16.16 signed fixed-point scalar
//!
//! The raw value is an `i32` and the represented number is `raw / 65536`.
//! Addition, subtraction and negation wrap exactly like the 32-bit container.
//! Multiplication and division widen to `i64` for the scaling step so the
//! intermediate never overflows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of fractional bits
pub const FRAC_BITS: u32 = 16;
/// Raw value of 1.0
pub const SCALE: i32 = 1 << FRAC_BITS;
const SCALE_F32: f32 = 65536.0;

/// 16.16 fixed-point number
///
/// Ordering is total and follows the raw integer. Serializes as its float
/// value, so JSON files stay readable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "f32", into = "f32")]
pub struct Fixed32(i32);

impl Fixed32 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(SCALE);
    pub const HALF: Self = Self(SCALE / 2);
    /// Smallest positive step (1/65536)
    pub const EPSILON: Self = Self(1);
    pub const MIN: Self = Self(i32::MIN);
    pub const MAX: Self = Self(i32::MAX);
    /// 3.14159265, truncated to 16.16
    pub const PI: Self = Self(205_887);

    /// Construct directly from raw 16.16 bits.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw 16.16 representation.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whole-number constructor (`raw = n << 16`), exact for every `i16`.
    #[inline]
    pub const fn from_int(n: i16) -> Self {
        Self((n as i32) << FRAC_BITS)
    }

    /// Float constructor. Truncates toward zero; out-of-range values
    /// saturate and NaN becomes zero.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self((value * SCALE_F32) as i32)
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub const fn to_i32(self) -> i32 {
        self.0 / SCALE
    }

    /// Integer part, truncated toward zero. Always fits: the integer range
    /// of a 16.16 value is exactly that of `i16`.
    #[inline]
    pub const fn to_i16(self) -> i16 {
        (self.0 / SCALE) as i16
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / SCALE_F32
    }

    /// Division that reports a zero divisor instead of panicking.
    #[inline]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let wide = i64::from(self.0) * i64::from(SCALE);
        Some(Self((wide / i64::from(rhs.0)) as i32))
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Square root through `f32`.
    ///
    /// Loses precision for large values (f32 carries 24 mantissa bits) and
    /// returns zero for negative input.
    #[inline]
    pub fn sqrt(self) -> Self {
        Self::from_f32(self.to_f32().sqrt())
    }

    /// Sine of an angle in radians, through `f32`.
    #[inline]
    pub fn sin(self) -> Self {
        Self::from_f32(self.to_f32().sin())
    }

    /// Cosine of an angle in radians, through `f32`.
    #[inline]
    pub fn cos(self) -> Self {
        Self::from_f32(self.to_f32().cos())
    }
}

impl Add for Fixed32 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed32 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fixed32 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((i64::from(self.0) * i64::from(rhs.0)) >> FRAC_BITS) as i32)
    }
}

impl Div for Fixed32 {
    type Output = Self;

    /// # Panics
    /// Panics if `rhs` is zero. Use [`Fixed32::checked_div`] to handle it.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        match self.checked_div(rhs) {
            Some(q) => q,
            None => panic!("attempt to divide Fixed32 by zero"),
        }
    }
}

impl Neg for Fixed32 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl AddAssign for Fixed32 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed32 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed32 {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed32 {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl From<i16> for Fixed32 {
    #[inline]
    fn from(n: i16) -> Self {
        Self::from_int(n)
    }
}

impl From<f32> for Fixed32 {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<Fixed32> for f32 {
    #[inline]
    fn from(value: Fixed32) -> Self {
        value.to_f32()
    }
}

impl From<Fixed32> for i32 {
    #[inline]
    fn from(value: Fixed32) -> Self {
        value.to_i32()
    }
}

impl From<Fixed32> for i16 {
    #[inline]
    fn from(value: Fixed32) -> Self {
        value.to_i16()
    }
}

impl fmt::Display for Fixed32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}
