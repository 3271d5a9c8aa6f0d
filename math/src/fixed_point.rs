use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub const FRACBITS: i32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// `FixedMul`, the product is truncated back to 32 bits the same way the
/// original 32bit code does it.
#[inline(always)]
pub const fn fixed_mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> FRACBITS) as i32
}

/// `FixedDiv`, saturates to `i32::MIN`/`i32::MAX` when the result can't fit.
#[inline(always)]
pub const fn fixed_div(a: i32, b: i32) -> i32 {
    if (a.unsigned_abs() >> 14) >= b.unsigned_abs() {
        if (a ^ b) < 0 { i32::MIN } else { i32::MAX }
    } else {
        (((a as i64) << FRACBITS) / b as i64) as i32
    }
}

/// A 16.16 fixed point number. Geometry, heights, scales and texture
/// coordinates all use this format.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const UNIT: Fixed = Fixed(FRACUNIT);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    /// Wrap a raw 16.16 value
    #[inline(always)]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Whole map units to fixed
    #[inline(always)]
    pub const fn from_int(value: i32) -> Self {
        Self(value << FRACBITS)
    }

    #[inline(always)]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounding towards negative infinity
    #[inline(always)]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub const fn shr(self, bits: i32) -> Self {
        Self(self.0 >> bits)
    }

    #[inline]
    pub const fn shl(self, bits: i32) -> Self {
        Self(self.0 << bits)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({}:{:04x})", self.0 >> FRACBITS, self.0 & (FRACUNIT - 1))
    }
}

impl From<i32> for Fixed {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<i16> for Fixed {
    fn from(value: i16) -> Self {
        Self::from_int(value as i32)
    }
}

impl From<Fixed> for i32 {
    fn from(value: Fixed) -> Self {
        value.to_int()
    }
}

impl Add for Fixed {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Fixed {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Mul for Fixed {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(fixed_mul(self.0, rhs.0))
    }
}

/// Scale by a whole number, e.g `dx * ds_xstep`
impl Mul<i32> for Fixed {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl Div for Fixed {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(fixed_div(self.0, rhs.0))
    }
}

/// Divide by a whole number
impl Div<i32> for Fixed {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl Neg for Fixed {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}
