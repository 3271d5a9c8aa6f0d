use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::fixed_point::{FRACBITS, Fixed};
use crate::trig::{ANGLETOFINESHIFT, finecosine, finesine, finetangent};

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

/// Binary Angle Measure. The full circle is the full `u32` range so all
/// arithmetic wraps for free.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(u32);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const A45: Angle = Angle(ANG45);
    pub const A90: Angle = Angle(ANG90);
    pub const A180: Angle = Angle(ANG180);
    pub const A270: Angle = Angle(ANG270);

    #[inline(always)]
    pub const fn new(bam: u32) -> Self {
        Angle(bam)
    }

    /// Whole degrees, exact for multiples of 45
    pub const fn from_degrees(degrees: i32) -> Self {
        let d = degrees.rem_euclid(360) as u64;
        Angle(((d << 32) / 360) as u32)
    }

    #[inline(always)]
    pub const fn bam(self) -> u32 {
        self.0
    }

    /// Index in to the fine tables
    #[inline(always)]
    pub const fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    #[inline]
    pub fn sin(self) -> Fixed {
        Fixed::new(finesine(self.fine()))
    }

    #[inline]
    pub fn cos(self) -> Fixed {
        Fixed::new(finecosine(self.fine()))
    }

    /// Tangent of an angle in the range `-ANG90..ANG90`. The angle is
    /// offset by `ANG90` for the `finetangent` lookup the way the wall
    /// texture mapping expects.
    #[inline]
    pub fn tan(self) -> Fixed {
        Fixed::new(finetangent(self.wrapping_add(Angle::A90).fine()))
    }

    #[inline(always)]
    pub const fn wrapping_add(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_add(other.0))
    }

    #[inline(always)]
    pub const fn wrapping_sub(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl Add for Angle {
    type Output = Angle;

    #[inline(always)]
    fn add(self, other: Angle) -> Angle {
        self.wrapping_add(other)
    }
}

impl AddAssign for Angle {
    #[inline(always)]
    fn add_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Sub for Angle {
    type Output = Angle;

    #[inline(always)]
    fn sub(self, other: Angle) -> Angle {
        self.wrapping_sub(other)
    }
}

impl SubAssign for Angle {
    #[inline(always)]
    fn sub_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_sub(other.0);
    }
}

impl Neg for Angle {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Angle(self.0.wrapping_neg())
    }
}

/// Interpolate between two angles, taking the short way round.
/// `scale` is a 16.16 fraction in `0..=FRACUNIT`.
pub fn interpolate_angle(old: Angle, new: Angle, scale: Fixed) -> Angle {
    let frac = scale.raw().clamp(0, 1 << FRACBITS) as u64;
    let part = |delta: u32| ((delta as u64 * frac) >> FRACBITS) as u32;

    if new == old {
        new
    } else if new.0 > old.0 {
        if new.0 - old.0 < ANG270 {
            Angle(old.0.wrapping_add(part(new.0 - old.0)))
        } else {
            Angle(old.0.wrapping_sub(part(old.0.wrapping_sub(new.0))))
        }
    } else if old.0 - new.0 < ANG270 {
        Angle(old.0.wrapping_sub(part(old.0 - new.0)))
    } else {
        Angle(old.0.wrapping_add(part(new.0.wrapping_sub(old.0))))
    }
}
