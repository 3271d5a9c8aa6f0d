//! Fine angle lookup tables. These are built once on first use and are the
//! only place floating point is touched, everything at render time reads the
//! integer results.

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::fixed_point::FRACUNIT;

/// Size of the fine angle tables
pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
/// `0x100000000` to `0x2000`
pub const ANGLETOFINESHIFT: u32 = 19;

pub const SLOPERANGE: u32 = 2048;
pub const SLOPEBITS: u32 = 11;
pub const DBITS: i32 = 16 - SLOPEBITS as i32;

/// Sine table covers an extra quarter so cosine can be read at `+FINEANGLES/4`
static FINESINE: OnceLock<Vec<i32>> = OnceLock::new();
static FINETANGENT: OnceLock<Vec<i32>> = OnceLock::new();
static TANTOANGLE: OnceLock<Vec<u32>> = OnceLock::new();

fn finesine_table() -> &'static [i32] {
    FINESINE.get_or_init(|| {
        (0..5 * FINEANGLES / 4)
            .map(|i| {
                let a = (i as f64 + 0.5) * PI * 2.0 / FINEANGLES as f64;
                (a.sin() * FRACUNIT as f64) as i32
            })
            .collect()
    })
}

fn finetangent_table() -> &'static [i32] {
    FINETANGENT.get_or_init(|| {
        (0..FINEANGLES / 2)
            .map(|i| {
                let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * PI * 2.0 / FINEANGLES as f64;
                let t = a.tan() * FRACUNIT as f64;
                t.clamp(i32::MIN as f64, i32::MAX as f64) as i32
            })
            .collect()
    })
}

fn tantoangle_table() -> &'static [u32] {
    TANTOANGLE.get_or_init(|| {
        (0..=SLOPERANGE)
            .map(|i| {
                let f = (i as f64 / SLOPERANGE as f64).atan() / (PI * 2.0);
                (f * 4_294_967_296.0) as u32
            })
            .collect()
    })
}

/// Force all tables to be built, so the first frame doesn't pay for it
pub fn init_tables() {
    finesine_table();
    finetangent_table();
    tantoangle_table();
}

/// `finesine[]`, index is masked to the table range
#[inline]
pub fn finesine(index: usize) -> i32 {
    finesine_table()[index & FINEMASK]
}

/// `finecosine[]`
#[inline]
pub fn finecosine(index: usize) -> i32 {
    finesine_table()[(index & FINEMASK) + FINEANGLES / 4]
}

/// `finetangent[]`, only valid for `0..FINEANGLES/2`
#[inline]
pub fn finetangent(index: usize) -> i32 {
    finetangent_table()[index & (FINEANGLES / 2 - 1)]
}

/// `tantoangle[]`, index is a slope in `0..=SLOPERANGE`
#[inline]
pub fn tantoangle(index: usize) -> u32 {
    tantoangle_table()[index.min(SLOPERANGE as usize)]
}

/// Divide a slope for the `tantoangle` lookup. 64bit so that very long
/// distances don't overflow the shift.
#[inline]
pub fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE as usize;
    }
    let ans = ((num as u64) << 3) / (den as u64 >> 8);
    ans.min(SLOPERANGE as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_quadrants() {
        // Doom tables are offset by half a step so none are exactly 0 or 1
        assert_eq!(finesine(0), 25);
        assert_eq!(finesine(FINEANGLES / 4 - 1), 65535);
        assert_eq!(finesine(FINEANGLES / 2), -25);
        assert_eq!(finecosine(0), finesine(FINEANGLES / 4));
        assert!(finecosine(FINEANGLES / 2) < -65500);
    }

    #[test]
    fn tangent_symmetry() {
        assert_eq!(finetangent(FINEANGLES / 4), -finetangent(FINEANGLES / 4 - 1));
        assert!(finetangent(0) < -FRACUNIT * 1000);
        assert!(finetangent(FINEANGLES / 2 - 1) > FRACUNIT * 1000);
    }

    #[test]
    fn tantoangle_range() {
        assert_eq!(tantoangle(0), 0);
        // atan(1) == 45 degrees
        let ang45 = tantoangle(SLOPERANGE as usize) as i64;
        assert!((ang45 - 0x2000_0000).abs() <= 1);
        assert!(tantoangle(1024) < tantoangle(1025));
    }

    #[test]
    fn slope_div_clamps() {
        assert_eq!(slope_div(10, 100), SLOPERANGE as usize);
        assert_eq!(slope_div(1 << 20, 1 << 20), SLOPERANGE as usize);
        assert_eq!(slope_div(1 << 19, 1 << 20), 1024);
    }
}
