//! Diminished lighting. Every lookup returns the index of a colourmap in
//! `PicData`, 0 is full bright and `NUMCOLORMAPS - 1` the darkest.

use level::{NUMCOLORMAPS, Vertex};
use math::{FRACUNIT, Fixed, fixed_div};

use crate::utilities::ORIGWIDTH;

pub const LIGHTLEVELS: usize = 16;
pub const LIGHTSEGSHIFT: i32 = 4;
pub const MAXLIGHTSCALE: usize = 48;
pub const LIGHTSCALESHIFT: i32 = 12;
pub const DISTMAP: i32 = 2;

pub const LIGHTZSHIFT: i32 = 20;
pub const MAXLIGHTZ: usize = 128;
pub const SMOOTH_LIGHTZSHIFT: i32 = 17;
pub const SMOOTH_MAXLIGHTZ: usize = 1024;

/// Colourmap the fuzz effect darkens through
pub const FUZZ_COLOURMAP: usize = 6;

/// Doom function names `R_InitLightTables` and the scalelight half of
/// `R_ExecuteSetViewSize`
#[derive(Debug, Clone)]
pub struct LightTables {
    /// Walls and sprites, by light level then scale
    scalelight: [[usize; MAXLIGHTSCALE]; LIGHTLEVELS],
    /// Floors and ceilings, by light level then distance
    zlight: Vec<Vec<usize>>,
    lightzshift: i32,
    maxlightz: usize,
    /// Buffer width the scale index is normalised from
    full_width: i32,
}

impl LightTables {
    pub fn new(smooth: bool, full_width: i32) -> Self {
        let (lightzshift, maxlightz) = if smooth {
            (SMOOTH_LIGHTZSHIFT, SMOOTH_MAXLIGHTZ)
        } else {
            (LIGHTZSHIFT, MAXLIGHTZ)
        };
        let maxmap = NUMCOLORMAPS as i32 - 1;

        let mut scalelight = [[0; MAXLIGHTSCALE]; LIGHTLEVELS];
        let mut zlight = vec![vec![0; maxlightz]; LIGHTLEVELS];
        for i in 0..LIGHTLEVELS {
            let startmap = ((LIGHTLEVELS - 1 - i) * 2 * NUMCOLORMAPS / LIGHTLEVELS) as i32;
            for (j, z) in zlight[i].iter_mut().enumerate() {
                let scale = fixed_div(160 * FRACUNIT, ((j as i32) + 1) << lightzshift);
                let level = startmap - (scale >> LIGHTSCALESHIFT) / DISTMAP;
                *z = level.clamp(0, maxmap) as usize;
            }
            for (j, s) in scalelight[i].iter_mut().enumerate() {
                let level = startmap - j as i32 / DISTMAP;
                *s = level.clamp(0, maxmap) as usize;
            }
        }

        Self {
            scalelight,
            zlight,
            lightzshift,
            maxlightz,
            full_width: full_width.max(1),
        }
    }

    /// Sector light plus extra light, as a table row
    #[inline]
    pub fn light_level(lightlevel: i32, extralight: i32) -> usize {
        ((lightlevel >> LIGHTSEGSHIFT) + extralight).clamp(0, LIGHTLEVELS as i32 - 1) as usize
    }

    /// Walls get fake contrast, lines along x are a level darker and lines
    /// along y a level lighter.
    pub fn wall_light_level(lightlevel: i32, extralight: i32, v1: &Vertex, v2: &Vertex) -> usize {
        let mut lightnum = (lightlevel >> LIGHTSEGSHIFT) + extralight;
        if v1.y == v2.y {
            lightnum -= 1;
        } else if v1.x == v2.x {
            lightnum += 1;
        }
        lightnum.clamp(0, LIGHTLEVELS as i32 - 1) as usize
    }

    /// Column of `scalelight` for a wall or sprite scale. The scale is taken
    /// back to a 320 wide view so the same distance gets the same light at
    /// any resolution.
    #[inline]
    pub fn scale_index(&self, scale: Fixed) -> usize {
        let normal = scale.raw().max(0) as i64 * ORIGWIDTH as i64 / self.full_width as i64;
        ((normal >> LIGHTSCALESHIFT) as usize).min(MAXLIGHTSCALE - 1)
    }

    #[inline]
    pub fn scale_light(&self, level: usize, scale: Fixed) -> usize {
        self.scalelight[level][self.scale_index(scale)]
    }

    /// The brightest entry of a light row, used by weapon sprites
    #[inline]
    pub fn nearest_light(&self, level: usize) -> usize {
        self.scalelight[level][MAXLIGHTSCALE - 1]
    }

    #[inline]
    pub fn z_index(&self, distance: Fixed) -> usize {
        ((distance.raw().max(0) >> self.lightzshift) as usize).min(self.maxlightz - 1)
    }

    #[inline]
    pub fn z_light(&self, level: usize, distance: Fixed) -> usize {
        self.zlight[level][self.z_index(distance)]
    }
}
