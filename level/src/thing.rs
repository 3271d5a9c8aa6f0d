//! Per frame inputs from the simulation: the camera, the things in the level
//! and the player weapon sprites.

use math::{Angle, Fixed, interpolate_angle};

/// Frame flag for a sprite that ignores sector light
pub const FF_FULLBRIGHT: u32 = 0x8000;
pub const FF_FRAMEMASK: u32 = 0x7fff;

/// Render related flags of a thing. Values match the classic `mobjflag_t` so
/// flags from the simulation can be passed through untouched.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapObjFlag {
    /// Use fuzzy draw (shadow demons or spectres), temporary player
    /// invisibility powerup.
    Shadow = 0x40000,
    /// If 0x4 0x8 or 0xc, use a translation table for player colormaps
    Translation = 0xc000000,
    /// Blend with what is already drawn through the tint map
    Translucent = 0x8000_0000,
}

pub const MF_TRANSSHIFT: u32 = 26;

/// A thing as the renderer sees it
#[derive(Debug, Clone)]
pub struct MapObject {
    pub x: Fixed,
    pub y: Fixed,
    /// Bottom of the thing
    pub z: Fixed,
    pub angle: Angle,
    /// Index to a `SpriteDef`
    pub sprite: usize,
    /// Frame number, may include `FF_FULLBRIGHT`
    pub frame: u32,
    pub flags: u32,
    /// The sector the thing is standing in
    pub sector: usize,
}

impl MapObject {
    pub fn new(x: Fixed, y: Fixed, z: Fixed, sector: usize, sprite: usize) -> Self {
        Self {
            x,
            y,
            z,
            angle: Angle::ZERO,
            sprite,
            frame: 0,
            flags: 0,
            sector,
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: MapObjFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    /// `0` for no translation, else `1..=3`
    #[inline]
    pub fn translation(&self) -> usize {
        ((self.flags & MapObjFlag::Translation as u32) >> MF_TRANSSHIFT) as usize
    }
}

/// A player weapon sprite, drawn on top of the view
#[derive(Debug, Clone)]
pub struct PspDef {
    pub sprite: usize,
    pub frame: u32,
    /// Screen position in 320x200 space
    pub sx: Fixed,
    pub sy: Fixed,
}

/// The camera for a frame
#[derive(Debug, Clone)]
pub struct ViewPoint {
    pub x: Fixed,
    pub y: Fixed,
    /// Eye height
    pub z: Fixed,
    pub angle: Angle,
    /// Look up/down in screen pixels at 200 high, positive looks down
    pub pitch: i32,
    /// Added to every light level, gun flashes
    pub extralight: i32,
    /// Forces every light lookup to one colourmap
    pub fixed_colormap: Option<usize>,
    /// The viewer is invisible, weapon sprites are drawn with fuzz
    pub shadow: bool,
    pub psprites: Vec<PspDef>,
    /// Used to alternate the out of bounds fill
    pub game_tic: u32,
}

impl ViewPoint {
    pub fn new(x: Fixed, y: Fixed, z: Fixed, angle: Angle) -> Self {
        Self {
            x,
            y,
            z,
            angle,
            pitch: 0,
            extralight: 0,
            fixed_colormap: None,
            shadow: false,
            psprites: Vec::new(),
            game_tic: 0,
        }
    }

    /// Camera between two game tics. `frac` is `0..=FRACUNIT`, everything
    /// other than the pose is taken from `next`.
    pub fn interpolate(prev: &ViewPoint, next: &ViewPoint, frac: Fixed) -> ViewPoint {
        let lerp = |a: Fixed, b: Fixed| a + (b - a) * frac;
        ViewPoint {
            x: lerp(prev.x, next.x),
            y: lerp(prev.y, next.y),
            z: lerp(prev.z, next.z),
            angle: interpolate_angle(prev.angle, next.angle, frac),
            pitch: prev.pitch + (((next.pitch - prev.pitch) as i64 * frac.raw() as i64) >> 16) as i32,
            ..next.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::FRACUNIT;

    #[test]
    fn interpolate_halfway() {
        let a = ViewPoint::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_int(41), Angle::ZERO);
        let mut b = ViewPoint::new(Fixed::from_int(64), Fixed::from_int(-32), Fixed::from_int(41), Angle::A90);
        b.pitch = 10;
        b.game_tic = 5;
        let mid = ViewPoint::interpolate(&a, &b, Fixed::new(FRACUNIT / 2));
        assert_eq!(mid.x, Fixed::from_int(32));
        assert_eq!(mid.y, Fixed::from_int(-16));
        assert_eq!(mid.angle, Angle::A45);
        assert_eq!(mid.pitch, 5);
        assert_eq!(mid.game_tic, 5);
    }

    #[test]
    fn translation_bits() {
        let mut thing = MapObject::new(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO, 0, 0);
        assert_eq!(thing.translation(), 0);
        thing.flags = 2 << MF_TRANSSHIFT | MapObjFlag::Shadow as u32;
        assert_eq!(thing.translation(), 2);
        assert!(thing.has_flag(MapObjFlag::Shadow));
        assert!(!thing.has_flag(MapObjFlag::Translucent));
    }
}
