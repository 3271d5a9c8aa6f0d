use log::debug;
use math::{
    ANG90, ANGLETOFINESHIFT, Angle, FINEANGLES, FRACBITS, FRACUNIT, Fixed, finecosine,
    finetangent, fixed_div, fixed_mul,
};
use render_trait::{Detail, DisplayConfig};

/// Fineangles in the SCREENWIDTH wide window.
pub const FIELDOFVIEW: usize = 2048;
/// Width the psprite and light scales are relative to
pub const ORIGWIDTH: i32 = 320;
pub const ORIGHEIGHT: i32 = 200;
/// Pitch limits, in pixels at 200 high
pub const LOOKDIRMIN: i32 = -110;
pub const LOOKDIRMAX: i32 = 90;

/// Everything derived from the view size. Rebuilt on a resolution or detail
/// change, `centery` and `yslope` also follow the camera pitch.
///
/// Doom function names `R_ExecuteSetViewSize` and `R_InitTextureMapping`
#[derive(Debug, Clone)]
pub struct ViewTables {
    /// Columns in the 3D view, half the buffer in low detail
    pub view_width: i32,
    pub view_height: i32,
    pub detail_shift: i32,
    /// `view_width << detail_shift`
    pub full_width: i32,
    pub centerx: i32,
    pub centerxfrac: Fixed,
    pub centery: i32,
    pub centeryfrac: Fixed,
    pub projection: Fixed,
    /// `projection` with the aspect correction, used for anything vertical
    pub yprojection: Fixed,
    pub aspect: Fixed,
    /// `FINEANGLES/2` entries, fine angle (offset by 90 degrees) to column
    pub viewangletox: Vec<i32>,
    /// `view_width + 1` entries, column to angle from the view direction
    pub xtoviewangle: Vec<Angle>,
    pub clipangle: Angle,
    pub yslope: Vec<Fixed>,
    pub distscale: Vec<Fixed>,
    pub pspritescale: Fixed,
    pub pspriteiscale: Fixed,
    pitch: i32,
}

impl ViewTables {
    pub fn new(config: &DisplayConfig) -> Self {
        let detail_shift = match config.detail {
            Detail::High => 0,
            Detail::Low => 1,
        };
        let view_width = (config.width as i32) >> detail_shift;
        let view_height = config.height as i32;
        let centerx = view_width / 2;
        let centerxfrac = Fixed::from_int(centerx);
        let projection = centerxfrac;
        let aspect = if config.aspect.raw() <= 0 {
            Fixed::UNIT
        } else {
            config.aspect
        };

        let mut tables = Self {
            view_width,
            view_height,
            detail_shift,
            full_width: view_width << detail_shift,
            centerx,
            centerxfrac,
            centery: view_height / 2,
            centeryfrac: Fixed::from_int(view_height / 2),
            projection,
            yprojection: projection * aspect,
            aspect,
            viewangletox: Vec::new(),
            xtoviewangle: Vec::new(),
            clipangle: Angle::ZERO,
            yslope: vec![Fixed::ZERO; view_height as usize],
            distscale: vec![Fixed::ZERO; view_width as usize],
            pspritescale: Fixed::new(FRACUNIT * view_width / ORIGWIDTH),
            pspriteiscale: Fixed::new(FRACUNIT * ORIGWIDTH / view_width.max(1)),
            pitch: 0,
        };
        tables.init_texture_mapping();
        tables.init_distscale();
        tables.init_yslope();

        debug!(
            "View tables for {}x{}, {:?} detail: view width {}, projection {:?}, clip angle {:#x}",
            config.width,
            config.height,
            config.detail,
            view_width,
            projection,
            tables.clipangle.bam()
        );
        tables
    }

    /// Doom function name `R_InitTextureMapping`
    fn init_texture_mapping(&mut self) {
        let centerxfrac = self.centerxfrac.raw();
        // Use tangent table to generate viewangletox:
        //  viewangletox will give the next greatest x
        //  after the view angle.
        //
        // Calc focallength
        //  so FIELDOFVIEW angles covers SCREENWIDTH.
        let focallength = fixed_div(centerxfrac, finetangent(FINEANGLES / 4 + FIELDOFVIEW / 2));

        self.viewangletox = (0..FINEANGLES / 2)
            .map(|i| {
                let tan = finetangent(i);
                if tan > FRACUNIT * 2 {
                    -1
                } else if tan < -FRACUNIT * 2 {
                    self.view_width + 1
                } else {
                    let t = fixed_mul(tan, focallength);
                    let t = (centerxfrac - t + FRACUNIT - 1) >> FRACBITS;
                    t.clamp(-1, self.view_width + 1)
                }
            })
            .collect();

        // Scan viewangletox[] to generate xtoviewangle[]:
        //  xtoviewangle will give the smallest view angle
        //  that maps to x.
        self.xtoviewangle = (0..=self.view_width)
            .map(|x| {
                let mut i = 0;
                while self.viewangletox[i] > x {
                    i += 1;
                }
                Angle::new(((i as u32) << ANGLETOFINESHIFT).wrapping_sub(ANG90))
            })
            .collect();

        // Take out the fencepost cases from viewangletox.
        for t in self.viewangletox.iter_mut() {
            if *t == -1 {
                *t = 0;
            } else if *t == self.view_width + 1 {
                *t = self.view_width;
            }
        }
        self.clipangle = self.xtoviewangle[0];
    }

    fn init_distscale(&mut self) {
        for (i, d) in self.distscale.iter_mut().enumerate() {
            let cosadj = finecosine(self.xtoviewangle[i].fine()).abs();
            *d = Fixed::new(fixed_div(FRACUNIT, cosadj));
        }
    }

    fn init_yslope(&mut self) {
        let num = fixed_mul(self.full_width / 2 * FRACUNIT, self.aspect.raw());
        for (i, slope) in self.yslope.iter_mut().enumerate() {
            let dy = (((i as i32 - self.centery) << FRACBITS) + FRACUNIT / 2).abs();
            *slope = Fixed::new(fixed_div(num, dy));
        }
    }

    /// Move the horizon for the camera pitch. Positive pitch looks down.
    pub fn set_pitch(&mut self, pitch: i32) {
        let pitch = pitch.clamp(LOOKDIRMIN, LOOKDIRMAX);
        if pitch == self.pitch {
            return;
        }
        self.pitch = pitch;
        self.centery = self.view_height / 2 - pitch * self.view_height / ORIGHEIGHT;
        self.centeryfrac = Fixed::from_int(self.centery);
        self.init_yslope();
    }

    #[cfg(test)]
    pub fn pitch(&self) -> i32 {
        self.pitch
    }

    /// Screen column for an angle relative to the view, the angle must be
    /// within `clipangle`
    #[inline]
    pub fn angle_to_x(&self, angle: Angle) -> i32 {
        self.viewangletox[angle.wrapping_add(Angle::A90).fine()]
    }
}

/// Wall scale at one screen column.
///
/// Doom function name `R_ScaleFromGlobalAngle`
pub fn scale_from_global_angle(
    visangle: Angle,
    view_angle: Angle,
    rw_normalangle: Angle,
    rw_distance: Fixed,
    tables: &ViewTables,
    max_rwscale: Fixed,
) -> Fixed {
    let anglea = Angle::A90 + (visangle - view_angle);
    let angleb = Angle::A90 + (visangle - rw_normalangle);
    let den = rw_distance * anglea.sin();
    let num = (tables.yprojection * angleb.sin()).shl(tables.detail_shift);

    if den.raw() > num.raw() >> FRACBITS {
        let scale = num / den;
        if scale > max_rwscale {
            max_rwscale
        } else if scale.raw() < 256 {
            Fixed::new(256)
        } else {
            scale
        }
    } else {
        max_rwscale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::{ANG45, FRACUNIT};

    fn tables(width: usize, height: usize, detail: Detail) -> ViewTables {
        ViewTables::new(&DisplayConfig {
            width,
            height,
            detail,
            ..DisplayConfig::default()
        })
    }

    #[test]
    fn fov_spans_the_view() {
        let t = tables(320, 200, Detail::High);
        assert_eq!(t.view_width, 320);
        assert_eq!(t.centerx, 160);
        // Left edge looks 45 degrees left
        let left = t.xtoviewangle[0].bam();
        assert!(left.abs_diff(ANG45) < 1 << 22, "{left:#x}");
        let right = t.xtoviewangle[320].bam();
        assert!(right.abs_diff(ANG45.wrapping_neg()) < 1 << 22, "{right:#x}");
        assert_eq!(t.clipangle, t.xtoviewangle[0]);
        // Straight ahead is the middle column
        assert_eq!(t.angle_to_x(Angle::ZERO), 160);
    }

    #[test]
    fn viewangletox_is_monotonic_and_in_range() {
        let t = tables(640, 400, Detail::High);
        let mut last = i32::MAX;
        for x in t.viewangletox.iter() {
            assert!((0..=640).contains(x));
            assert!(*x <= last);
            last = *x;
        }
    }

    #[test]
    fn xtoviewangle_maps_back() {
        let t = tables(320, 200, Detail::High);
        for x in [0, 1, 80, 160, 240, 319] {
            assert_eq!(t.angle_to_x(t.xtoviewangle[x as usize]), x);
        }
    }

    #[test]
    fn low_detail_halves_columns() {
        let t = tables(320, 200, Detail::Low);
        assert_eq!(t.view_width, 160);
        assert_eq!(t.full_width, 320);
        assert_eq!(t.xtoviewangle.len(), 161);
        assert_eq!(t.distscale.len(), 160);
        // Floors stay the same distance for the same rows
        let high = tables(320, 200, Detail::High);
        assert_eq!(t.yslope[150], high.yslope[150]);
    }

    #[test]
    fn psprite_scale() {
        let t = tables(640, 400, Detail::High);
        assert_eq!(t.pspritescale.raw(), FRACUNIT * 2);
        assert_eq!(t.pspriteiscale.raw(), FRACUNIT / 2);
    }

    #[test]
    fn distscale_grows_to_the_edges() {
        let t = tables(320, 200, Detail::High);
        assert!((t.distscale[160].raw() - FRACUNIT).abs() < 64);
        assert!(t.distscale[0] > t.distscale[80]);
        assert!(t.distscale[319] > t.distscale[240]);
    }

    #[test]
    fn pitch_moves_centery() {
        let mut t = tables(320, 200, Detail::High);
        let level = t.yslope[150];
        t.set_pitch(20);
        assert_eq!(t.centery, 80);
        assert_eq!(t.centeryfrac, Fixed::from_int(80));
        // The row 20 pixels further from centre is now 150
        assert!(t.yslope[150] < level);
        t.set_pitch(-500);
        assert_eq!(t.pitch(), LOOKDIRMIN);
        assert_eq!(t.centery, 210);
    }

    #[test]
    fn scale_at_the_centre() {
        let t = tables(320, 200, Detail::High);
        // A wall facing the camera 160 units away is drawn at 1:1. The
        // normal points away from the front side.
        let normal = Angle::ZERO;
        let scale = scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            normal,
            Fixed::from_int(160),
            &t,
            Fixed::from_int(64),
        );
        assert!((scale.raw() - FRACUNIT).abs() < 64, "{scale:?}");

        // Twice as far is half the size
        let scale = scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            normal,
            Fixed::from_int(320),
            &t,
            Fixed::from_int(64),
        );
        assert!((scale.raw() - FRACUNIT / 2).abs() < 64, "{scale:?}");

        // Very close walls are clamped
        let scale = scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            normal,
            Fixed::new(1),
            &t,
            Fixed::from_int(64),
        );
        assert_eq!(scale, Fixed::from_int(64));
    }
}
