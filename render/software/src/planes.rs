use level::{PicData, ViewPoint};
use log::trace;
use math::{Angle, Fixed, finecosine, finesine};
use render_trait::PixelBuffer;

use crate::defs::{UNSET, Visplane};
use crate::draw::{ColumnStyle, DrawColumn, DrawSpan, Fuzz};
use crate::lights::LightTables;
use crate::utilities::ViewTables;

/// Buckets for the plane lookup
const VISPLANE_HASHES: usize = 128;
/// Sky texture columns per view angle
const ANGLETOSKYSHIFT: u32 = 22;

#[inline]
fn visplane_hash(picnum: usize, lightlevel: i32, height: Fixed) -> usize {
    (picnum as u32)
        .wrapping_mul(3)
        .wrapping_add(lightlevel as u32)
        .wrapping_add((height.raw() as u32).wrapping_mul(7)) as usize
        & (VISPLANE_HASHES - 1)
}

/// Per row state of the span builder
struct SpanState {
    /// spanstart holds the start of a plane span
    /// initialized to 0 at start
    spanstart: Vec<i32>,
    cachedheight: Vec<Fixed>,
    cacheddistance: Vec<Fixed>,
    cachedxstep: Vec<Fixed>,
    cachedystep: Vec<Fixed>,
    basexscale: Fixed,
    baseyscale: Fixed,
}

impl SpanState {
    fn new(view_height: usize) -> Self {
        Self {
            spanstart: vec![0; view_height],
            cachedheight: vec![Fixed::ZERO; view_height],
            cacheddistance: vec![Fixed::ZERO; view_height],
            cachedxstep: vec![Fixed::ZERO; view_height],
            cachedystep: vec![Fixed::ZERO; view_height],
            basexscale: Fixed::ZERO,
            baseyscale: Fixed::ZERO,
        }
    }
}

/// What a plane is drawn with, fixed for every span of the plane
struct PlaneDraw<'a> {
    view: &'a ViewPoint,
    pics: &'a PicData,
    tables: &'a ViewTables,
    lights: &'a LightTables,
    plane: &'a Visplane,
    planeheight: Fixed,
    light: usize,
}

pub struct VisPlaneRender {
    // Here comes the obnoxious "visplane".
    visplanes: Vec<Visplane>,
    /// Planes in use this frame, the rest of `visplanes` is kept allocated
    lastvisplane: usize,
    hash: [Option<usize>; VISPLANE_HASHES],
    /// Index of current visplane in `self.visplanes` for floor
    pub floorplane: Option<usize>,
    /// Index of current visplane in `self.visplanes` for ceiling
    pub ceilingplane: Option<usize>,
    spans: SpanState,
    view_width: usize,
}

impl VisPlaneRender {
    pub fn new(view_width: usize, view_height: usize) -> Self {
        VisPlaneRender {
            visplanes: Vec::new(),
            lastvisplane: 0,
            hash: [None; VISPLANE_HASHES],
            floorplane: None,
            ceilingplane: None,
            spans: SpanState::new(view_height),
            view_width,
        }
    }

    /// R_ClearPlanes
    /// At begining of frame.
    pub fn clear_planes(&mut self, view_angle: Angle, tables: &ViewTables) {
        self.lastvisplane = 0;
        self.hash = [None; VISPLANE_HASHES];
        self.floorplane = None;
        self.ceilingplane = None;
        self.spans.cachedheight.fill(Fixed::ZERO);

        // left to right mapping
        let angle = (view_angle - Angle::A90).fine();
        // scale will be unit scale at SCREENWIDTH/2 distance
        self.spans.basexscale = Fixed::new(finecosine(angle)) / tables.centerxfrac;
        self.spans.baseyscale = -(Fixed::new(finesine(angle)) / tables.centerxfrac);
    }

    /// Planes used in this frame
    pub fn len(&self) -> usize {
        self.lastvisplane
    }

    #[cfg(test)]
    pub fn plane(&self, index: usize) -> &Visplane {
        &self.visplanes[index]
    }

    pub fn plane_mut(&mut self, index: usize) -> &mut Visplane {
        &mut self.visplanes[index]
    }

    #[cfg(test)]
    pub fn planes(&self) -> &[Visplane] {
        &self.visplanes[..self.lastvisplane]
    }

    /// Take the next free plane, the arena grows when the frame needs more
    fn new_plane(&mut self, height: Fixed, picnum: usize, lightlevel: i32) -> usize {
        let index = self.lastvisplane;
        if index == self.visplanes.len() {
            self.visplanes.push(Visplane::new(self.view_width));
        }
        self.visplanes[index].reset(height, picnum, lightlevel, self.view_width);
        self.lastvisplane += 1;

        let bucket = visplane_hash(picnum, lightlevel, height);
        self.visplanes[index].next = self.hash[bucket];
        self.hash[bucket] = Some(index);
        index
    }

    /// Find a plane matching height, picnum, light level. Otherwise return a
    /// new plane. Every sky is the same plane.
    ///
    /// Doom function name `R_FindPlane`
    pub fn find_plane(&mut self, mut height: Fixed, picnum: usize, mut lightlevel: i32, sky_num: usize) -> usize {
        if picnum == sky_num {
            // all skies map together
            height = Fixed::ZERO;
            lightlevel = 0;
        }

        let mut next = self.hash[visplane_hash(picnum, lightlevel, height)];
        while let Some(index) = next {
            let check = &self.visplanes[index];
            if check.height == height && check.picnum == picnum && check.lightlevel == lightlevel {
                return index;
            }
            next = check.next;
        }

        self.new_plane(height, picnum, lightlevel)
    }

    /// Check if this plane can take the columns `start..=stop`, otherwise use
    /// a new plane with the same key. `force_new` always splits, used when the
    /// floor and ceiling of a seg share one plane.
    ///
    /// Doom function name `R_CheckPlane`
    pub fn check_plane(&mut self, index: usize, start: i32, stop: i32, force_new: bool) -> usize {
        let plane = &mut self.visplanes[index];

        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };

        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        if !force_new && (intrl..=intrh).all(|x| plane.top(x) == UNSET) {
            plane.minx = unionl;
            plane.maxx = unionh;
            // Use the same plane
            return index;
        }

        // Otherwise make a new plane
        let (height, picnum, lightlevel) = (plane.height, plane.picnum, plane.lightlevel);
        let index = self.new_plane(height, picnum, lightlevel);
        let plane = &mut self.visplanes[index];
        plane.minx = start;
        plane.maxx = stop;
        index
    }

    /// R_DrawPlanes
    /// At the end of each frame.
    pub fn draw_planes(
        &mut self,
        view: &ViewPoint,
        pics: &PicData,
        tables: &ViewTables,
        lights: &LightTables,
        fuzz: &mut Fuzz,
        buffer: &mut impl PixelBuffer,
    ) {
        for index in 0..self.lastvisplane {
            let plane = &mut self.visplanes[index];
            if plane.minx > plane.maxx {
                continue;
            }

            if plane.picnum == pics.sky_num() {
                draw_sky(plane, view, pics, tables, fuzz, buffer);
                continue;
            }

            // regular flat
            let stop = plane.maxx + 1;
            let minx = plane.minx;
            plane.set_top(stop, UNSET);
            plane.set_top(minx - 1, UNSET);

            let draw = PlaneDraw {
                view,
                pics,
                tables,
                lights,
                plane: &self.visplanes[index],
                planeheight: (self.visplanes[index].height - view.z).abs(),
                light: LightTables::light_level(self.visplanes[index].lightlevel, view.extralight),
            };
            for x in minx..=stop {
                make_spans(
                    &draw,
                    &mut self.spans,
                    x,
                    draw.plane.top(x - 1),
                    draw.plane.bottom(x - 1),
                    draw.plane.top(x),
                    draw.plane.bottom(x),
                    buffer,
                );
            }
            trace!("Drew {:?}", draw.plane);
        }
    }
}

/// Sky is always drawn full bright, i.e. colormaps[0] is used. Because of
/// this hack, sky is not affected by INVUL inverse mapping.
fn draw_sky(
    plane: &Visplane,
    view: &ViewPoint,
    pics: &PicData,
    tables: &ViewTables,
    fuzz: &mut Fuzz,
    buffer: &mut impl PixelBuffer,
) {
    let sky = pics.get_texture(pics.sky_pic());
    let colourmap = pics.colourmap(view.fixed_colormap.unwrap_or(0));
    let iscale = tables.pspriteiscale.shr(tables.detail_shift) / tables.aspect;
    let texturemid = pics.sky_texture_mid();

    for x in plane.minx..=plane.maxx {
        let yl = plane.top(x);
        let yh = plane.bottom(x);
        if yl == UNSET || yl > yh {
            continue;
        }
        let angle = (view.angle + tables.xtoviewangle[x as usize]).bam() >> ANGLETOSKYSHIFT;
        DrawColumn {
            source: &sky.column(angle as i32).pixels,
            colourmap,
            brightmap: None,
            iscale,
            texturemid,
            texheight: sky.height as i32,
            x,
            yl,
            yh,
        }
        .draw(pics, tables, ColumnStyle::Opaque, fuzz, buffer);
    }
}

/// R_MakeSpans
#[allow(clippy::too_many_arguments)]
fn make_spans(
    draw: &PlaneDraw,
    spans: &mut SpanState,
    x: i32,
    mut t1: i32,
    mut b1: i32,
    mut t2: i32,
    mut b2: i32,
    buffer: &mut impl PixelBuffer,
) {
    while t1 < t2 && t1 <= b1 {
        let start = spans.spanstart[t1 as usize];
        map_plane(draw, spans, t1, start, x - 1, buffer);
        t1 += 1;
    }

    while b1 > b2 && b1 >= t1 {
        let start = spans.spanstart[b1 as usize];
        map_plane(draw, spans, b1, start, x - 1, buffer);
        b1 -= 1;
    }

    while t2 < t1 && t2 <= b2 {
        spans.spanstart[t2 as usize] = x;
        t2 += 1;
    }

    while b2 > b1 && b2 >= t2 {
        spans.spanstart[b2 as usize] = x;
        b2 -= 1;
    }
}

/// R_MapPlane
///
/// Uses global vars:
///  planeheight
///  ds_source
///  basexscale
///  baseyscale
///  viewx
///  viewy
fn map_plane(draw: &PlaneDraw, spans: &mut SpanState, y: i32, x1: i32, x2: i32, buffer: &mut impl PixelBuffer) {
    if x2 < x1 {
        return;
    }
    let row = y as usize;
    let tables = draw.tables;

    let distance = if draw.planeheight != spans.cachedheight[row] {
        let distance = draw.planeheight * tables.yslope[row];
        spans.cachedheight[row] = draw.planeheight;
        spans.cacheddistance[row] = distance;
        spans.cachedxstep[row] = distance * spans.basexscale;
        spans.cachedystep[row] = distance * spans.baseyscale;
        distance
    } else {
        spans.cacheddistance[row]
    };

    let length = distance * tables.distscale[x1 as usize];
    let angle = (draw.view.angle + tables.xtoviewangle[x1 as usize]).fine();
    let xfrac = draw.view.x + Fixed::new(finecosine(angle)) * length;
    let yfrac = -draw.view.y - Fixed::new(finesine(angle)) * length;

    let flat = draw.pics.get_flat(draw.plane.picnum);
    let (colourmap, brightmap) = match draw.view.fixed_colormap {
        Some(fixed) => (draw.pics.colourmap(fixed), None),
        None => (
            draw.pics.colourmap(draw.lights.z_light(draw.light, distance)),
            flat.brightmap.map(|b| draw.pics.brightmap(b)),
        ),
    };

    DrawSpan {
        flat,
        colourmap,
        brightmap,
        xfrac,
        yfrac,
        xstep: spans.cachedxstep[row],
        ystep: spans.cachedystep[row],
        y,
        x1,
        x2,
    }
    .draw(draw.pics, tables, buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use level::prefab;
    use math::Angle;
    use render_trait::{DisplayConfig, IndexedBuffer};

    fn tables() -> ViewTables {
        ViewTables::new(&DisplayConfig {
            width: 64,
            height: 40,
            ..DisplayConfig::default()
        })
    }

    #[test]
    fn find_plane_reuses_keys() {
        let mut planes = VisPlaneRender::new(64, 40);
        planes.clear_planes(Angle::A90, &tables());
        let a = planes.find_plane(Fixed::ZERO, 0, 160, 2);
        let b = planes.find_plane(Fixed::from_int(24), 0, 160, 2);
        let c = planes.find_plane(Fixed::ZERO, 0, 160, 2);
        assert_eq!(a, c);
        assert_ne!(a, b);
        // All skies are one plane whatever the height or light
        let s1 = planes.find_plane(Fixed::from_int(128), 2, 208, 2);
        let s2 = planes.find_plane(Fixed::from_int(96), 2, 144, 2);
        assert_eq!(s1, s2);
        assert_eq!(planes.plane(s1).height, Fixed::ZERO);
        assert_eq!(planes.plane(s1).lightlevel, 0);
        assert_eq!(planes.len(), 3);

        planes.clear_planes(Angle::A90, &tables());
        assert_eq!(planes.len(), 0);
        let d = planes.find_plane(Fixed::from_int(24), 0, 160, 2);
        assert_eq!(d, 0);
        assert_eq!(planes.plane(d).height, Fixed::from_int(24));
    }

    #[test]
    fn check_plane_extends_or_splits() {
        let mut planes = VisPlaneRender::new(64, 40);
        planes.clear_planes(Angle::A90, &tables());
        let p = planes.find_plane(Fixed::ZERO, 0, 160, 2);
        assert_eq!(planes.check_plane(p, 10, 20, false), p);
        for x in 10..=20 {
            planes.plane_mut(p).set_column(x, 30, 39);
        }
        // Disjoint range, still the same plane
        assert_eq!(planes.check_plane(p, 30, 40, false), p);
        assert_eq!(planes.plane(p).minx, 10);
        assert_eq!(planes.plane(p).maxx, 40);

        // Overlaps written columns
        let q = planes.check_plane(p, 15, 25, false);
        assert_ne!(q, p);
        assert_eq!(planes.plane(q).minx, 15);
        assert_eq!(planes.plane(q).maxx, 25);
        assert!(planes.plane(q).same_key(planes.plane(p)));
        // The new plane can be found again through the hash
        assert_eq!(planes.find_plane(Fixed::ZERO, 0, 160, 2), q);

        let r = planes.check_plane(q, 50, 60, true);
        assert_ne!(r, q);
        assert_eq!(planes.len(), 3);
    }

    #[test]
    fn flat_fills_exactly_its_columns() {
        let pics = prefab::pic_data().unwrap();
        let tables = tables();
        let lights = LightTables::new(false, 64);
        let view = ViewPoint::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_int(41), Angle::A90);
        let mut planes = VisPlaneRender::new(64, 40);
        planes.clear_planes(view.angle, &tables);
        let p = planes.find_plane(Fixed::ZERO, prefab::FLOOR, 160, pics.sky_num());
        let p = planes.check_plane(p, 10, 20, false);
        for x in 10..=20 {
            planes.plane_mut(p).set_column(x, 25 + (x & 1), 30);
        }

        let mut buf = IndexedBuffer::new(64, 40);
        let mut fuzz = Fuzz::default();
        planes.draw_planes(&view, &pics, &tables, &lights, &mut fuzz, &mut buf);
        for y in 0..40 {
            for x in 0..64 {
                let inside = (10..=20).contains(&x) && y >= 25 + (x & 1) && y <= 30;
                let px = buf.read_pixel(x as usize, y as usize);
                assert_eq!(px & 0xf0 == prefab::HUE_FLOOR, inside, "{x},{y}");
            }
        }
    }

    #[test]
    fn sky_ignores_light() {
        let pics = prefab::pic_data().unwrap();
        let tables = tables();
        let lights = LightTables::new(false, 64);
        let mut view = ViewPoint::new(Fixed::ZERO, Fixed::ZERO, Fixed::from_int(41), Angle::A90);
        view.extralight = -16;
        let mut planes = VisPlaneRender::new(64, 40);
        planes.clear_planes(view.angle, &tables);
        let p = planes.find_plane(Fixed::from_int(128), prefab::F_SKY1, 0, pics.sky_num());
        let p = planes.check_plane(p, 0, 63, false);
        for x in 0..64 {
            planes.plane_mut(p).set_column(x, 0, 5);
        }

        let mut buf = IndexedBuffer::new(64, 40);
        let mut fuzz = Fuzz::default();
        planes.draw_planes(&view, &pics, &tables, &lights, &mut fuzz, &mut buf);
        let sky = pics.get_texture(prefab::SKY1);
        let angle = (view.angle + tables.xtoviewangle[0]).bam() >> ANGLETOSKYSHIFT;
        let row = (pics.sky_texture_mid() + tables.pspriteiscale * (0 - tables.centery)).to_int();
        let texel = sky.column(angle as i32).pixels[row.rem_euclid(128) as usize];
        assert_eq!(buf.read_pixel(0, 0), texel);
        assert_eq!(buf.read_pixel(0, 6), 0);
    }
}
