use level::{LineDefFlags, Sector, WallPic};
use math::{ANG90, ANG180, Angle, FRACBITS, FRACUNIT, Fixed, finetangent, point_to_dist};
use render_trait::PixelBuffer;

use crate::defs::{ClipArray, DrawSeg, SIL_BOTH, SIL_BOTTOM, SIL_NONE, SIL_TOP};
use crate::draw::{ColumnStyle, DrawColumn};
use crate::lights::LightTables;
use crate::utilities::scale_from_global_angle;
use crate::{RenderData, RenderFrame};

/// Scale clamp and fixed point precision of the wall edges by sector height,
/// tall sectors trade precision for range.
const SCALE_VALUES: [(i32, i32); 9] = [
    (2048 * FRACUNIT, 12),
    (1024 * FRACUNIT, 12),
    (1024 * FRACUNIT, 11),
    (512 * FRACUNIT, 11),
    (512 * FRACUNIT, 10),
    (256 * FRACUNIT, 10),
    (256 * FRACUNIT, 9),
    (128 * FRACUNIT, 9),
    (64 * FRACUNIT, 9),
];

/// Wall edge precision, kept across segs and only recalculated when the
/// front sector height changes.
#[derive(Debug, Clone)]
pub(crate) struct Wiggle {
    lastheight: i32,
    pub max_rwscale: Fixed,
    pub heightbits: i32,
    pub heightunit: i64,
    pub invhgtbits: i32,
}

impl Default for Wiggle {
    fn default() -> Self {
        Self {
            lastheight: 0,
            max_rwscale: Fixed::from_int(64),
            heightbits: 12,
            heightunit: 1 << 12,
            invhgtbits: FRACBITS - 12,
        }
    }
}

impl Wiggle {
    /// Doom function name `R_FixWiggle`
    pub fn fix(&mut self, sector: &Sector) {
        // disallow negative heights. using 1 forces cache initialization
        let height = ((sector.ceilingheight - sector.floorheight).raw() >> FRACBITS).max(1);
        // early out?
        if height == self.lastheight {
            return;
        }
        self.lastheight = height;

        let mut scaleindex = 0;
        let mut h = height >> 7;
        // calculate adjustment
        loop {
            h >>= 1;
            if h == 0 {
                break;
            }
            scaleindex += 1;
        }
        let (clamp, heightbits) = SCALE_VALUES[scaleindex.min(SCALE_VALUES.len() - 1)];

        // fine-tune renderer for this wall
        self.max_rwscale = Fixed::new(clamp);
        self.heightbits = heightbits;
        self.heightunit = 1 << heightbits;
        self.invhgtbits = FRACBITS - heightbits;
    }
}

/// All of the state in this struct is unique to it as it is used once per seg
/// to be rendered.
pub(crate) struct SegRender<'a> {
    /// True if any of the segs textures might be visible.
    segtextured: bool,
    /// False if the back side is the same plane.
    markfloor: bool,
    markceiling: bool,
    maskedtexture: bool,
    /// Index in to `openings` array
    maskedtexturecol: i32,
    // Textures, `None` if that part is not drawn
    toptexture: Option<&'a WallPic>,
    bottomtexture: Option<&'a WallPic>,
    midtexture: Option<&'a WallPic>,
    //
    rw_normalangle: Angle,
    // regular wall
    rw_x: i32,
    rw_stopx: i32,
    rw_centerangle: Angle,
    rw_offset: Fixed,
    rw_distance: Fixed,
    rw_scale: Fixed,
    rw_scalestep: Fixed,
    rw_midtexturemid: Fixed,
    rw_toptexturemid: Fixed,
    rw_bottomtexturemid: Fixed,

    pixhigh: i64,
    pixlow: i64,
    pixhighstep: i64,
    pixlowstep: i64,

    topfrac: i64,
    topstep: i64,
    bottomfrac: i64,
    bottomstep: i64,

    /// Row of `scalelight` for the wall, `None` with a fixed colourmap
    wall_lights: Option<usize>,
    heightbits: i32,
    heightunit: i64,
}

impl<'a> SegRender<'a> {
    fn new(start: i32, stop: i32) -> Self {
        Self {
            segtextured: false,
            markfloor: false,
            markceiling: false,
            maskedtexture: false,
            maskedtexturecol: 0,
            toptexture: None,
            bottomtexture: None,
            midtexture: None,
            rw_normalangle: Angle::ZERO,
            rw_x: start,
            rw_stopx: stop + 1,
            rw_centerangle: Angle::ZERO,
            rw_offset: Fixed::ZERO,
            rw_distance: Fixed::ZERO,
            rw_scale: Fixed::ZERO,
            rw_scalestep: Fixed::ZERO,
            rw_midtexturemid: Fixed::ZERO,
            rw_toptexturemid: Fixed::ZERO,
            rw_bottomtexturemid: Fixed::ZERO,
            pixhigh: 0,
            pixlow: 0,
            pixhighstep: 0,
            pixlowstep: 0,
            topfrac: 0,
            topstep: 0,
            bottomfrac: 0,
            bottomstep: 0,
            wall_lights: None,
            heightbits: 12,
            heightunit: 1 << 12,
        }
    }

    /// R_StoreWallRange - r_segs
    ///
    /// A wall range of `seg` that the BSP found visible, `start..=stop`. Draws
    /// the wall parts, marks the floor and ceiling and keeps a `DrawSeg` for
    /// sprite clipping.
    pub fn store_wall_range(
        frame: &RenderFrame<'a>,
        rdata: &mut RenderData,
        start: i32,
        stop: i32,
        seg_index: usize,
        buffer: &mut impl PixelBuffer,
    ) {
        let tables = frame.tables;
        if start >= tables.view_width || start < 0 || start > stop {
            panic!("Bad R_RenderWallRange: {} to {}", start, stop);
        }

        let map = frame.map;
        let pics = frame.pics;
        let view = frame.view;
        let viewz = view.z;
        let seg = &map.segments()[seg_index];
        let sidedef = &map.sidedefs()[seg.sidedef];
        let linedef = &map.linedefs()[seg.linedef];
        let frontsector = &map.sectors()[seg.frontsector];
        let sky_num = pics.sky_num();

        let mut this = SegRender::new(start, stop);
        let mut ds_p = DrawSeg::new(seg_index);

        this.rw_normalangle = seg.angle + Angle::A90;
        let offsetangle = ((this.rw_normalangle - rdata.rw_angle1).bam() as i32)
            .unsigned_abs()
            .min(ANG90);
        let distangle = Angle::A90 - Angle::new(offsetangle);
        let hyp = point_to_dist(view.x, view.y, seg.v1.x, seg.v1.y);
        this.rw_distance = hyp * distangle.sin();

        ds_p.x1 = start;
        ds_p.x2 = stop;

        // Wiggle fix, tall sectors lose precision
        rdata.wiggle.fix(frontsector);
        this.heightbits = rdata.wiggle.heightbits;
        this.heightunit = rdata.wiggle.heightunit;
        let invhgtbits = rdata.wiggle.invhgtbits;
        let max_rwscale = rdata.wiggle.max_rwscale;

        // calculate scale at both ends and step
        this.rw_scale = scale_from_global_angle(
            view.angle + tables.xtoviewangle[start as usize],
            view.angle,
            this.rw_normalangle,
            this.rw_distance,
            tables,
            max_rwscale,
        );
        ds_p.scale1 = this.rw_scale;
        if stop > start {
            ds_p.scale2 = scale_from_global_angle(
                view.angle + tables.xtoviewangle[stop as usize],
                view.angle,
                this.rw_normalangle,
                this.rw_distance,
                tables,
                max_rwscale,
            );
            this.rw_scalestep = (ds_p.scale2 - this.rw_scale) / (stop - start);
            ds_p.scalestep = this.rw_scalestep;
        } else {
            ds_p.scale2 = ds_p.scale1;
        }

        // calculate texture boundaries
        //  and decide if floor / ceiling marks are needed
        let mut worldtop = frontsector.ceilingheight - viewz;
        let worldbottom = frontsector.floorheight - viewz;
        let mut worldhigh = Fixed::ZERO;
        let mut worldlow = Fixed::ZERO;
        let backsector = seg.backsector.map(|b| &map.sectors()[b]);

        match backsector {
            None => {
                // single sided line
                this.midtexture = sidedef.midtexture.map(|t| pics.get_texture(t));
                // a single sided line is terminal, so it must mark ends
                this.markfloor = true;
                this.markceiling = true;
                this.rw_midtexturemid = match this.midtexture {
                    Some(tex) if linedef.flags & LineDefFlags::UnpegBottom as u32 != 0 => {
                        let vtop = frontsector.floorheight + Fixed::from_int(tex.height as i32);
                        // bottom of texture at bottom
                        vtop - viewz
                    }
                    // top of texture at top
                    _ => worldtop,
                };
                this.rw_midtexturemid += sidedef.rowoffset;

                ds_p.silhouette = SIL_BOTH;
                ds_p.sprtopclip = Some(ClipArray::Constant(tables.view_height));
                ds_p.sprbottomclip = Some(ClipArray::Constant(-1));
                ds_p.bsilheight = Fixed::MAX;
                ds_p.tsilheight = Fixed::MIN;
            }
            Some(backsector) => {
                // two sided line
                ds_p.sprtopclip = None;
                ds_p.sprbottomclip = None;
                ds_p.silhouette = SIL_NONE;

                if frontsector.floorheight > backsector.floorheight {
                    ds_p.silhouette = SIL_BOTTOM;
                    ds_p.bsilheight = frontsector.floorheight;
                } else if backsector.floorheight > viewz {
                    ds_p.silhouette = SIL_BOTTOM;
                    ds_p.bsilheight = Fixed::MAX;
                }

                if frontsector.ceilingheight < backsector.ceilingheight {
                    ds_p.silhouette |= SIL_TOP;
                    ds_p.tsilheight = frontsector.ceilingheight;
                } else if backsector.ceilingheight < viewz {
                    ds_p.silhouette |= SIL_TOP;
                    ds_p.tsilheight = Fixed::MIN;
                }

                if backsector.ceilingheight <= frontsector.floorheight {
                    ds_p.sprbottomclip = Some(ClipArray::Constant(-1));
                    ds_p.bsilheight = Fixed::MAX;
                    ds_p.silhouette |= SIL_BOTTOM;
                }

                if backsector.floorheight >= frontsector.ceilingheight {
                    ds_p.sprtopclip = Some(ClipArray::Constant(tables.view_height));
                    ds_p.tsilheight = Fixed::MIN;
                    ds_p.silhouette |= SIL_TOP;
                }

                worldhigh = backsector.ceilingheight - viewz;
                worldlow = backsector.floorheight - viewz;

                // hack to allow height changes in outdoor areas
                if frontsector.ceilingpic == sky_num && backsector.ceilingpic == sky_num {
                    worldtop = worldhigh;
                }

                // same plane on both sides?
                this.markfloor = worldlow != worldbottom
                    || backsector.floorpic != frontsector.floorpic
                    || backsector.lightlevel != frontsector.lightlevel;
                this.markceiling = worldhigh != worldtop
                    || backsector.ceilingpic != frontsector.ceilingpic
                    || backsector.lightlevel != frontsector.lightlevel;

                if backsector.ceilingheight <= frontsector.floorheight
                    || backsector.floorheight >= frontsector.ceilingheight
                {
                    // closed door
                    this.markceiling = true;
                    this.markfloor = true;
                }

                if worldhigh < worldtop {
                    // top texture
                    this.toptexture = sidedef.toptexture.map(|t| pics.get_texture(t));
                    this.rw_toptexturemid = match this.toptexture {
                        Some(tex) if linedef.flags & LineDefFlags::UnpegTop as u32 == 0 => {
                            let vtop = backsector.ceilingheight + Fixed::from_int(tex.height as i32);
                            // bottom of texture
                            vtop - viewz
                        }
                        // top of texture at top
                        _ => worldtop,
                    };
                }

                if worldlow > worldbottom {
                    // bottom texture
                    this.bottomtexture = sidedef.bottomtexture.map(|t| pics.get_texture(t));
                    this.rw_bottomtexturemid = if linedef.flags & LineDefFlags::UnpegBottom as u32 != 0 {
                        // bottom of texture at bottom
                        // top of texture at top
                        worldtop
                    } else {
                        // top of texture at top
                        worldlow
                    };
                }
                this.rw_toptexturemid += sidedef.rowoffset;
                this.rw_bottomtexturemid += sidedef.rowoffset;

                // allocate space for masked texture tables
                if sidedef.midtexture.is_some() {
                    // masked midtexture
                    this.maskedtexture = true;
                    this.maskedtexturecol = rdata.openings.len() as i32 - this.rw_x;
                    ds_p.maskedtexturecol = Some(this.maskedtexturecol);
                    let len = rdata.openings.len() + (this.rw_stopx - this.rw_x) as usize;
                    rdata.openings.resize(len, 0);
                }
            }
        }

        // calculate rw_offset (only needed for textured lines)
        this.segtextured = this.midtexture.is_some()
            || this.toptexture.is_some()
            || this.bottomtexture.is_some()
            || this.maskedtexture;

        if this.segtextured {
            let diff = this.rw_normalangle - rdata.rw_angle1;
            let mut offsetangle = diff.bam();
            if offsetangle > ANG180 {
                offsetangle = offsetangle.wrapping_neg();
            }
            let sineval = Angle::new(offsetangle.min(ANG90)).sin();
            this.rw_offset = hyp * sineval;
            if diff.bam() < ANG180 {
                this.rw_offset = -this.rw_offset;
            }
            this.rw_offset += sidedef.textureoffset + seg.offset;
            this.rw_centerangle = Angle::A90 + view.angle - this.rw_normalangle;

            // calculate light table
            //  use different light tables
            //  for horizontal / vertical / diagonal
            if view.fixed_colormap.is_none() {
                this.wall_lights = Some(LightTables::wall_light_level(
                    frontsector.lightlevel,
                    view.extralight,
                    &seg.v1,
                    &seg.v2,
                ));
            }
        }

        // if a floor / ceiling plane is on the wrong side
        //  of the view plane, it is definitely invisible
        //  and doesn't need to be marked.
        if frontsector.floorheight >= viewz {
            // above view plane
            this.markfloor = false;
        }
        if frontsector.ceilingheight <= viewz && frontsector.ceilingpic != sky_num {
            // below view plane
            this.markceiling = false;
        }
        let planes = &mut rdata.visplane_render;
        if planes.floorplane.is_none() {
            this.markfloor = false;
        }
        if planes.ceilingplane.is_none() {
            this.markceiling = false;
        }

        // calculate incremental stepping values for texture edges
        // Edges are kept at `heightbits` precision
        let centeryfrac = (tables.centeryfrac.raw() >> invhgtbits) as i64;
        let rw_scale = this.rw_scale.raw() as i64;
        let rw_scalestep = this.rw_scalestep.raw() as i64;
        let edge = |world: Fixed| -> (i64, i64) {
            let world = (world.raw() >> invhgtbits) as i64;
            (centeryfrac - ((world * rw_scale) >> FRACBITS), -((rw_scalestep * world) >> FRACBITS))
        };
        (this.topfrac, this.topstep) = edge(worldtop);
        (this.bottomfrac, this.bottomstep) = edge(worldbottom);
        if backsector.is_some() {
            if worldhigh < worldtop {
                (this.pixhigh, this.pixhighstep) = edge(worldhigh);
            }
            if worldlow > worldbottom {
                (this.pixlow, this.pixlowstep) = edge(worldlow);
            }
        }

        // render it
        if this.markceiling {
            if let Some(ceiling) = planes.ceilingplane {
                planes.ceilingplane = Some(planes.check_plane(ceiling, this.rw_x, this.rw_stopx - 1, false));
            }
        }
        if this.markfloor {
            if let Some(floor) = planes.floorplane {
                let shared = this.markceiling && planes.ceilingplane == Some(floor);
                planes.floorplane = Some(planes.check_plane(floor, this.rw_x, this.rw_stopx - 1, shared));
            }
        }

        this.render_seg_loop(frame, rdata, buffer);

        // save sprite clipping info
        let rw_stopx = this.rw_stopx as usize;
        if (ds_p.silhouette & SIL_TOP != 0 || this.maskedtexture) && ds_p.sprtopclip.is_none() {
            let offset = rdata.openings.len() as i32 - start;
            rdata
                .openings
                .extend_from_slice(&rdata.portal_clip.ceilingclip[start as usize..rw_stopx]);
            ds_p.sprtopclip = Some(ClipArray::Openings(offset));
        }

        if (ds_p.silhouette & SIL_BOTTOM != 0 || this.maskedtexture) && ds_p.sprbottomclip.is_none() {
            let offset = rdata.openings.len() as i32 - start;
            rdata
                .openings
                .extend_from_slice(&rdata.portal_clip.floorclip[start as usize..rw_stopx]);
            ds_p.sprbottomclip = Some(ClipArray::Openings(offset));
        }

        if this.maskedtexture && ds_p.silhouette & SIL_TOP == 0 {
            ds_p.silhouette |= SIL_TOP;
            ds_p.tsilheight = Fixed::MIN;
        }
        if this.maskedtexture && ds_p.silhouette & SIL_BOTTOM == 0 {
            ds_p.silhouette |= SIL_BOTTOM;
            ds_p.bsilheight = Fixed::MAX;
        }
        rdata.drawsegs.push(ds_p);
    }

    /// Doom function name `R_RenderSegLoop`
    fn render_seg_loop(&mut self, frame: &RenderFrame<'a>, rdata: &mut RenderData, buffer: &mut impl PixelBuffer) {
        let RenderData {
            portal_clip,
            visplane_render,
            openings,
            fuzz,
            ..
        } = rdata;
        let tables = frame.tables;
        let pics = frame.pics;
        let fixed = frame.view.fixed_colormap.map(|c| pics.colourmap(c));

        while self.rw_x < self.rw_stopx {
            let x = self.rw_x as usize;
            let ceilingclip = portal_clip.ceilingclip[x];
            let floorclip = portal_clip.floorclip[x];

            // mark floor / ceiling areas
            let mut yl = ((self.topfrac + self.heightunit - 1) >> self.heightbits) as i32;
            // no space above wall?
            if yl < ceilingclip + 1 {
                yl = ceilingclip + 1;
            }

            if self.markceiling {
                let top = ceilingclip + 1;
                let mut bottom = yl - 1;
                if bottom >= floorclip {
                    bottom = floorclip - 1;
                }
                if top <= bottom {
                    if let Some(ceiling) = visplane_render.ceilingplane {
                        visplane_render.plane_mut(ceiling).set_column(self.rw_x, top, bottom);
                    }
                }
            }

            let mut yh = (self.bottomfrac >> self.heightbits) as i32;
            if yh >= floorclip {
                yh = floorclip - 1;
            }

            if self.markfloor {
                let mut top = yh + 1;
                let bottom = floorclip - 1;
                if top <= ceilingclip {
                    top = ceilingclip + 1;
                }
                if top <= bottom {
                    if let Some(floor) = visplane_render.floorplane {
                        visplane_render.plane_mut(floor).set_column(self.rw_x, top, bottom);
                    }
                }
            }

            // texturecolumn and lighting are independent of wall tiers
            let mut texture_column = 0;
            let mut dc_iscale = Fixed::ZERO;
            let mut colourmap = pics.colourmap(0);
            if self.segtextured {
                // calculate texture offset
                let angle = (self.rw_centerangle + tables.xtoviewangle[x]).fine();
                let tan = Fixed::new(finetangent(angle));
                texture_column = (self.rw_offset - tan * self.rw_distance).raw() >> FRACBITS;

                colourmap = match (fixed, self.wall_lights) {
                    (Some(fixed), _) => fixed,
                    (None, Some(level)) => pics.colourmap(frame.lights.scale_light(level, self.rw_scale)),
                    (None, None) => colourmap,
                };
                dc_iscale = Fixed::new((0xffff_ffffu32 / self.rw_scale.raw().max(1) as u32) as i32);
            }

            let rw_x = self.rw_x;
            let column = |tex: &'a WallPic, texturemid: Fixed, yl: i32, yh: i32| DrawColumn {
                source: &tex.column(texture_column).pixels,
                colourmap,
                brightmap: match fixed {
                    None => tex.brightmap.map(|b| pics.brightmap(b)),
                    Some(_) => None,
                },
                iscale: dc_iscale,
                texturemid,
                texheight: tex.height as i32,
                x: rw_x,
                yl,
                yh,
            };

            if let Some(tex) = self.midtexture {
                // single sided line
                column(tex, self.rw_midtexturemid, yl, yh).draw(pics, tables, ColumnStyle::Opaque, fuzz, buffer);
                portal_clip.ceilingclip[x] = tables.view_height;
                portal_clip.floorclip[x] = -1;
            } else {
                // two sided line
                if let Some(tex) = self.toptexture {
                    // top wall
                    let mut mid = (self.pixhigh >> self.heightbits) as i32;
                    self.pixhigh += self.pixhighstep;
                    if mid >= floorclip {
                        mid = floorclip - 1;
                    }
                    if mid >= yl {
                        column(tex, self.rw_toptexturemid, yl, mid)
                            .draw(pics, tables, ColumnStyle::Opaque, fuzz, buffer);
                        portal_clip.ceilingclip[x] = mid;
                    } else {
                        portal_clip.ceilingclip[x] = yl - 1;
                    }
                } else if self.markceiling {
                    // no top wall
                    portal_clip.ceilingclip[x] = yl - 1;
                }

                if let Some(tex) = self.bottomtexture {
                    // bottom wall
                    let mut mid = ((self.pixlow + self.heightunit - 1) >> self.heightbits) as i32;
                    self.pixlow += self.pixlowstep;
                    // no space above wall?
                    let ceilingclip = portal_clip.ceilingclip[x];
                    if mid <= ceilingclip {
                        mid = ceilingclip + 1;
                    }
                    if mid <= yh {
                        column(tex, self.rw_bottomtexturemid, mid, yh)
                            .draw(pics, tables, ColumnStyle::Opaque, fuzz, buffer);
                        portal_clip.floorclip[x] = mid;
                    } else {
                        portal_clip.floorclip[x] = yh + 1;
                    }
                } else if self.markfloor {
                    // no bottom wall
                    portal_clip.floorclip[x] = yh + 1;
                }

                if self.maskedtexture {
                    // save texturecol
                    //  for backdrawing of masked mid texture
                    openings[(self.maskedtexturecol + self.rw_x) as usize] = texture_column;
                }
            }

            self.rw_x += 1;
            self.rw_scale += self.rw_scalestep;
            self.topfrac += self.topstep;
            self.bottomfrac += self.bottomstep;
        }
    }
}
