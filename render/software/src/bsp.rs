use super::defs::{ClipRange, MAXDRAWSEGS, MAXVISPLANES, MAXVISSPRITES};
use super::lights::LightTables;
use super::segs::SegRender;
use super::utilities::ViewTables;
use super::{RenderData, RenderFrame};
#[cfg(feature = "hprof")]
use coarse_prof::profile;
use level::{BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP, IS_SSECTOR_MASK, MapData, MapObject, PicData, ViewPoint};
use log::{debug, trace, warn};
use math::{ANG180, Angle, Fixed, point_to_angle_2};
use render_trait::{DisplayConfig, FrameStats, PixelBuffer, PlayViewRenderer};

/// Colour used to fill the view before drawing when the flashing fill is on.
/// Anything the walls and planes miss stands out.
const HOM_COLOUR: u8 = 175;

/// Box corners to test against the view, by the position of the view relative
/// to the box. Each entry is `x1, y1, x2, y2` as indexes in to the box.
const CHECKCOORD: [[usize; 4]; 11] = [
    [BOXRIGHT, BOXTOP, BOXLEFT, BOXBOTTOM],
    [BOXRIGHT, BOXTOP, BOXLEFT, BOXTOP],
    [BOXRIGHT, BOXBOTTOM, BOXLEFT, BOXTOP],
    [0, 0, 0, 0],
    [BOXLEFT, BOXTOP, BOXLEFT, BOXBOTTOM],
    [0, 0, 0, 0],
    [BOXRIGHT, BOXBOTTOM, BOXRIGHT, BOXTOP],
    [0, 0, 0, 0],
    [BOXLEFT, BOXTOP, BOXRIGHT, BOXBOTTOM],
    [BOXLEFT, BOXBOTTOM, BOXRIGHT, BOXBOTTOM],
    [BOXLEFT, BOXBOTTOM, BOXRIGHT, BOXTOP],
];

/// The renderer. Owns the view tables for the current display config and all
/// of the per frame storage, which is kept between frames and only grows.
pub struct SoftwareRenderer {
    config: DisplayConfig,
    tables: ViewTables,
    lights: LightTables,
    pub(crate) r_data: RenderData,
    /// Highest counts seen since the view size was last set
    peaks: FrameStats,
    last_tic: Option<u32>,
}

impl SoftwareRenderer {
    pub fn new(config: DisplayConfig) -> Self {
        let tables = ViewTables::new(&config);
        let lights = LightTables::new(config.smooth_lighting, tables.full_width);
        let r_data = RenderData::new(tables.view_width as usize, tables.view_height as usize);
        Self {
            config,
            tables,
            lights,
            r_data,
            peaks: FrameStats::default(),
            last_tic: None,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Highest counts seen since the view size was last set
    pub fn peaks(&self) -> &FrameStats {
        &self.peaks
    }

    fn update_peaks(&mut self, stats: &mut FrameStats) {
        self.peaks.peak_visplanes = self.peaks.peak_visplanes.max(stats.visplanes);
        self.peaks.peak_drawsegs = self.peaks.peak_drawsegs.max(stats.segs);
        self.peaks.peak_vissprites = self.peaks.peak_vissprites.max(stats.vissprites);
        stats.peak_visplanes = self.peaks.peak_visplanes;
        stats.peak_drawsegs = self.peaks.peak_drawsegs;
        stats.peak_vissprites = self.peaks.peak_vissprites;

        if stats.visplanes > MAXVISPLANES {
            warn!("R_FindPlane: {} visplanes, over the classic limit of {MAXVISPLANES}", stats.visplanes);
        }
        if stats.segs > MAXDRAWSEGS {
            warn!("R_StoreWallRange: {} drawsegs, over the classic limit of {MAXDRAWSEGS}", stats.segs);
        }
        if stats.vissprites > MAXVISSPRITES {
            warn!("R_ProjectSprite: {} vissprites, over the classic limit of {MAXVISSPRITES}", stats.vissprites);
        }
    }
}

impl PlayViewRenderer for SoftwareRenderer {
    /// Doom function name `R_ExecuteSetViewSize`
    fn set_view_size(&mut self, config: DisplayConfig) {
        debug!(
            "Set view size: {}x{}, {:?} detail, aspect {:?}",
            config.width, config.height, config.detail, config.aspect
        );
        *self = Self::new(config);
    }

    fn render_player_view(
        &mut self,
        view: &ViewPoint,
        map: &MapData,
        things: &[MapObject],
        pic_data: &PicData,
        buffer: &mut impl PixelBuffer,
    ) -> FrameStats {
        let size = buffer.size();
        if size.width_usize() != self.config.width || size.height_usize() != self.config.height {
            debug!(
                "Buffer is {}x{}, view is {}x{}",
                size.width(),
                size.height(),
                self.config.width,
                self.config.height
            );
            self.set_view_size(DisplayConfig {
                width: size.width_usize(),
                height: size.height_usize(),
                ..self.config
            });
        }

        self.tables.set_pitch(view.pitch);
        if self.last_tic != Some(view.game_tic) {
            self.r_data.fuzz.set_pos_tic();
            self.last_tic = Some(view.game_tic);
        }

        self.r_data.clear_data(view.angle, &self.tables, map.sectors().len());
        if self.config.flashing_hom && view.game_tic & 4 == 0 {
            buffer.clear_with_colour(HOM_COLOUR);
        } else {
            buffer.clear_with_colour(0);
        }

        let frame = RenderFrame {
            view,
            map,
            things,
            pics: pic_data,
            tables: &self.tables,
            lights: &self.lights,
        };

        #[cfg(feature = "hprof")]
        profile!("render_bsp_node begin!");
        self.r_data.render_bsp_node(&frame, map.start_node(), buffer);
        trace!("BSP traversals for render: {}", self.r_data.bsp_nodes);

        #[cfg(feature = "hprof")]
        profile!("draw_planes");
        let RenderData {
            visplane_render,
            fuzz,
            ..
        } = &mut self.r_data;
        visplane_render.draw_planes(view, pic_data, &self.tables, &self.lights, fuzz, buffer);

        #[cfg(feature = "hprof")]
        profile!("draw_masked");
        self.r_data.fuzz.set_pos_draw();
        self.r_data.draw_masked(&frame, buffer);

        let mut stats = FrameStats {
            segs: self.r_data.drawsegs.len(),
            visplanes: self.r_data.visplane_render.len(),
            vissprites: self.r_data.vissprites.len(),
            bsp_nodes: self.r_data.bsp_nodes,
            sprite_columns: self.r_data.sprite_columns,
            ..FrameStats::default()
        };
        self.update_peaks(&mut stats);
        trace!("{stats:?}");
        stats
    }
}

impl RenderData {
    /// R_ClearClipSegs - r_bsp
    pub(crate) fn clear_clip_segs(&mut self) {
        self.solidsegs.clear();
        self.solidsegs.push(ClipRange {
            first: i32::MIN + 1,
            last: -1,
        });
        self.solidsegs.push(ClipRange {
            first: self.view_width,
            last: i32::MAX,
        });
    }

    /// Test a screen range against the clip angle. Returns the columns, or
    /// `None` if it is off screen or does not cross a pixel. `angle1` and
    /// `angle2` are absolute, left and right as seen from the view.
    fn clip_to_view(&self, frame: &RenderFrame, angle1: u32, angle2: u32) -> Option<(i32, i32)> {
        let view_angle = frame.view.angle.bam();
        let clipangle = frame.tables.clipangle.bam();
        let span = angle1.wrapping_sub(angle2);

        let mut angle1 = angle1.wrapping_sub(view_angle);
        let mut angle2 = angle2.wrapping_sub(view_angle);

        let mut tspan = angle1.wrapping_add(clipangle);
        if tspan > clipangle.wrapping_mul(2) {
            tspan = tspan.wrapping_sub(clipangle.wrapping_mul(2));
            // Totally off the left edge?
            if tspan >= span {
                return None;
            }
            angle1 = clipangle;
        }
        tspan = clipangle.wrapping_sub(angle2);
        if tspan > clipangle.wrapping_mul(2) {
            tspan = tspan.wrapping_sub(clipangle.wrapping_mul(2));
            // Totally off the right edge?
            if tspan >= span {
                return None;
            }
            angle2 = clipangle.wrapping_neg();
        }

        let x1 = frame.tables.angle_to_x(Angle::new(angle1));
        let x2 = frame.tables.angle_to_x(Angle::new(angle2));
        // Does not cross a pixel?
        if x1 == x2 {
            return None;
        }
        Some((x1, x2))
    }

    /// R_AddLine - r_bsp
    ///
    /// Clips the given segment and adds any visible pieces to the line list.
    fn add_line(&mut self, frame: &RenderFrame, seg_index: usize, buffer: &mut impl PixelBuffer) {
        let map = frame.map;
        let view = frame.view;
        let seg = &map.segments()[seg_index];

        // OPTIMIZE: quickly reject orthogonal back sides.
        let angle1 = point_to_angle_2(view.x, view.y, seg.v1.x, seg.v1.y).bam();
        let angle2 = point_to_angle_2(view.x, view.y, seg.v2.x, seg.v2.y).bam();

        // Clip to view edges.
        // OPTIMIZE: make constant out of 2*clipangle (FIELDOFVIEW).
        let span = angle1.wrapping_sub(angle2);
        // Back side? I.e. backface culling?
        if span >= ANG180 {
            return;
        }

        // Global angle needed by segcalc.
        self.rw_angle1 = Angle::new(angle1);

        let Some((x1, x2)) = self.clip_to_view(frame, angle1, angle2) else {
            return;
        };

        let frontsector = &map.sectors()[seg.frontsector];
        let Some(backsector) = seg.backsector.map(|b| &map.sectors()[b]) else {
            // Single sided line?
            self.clip_solid_seg(frame, x1, x2 - 1, seg_index, buffer);
            return;
        };

        // Closed door.
        if backsector.ceilingheight <= frontsector.floorheight
            || backsector.floorheight >= frontsector.ceilingheight
        {
            self.clip_solid_seg(frame, x1, x2 - 1, seg_index, buffer);
            return;
        }

        // Window.
        if backsector.ceilingheight != frontsector.ceilingheight
            || backsector.floorheight != frontsector.floorheight
        {
            self.clip_pass_seg(frame, x1, x2 - 1, seg_index, buffer);
            return;
        }

        // Reject empty lines used for triggers
        //  and special events.
        // Identical floor and ceiling on both sides,
        // identical light levels on both sides,
        // and no middle texture.
        if backsector.ceilingpic == frontsector.ceilingpic
            && backsector.floorpic == frontsector.floorpic
            && backsector.lightlevel == frontsector.lightlevel
            && map.sidedefs()[seg.sidedef].midtexture.is_none()
        {
            return;
        }

        self.clip_pass_seg(frame, x1, x2 - 1, seg_index, buffer);
    }

    /// R_ClipSolidWallSegment - r_bsp
    ///
    /// Does handle solid walls, e.g. single sided LineDefs (middle texture)
    /// that entirely block the view.
    fn clip_solid_seg(
        &mut self,
        frame: &RenderFrame,
        first: i32,
        last: i32,
        seg_index: usize,
        buffer: &mut impl PixelBuffer,
    ) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start),
                //  so insert a new clippost.
                SegRender::store_wall_range(frame, self, first, last, seg_index, buffer);
                self.solidsegs.insert(start, ClipRange { first, last });
                return;
            }

            // There is a fragment above *start.
            let stop = self.solidsegs[start].first - 1;
            SegRender::store_wall_range(frame, self, first, stop, seg_index, buffer);
            // Now adjust the clip size.
            self.solidsegs[start].first = first;
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        let mut next = start;
        while last >= self.solidsegs[next + 1].first - 1 {
            // There is a fragment between two posts.
            let from = self.solidsegs[next].last + 1;
            let to = self.solidsegs[next + 1].first - 1;
            SegRender::store_wall_range(frame, self, from, to, seg_index, buffer);
            next += 1;

            if last <= self.solidsegs[next].last {
                // Bottom is contained in next.
                // Adjust the clip size.
                self.solidsegs[start].last = self.solidsegs[next].last;
                self.crunch(start, next);
                return;
            }
        }

        // There is a fragment after *next.
        let from = self.solidsegs[next].last + 1;
        SegRender::store_wall_range(frame, self, from, last, seg_index, buffer);
        // Adjust the clip size.
        self.solidsegs[start].last = last;

        // Remove start+1 to next from the clip list,
        // because start now covers their area.
        self.crunch(start, next);
    }

    /// Ranges after `start` up to and including `next` are covered by `start`
    fn crunch(&mut self, start: usize, next: usize) {
        if next == start {
            return;
        }
        self.solidsegs.drain(start + 1..=next);
    }

    /// R_ClipPassWallSegment - r_bsp
    ///
    /// Clips the given range of columns, but does not includes it in the clip
    /// list. Does handle windows, e.g. LineDefs with upper and lower
    /// texture
    fn clip_pass_seg(
        &mut self,
        frame: &RenderFrame,
        first: i32,
        last: i32,
        seg_index: usize,
        buffer: &mut impl PixelBuffer,
    ) {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.solidsegs[start].last < first - 1 {
            start += 1;
        }

        if first < self.solidsegs[start].first {
            if last < self.solidsegs[start].first - 1 {
                // Post is entirely visible (above start).
                SegRender::store_wall_range(frame, self, first, last, seg_index, buffer);
                return;
            }

            // There is a fragment above *start.
            let stop = self.solidsegs[start].first - 1;
            SegRender::store_wall_range(frame, self, first, stop, seg_index, buffer);
        }

        // Bottom contained in start?
        if last <= self.solidsegs[start].last {
            return;
        }

        while last >= self.solidsegs[start + 1].first - 1 {
            // There is a fragment between two posts.
            let from = self.solidsegs[start].last + 1;
            let to = self.solidsegs[start + 1].first - 1;
            SegRender::store_wall_range(frame, self, from, to, seg_index, buffer);
            start += 1;

            if last <= self.solidsegs[start].last {
                return;
            }
        }

        // There is a fragment after *next.
        let from = self.solidsegs[start].last + 1;
        SegRender::store_wall_range(frame, self, from, last, seg_index, buffer);
    }

    /// R_Subsector - r_bsp
    ///
    /// Determine floor/ceiling planes, add sprites of things in sector and
    /// draw one or more line segments.
    fn draw_subsector(&mut self, frame: &RenderFrame, num: usize, buffer: &mut impl PixelBuffer) {
        #[cfg(feature = "hprof")]
        profile!("draw_subsector");
        let map = frame.map;
        let Some(sub) = map.subsectors().get(num) else {
            panic!("R_Subsector: ss {num} with numss = {}", map.subsectors().len());
        };
        let sector_index = sub.sector;
        let frontsector = &map.sectors()[sector_index];
        let viewz = frame.view.z;
        let sky_num = frame.pics.sky_num();

        self.visplane_render.floorplane = if frontsector.floorheight < viewz {
            Some(self.visplane_render.find_plane(
                frontsector.floorheight,
                frontsector.floorpic,
                frontsector.lightlevel,
                sky_num,
            ))
        } else {
            None
        };

        self.visplane_render.ceilingplane =
            if frontsector.ceilingheight > viewz || frontsector.ceilingpic == sky_num {
                Some(self.visplane_render.find_plane(
                    frontsector.ceilingheight,
                    frontsector.ceilingpic,
                    frontsector.lightlevel,
                    sky_num,
                ))
            } else {
                None
            };

        self.add_sprites(frame, sector_index);

        let first = sub.start_seg as usize;
        for seg_index in first..first + sub.seg_count as usize {
            self.add_line(frame, seg_index, buffer);
        }
    }

    /// R_RenderBSPNode - r_bsp
    ///
    /// Renders all subsectors below a given node, traversing subtree
    /// recursively. Just call with BSP root.
    pub(crate) fn render_bsp_node(&mut self, frame: &RenderFrame, bspnum: u32, buffer: &mut impl PixelBuffer) {
        self.bsp_nodes += 1;

        // Found a subsector?
        if bspnum & IS_SSECTOR_MASK != 0 {
            if bspnum == u32::MAX {
                self.draw_subsector(frame, 0, buffer);
            } else {
                self.draw_subsector(frame, (bspnum & !IS_SSECTOR_MASK) as usize, buffer);
            }
            return;
        }

        let Some(node) = frame.map.nodes().get(bspnum as usize) else {
            panic!("R_RenderBSPNode: bad node {bspnum}");
        };

        // Decide which side the view point is on.
        let side = node.point_on_side(frame.view.x, frame.view.y);

        // Recursively divide front space.
        self.render_bsp_node(frame, node.children[side], buffer);

        // Possibly divide back space.
        if self.check_bbox(frame, &node.bboxes[side ^ 1]) {
            self.render_bsp_node(frame, node.children[side ^ 1], buffer);
        }
    }

    /// R_CheckBBox - r_bsp
    ///
    /// Checks BSP node/subtree bounding box. Returns true if some part of the
    /// bbox might be visible.
    fn check_bbox(&self, frame: &RenderFrame, bspcoord: &[Fixed; 4]) -> bool {
        #[cfg(feature = "hprof")]
        profile!("check_bbox");
        let view = frame.view;

        // Find the corners of the box
        // that define the edges from current viewpoint.
        let boxx = if view.x <= bspcoord[BOXLEFT] {
            0
        } else if view.x < bspcoord[BOXRIGHT] {
            1
        } else {
            2
        };

        let boxy = if view.y >= bspcoord[BOXTOP] {
            0
        } else if view.y > bspcoord[BOXBOTTOM] {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        if boxpos == 5 {
            return true;
        }

        let [cx1, cy1, cx2, cy2] = CHECKCOORD[boxpos];
        let angle1 = point_to_angle_2(view.x, view.y, bspcoord[cx1], bspcoord[cy1]).bam();
        let angle2 = point_to_angle_2(view.x, view.y, bspcoord[cx2], bspcoord[cy2]).bam();

        // Sitting on a line?
        if angle1.wrapping_sub(angle2) >= ANG180 {
            return true;
        }

        let Some((sx1, sx2)) = self.clip_to_view(frame, angle1, angle2) else {
            return false;
        };
        let sx2 = sx2 - 1;

        // Find the first clippost
        //  that touches the source post
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.solidsegs[start].last < sx2 {
            start += 1;
        }

        // The clippost contains the new span.
        !(sx1 >= self.solidsegs[start].first && sx2 <= self.solidsegs[start].last)
    }
}
