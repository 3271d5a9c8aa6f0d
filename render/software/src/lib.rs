//! A classic 2.5D software renderer in 16.16 fixed point. The BSP is walked
//! front to back, walls are clipped to screen columns, floors and ceilings are
//! collected in to visplanes and drawn as spans, then sprites and masked
//! textures are drawn back to front.

use self::{
    defs::{ClipRange, DrawSeg, MAXDRAWSEGS, MAXVISSPRITES},
    draw::Fuzz,
    lights::LightTables,
    planes::VisPlaneRender,
    portals::PortalClip,
    segs::Wiggle,
    things::VisSprite,
    utilities::ViewTables,
};
use level::{MapData, MapObject, PicData, ViewPoint};
use math::Angle;

mod bsp;
mod defs;
mod draw;
mod lights;
mod planes;
mod portals;
mod segs;
mod things;
mod utilities;

#[cfg(test)]
mod tests;

pub use bsp::SoftwareRenderer;

/// Everything that is read but never written while drawing one frame
pub(crate) struct RenderFrame<'a> {
    pub view: &'a ViewPoint,
    pub map: &'a MapData,
    pub things: &'a [MapObject],
    pub pics: &'a PicData,
    pub tables: &'a ViewTables,
    pub lights: &'a LightTables,
}

/// We store most of what is needed for rendering in various functions here to
/// avoid having to pass too many things in args through multiple function
/// calls. This is due to the Doom C relying a fair bit on global state.
///
/// `RenderData` will be passed to the sprite drawer/clipper to use `drawsegs`
/// ----------------------------------------------------------------------------
/// - R_DrawSprite, r_things.c
/// - R_DrawMasked, r_things.c
/// - R_StoreWallRange, r_segs.c, pushes one entry to `drawsegs` per call
/// - R_DrawPlanes, r_plane.c
pub(crate) struct RenderData {
    pub rw_angle1: Angle,
    pub drawsegs: Vec<DrawSeg>,
    /// Clip and texture column storage for drawsegs, indexed through the
    /// offsets kept in each `DrawSeg`
    pub openings: Vec<i32>,
    pub portal_clip: PortalClip,
    pub visplane_render: VisPlaneRender,
    /// Ranges of fully drawn columns, with a sentinel at each end
    pub solidsegs: Vec<ClipRange>,
    pub vissprites: Vec<VisSprite>,
    /// Per column sprite clips, reused for each sprite
    pub sprite_clipbot: Vec<i32>,
    pub sprite_cliptop: Vec<i32>,
    /// Used for checking if a sector has been worked on when iterating over
    pub checked_sectors: Vec<bool>,
    pub wiggle: Wiggle,
    pub fuzz: Fuzz,
    pub bsp_nodes: usize,
    pub sprite_columns: usize,
    view_width: i32,
}

impl RenderData {
    pub(crate) fn new(view_width: usize, view_height: usize) -> Self {
        Self {
            rw_angle1: Angle::default(),
            drawsegs: Vec::with_capacity(MAXDRAWSEGS),
            openings: Vec::with_capacity(view_width * 64),
            portal_clip: PortalClip::new(view_width, view_height),
            visplane_render: VisPlaneRender::new(view_width, view_height),
            solidsegs: Vec::with_capacity(32),
            vissprites: Vec::with_capacity(MAXVISSPRITES),
            sprite_clipbot: Vec::with_capacity(view_width),
            sprite_cliptop: Vec::with_capacity(view_width),
            checked_sectors: Vec::new(),
            wiggle: Wiggle::default(),
            fuzz: Fuzz::default(),
            bsp_nodes: 0,
            sprite_columns: 0,
            view_width: view_width as i32,
        }
    }

    /// Reset everything for a new frame. Storage is kept.
    pub(crate) fn clear_data(&mut self, view_angle: Angle, tables: &ViewTables, sector_count: usize) {
        self.portal_clip.clear();
        self.drawsegs.clear();
        self.openings.clear();
        self.rw_angle1 = Angle::default();
        self.visplane_render.clear_planes(view_angle, tables);
        self.clear_clip_segs();
        self.vissprites.clear();
        self.checked_sectors.clear();
        self.checked_sectors.resize(sector_count, false);
        self.bsp_nodes = 0;
        self.sprite_columns = 0;
    }
}
