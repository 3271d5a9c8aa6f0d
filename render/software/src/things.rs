use level::{
    Brightmap, Colourmap, FF_FRAMEMASK, FF_FULLBRIGHT, LineDefFlags, MapObjFlag, MapObject, PicColumn,
    PicData, point_on_side,
};
use math::{ANG45, FRACBITS, FRACUNIT, Fixed, point_to_angle_2};
use render_trait::PixelBuffer;

use crate::defs::{ClipArray, DrawSeg, SIL_BOTTOM, SIL_TOP, UNSET};
use crate::draw::{ColumnStyle, DrawColumn, Fuzz};
use crate::lights::LightTables;
use crate::utilities::{ORIGHEIGHT, ORIGWIDTH, ViewTables};
use crate::{RenderData, RenderFrame};

/// Things closer than this are not drawn
const MINZ: Fixed = Fixed::from_int(4);
const BASEYCENTER: i32 = ORIGHEIGHT / 2;

/// A sprite that survived projection, drawn after the walls and planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisSprite {
    pub x1: i32,
    pub x2: i32,
    // Line side calc
    pub gx: Fixed,
    pub gy: Fixed,
    // Bottom and top for clipping
    pub gz: Fixed,
    pub gzt: Fixed,
    // horizontal position of x1
    pub startfrac: Fixed,
    pub scale: Fixed,
    // negative if flipped
    pub xiscale: Fixed,
    pub texturemid: Fixed,
    /// The index in to sprite patches
    pub patch: usize,
    /// Colourmap index, unused for fuzz
    pub colourmap: usize,
    pub style: ColumnStyle,
}

/// Column drawing shared by sprites and masked mid textures
struct MaskedDraw<'a> {
    sprtopscreen: i64,
    spryscale: Fixed,
    iscale: Fixed,
    texturemid: Fixed,
    colourmap: &'a Colourmap,
    brightmap: Option<&'a Brightmap>,
    style: ColumnStyle,
}

impl MaskedDraw<'_> {
    /// Draw the posts of one column between the clips, true if any pixel
    /// was written.
    ///
    /// Doom function name `R_DrawMaskedColumn`
    #[allow(clippy::too_many_arguments)]
    fn draw_column(
        &self,
        column: &PicColumn,
        x: i32,
        mfloorclip: i32,
        mceilingclip: i32,
        pics: &PicData,
        tables: &ViewTables,
        fuzz: &mut Fuzz,
        buffer: &mut impl PixelBuffer,
    ) -> bool {
        let mut drawn = false;
        let spryscale = self.spryscale.raw() as i64;
        for post in column.posts.iter() {
            // calculate unclipped screen coordinates
            //  for post
            let topscreen = self.sprtopscreen + spryscale * post.top as i64;
            let bottomscreen = topscreen + spryscale * post.length as i64;

            let mut yl = ((topscreen + FRACUNIT as i64 - 1) >> FRACBITS) as i32;
            let mut yh = ((bottomscreen - 1) >> FRACBITS) as i32;

            if yh >= mfloorclip {
                yh = mfloorclip - 1;
            }
            if yl <= mceilingclip {
                yl = mceilingclip + 1;
            }

            if yl <= yh {
                DrawColumn {
                    source: &column.pixels,
                    colourmap: self.colourmap,
                    brightmap: self.brightmap,
                    iscale: self.iscale,
                    texturemid: self.texturemid,
                    texheight: 0,
                    x,
                    yl,
                    yh,
                }
                .draw(pics, tables, self.style, fuzz, buffer);
                drawn = true;
            }
        }
        drawn
    }
}

/// Pick the column style from the thing flags
fn thing_style(thing: &MapObject) -> ColumnStyle {
    if thing.has_flag(MapObjFlag::Shadow) {
        return ColumnStyle::Fuzz;
    }
    let translucent = thing.has_flag(MapObjFlag::Translucent);
    match (thing.translation(), translucent) {
        (0, false) => ColumnStyle::Opaque,
        (0, true) => ColumnStyle::Translucent,
        (t, false) => ColumnStyle::Translated(t - 1),
        (t, true) => ColumnStyle::TranslatedTranslucent(t - 1),
    }
}

impl RenderData {
    /// During BSP traversal, this adds sprites by sector. Each sector is only
    /// checked once, however many subsectors it is split in to.
    ///
    /// Doom function name `R_AddSprites`
    pub(crate) fn add_sprites(&mut self, frame: &RenderFrame, sector_index: usize) {
        if self.checked_sectors[sector_index] {
            return;
        }
        self.checked_sectors[sector_index] = true;

        let sector = &frame.map.sectors()[sector_index];
        let light_level = LightTables::light_level(sector.lightlevel, frame.view.extralight);
        for thing in frame.things.iter().filter(|t| t.sector == sector_index) {
            self.project_sprite(frame, thing, light_level);
        }
    }

    /// Generates a vissprite for a thing if it might be visible.
    ///
    /// Doom function name `R_ProjectSprite`
    fn project_sprite(&mut self, frame: &RenderFrame, thing: &MapObject, light_level: usize) {
        let view = frame.view;
        let tables = frame.tables;
        let view_cos = view.angle.cos();
        let view_sin = view.angle.sin();

        // transform the origin point
        let tr_x = thing.x - view.x;
        let tr_y = thing.y - view.y;
        let gxt = tr_x * view_cos;
        let gyt = -(tr_y * view_sin);
        let tz = gxt - gyt;

        // thing is behind view plane?
        if tz < MINZ {
            return;
        }
        let xscale = tables.projection / tz;

        let gxt = -(tr_x * view_sin);
        let gyt = tr_y * view_cos;
        let mut tx = -(gyt + gxt);

        // too far off the side?
        if tx.abs() > tz.shl(2) {
            return;
        }

        // decide which patch to use for sprite relative to player
        let def = frame.pics.sprite_def(thing.sprite);
        let frame_num = (thing.frame & FF_FRAMEMASK) as usize;
        let sprframe = match def.frames.get(frame_num) {
            Some(f) => f,
            None => panic!("R_ProjectSprite: invalid sprite frame {} : {}", def.name, frame_num),
        };
        let rot = if sprframe.rotate {
            // choose a different rotation based on player view
            let ang = point_to_angle_2(view.x, view.y, thing.x, thing.y);
            ((ang - thing.angle).bam().wrapping_add((ANG45 / 2).wrapping_mul(9)) >> 29) as usize
        } else {
            // use single rotation for all views
            0
        };
        let patch = match sprframe.lump[rot] {
            Some(p) => p,
            None => panic!("R_ProjectSprite: {} frame {} has no rotation {}", def.name, frame_num, rot),
        };
        let flip = sprframe.flip[rot];
        let pic = frame.pics.sprite_patch(patch);

        // calculate edges of the shape
        tx -= Fixed::from_int(pic.left_offset);
        let x1 = (tables.centerxfrac + tx * xscale).raw() >> FRACBITS;
        // off the right side?
        if x1 >= tables.view_width {
            return;
        }
        tx += Fixed::from_int(pic.width as i32);
        let x2 = ((tables.centerxfrac + tx * xscale).raw() >> FRACBITS) - 1;
        // off the left side
        if x2 < 0 {
            return;
        }

        let gzt = thing.z + Fixed::from_int(pic.top_offset);
        let scale = (tables.yprojection / tz).shl(tables.detail_shift);
        // entirely above or below the view?
        let top = tables.centeryfrac.raw() as i64 - (((gzt - view.z).raw() as i64 * scale.raw() as i64) >> FRACBITS);
        let bottom = top + pic.height as i64 * scale.raw() as i64;
        if bottom <= 0 || top >> FRACBITS >= tables.view_height as i64 {
            return;
        }

        // store information in a vissprite
        let iscale = Fixed::UNIT / xscale;
        let mut vis = VisSprite {
            x1: x1.max(0),
            x2: x2.min(tables.view_width - 1),
            gx: thing.x,
            gy: thing.y,
            gz: thing.z,
            gzt,
            startfrac: Fixed::ZERO,
            scale,
            xiscale: iscale,
            texturemid: gzt - view.z,
            patch,
            colourmap: 0,
            style: thing_style(thing),
        };
        if flip {
            vis.startfrac = Fixed::from_int(pic.width as i32) - Fixed::new(1);
            vis.xiscale = -iscale;
        }
        if vis.x1 > x1 {
            vis.startfrac += vis.xiscale * (vis.x1 - x1);
        }

        vis.colourmap = if let Some(fixed) = view.fixed_colormap {
            // fixed map
            fixed
        } else if thing.frame & FF_FULLBRIGHT != 0 {
            // full bright
            0
        } else {
            // diminished light
            frame.lights.scale_light(light_level, xscale.shl(tables.detail_shift))
        };

        self.vissprites.push(vis);
    }

    /// Doom function name `R_DrawVisSprite`
    fn draw_vissprite(
        &mut self,
        frame: &RenderFrame,
        vis: &VisSprite,
        clipbot: &[i32],
        cliptop: &[i32],
        buffer: &mut impl PixelBuffer,
    ) {
        let tables = frame.tables;
        let pic = frame.pics.sprite_patch(vis.patch);
        let spryscale = vis.scale;
        let draw = MaskedDraw {
            sprtopscreen: tables.centeryfrac.raw() as i64 - ((vis.texturemid.raw() as i64 * spryscale.raw() as i64) >> FRACBITS),
            spryscale,
            iscale: Fixed::UNIT / spryscale,
            texturemid: vis.texturemid,
            colourmap: frame.pics.colourmap(vis.colourmap),
            brightmap: None,
            style: vis.style,
        };

        let mut frac = vis.startfrac;
        for x in vis.x1..=vis.x2 {
            let texturecolumn = frac.raw() >> FRACBITS;
            frac += vis.xiscale;
            if texturecolumn < 0 || texturecolumn >= pic.width as i32 {
                panic!("R_DrawVisSprite: bad texturecolumn {texturecolumn} for patch {}", vis.patch);
            }
            let clip = (x - vis.x1) as usize;
            if draw.draw_column(
                &pic.columns[texturecolumn as usize],
                x,
                clipbot[clip],
                cliptop[clip],
                frame.pics,
                tables,
                &mut self.fuzz,
                buffer,
            ) {
                self.sprite_columns += 1;
            }
        }
    }

    /// Clip a sprite against the walls in front of it, drawing any masked
    /// textures that are behind it first.
    ///
    /// Doom function name `R_DrawSprite`
    fn draw_sprite(&mut self, frame: &RenderFrame, spr: &VisSprite, buffer: &mut impl PixelBuffer) {
        let width = (spr.x2 - spr.x1 + 1).max(0) as usize;
        let mut clipbot = std::mem::take(&mut self.sprite_clipbot);
        let mut cliptop = std::mem::take(&mut self.sprite_cliptop);
        clipbot.clear();
        clipbot.resize(width, -2);
        cliptop.clear();
        cliptop.resize(width, -2);
        let segs = frame.map.segments();

        // Scan drawsegs from end to start for obscuring segs.
        // The first drawseg that has a greater scale
        //  is the clip seg.
        for index in (0..self.drawsegs.len()).rev() {
            let ds = self.drawsegs[index];
            // determine if the drawseg obscures the sprite
            if ds.x1 > spr.x2 || ds.x2 < spr.x1 || (ds.silhouette == 0 && ds.maskedtexturecol.is_none()) {
                // does not cover sprite
                continue;
            }

            let r1 = ds.x1.max(spr.x1);
            let r2 = ds.x2.min(spr.x2);

            let (lowscale, scale) = if ds.scale1 > ds.scale2 {
                (ds.scale2, ds.scale1)
            } else {
                (ds.scale1, ds.scale2)
            };

            let seg = &segs[ds.curline];
            if scale < spr.scale
                || (lowscale < spr.scale
                    && point_on_side(spr.gx, spr.gy, seg.v1.x, seg.v1.y, seg.v2.x - seg.v1.x, seg.v2.y - seg.v1.y) == 0)
            {
                // masked mid texture?
                if ds.maskedtexturecol.is_some() {
                    self.render_masked_seg_range(frame, &ds, r1, r2, buffer);
                }
                // seg is behind sprite
                continue;
            }

            // clip this piece of the sprite
            let mut silhouette = ds.silhouette;
            if spr.gz >= ds.bsilheight {
                silhouette &= !SIL_BOTTOM;
            }
            if spr.gzt <= ds.tsilheight {
                silhouette &= !SIL_TOP;
            }

            for x in r1..=r2 {
                let i = (x - spr.x1) as usize;
                if silhouette & SIL_BOTTOM != 0 && clipbot[i] == -2 {
                    if let Some(clip) = ds.sprbottomclip {
                        clipbot[i] = clip.get(&self.openings, x);
                    }
                }
                if silhouette & SIL_TOP != 0 && cliptop[i] == -2 {
                    if let Some(clip) = ds.sprtopclip {
                        cliptop[i] = clip.get(&self.openings, x);
                    }
                }
            }
        }

        // all clipping has been performed, so draw the sprite
        // check for unclipped columns
        for (bot, top) in clipbot.iter_mut().zip(cliptop.iter_mut()) {
            if *bot == -2 {
                *bot = frame.tables.view_height;
            }
            if *top == -2 {
                *top = -1;
            }
        }

        self.draw_vissprite(frame, spr, &clipbot, &cliptop, buffer);
        self.sprite_clipbot = clipbot;
        self.sprite_cliptop = cliptop;
    }

    /// Draw the masked mid texture of a two sided line for `x1..=x2`. Each
    /// column is only drawn once, later calls skip it.
    ///
    /// Doom function name `R_RenderMaskedSegRange`
    pub(crate) fn render_masked_seg_range(
        &mut self,
        frame: &RenderFrame,
        ds: &DrawSeg,
        x1: i32,
        x2: i32,
        buffer: &mut impl PixelBuffer,
    ) {
        let Some(maskedtexturecol) = ds.maskedtexturecol else {
            return;
        };
        let map = frame.map;
        let pics = frame.pics;
        let tables = frame.tables;
        let view = frame.view;
        let seg = &map.segments()[ds.curline];
        let sidedef = &map.sidedefs()[seg.sidedef];
        let linedef = &map.linedefs()[seg.linedef];
        let frontsector = &map.sectors()[seg.frontsector];
        let Some(backsector) = seg.backsector.map(|b| &map.sectors()[b]) else {
            return;
        };
        let Some(texnum) = sidedef.midtexture else {
            return;
        };
        let texture = pics.get_texture(texnum);
        let texheight = Fixed::from_int(texture.height as i32);

        let lightnum = LightTables::wall_light_level(frontsector.lightlevel, view.extralight, &seg.v1, &seg.v2);
        let rw_scalestep = ds.scalestep;
        let mut spryscale = ds.scale1 + rw_scalestep * (x1 - ds.x1);
        let mfloorclip = ds.sprbottomclip.unwrap_or(ClipArray::Constant(tables.view_height));
        let mceilingclip = ds.sprtopclip.unwrap_or(ClipArray::Constant(-1));

        // find positioning
        let mut texturemid = if linedef.flags & LineDefFlags::UnpegBottom as u32 != 0 {
            frontsector.floorheight.max(backsector.floorheight) + texheight - view.z
        } else {
            frontsector.ceilingheight.min(backsector.ceilingheight) - view.z
        };
        texturemid += sidedef.rowoffset;

        let brightmap = match view.fixed_colormap {
            None => texture.brightmap.map(|b| pics.brightmap(b)),
            Some(_) => None,
        };

        // draw the columns
        for x in x1..=x2 {
            let col_index = (maskedtexturecol + x) as usize;
            let texturecolumn = self.openings[col_index];
            // calculate lighting
            if texturecolumn != UNSET {
                let colourmap = match view.fixed_colormap {
                    Some(fixed) => pics.colourmap(fixed),
                    None => pics.colourmap(frame.lights.scale_light(lightnum, spryscale)),
                };

                let scale = spryscale.raw() as i64;
                let t = ((tables.centeryfrac.raw() as i64) << FRACBITS) - texturemid.raw() as i64 * scale;
                // skip if the texture is out of the views range
                if t + texheight.raw() as i64 * scale >= 0 && t <= (tables.view_height as i64) << (FRACBITS * 2) {
                    let draw = MaskedDraw {
                        sprtopscreen: t >> FRACBITS,
                        spryscale,
                        iscale: Fixed::new((0xffff_ffffu32 / spryscale.raw().max(1) as u32) as i32),
                        texturemid,
                        colourmap,
                        brightmap,
                        style: ColumnStyle::Opaque,
                    };
                    draw.draw_column(
                        texture.column(texturecolumn),
                        x,
                        mfloorclip.get(&self.openings, x),
                        mceilingclip.get(&self.openings, x),
                        pics,
                        tables,
                        &mut self.fuzz,
                        buffer,
                    );
                    self.openings[col_index] = UNSET;
                }
            }
            spryscale += rw_scalestep;
        }
    }

    /// Doom function name `R_DrawPSprite`
    fn draw_player_sprite(
        &mut self,
        frame: &RenderFrame,
        psp: &level::PspDef,
        light_level: usize,
        clipbot: &[i32],
        cliptop: &[i32],
        buffer: &mut impl PixelBuffer,
    ) {
        let tables = frame.tables;
        let view = frame.view;

        // decide which patch to use
        let def = frame.pics.sprite_def(psp.sprite);
        let frame_num = (psp.frame & FF_FRAMEMASK) as usize;
        let sprframe = match def.frames.get(frame_num) {
            Some(f) => f,
            None => panic!("R_DrawPSprite: invalid sprite frame {} : {}", def.name, frame_num),
        };
        let patch = match sprframe.lump[0] {
            Some(p) => p,
            None => panic!("R_DrawPSprite: {} frame {} has no patch", def.name, frame_num),
        };
        let flip = sprframe.flip[0];
        let pic = frame.pics.sprite_patch(patch);

        // calculate edges of the shape
        let mut tx = psp.sx - Fixed::from_int(ORIGWIDTH / 2);
        tx -= Fixed::from_int(pic.left_offset);
        let x1 = (tables.centerxfrac + tx * tables.pspritescale).raw() >> FRACBITS;
        // off the right side
        if x1 >= tables.view_width {
            return;
        }
        tx += Fixed::from_int(pic.width as i32);
        let x2 = ((tables.centerxfrac + tx * tables.pspritescale).raw() >> FRACBITS) - 1;
        // off the left side
        if x2 < 0 {
            return;
        }

        // store information in a vissprite
        let mut texturemid = Fixed::from_int(BASEYCENTER) + Fixed::new(FRACUNIT / 4)
            - (psp.sy - Fixed::from_int(pic.top_offset));
        // follow the horizon when looking up or down
        texturemid += Fixed::from_int(tables.centery - tables.view_height / 2) / tables.pspritescale;

        let mut vis = VisSprite {
            x1: x1.max(0),
            x2: x2.min(tables.view_width - 1),
            gx: Fixed::ZERO,
            gy: Fixed::ZERO,
            gz: Fixed::ZERO,
            gzt: Fixed::ZERO,
            startfrac: Fixed::ZERO,
            scale: tables.pspritescale.shl(tables.detail_shift),
            xiscale: tables.pspriteiscale,
            texturemid,
            patch,
            colourmap: 0,
            style: ColumnStyle::Opaque,
        };
        if flip {
            vis.xiscale = -tables.pspriteiscale;
            vis.startfrac = Fixed::from_int(pic.width as i32) - Fixed::new(1);
        }
        if vis.x1 > x1 {
            vis.startfrac += vis.xiscale * (vis.x1 - x1);
        }

        if view.shadow {
            // shadow draw
            vis.style = ColumnStyle::Fuzz;
        } else if let Some(fixed) = view.fixed_colormap {
            // fixed color
            vis.colourmap = fixed;
        } else if psp.frame & FF_FULLBRIGHT != 0 {
            // full bright
            vis.colourmap = 0;
        } else {
            // local light
            vis.colourmap = frame.lights.nearest_light(light_level);
        }

        let offset = vis.x1 as usize;
        self.draw_vissprite(frame, &vis, &clipbot[offset..], &cliptop[offset..], buffer);
    }

    /// Doom function name `R_DrawPlayerSprites`
    fn draw_player_sprites(&mut self, frame: &RenderFrame, buffer: &mut impl PixelBuffer) {
        let view = frame.view;
        if view.psprites.is_empty() {
            return;
        }
        // get light level
        let map = frame.map;
        let sector = &map.sectors()[map.subsectors()[map.point_in_subsector(view.x, view.y)].sector];
        let light_level = LightTables::light_level(sector.lightlevel, view.extralight);

        // clip to screen bounds
        let width = frame.tables.view_width as usize;
        let mut clipbot = std::mem::take(&mut self.sprite_clipbot);
        let mut cliptop = std::mem::take(&mut self.sprite_cliptop);
        clipbot.clear();
        clipbot.resize(width, frame.tables.view_height);
        cliptop.clear();
        cliptop.resize(width, -1);

        // add all active psprites
        for psp in view.psprites.iter() {
            self.draw_player_sprite(frame, psp, light_level, &clipbot, &cliptop, buffer);
        }
        self.sprite_clipbot = clipbot;
        self.sprite_cliptop = cliptop;
    }

    /// Sprites back to front, then the masked textures that no sprite
    /// needed, then the weapon on top.
    ///
    /// Doom function name `R_DrawMasked`
    pub(crate) fn draw_masked(&mut self, frame: &RenderFrame, buffer: &mut impl PixelBuffer) {
        // Stable, equal scales keep the order they were found in
        self.vissprites.sort_by_key(|v| v.scale);

        let vissprites = std::mem::take(&mut self.vissprites);
        for spr in vissprites.iter() {
            self.draw_sprite(frame, spr, buffer);
        }
        self.vissprites = vissprites;

        // render any remaining masked mid textures
        for index in (0..self.drawsegs.len()).rev() {
            let ds = self.drawsegs[index];
            if ds.maskedtexturecol.is_some() {
                self.render_masked_seg_range(frame, &ds, ds.x1, ds.x2, buffer);
            }
        }

        // draw the psprites on top of everything
        self.draw_player_sprites(frame, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use level::{MF_TRANSSHIFT, prefab};
    use render_trait::{DisplayConfig, IndexedBuffer};

    fn thing(flags: u32) -> MapObject {
        let mut t = MapObject::new(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO, 0, 0);
        t.flags = flags;
        t
    }

    #[test]
    fn styles_from_flags() {
        assert_eq!(thing_style(&thing(0)), ColumnStyle::Opaque);
        assert_eq!(thing_style(&thing(MapObjFlag::Shadow as u32)), ColumnStyle::Fuzz);
        assert_eq!(
            thing_style(&thing(MapObjFlag::Translucent as u32)),
            ColumnStyle::Translucent
        );
        assert_eq!(thing_style(&thing(2 << MF_TRANSSHIFT)), ColumnStyle::Translated(1));
        assert_eq!(
            thing_style(&thing(1 << MF_TRANSSHIFT | MapObjFlag::Translucent as u32)),
            ColumnStyle::TranslatedTranslucent(0)
        );
        // Shadow wins over everything
        assert_eq!(
            thing_style(&thing(3 << MF_TRANSSHIFT | MapObjFlag::Shadow as u32)),
            ColumnStyle::Fuzz
        );
    }

    #[test]
    fn sort_is_stable_by_scale() {
        let vis = |scale: i32, patch: usize| VisSprite {
            x1: 0,
            x2: 0,
            gx: Fixed::ZERO,
            gy: Fixed::ZERO,
            gz: Fixed::ZERO,
            gzt: Fixed::ZERO,
            startfrac: Fixed::ZERO,
            scale: Fixed::new(scale),
            xiscale: Fixed::UNIT,
            texturemid: Fixed::ZERO,
            patch,
            colourmap: 0,
            style: ColumnStyle::Opaque,
        };
        let mut sprites = vec![vis(300, 0), vis(100, 1), vis(300, 2), vis(100, 3)];
        sprites.sort_by_key(|v| v.scale);
        let order: Vec<usize> = sprites.iter().map(|v| v.patch).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    #[should_panic(expected = "bad texturecolumn")]
    fn texture_column_past_patch_is_fatal() {
        let room = prefab::pillar_room().unwrap();
        let tables = ViewTables::new(&DisplayConfig::default());
        let lights = LightTables::new(false, tables.full_width);
        let mut r_data = RenderData::new(320, 200);
        r_data.clear_data(room.view.angle, &tables, room.map.sectors().len());
        let frame = RenderFrame {
            view: &room.view,
            map: &room.map,
            things: &room.things,
            pics: &room.pics,
            tables: &tables,
            lights: &lights,
        };
        let vis = VisSprite {
            x1: 10,
            x2: 20,
            gx: Fixed::ZERO,
            gy: Fixed::ZERO,
            gz: Fixed::ZERO,
            gzt: Fixed::ZERO,
            startfrac: Fixed::from_int(5000),
            scale: Fixed::UNIT,
            xiscale: Fixed::UNIT,
            texturemid: Fixed::ZERO,
            patch: 0,
            colourmap: 0,
            style: ColumnStyle::Opaque,
        };
        let mut buffer = IndexedBuffer::new(320, 200);
        r_data.draw_vissprite(&frame, &vis, &[200; 11], &[-1; 11], &mut buffer);
    }
}
