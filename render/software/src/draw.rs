//! The inner loops. Every pixel of the 3D view is written by either
//! `DrawColumn::draw` or `DrawSpan::draw`.

use level::{Brightmap, Colourmap, FlatPic, PicData};
use math::{FRACBITS, Fixed};
use render_trait::PixelBuffer;

use crate::lights::FUZZ_COLOURMAP;
use crate::utilities::ViewTables;

pub const FUZZTABLE: usize = 50;

/// Row offsets for the shadow effect, one is taken per pixel drawn
const FUZZOFFSET: [i32; FUZZTABLE] = [
    1, -1, 1, -1, 1, 1, -1, 1, 1, -1, 1, 1, 1, -1, 1, 1, 1, -1, -1, -1, -1, 1, -1, -1, 1, 1, 1, 1, -1,
    1, -1, 1, 1, -1, -1, 1, 1, -1, -1, -1, -1, 1, 1, 1, 1, -1, 1, 1, -1, 1,
];

/// How the source pixels are combined with the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStyle {
    Opaque,
    /// Player colours, index to `PicData::translation`
    Translated(usize),
    /// Blended with the frame through the tint map
    Translucent,
    TranslatedTranslucent(usize),
    /// The shadow effect, darkens what is already drawn
    Fuzz,
}

/// Position in the fuzz table. The table position is saved once per game tic
/// and put back before things are drawn, so a paused game does not shimmer.
///
/// Doom function names `R_SetFuzzPosTic` and `R_SetFuzzPosDraw`
#[derive(Debug, Default, Clone)]
pub struct Fuzz {
    pos: usize,
    pos_tic: usize,
}

impl Fuzz {
    pub fn set_pos_tic(&mut self) {
        self.pos_tic = self.pos;
    }

    pub fn set_pos_draw(&mut self) {
        self.pos = self.pos_tic;
    }

    #[inline]
    fn next(&mut self) -> i32 {
        let offset = FUZZOFFSET[self.pos];
        self.pos = (self.pos + 1) % FUZZTABLE;
        offset
    }
}

/// Look up a lit colour, brightmapped pixels ignore the light
#[inline(always)]
fn shade(colourmap: &Colourmap, brightmap: Option<&Brightmap>, bright: &Colourmap, src: u8) -> u8 {
    match brightmap {
        Some(b) if b.lit[src as usize] => bright[src as usize],
        _ => colourmap[src as usize],
    }
}

/// Write one view pixel, doubled horizontally in low detail
#[inline(always)]
fn put(tables: &ViewTables, buffer: &mut impl PixelBuffer, x: i32, y: i32, colour: u8) {
    if tables.detail_shift == 0 {
        buffer.set_pixel(x as usize, y as usize, colour);
    } else {
        let x = (x << 1) as usize;
        buffer.set_pixel(x, y as usize, colour);
        buffer.set_pixel(x + 1, y as usize, colour);
    }
}

#[inline(always)]
fn get(tables: &ViewTables, buffer: &impl PixelBuffer, x: i32, y: i32) -> u8 {
    buffer.read_pixel((x << tables.detail_shift) as usize, y as usize)
}

/// A column is a vertical slice/span from a wall texture that,
///  given the DOOM style restrictions on the view orientation,
///  will always have constant z depth.
/// Thus a special case loop for very fast rendering can
///  be used. It has also been used with Wolfenstein 3D.
pub struct DrawColumn<'a> {
    /// The full height column of the picture
    pub source: &'a [u8],
    pub colourmap: &'a Colourmap,
    pub brightmap: Option<&'a Brightmap>,
    pub iscale: Fixed,
    pub texturemid: Fixed,
    /// Height the texture repeats at, `0` for sprites and masked textures
    /// which are clamped to the source instead
    pub texheight: i32,
    pub x: i32,
    pub yl: i32,
    pub yh: i32,
}

impl<'a> DrawColumn<'a> {
    /// Doom function names `R_DrawColumn`, `R_DrawColumnLow`,
    /// `R_DrawTranslatedColumn`, `R_DrawTLColumn` and `R_DrawFuzzColumn`
    pub fn draw(
        &self,
        pics: &PicData,
        tables: &ViewTables,
        style: ColumnStyle,
        fuzz: &mut Fuzz,
        buffer: &mut impl PixelBuffer,
    ) {
        let yl = self.yl.max(0);
        let yh = self.yh.min(tables.view_height - 1);
        if self.x < 0 || self.x >= tables.view_width {
            return;
        }

        if style == ColumnStyle::Fuzz {
            self.draw_fuzz(pics, tables, fuzz, buffer);
            return;
        }
        if yh < yl || self.source.is_empty() {
            return;
        }

        let bright = pics.colourmap(0);
        let translation = match style {
            ColumnStyle::Translated(t) | ColumnStyle::TranslatedTranslucent(t) => {
                Some(pics.translation(t))
            }
            _ => None,
        };
        let tint = match style {
            ColumnStyle::Translucent | ColumnStyle::TranslatedTranslucent(_) => pics.tintmap(),
            _ => None,
        };

        let len = self.source.len() as i32;
        let mask = self.texheight - 1;
        let pow2 = self.texheight > 0 && self.texheight & mask == 0;

        // Inner loop that does the actual texture mapping,
        //  e.g. a DDA-like scaling.
        let mut frac = self.texturemid + self.iscale * (yl - tables.centery);
        for y in yl..=yh {
            let row = frac.raw() >> FRACBITS;
            let index = if pow2 {
                row & mask
            } else if self.texheight > 0 {
                row.rem_euclid(self.texheight)
            } else {
                row.clamp(0, len - 1)
            };
            let mut src = self.source[index.min(len - 1) as usize];
            if let Some(t) = translation {
                src = t[src as usize];
            }
            let mut colour = shade(self.colourmap, self.brightmap, bright, src);
            if let Some(tint) = tint {
                let bg = get(tables, buffer, self.x, y);
                colour = tint[((colour as usize) << 8) | bg as usize];
            }
            put(tables, buffer, self.x, y, colour);
            frac += self.iscale;
        }
    }

    /// Framebuffer postprocessing.
    /// Creates a fuzzy image by copying pixels
    ///  from adjacent ones to left and right.
    /// Used with an all black colormap, this
    ///  could create the SHADOW effect,
    ///  i.e. spectres and invisible players.
    fn draw_fuzz(
        &self,
        pics: &PicData,
        tables: &ViewTables,
        fuzz: &mut Fuzz,
        buffer: &mut impl PixelBuffer,
    ) {
        // Adjust borders. Low...
        let yl = self.yl.max(1);
        // .. and high.
        let yh = self.yh.min(tables.view_height - 2);
        if yh < yl {
            return;
        }
        let darken = pics.colourmap(FUZZ_COLOURMAP);
        for y in yl..=yh {
            let bg = get(tables, buffer, self.x, y + fuzz.next());
            put(tables, buffer, self.x, y, darken[bg as usize]);
        }
    }
}

/// A horizontal run of a floor or ceiling at one distance
pub struct DrawSpan<'a> {
    pub flat: &'a FlatPic,
    pub colourmap: &'a Colourmap,
    pub brightmap: Option<&'a Brightmap>,
    pub xfrac: Fixed,
    pub yfrac: Fixed,
    pub xstep: Fixed,
    pub ystep: Fixed,
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
}

impl<'a> DrawSpan<'a> {
    /// Doom function names `R_DrawSpan` and `R_DrawSpanLow`
    pub fn draw(&self, pics: &PicData, tables: &ViewTables, buffer: &mut impl PixelBuffer) {
        if self.y < 0 || self.y >= tables.view_height {
            return;
        }
        let x1 = self.x1.max(0);
        let x2 = self.x2.min(tables.view_width - 1);
        let bright = pics.colourmap(0);

        let mut xfrac = self.xfrac + self.xstep * (x1 - self.x1);
        let mut yfrac = self.yfrac + self.ystep * (x1 - self.x1);
        for x in x1..=x2 {
            // Current texture index in u,v.
            let spot = (((yfrac.raw() >> FRACBITS) & 63) * 64 + ((xfrac.raw() >> FRACBITS) & 63))
                as usize;
            let src = self.flat.data[spot];
            put(tables, buffer, x, self.y, shade(self.colourmap, self.brightmap, bright, src));
            xfrac += self.xstep;
            yfrac += self.ystep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use level::prefab;
    use render_trait::{Detail, DisplayConfig, IndexedBuffer};

    fn setup(detail: Detail) -> (PicData, ViewTables, IndexedBuffer) {
        let pics = PicData::new(prefab::colourmaps(), None).unwrap();
        let tables = ViewTables::new(&DisplayConfig {
            width: 64,
            height: 40,
            detail,
            ..DisplayConfig::default()
        });
        (pics, tables, IndexedBuffer::new(64, 40))
    }

    fn column<'a>(source: &'a [u8], colourmap: &'a Colourmap, texheight: i32) -> DrawColumn<'a> {
        DrawColumn {
            source,
            colourmap,
            brightmap: None,
            iscale: Fixed::UNIT,
            texturemid: Fixed::ZERO,
            texheight,
            x: 3,
            yl: 20,
            yh: 23,
        }
    }

    #[test]
    fn opaque_column_steps_through_the_source() {
        let (pics, tables, mut buf) = setup(Detail::High);
        let source: Vec<u8> = (0..8).map(|i| 0x50 | i).collect();
        let mut fuzz = Fuzz::default();
        // centery is 20 so row 20 reads texel 0
        column(&source, pics.colourmap(0), 8).draw(&pics, &tables, ColumnStyle::Opaque, &mut fuzz, &mut buf);
        for y in 20..=23 {
            assert_eq!(buf.read_pixel(3, y), 0x50 | (y as u8 - 20));
        }
        assert_eq!(buf.read_pixel(3, 24), 0);
        assert_eq!(buf.read_pixel(4, 20), 0);
    }

    #[test]
    fn textures_wrap_and_masked_columns_clamp() {
        let (pics, tables, mut buf) = setup(Detail::High);
        let source: Vec<u8> = (0..6).map(|i| 0x50 | i).collect();
        let mut fuzz = Fuzz::default();

        let mut dc = column(&source, pics.colourmap(0), 4);
        dc.source = &source[..4];
        dc.texturemid = Fixed::from_int(2);
        dc.draw(&pics, &tables, ColumnStyle::Opaque, &mut fuzz, &mut buf);
        // Power of two, 2 3 0 1
        assert_eq!(buf.read_pixel(3, 21), 0x53);
        assert_eq!(buf.read_pixel(3, 22), 0x50);

        let mut dc = column(&source, pics.colourmap(0), 6);
        dc.texturemid = Fixed::from_int(4);
        dc.draw(&pics, &tables, ColumnStyle::Opaque, &mut fuzz, &mut buf);
        // Six high, 4 5 0 1
        assert_eq!(buf.read_pixel(3, 21), 0x55);
        assert_eq!(buf.read_pixel(3, 22), 0x50);

        let mut dc = column(&source, pics.colourmap(0), 0);
        dc.texturemid = Fixed::from_int(4);
        dc.draw(&pics, &tables, ColumnStyle::Opaque, &mut fuzz, &mut buf);
        assert_eq!(buf.read_pixel(3, 22), 0x55);
        assert_eq!(buf.read_pixel(3, 23), 0x55);
    }

    #[test]
    fn light_and_brightmap() {
        let (pics, tables, mut buf) = setup(Detail::High);
        let source = [0x5c, 0xaf, 0x5c, 0xaf];
        let lamp = Brightmap::new("LAMP", [0xaf]);
        let mut fuzz = Fuzz::default();
        let mut dc = column(&source, pics.colourmap(16), 4);
        dc.brightmap = Some(&lamp);
        dc.draw(&pics, &tables, ColumnStyle::Opaque, &mut fuzz, &mut buf);
        assert_eq!(buf.read_pixel(3, 20), 0x56);
        assert_eq!(buf.read_pixel(3, 21), 0xaf);
    }

    #[test]
    fn low_detail_doubles_pixels() {
        let (pics, tables, mut buf) = setup(Detail::Low);
        let source = [0x71; 4];
        let mut fuzz = Fuzz::default();
        let mut dc = column(&source, pics.colourmap(0), 4);
        dc.x = 5;
        dc.draw(&pics, &tables, ColumnStyle::Translated(2), &mut fuzz, &mut buf);
        assert_eq!(buf.read_pixel(10, 21), 0x21);
        assert_eq!(buf.read_pixel(11, 21), 0x21);
        assert_eq!(buf.read_pixel(9, 21), 0);
        assert_eq!(buf.read_pixel(12, 21), 0);
    }

    #[test]
    fn translucent_blends_with_the_frame() {
        let pics = prefab::pic_data().unwrap();
        let (_, tables, mut buf) = setup(Detail::High);
        buf.clear_with_colour(0x2f);
        let source = [0x5f; 4];
        let mut fuzz = Fuzz::default();
        column(&source, pics.colourmap(0), 4).draw(&pics, &tables, ColumnStyle::Translucent, &mut fuzz, &mut buf);
        let tint = pics.tintmap().unwrap();
        assert_eq!(buf.read_pixel(3, 20), tint[(0x5f << 8) | 0x2f]);

        // Without a tint map the column is drawn solid
        let (pics, tables, mut buf) = setup(Detail::High);
        column(&source, pics.colourmap(0), 4).draw(&pics, &tables, ColumnStyle::Translucent, &mut fuzz, &mut buf);
        assert_eq!(buf.read_pixel(3, 20), 0x5f);
    }

    #[test]
    fn fuzz_darkens_and_stays_in_the_view() {
        let (pics, tables, mut buf) = setup(Detail::High);
        buf.clear_with_colour(0x5c);
        let mut fuzz = Fuzz::default();
        fuzz.set_pos_tic();
        let mut dc = column(&[], pics.colourmap(0), 0);
        dc.yl = 0;
        dc.yh = 39;
        dc.draw(&pics, &tables, ColumnStyle::Fuzz, &mut fuzz, &mut buf);
        assert_eq!(buf.read_pixel(3, 0), 0x5c);
        assert_eq!(buf.read_pixel(3, 39), 0x5c);
        let darkened = pics.colourmap(FUZZ_COLOURMAP)[0x5c];
        assert_eq!(buf.read_pixel(3, 1), darkened);
        assert_eq!(fuzz.pos, 38);

        fuzz.set_pos_draw();
        assert_eq!(fuzz.pos, 0);
    }

    #[test]
    fn span_indexes_row_major() {
        let (pics, tables, mut buf) = setup(Detail::High);
        let flat = FlatPic::new("TEST", |x, y| (y * 4 + x % 4) as u8);
        DrawSpan {
            flat: &flat,
            colourmap: pics.colourmap(0),
            brightmap: None,
            xfrac: Fixed::ZERO,
            yfrac: Fixed::from_int(2),
            xstep: Fixed::UNIT,
            ystep: Fixed::ZERO,
            y: 5,
            x1: -2,
            x2: 70,
        }
        .draw(&pics, &tables, &mut buf);
        // Clipped on the left so the first pixel is texel x 2
        assert_eq!(buf.read_pixel(0, 5), 8 + 2);
        assert_eq!(buf.read_pixel(1, 5), 8 + 3);
        assert_eq!(buf.read_pixel(2, 5), 8);
        assert_eq!(buf.read_pixel(63, 5), 8 + 1);
        assert_eq!(buf.read_pixel(0, 6), 0);
    }
}
