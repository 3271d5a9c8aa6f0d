//! All data related to pictures used while drawing. These are:
//! - Wall textures
//! - Flat/span textures
//! - Palette, colourmaps, translation and tint tables
//! - Sprites (patches and frame sets)
//! - Brightmaps
//!
//! Loading these from a WAD is the job of whoever builds the `PicData`.

mod sprites;
pub use sprites::*;

use std::error::Error;
use std::fmt;

use log::debug;
use math::Fixed;

/// Light levels plus the inverse (invulnerability) map and an all black map
pub const COLOURMAP_LEN: usize = 34;
pub const NUMCOLORMAPS: usize = 32;
pub const INVERSECOLORMAP: usize = 32;
/// The classic sky texture mid, `ORIGHEIGHT / 2`
pub const SKY_TEXTURE_MID: i32 = 100;
/// Percentage of the foreground kept by the tint map
const TINT_PERCENT: u32 = 66;

pub type Colourmap = [u8; 256];
pub type Colour = [u8; 3];

#[derive(Debug, PartialEq, Eq)]
pub enum PicDataError {
    BadSize {
        name: String,
        width: usize,
        height: usize,
    },
    ColourmapCount(usize),
    PaletteSize(usize),
    MissingBrightmap {
        name: String,
        brightmap: usize,
    },
    MissingPatch {
        sprite: String,
        lump: usize,
    },
}

impl Error for PicDataError {}

impl fmt::Display for PicDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PicDataError::BadSize {
                name,
                width,
                height,
            } => write!(f, "picture {name} has a bad size {width}x{height}"),
            PicDataError::ColourmapCount(n) => {
                write!(f, "expected at least {COLOURMAP_LEN} colourmaps, got {n}")
            }
            PicDataError::PaletteSize(n) => write!(f, "palette must have 256 colours, got {n}"),
            PicDataError::MissingBrightmap { name, brightmap } => {
                write!(f, "picture {name} uses missing brightmap {brightmap}")
            }
            PicDataError::MissingPatch { sprite, lump } => {
                write!(f, "sprite {sprite} uses missing patch {lump}")
            }
        }
    }
}

/// A vertical run of opaque pixels in a column
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Post {
    pub top: usize,
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct PicColumn {
    /// Full height of the picture, transparent pixels hold 0
    pub pixels: Vec<u8>,
    pub posts: Vec<Post>,
}

impl PicColumn {
    fn build(height: usize, mut pixel: impl FnMut(usize) -> Option<u8>) -> Self {
        let mut pixels = vec![0; height];
        let mut posts: Vec<Post> = Vec::new();
        let mut run: Option<usize> = None;
        for (y, px) in pixels.iter_mut().enumerate() {
            match pixel(y) {
                Some(p) => {
                    *px = p;
                    run.get_or_insert(y);
                }
                None => {
                    if let Some(top) = run.take() {
                        posts.push(Post {
                            top,
                            length: y - top,
                        });
                    }
                }
            }
        }
        if let Some(top) = run {
            posts.push(Post {
                top,
                length: height - top,
            });
        }
        Self { pixels, posts }
    }
}

fn check_size(name: &str, width: usize, height: usize) -> Result<(), PicDataError> {
    if width == 0 || height == 0 || width > 4096 || height > 1024 {
        return Err(PicDataError::BadSize {
            name: name.to_string(),
            width,
            height,
        });
    }
    Ok(())
}

/// A composed wall texture, stored as columns
#[derive(Debug, Clone)]
pub struct WallPic {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub columns: Vec<PicColumn>,
    /// Index in to the brightmaps of `PicData`
    pub brightmap: Option<usize>,
}

impl WallPic {
    /// `pixel(x, y)` returns `None` for a transparent pixel
    pub fn new(
        name: &str,
        width: usize,
        height: usize,
        mut pixel: impl FnMut(usize, usize) -> Option<u8>,
    ) -> Result<Self, PicDataError> {
        check_size(name, width, height)?;
        let columns = (0..width)
            .map(|x| PicColumn::build(height, |y| pixel(x, y)))
            .collect();
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            columns,
            brightmap: None,
        })
    }

    pub fn with_brightmap(mut self, brightmap: usize) -> Self {
        self.brightmap = Some(brightmap);
        self
    }

    /// Column for a texture x coordinate, wrapping for any width
    #[inline]
    pub fn column(&self, texture_column: i32) -> &PicColumn {
        &self.columns[texture_column.rem_euclid(self.width as i32) as usize]
    }
}

/// A 64x64 floor or ceiling texture, stored row major
#[derive(Debug, Clone)]
pub struct FlatPic {
    pub name: String,
    pub data: Box<[u8; 4096]>,
    pub brightmap: Option<usize>,
}

impl FlatPic {
    pub fn new(name: &str, mut pixel: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Box::new([0u8; 4096]);
        for (i, p) in data.iter_mut().enumerate() {
            *p = pixel(i & 63, i >> 6);
        }
        Self {
            name: name.to_string(),
            data,
            brightmap: None,
        }
    }

    pub fn with_brightmap(mut self, brightmap: usize) -> Self {
        self.brightmap = Some(brightmap);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SpritePic {
    pub name: String,
    pub left_offset: i32,
    pub top_offset: i32,
    pub width: usize,
    pub height: usize,
    pub columns: Vec<PicColumn>,
}

impl SpritePic {
    pub fn new(
        name: &str,
        width: usize,
        height: usize,
        left_offset: i32,
        top_offset: i32,
        mut pixel: impl FnMut(usize, usize) -> Option<u8>,
    ) -> Result<Self, PicDataError> {
        check_size(name, width, height)?;
        let columns = (0..width)
            .map(|x| PicColumn::build(height, |y| pixel(x, y)))
            .collect();
        Ok(Self {
            name: name.to_string(),
            left_offset,
            top_offset,
            width,
            height,
            columns,
        })
    }
}

/// Colour indexes that are drawn full bright regardless of light level
#[derive(Debug, Clone)]
pub struct Brightmap {
    pub name: String,
    pub lit: [bool; 256],
}

impl Brightmap {
    pub fn new(name: &str, lit: impl IntoIterator<Item = u8>) -> Self {
        let mut map = [false; 256];
        for c in lit {
            map[c as usize] = true;
        }
        Self {
            name: name.to_string(),
            lit: map,
        }
    }
}

#[derive(Debug)]
pub struct PicData {
    /// Usually 34 blocks of 256, each u8 being an index in to the palette
    colourmaps: Vec<Colourmap>,
    palette: Option<Vec<Colour>>,
    /// Green to gray, brown and red
    translations: [Colourmap; 3],
    /// `tintmap[(fg << 8) | bg]`, only available with a palette
    tintmap: Option<Vec<u8>>,
    walls: Vec<WallPic>,
    /// Used in animations
    wall_translation: Vec<usize>,
    flats: Vec<FlatPic>,
    /// Used in animations
    flat_translation: Vec<usize>,
    sprite_patches: Vec<SpritePic>,
    sprite_defs: Vec<SpriteDef>,
    brightmaps: Vec<Brightmap>,
    /// The flat number that signifies a sky should be drawn
    sky_num: usize,
    /// The wall texture used for the sky
    sky_pic: usize,
}

impl PicData {
    /// Colourmaps are required, the palette is only needed for the tint
    /// (translucency) table and for turning the frame in to RGB.
    pub fn new(colourmaps: Vec<Colourmap>, palette: Option<Vec<Colour>>) -> Result<Self, PicDataError> {
        if colourmaps.len() < COLOURMAP_LEN {
            return Err(PicDataError::ColourmapCount(colourmaps.len()));
        }
        if let Some(p) = &palette {
            if p.len() != 256 {
                return Err(PicDataError::PaletteSize(p.len()));
            }
        }

        let tintmap = palette.as_deref().map(Self::init_tintmap);
        Ok(Self {
            colourmaps,
            palette,
            translations: Self::init_translations(),
            tintmap,
            walls: Vec::new(),
            wall_translation: Vec::new(),
            flats: Vec::new(),
            flat_translation: Vec::new(),
            sprite_patches: Vec::new(),
            sprite_defs: Vec::new(),
            brightmaps: Vec::new(),
            sky_num: usize::MAX,
            sky_pic: 0,
        })
    }

    /// Map the green ramp `0x70..=0x7f` to gray, brown and red
    ///
    /// Doom function name `R_InitTranslationTables`
    fn init_translations() -> [Colourmap; 3] {
        let mut tables = [[0u8; 256]; 3];
        for i in 0..256 {
            if (0x70..=0x7f).contains(&i) {
                tables[0][i] = 0x60 + (i as u8 & 0xf);
                tables[1][i] = 0x40 + (i as u8 & 0xf);
                tables[2][i] = 0x20 + (i as u8 & 0xf);
            } else {
                tables[0][i] = i as u8;
                tables[1][i] = i as u8;
                tables[2][i] = i as u8;
            }
        }
        tables
    }

    /// Blend every pair of colours and find the closest palette entry
    fn init_tintmap(palette: &[Colour]) -> Vec<u8> {
        let mut map = vec![0u8; 256 * 256];
        for fg in 0..256 {
            for bg in 0..256 {
                let mut blend = [0u32; 3];
                for (c, b) in blend.iter_mut().enumerate() {
                    *b = (palette[fg][c] as u32 * TINT_PERCENT
                        + palette[bg][c] as u32 * (100 - TINT_PERCENT))
                        / 100;
                }
                map[(fg << 8) | bg] = nearest_colour(palette, blend);
            }
        }
        debug!("Built tint map");
        map
    }

    pub fn add_brightmap(&mut self, brightmap: Brightmap) -> usize {
        self.brightmaps.push(brightmap);
        self.brightmaps.len() - 1
    }

    pub fn add_wall(&mut self, pic: WallPic) -> Result<usize, PicDataError> {
        self.check_brightmap(&pic.name, pic.brightmap)?;
        self.wall_translation.push(self.walls.len());
        self.walls.push(pic);
        Ok(self.walls.len() - 1)
    }

    pub fn add_flat(&mut self, pic: FlatPic) -> Result<usize, PicDataError> {
        self.check_brightmap(&pic.name, pic.brightmap)?;
        self.flat_translation.push(self.flats.len());
        self.flats.push(pic);
        Ok(self.flats.len() - 1)
    }

    pub fn add_sprite_patch(&mut self, pic: SpritePic) -> usize {
        self.sprite_patches.push(pic);
        self.sprite_patches.len() - 1
    }

    pub fn add_sprite_def(&mut self, def: SpriteDef) -> Result<usize, PicDataError> {
        for frame in &def.frames {
            if let Some(lump) = frame.lumps().find(|l| *l >= self.sprite_patches.len()) {
                return Err(PicDataError::MissingPatch {
                    sprite: def.name.clone(),
                    lump,
                });
            }
        }
        self.sprite_defs.push(def);
        Ok(self.sprite_defs.len() - 1)
    }

    fn check_brightmap(&self, name: &str, brightmap: Option<usize>) -> Result<(), PicDataError> {
        match brightmap {
            Some(b) if b >= self.brightmaps.len() => Err(PicDataError::MissingBrightmap {
                name: name.to_string(),
                brightmap: b,
            }),
            _ => Ok(()),
        }
    }

    /// Set the flat that marks a sky and the wall texture drawn for it
    pub fn set_sky(&mut self, sky_num: usize, sky_pic: usize) {
        self.sky_num = sky_num;
        self.sky_pic = sky_pic;
    }

    /// Get the number of the flat used for the sky texture. Sectors using this
    /// number for the flat will be rendered with the skybox.
    pub fn sky_num(&self) -> usize {
        self.sky_num
    }

    /// Get the index used by `get_texture()` to return a texture.
    pub fn sky_pic(&self) -> usize {
        self.sky_pic
    }

    /// Texture mid for the sky. Tall skies are shifted so the horizon stays
    /// in place when looking up.
    pub fn sky_texture_mid(&self) -> Fixed {
        match self.walls.get(self.sky_pic) {
            Some(sky) if sky.height > 128 => Fixed::from_int(SKY_TEXTURE_MID - 128),
            _ => Fixed::from_int(SKY_TEXTURE_MID),
        }
    }

    /// Animate a wall by pointing one texture number at another
    pub fn set_wall_translation(&mut self, pic: usize, to: usize) {
        if pic < self.wall_translation.len() && to < self.walls.len() {
            self.wall_translation[pic] = to;
        }
    }

    pub fn set_flat_translation(&mut self, pic: usize, to: usize) {
        if pic < self.flat_translation.len() && to < self.flats.len() {
            self.flat_translation[pic] = to;
        }
    }

    pub fn palette(&self) -> Option<&[Colour]> {
        self.palette.as_deref()
    }

    pub fn num_colourmaps(&self) -> usize {
        self.colourmaps.len()
    }

    #[inline]
    pub fn colourmap(&self, index: usize) -> &Colourmap {
        match self.colourmaps.get(index) {
            Some(c) => c,
            None => panic!("Bad colourmap {index}, have {}", self.colourmaps.len()),
        }
    }

    /// `0..=2`, selected by a things translation bits minus one
    #[inline]
    pub fn translation(&self, index: usize) -> &Colourmap {
        &self.translations[index.min(2)]
    }

    #[inline]
    pub fn tintmap(&self) -> Option<&[u8]> {
        self.tintmap.as_deref()
    }

    #[inline]
    pub fn brightmap(&self, index: usize) -> &Brightmap {
        &self.brightmaps[index]
    }

    pub fn get_texture(&self, num: usize) -> &WallPic {
        match self.wall_translation.get(num) {
            Some(n) => &self.walls[*n],
            None => panic!("Bad texture number {num}, have {}", self.walls.len()),
        }
    }

    pub fn get_flat(&self, num: usize) -> &FlatPic {
        match self.flat_translation.get(num) {
            Some(n) => &self.flats[*n],
            None => panic!("Bad flat number {num}, have {}", self.flats.len()),
        }
    }

    pub fn num_textures(&self) -> usize {
        self.walls.len()
    }

    pub fn wallpic_num_for_name(&self, name: &str) -> Option<usize> {
        self.walls.iter().position(|t| t.name == name)
    }

    pub fn flat_num_for_name(&self, name: &str) -> Option<usize> {
        self.flats.iter().position(|t| t.name == name)
    }

    pub fn sprite_def(&self, sprite_num: usize) -> &SpriteDef {
        match self.sprite_defs.get(sprite_num) {
            Some(d) => d,
            None => panic!("Bad sprite number {sprite_num}, have {}", self.sprite_defs.len()),
        }
    }

    pub fn sprite_patch(&self, patch_num: usize) -> &SpritePic {
        &self.sprite_patches[patch_num]
    }
}

fn nearest_colour(palette: &[Colour], rgb: [u32; 3]) -> u8 {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, c) in palette.iter().enumerate() {
        let d = rgb
            .iter()
            .zip(c.iter())
            .map(|(a, b)| {
                let d = *a as i32 - *b as i32;
                (d * d) as u32
            })
            .sum::<u32>();
        if d < best_dist {
            best_dist = d;
            best = i;
            if d == 0 {
                break;
            }
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colourmaps() -> Vec<Colourmap> {
        (0..COLOURMAP_LEN)
            .map(|_| {
                let mut m = [0u8; 256];
                for (i, c) in m.iter_mut().enumerate() {
                    *c = i as u8;
                }
                m
            })
            .collect()
    }

    #[test]
    fn posts_follow_transparency() {
        let pic = WallPic::new("GRATE", 2, 8, |x, y| {
            if x == 0 || (2..4).contains(&y) || y == 7 {
                Some(9)
            } else {
                None
            }
        })
        .unwrap();
        assert_eq!(pic.columns[0].posts, vec![Post { top: 0, length: 8 }]);
        assert_eq!(
            pic.columns[1].posts,
            vec![Post { top: 2, length: 2 }, Post { top: 7, length: 1 }]
        );
        // Wraps both ways
        assert_eq!(pic.column(-1).posts.len(), 2);
        assert_eq!(pic.column(2).posts.len(), 1);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            WallPic::new("NONE", 0, 8, |_, _| None),
            Err(PicDataError::BadSize { .. })
        ));
        assert_eq!(
            PicData::new(vec![[0; 256]; 3], None).unwrap_err(),
            PicDataError::ColourmapCount(3)
        );

        let mut pics = PicData::new(colourmaps(), None).unwrap();
        let def = SpriteDef::new("TROO", vec![SpriteFrame::single(4, false)]);
        assert!(matches!(
            pics.add_sprite_def(def),
            Err(PicDataError::MissingPatch { lump: 4, .. })
        ));
        let wall = WallPic::new("LIT", 1, 1, |_, _| Some(1)).unwrap().with_brightmap(3);
        assert!(matches!(
            pics.add_wall(wall),
            Err(PicDataError::MissingBrightmap { brightmap: 3, .. })
        ));
    }

    #[test]
    fn translation_ramps() {
        let pics = PicData::new(colourmaps(), None).unwrap();
        assert_eq!(pics.translation(0)[0x70], 0x60);
        assert_eq!(pics.translation(1)[0x7f], 0x4f);
        assert_eq!(pics.translation(2)[0x75], 0x25);
        assert_eq!(pics.translation(2)[0x80], 0x80);
        assert_eq!(pics.translation(0)[0x6f], 0x6f);
    }

    #[test]
    fn tint_blends_towards_foreground() {
        let mut palette = vec![[0u8; 3]; 256];
        for (i, c) in palette.iter_mut().enumerate() {
            *c = [i as u8, i as u8, i as u8];
        }
        let pics = PicData::new(colourmaps(), Some(palette)).unwrap();
        let tint = pics.tintmap().unwrap();
        assert_eq!(tint[(200 << 8) | 200], 200);
        // 66% of 255 + 34% of 0
        assert_eq!(tint[255 << 8], 168);
    }

    #[test]
    fn wall_animation_translation() {
        let mut pics = PicData::new(colourmaps(), None).unwrap();
        let a = pics.add_wall(WallPic::new("A", 1, 1, |_, _| Some(1)).unwrap()).unwrap();
        let b = pics.add_wall(WallPic::new("B", 1, 1, |_, _| Some(2)).unwrap()).unwrap();
        pics.set_wall_translation(a, b);
        assert_eq!(pics.get_texture(a).name, "B");
        assert_eq!(pics.wallpic_num_for_name("B"), Some(b));
    }
}
