//! Small hand built levels. They are complete enough to render: closed
//! sectors, a BSP tree, textures and a camera. Used by tests and by the
//! frame dumping tool.
//!
//! The palette is 16 hues of 16 brightness steps, colour `hue << 4 | value`.
//! Every light colourmap keeps the hue and only scales the value, so the hue
//! of a pixel tells which picture it came from.

use std::error::Error;

use math::{Angle, Fixed, point_to_angle_2, point_to_dist};

use crate::flags::LineDefFlags;
use crate::map_data::{IS_SSECTOR_MASK, LumpLineDef, LumpSegment, LumpSubSector, MapData, MapLumps};
use crate::map_defs::{BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP, Node, Sector, SideDef, Vertex};
use crate::pic::{
    Brightmap, COLOURMAP_LEN, Colour, Colourmap, FlatPic, INVERSECOLORMAP, NUMCOLORMAPS, PicData,
    PicDataError, SpriteDef, SpriteFrame, SpritePic, WallPic,
};
use crate::thing::{MapObject, PspDef, ViewPoint};

pub const HUE_WALL: u8 = 0x50;
pub const HUE_TROO: u8 = 0x70;
pub const HUE_FLOOR: u8 = 0x80;
pub const HUE_CEIL: u8 = 0x90;
pub const HUE_LIT: u8 = 0xa0;
pub const HUE_STEP: u8 = 0xb0;
pub const HUE_SKY: u8 = 0xc0;
pub const HUE_GRATE: u8 = 0xd0;
pub const HUE_PISG: u8 = 0xe0;

pub const WALL: usize = 0;
pub const STEP: usize = 1;
pub const GRATE: usize = 2;
pub const SKY1: usize = 3;
pub const LIT: usize = 4;

pub const FLOOR: usize = 0;
pub const CEIL: usize = 1;
pub const F_SKY1: usize = 2;

pub const TROO: usize = 0;
pub const PISG: usize = 1;

/// Eye height above the floor
pub const VIEWHEIGHT: i32 = 41;

const HUES: [Colour; 16] = [
    [255, 255, 255],
    [255, 96, 96],
    [255, 160, 64],
    [255, 255, 96],
    [160, 255, 96],
    [200, 160, 120],
    [96, 255, 255],
    [64, 255, 64],
    [160, 128, 96],
    [176, 176, 200],
    [255, 240, 160],
    [128, 96, 64],
    [96, 160, 255],
    [160, 176, 160],
    [224, 96, 255],
    [255, 64, 160],
];

/// A level ready to render
pub struct Prefab {
    pub map: MapData,
    pub pics: PicData,
    pub view: ViewPoint,
    pub things: Vec<MapObject>,
}

pub fn palette() -> Vec<Colour> {
    (0..256)
        .map(|i| {
            let hue = HUES[i >> 4];
            let v = (i & 0xf) as u32 + 1;
            [
                (hue[0] as u32 * v / 16) as u8,
                (hue[1] as u32 * v / 16) as u8,
                (hue[2] as u32 * v / 16) as u8,
            ]
        })
        .collect()
}

/// Light maps darken the value and keep the hue. Then the inverse map and
/// an all black map.
pub fn colourmaps() -> Vec<Colourmap> {
    let mut maps = vec![[0u8; 256]; COLOURMAP_LEN];
    for (level, map) in maps.iter_mut().enumerate().take(NUMCOLORMAPS) {
        for (c, out) in map.iter_mut().enumerate() {
            let hue = c as u8 & 0xf0;
            let v = (c & 0xf) * (NUMCOLORMAPS - level) / NUMCOLORMAPS;
            *out = hue | v as u8;
        }
    }
    for (c, out) in maps[INVERSECOLORMAP].iter_mut().enumerate() {
        *out = 15 - (c as u8 & 0xf);
    }
    maps
}

/// Textures, flats and sprites used by every prefab. The numbering matches
/// the constants in this module.
pub fn pic_data() -> Result<PicData, PicDataError> {
    let mut pics = PicData::new(colourmaps(), Some(palette()))?;

    pics.add_wall(WallPic::new("WALL", 64, 128, |x, y| {
        let row = y / 16;
        let mortar = y % 16 == 0 || (x + row * 32) % 64 == 0;
        Some(HUE_WALL | if mortar { 6 } else { 12 + ((x + y) % 3) as u8 })
    })?)?;
    pics.add_wall(WallPic::new("STEP", 64, 64, |_, y| {
        Some(HUE_STEP | if y % 8 < 2 { 8 } else { 14 })
    })?)?;
    pics.add_wall(WallPic::new("GRATE", 64, 64, |x, y| {
        (x % 16 < 4 || y % 16 < 4).then_some(HUE_GRATE | 13)
    })?)?;
    pics.add_wall(WallPic::new("SKY1", 256, 128, |x, y| {
        Some(HUE_SKY | (15 - (y / 16) as u8).max(((x / 32) % 2) as u8 + 4))
    })?)?;
    let lamp = pics.add_brightmap(Brightmap::new("LIT", [HUE_LIT | 15]));
    pics.add_wall(
        WallPic::new("LIT", 64, 128, |x, y| {
            let in_lamp = (24..40).contains(&x) && (48..64).contains(&y);
            Some(HUE_LIT | if in_lamp { 15 } else { 9 })
        })?
        .with_brightmap(lamp),
    )?;

    pics.add_flat(FlatPic::new("FLOOR", |x, y| {
        HUE_FLOOR | if (x / 16 + y / 16) % 2 == 0 { 14 } else { 10 }
    }))?;
    pics.add_flat(FlatPic::new("CEIL", |x, y| {
        HUE_CEIL | if x % 32 == 0 || y % 32 == 0 { 7 } else { 12 }
    }))?;
    pics.add_flat(FlatPic::new("F_SKY1", |_, _| HUE_SKY))?;
    pics.set_sky(F_SKY1, SKY1);

    // Rotations 1 to 5, 6 to 8 are 4 to 2 flipped
    let mut troo = [0usize; 5];
    for (i, lump) in troo.iter_mut().enumerate() {
        let v = 15 - i as u8 * 2;
        *lump = pics.add_sprite_patch(SpritePic::new(
            &format!("TROOA{}", i + 1),
            41,
            57,
            20,
            52,
            |x, y| {
                let body = (8..33).contains(&x) || y > 20;
                (body && y > 2).then_some(HUE_TROO | v)
            },
        )?);
    }
    let frame = SpriteFrame::rotations([
        (troo[0], false),
        (troo[1], false),
        (troo[2], false),
        (troo[3], false),
        (troo[4], false),
        (troo[3], true),
        (troo[2], true),
        (troo[1], true),
    ]);
    pics.add_sprite_def(SpriteDef::new("TROO", vec![frame]))?;

    let pisg = pics.add_sprite_patch(SpritePic::new("PISGA0", 32, 40, -144, -128, |x, _| {
        Some(HUE_PISG | (8 + (x % 8) as u8))
    })?);
    pics.add_sprite_def(SpriteDef::new("PISG", vec![SpriteFrame::single(pisg, false)]))?;

    Ok(pics)
}

fn f(v: i32) -> Fixed {
    Fixed::from_int(v)
}

/// `[top, bottom, left, right]` in map units
fn bbox(top: i32, bottom: i32, left: i32, right: i32) -> [Fixed; 4] {
    let mut b = [Fixed::ZERO; 4];
    b[BOXTOP] = f(top);
    b[BOXBOTTOM] = f(bottom);
    b[BOXLEFT] = f(left);
    b[BOXRIGHT] = f(right);
    b
}

/// Collects map lumps while a prefab is put together by hand
#[derive(Default)]
struct Builder {
    lumps: MapLumps,
}

impl Builder {
    fn vertex(&mut self, x: i32, y: i32) -> usize {
        let v = Vertex::from_int(x, y);
        if let Some(i) = self.lumps.vertexes.iter().position(|o| *o == v) {
            return i;
        }
        self.lumps.vertexes.push(v);
        self.lumps.vertexes.len() - 1
    }

    fn sector(&mut self, floor: i32, ceiling: i32, floorpic: usize, ceilingpic: usize, light: i32) -> usize {
        let num = self.lumps.sectors.len();
        self.lumps.sectors.push(Sector::new(
            num as u32,
            f(floor),
            f(ceiling),
            floorpic,
            ceilingpic,
            light,
        ));
        num
    }

    fn side(&mut self, side: SideDef) -> usize {
        self.lumps.sidedefs.push(side);
        self.lumps.sidedefs.len() - 1
    }

    /// A one sided wall, front facing right of `v1 -> v2`
    fn wall(&mut self, v1: (i32, i32), v2: (i32, i32), sector: usize, texture: usize) -> usize {
        let front = self.side(SideDef::solid(sector, texture));
        self.line(v1, v2, LineDefFlags::Blocking as u32, front, None)
    }

    fn line(&mut self, v1: (i32, i32), v2: (i32, i32), flags: u32, front: usize, back: Option<usize>) -> usize {
        let start_vertex = self.vertex(v1.0, v1.1);
        let end_vertex = self.vertex(v2.0, v2.1);
        self.lumps.linedefs.push(LumpLineDef {
            start_vertex,
            end_vertex,
            flags,
            front_sidedef: front,
            back_sidedef: back,
        });
        self.lumps.linedefs.len() - 1
    }

    /// A seg covering `from -> to` of a line. For the back side the points
    /// run the other way.
    fn seg(&mut self, line: usize, side: usize, from: (i32, i32), to: (i32, i32)) -> usize {
        let l = &self.lumps.linedefs[line];
        let origin = if side == 0 {
            self.lumps.vertexes[l.start_vertex]
        } else {
            self.lumps.vertexes[l.end_vertex]
        };
        let start_vertex = self.vertex(from.0, from.1);
        let end_vertex = self.vertex(to.0, to.1);
        let v1 = self.lumps.vertexes[start_vertex];
        let v2 = self.lumps.vertexes[end_vertex];

        let offset = if origin.x == v1.x || origin.y == v1.y {
            (v1.x - origin.x).abs() + (v1.y - origin.y).abs()
        } else {
            point_to_dist(origin.x, origin.y, v1.x, v1.y)
        };

        self.lumps.segments.push(LumpSegment {
            start_vertex,
            end_vertex,
            angle: point_to_angle_2(v1.x, v1.y, v2.x, v2.y),
            linedef: line,
            side,
            offset,
        });
        self.lumps.segments.len() - 1
    }

    /// A seg for the whole line
    fn full_seg(&mut self, line: usize, side: usize) -> usize {
        let l = &self.lumps.linedefs[line];
        let (a, b) = (self.lumps.vertexes[l.start_vertex], self.lumps.vertexes[l.end_vertex]);
        let (a, b) = ((a.x.to_int(), a.y.to_int()), (b.x.to_int(), b.y.to_int()));
        if side == 0 {
            self.seg(line, 0, a, b)
        } else {
            self.seg(line, 1, b, a)
        }
    }

    /// Every seg added since `first` becomes one subsector
    fn subsector(&mut self, first: usize) -> u32 {
        self.lumps.subsectors.push(LumpSubSector {
            seg_count: (self.lumps.segments.len() - first) as u32,
            start_seg: first as u32,
        });
        (self.lumps.subsectors.len() - 1) as u32 | IS_SSECTOR_MASK
    }

    fn node(&mut self, origin: (i32, i32), delta: (i32, i32), bboxes: [[Fixed; 4]; 2], children: [u32; 2]) -> u32 {
        self.lumps.nodes.push(Node {
            x: f(origin.0),
            y: f(origin.1),
            dx: f(delta.0),
            dy: f(delta.1),
            bboxes,
            children,
        });
        (self.lumps.nodes.len() - 1) as u32
    }

    fn build(self) -> Result<MapData, Box<dyn Error>> {
        Ok(MapData::new(self.lumps)?)
    }
}

fn view_at(x: i32, y: i32, floor: i32, angle: Angle) -> ViewPoint {
    ViewPoint::new(f(x), f(y), f(floor + VIEWHEIGHT), angle)
}

/// One sector, 256 units square, 128 high. The north wall has a vertex at
/// its midpoint so it is drawn as two segs. The camera stands on the middle
/// line near the south wall looking north and sees four segs.
pub fn square_room() -> Result<Prefab, Box<dyn Error>> {
    let mut b = Builder::default();
    let s = b.sector(0, 128, FLOOR, CEIL, 160);

    let west = b.wall((-128, -128), (-128, 128), s, WALL);
    let north_a = b.wall((-128, 128), (0, 128), s, WALL);
    let north_b = b.wall((0, 128), (128, 128), s, WALL);
    let east = b.wall((128, 128), (128, -128), s, WALL);
    let south = b.wall((128, -128), (-128, -128), s, WALL);

    let first = b.full_seg(west, 0);
    for line in [north_a, north_b, east, south] {
        b.full_seg(line, 0);
    }
    b.subsector(first);

    Ok(Prefab {
        map: b.build()?,
        pics: pic_data()?,
        view: view_at(0, -64, 0, Angle::A90),
        things: Vec::new(),
    })
}

/// Two sectors split at y = 0. The north half has its floor 24 units higher
/// so the joining line shows a lower texture from the south.
pub fn step_room() -> Result<Prefab, Box<dyn Error>> {
    let mut b = Builder::default();
    let low = b.sector(0, 128, FLOOR, CEIL, 160);
    let high = b.sector(24, 128, FLOOR, CEIL, 160);

    let west = b.wall((-128, -128), (-128, 0), low, WALL);
    let west_high = b.wall((-128, 0), (-128, 128), high, WALL);
    let east_high = b.wall((128, 128), (128, 0), high, WALL);
    let east = b.wall((128, 0), (128, -128), low, WALL);
    let north = b.wall((-128, 128), (128, 128), high, WALL);
    let south = b.wall((128, -128), (-128, -128), low, WALL);

    let front = b.side(SideDef {
        textureoffset: Fixed::ZERO,
        rowoffset: Fixed::ZERO,
        toptexture: None,
        bottomtexture: Some(STEP),
        midtexture: None,
        sector: low,
    });
    let back = b.side(SideDef {
        textureoffset: Fixed::ZERO,
        rowoffset: Fixed::ZERO,
        toptexture: None,
        bottomtexture: None,
        midtexture: None,
        sector: high,
    });
    let step = b.line((-128, 0), (128, 0), LineDefFlags::TwoSided as u32, front, Some(back));

    let first = b.full_seg(south, 0);
    b.full_seg(west, 0);
    b.full_seg(step, 0);
    b.full_seg(east, 0);
    let south_ss = b.subsector(first);

    let first = b.full_seg(north, 0);
    b.full_seg(east_high, 0);
    b.full_seg(step, 1);
    b.full_seg(west_high, 0);
    let north_ss = b.subsector(first);

    b.node(
        (-128, 0),
        (256, 0),
        [bbox(0, -128, -128, 128), bbox(128, 0, -128, 128)],
        [south_ss, north_ss],
    );

    Ok(Prefab {
        map: b.build()?,
        pics: pic_data()?,
        view: view_at(0, -96, 0, Angle::A90),
        things: Vec::new(),
    })
}

/// A 512 unit room with a solid pillar at x -32..32, y 32..96. The camera
/// looks north at the pillar and an imp stands directly behind it.
pub fn pillar_room() -> Result<Prefab, Box<dyn Error>> {
    let mut b = Builder::default();
    let s = b.sector(0, 128, FLOOR, CEIL, 192);

    let west = b.wall((-256, -256), (-256, 256), s, WALL);
    let north = b.wall((-256, 256), (256, 256), s, WALL);
    let east = b.wall((256, 256), (256, -256), s, WALL);
    let south = b.wall((256, -256), (-256, -256), s, WALL);
    let p_south = b.wall((-32, 32), (32, 32), s, WALL);
    let p_east = b.wall((32, 32), (32, 96), s, WALL);
    let p_north = b.wall((32, 96), (-32, 96), s, WALL);
    let p_west = b.wall((-32, 96), (-32, 32), s, WALL);

    // South of the pillar
    let first = b.full_seg(south, 0);
    b.seg(west, 0, (-256, -256), (-256, 32));
    b.full_seg(p_south, 0);
    b.seg(east, 0, (256, 32), (256, -256));
    let south_ss = b.subsector(first);

    // North of the pillar
    let first = b.full_seg(north, 0);
    b.seg(east, 0, (256, 256), (256, 96));
    b.full_seg(p_north, 0);
    b.seg(west, 0, (-256, 96), (-256, 256));
    let north_ss = b.subsector(first);

    // Beside the pillar
    let first = b.seg(east, 0, (256, 96), (256, 32));
    b.full_seg(p_east, 0);
    let east_ss = b.subsector(first);

    let first = b.seg(west, 0, (-256, 32), (-256, 96));
    b.full_seg(p_west, 0);
    let west_ss = b.subsector(first);

    let band = b.node(
        (0, 32),
        (0, 64),
        [bbox(96, 32, 32, 256), bbox(96, 32, -256, -32)],
        [east_ss, west_ss],
    );
    let upper = b.node(
        (32, 96),
        (-64, 0),
        [bbox(256, 96, -256, 256), bbox(96, 32, -256, 256)],
        [north_ss, band],
    );
    b.node(
        (-32, 32),
        (64, 0),
        [bbox(32, -256, -256, 256), bbox(256, 32, -256, 256)],
        [south_ss, upper],
    );

    let mut imp = MapObject::new(f(0), f(160), f(0), s, TROO);
    imp.angle = Angle::A270;

    Ok(Prefab {
        map: b.build()?,
        pics: pic_data()?,
        view: view_at(0, -128, 0, Angle::A90),
        things: vec![imp],
    })
}

/// A grate across the middle of the room, the far half open to the sky and
/// lit brighter. An imp stands behind the grate and the player holds a
/// pistol.
pub fn window_room() -> Result<Prefab, Box<dyn Error>> {
    let mut b = Builder::default();
    let near = b.sector(0, 128, FLOOR, CEIL, 144);
    let far = b.sector(0, 128, FLOOR, F_SKY1, 208);

    let west = b.wall((-128, -128), (-128, 0), near, WALL);
    let west_far = b.wall((-128, 0), (-128, 256), far, WALL);
    let north = b.wall((-128, 256), (128, 256), far, LIT);
    let east_far = b.wall((128, 256), (128, 0), far, WALL);
    let east = b.wall((128, 0), (128, -128), near, WALL);
    let south = b.wall((128, -128), (-128, -128), near, WALL);

    let grate_side = |sector| SideDef {
        textureoffset: Fixed::ZERO,
        rowoffset: Fixed::ZERO,
        toptexture: None,
        bottomtexture: None,
        midtexture: Some(GRATE),
        sector,
    };
    let front = b.side(grate_side(near));
    let back = b.side(grate_side(far));
    let grate = b.line(
        (-128, 0),
        (128, 0),
        LineDefFlags::TwoSided as u32 | LineDefFlags::UnpegBottom as u32,
        front,
        Some(back),
    );

    let first = b.full_seg(south, 0);
    b.full_seg(west, 0);
    b.full_seg(grate, 0);
    b.full_seg(east, 0);
    let near_ss = b.subsector(first);

    let first = b.full_seg(north, 0);
    b.full_seg(east_far, 0);
    b.full_seg(grate, 1);
    b.full_seg(west_far, 0);
    let far_ss = b.subsector(first);

    b.node(
        (-128, 0),
        (256, 0),
        [bbox(0, -128, -128, 128), bbox(256, 0, -128, 128)],
        [near_ss, far_ss],
    );

    let mut imp = MapObject::new(f(0), f(128), f(0), far, TROO);
    imp.angle = Angle::A270;

    let mut view = view_at(0, -96, 0, Angle::A90);
    view.psprites.push(PspDef {
        sprite: PISG,
        frame: 0,
        sx: Fixed::UNIT,
        sy: f(32),
    });

    Ok(Prefab {
        map: b.build()?,
        pics: pic_data()?,
        view,
        things: vec![imp],
    })
}

/// Every prefab by name, for the command line
pub fn by_name(name: &str) -> Option<fn() -> Result<Prefab, Box<dyn Error>>> {
    match name {
        "square" => Some(square_room),
        "step" => Some(step_room),
        "pillar" => Some(pillar_room),
        "window" => Some(window_room),
        _ => None,
    }
}

pub const NAMES: [&str; 4] = ["square", "step", "pillar", "window"];
