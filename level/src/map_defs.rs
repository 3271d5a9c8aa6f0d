use math::{Angle, Fixed};

pub const BOXTOP: usize = 0;
pub const BOXBOTTOM: usize = 1;
pub const BOXLEFT: usize = 2;
pub const BOXRIGHT: usize = 3;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
}

impl Vertex {
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Whole map units
    pub const fn from_int(x: i32, y: i32) -> Self {
        Self {
            x: Fixed::from_int(x),
            y: Fixed::from_int(y),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

/// The SECTORS record, at runtime. Heights, pictures and light may be
/// changed between frames, nothing else.
#[derive(Debug, Default, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: u32,
    pub floorheight: Fixed,
    pub ceilingheight: Fixed,
    /// Index to a flat
    pub floorpic: usize,
    /// Index to a flat
    pub ceilingpic: usize,
    /// `0..=255`
    pub lightlevel: i32,
    /// Lines bordering this sector, filled in when the map is built
    pub lines: Vec<usize>,
}

impl Sector {
    pub fn new(
        num: u32,
        floorheight: Fixed,
        ceilingheight: Fixed,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: i32,
    ) -> Self {
        Self {
            num,
            floorheight,
            ceilingheight,
            floorpic,
            ceilingpic,
            lightlevel,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SideDef {
    /// add this to the calculated texture column
    pub textureoffset: Fixed,
    /// add this to the calculated texture top
    pub rowoffset: Fixed,
    pub toptexture: Option<usize>,
    pub bottomtexture: Option<usize>,
    pub midtexture: Option<usize>,
    /// Sector the SideDef is facing.
    pub sector: usize,
}

impl SideDef {
    /// A side with only a mid texture and no offsets
    pub fn solid(sector: usize, midtexture: usize) -> Self {
        Self {
            textureoffset: Fixed::ZERO,
            rowoffset: Fixed::ZERO,
            toptexture: None,
            bottomtexture: None,
            midtexture: Some(midtexture),
            sector,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v1: Vertex,
    pub v2: Vertex,
    /// Precalculated v2 - v1 for side checking.
    pub dx: Fixed,
    pub dy: Fixed,
    pub flags: u32,
    /// BOXTOP, BOXBOTTOM, BOXLEFT, BOXRIGHT
    pub bbox: [Fixed; 4],
    pub slopetype: SlopeType,
    pub front_sidedef: usize,
    /// `None` if one sided
    pub back_sidedef: Option<usize>,
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Segment {
    // Vertices, from v1 to v2.
    pub v1: Vertex,
    pub v2: Vertex,
    /// Offset distance along the linedef (from `start_vertex`) to the start
    /// of this `Segment`
    pub offset: Fixed,
    pub angle: Angle,
    pub sidedef: usize,
    /// The Linedef this segment travels along. During drawing it is used for
    /// finding flags.
    pub linedef: usize,
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SubSector {
    pub sector: usize,
    /// How many `Segment`s line this `SubSector`
    pub seg_count: u32,
    /// The `Segment` to start with
    pub start_seg: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Where the line used for splitting the level starts
    pub x: Fixed,
    pub y: Fixed,
    /// Direction of the partition line
    pub dx: Fixed,
    pub dy: Fixed,
    /// Bounding box for each child, indexed by BOXTOP, BOXBOTTOM, BOXLEFT,
    /// BOXRIGHT
    pub bboxes: [[Fixed; 4]; 2],
    /// The node children. Doom uses a clever trick where if one node is
    /// selected then the other can also be checked with the same/minimal
    /// code by inverting the last bit.
    /// The final 'leaf' is bitmasked to find the index to subsector array
    pub children: [u32; 2],
}
