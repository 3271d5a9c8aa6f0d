use std::error::Error;
use std::fmt;

use log::{debug, warn};
use math::{Angle, Fixed};

use crate::map_defs::{
    BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP, LineDef, Node, Sector, Segment, SideDef, SlopeType,
    SubSector, Vertex,
};

pub const IS_SSECTOR_MASK: u32 = 0x8000_0000;

/// A linedef as an external loader hands it over, vertexes and sides by
/// index.
#[derive(Debug, Clone)]
pub struct LumpLineDef {
    pub start_vertex: usize,
    pub end_vertex: usize,
    pub flags: u32,
    pub front_sidedef: usize,
    pub back_sidedef: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LumpSegment {
    pub start_vertex: usize,
    pub end_vertex: usize,
    pub angle: Angle,
    pub linedef: usize,
    /// 0 for the front side of the linedef, 1 for the back
    pub side: usize,
    pub offset: Fixed,
}

#[derive(Debug, Clone)]
pub struct LumpSubSector {
    pub seg_count: u32,
    pub start_seg: u32,
}

/// Everything required to build a `MapData`
#[derive(Debug, Default, Clone)]
pub struct MapLumps {
    pub vertexes: Vec<Vertex>,
    pub sectors: Vec<Sector>,
    pub sidedefs: Vec<SideDef>,
    pub linedefs: Vec<LumpLineDef>,
    pub segments: Vec<LumpSegment>,
    pub subsectors: Vec<LumpSubSector>,
    pub nodes: Vec<Node>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MapDataError {
    NoSubSectors,
    BadVertex { linedef: usize, vertex: usize },
    BadSegVertex { segment: usize, vertex: usize },
    BadSideDef { linedef: usize, sidedef: usize },
    BadSector { sidedef: usize, sector: usize },
    BadLineDef { segment: usize, linedef: usize },
    MissingBackSide { segment: usize },
    BadSegRange { subsector: usize },
    BadChild { node: usize, child: u32 },
}

impl Error for MapDataError {}

impl fmt::Display for MapDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapDataError::NoSubSectors => write!(f, "map has no subsectors"),
            MapDataError::BadVertex { linedef, vertex } => {
                write!(f, "linedef {linedef} references missing vertex {vertex}")
            }
            MapDataError::BadSegVertex { segment, vertex } => {
                write!(f, "segment {segment} references missing vertex {vertex}")
            }
            MapDataError::BadSideDef { linedef, sidedef } => {
                write!(f, "linedef {linedef} references missing sidedef {sidedef}")
            }
            MapDataError::BadSector { sidedef, sector } => {
                write!(f, "sidedef {sidedef} references missing sector {sector}")
            }
            MapDataError::BadLineDef { segment, linedef } => {
                write!(f, "segment {segment} references missing linedef {linedef}")
            }
            MapDataError::MissingBackSide { segment } => {
                write!(f, "segment {segment} is on the back of a one sided linedef")
            }
            MapDataError::BadSegRange { subsector } => {
                write!(f, "subsector {subsector} has a segment range outside the map")
            }
            MapDataError::BadChild { node, child } => {
                write!(f, "node {node} has an invalid child {child:#x}")
            }
        }
    }
}

/// The static level graph the renderer walks. Everything is referenced by
/// index, and every index is checked once by `MapData::new` so the renderer
/// can treat a bad one as corruption.
///
/// Only sectors may be changed after construction, and only between frames.
#[derive(Debug, Default)]
pub struct MapData {
    vertexes: Vec<Vertex>,
    linedefs: Vec<LineDef>,
    sectors: Vec<Sector>,
    sidedefs: Vec<SideDef>,
    subsectors: Vec<SubSector>,
    segments: Vec<Segment>,
    nodes: Vec<Node>,
    start_node: u32,
}

impl MapData {
    pub fn new(lumps: MapLumps) -> Result<Self, MapDataError> {
        let MapLumps {
            vertexes,
            mut sectors,
            sidedefs,
            linedefs: lump_lines,
            segments: lump_segs,
            subsectors: lump_subs,
            nodes,
        } = lumps;

        if lump_subs.is_empty() {
            return Err(MapDataError::NoSubSectors);
        }

        for (i, side) in sidedefs.iter().enumerate() {
            if side.sector >= sectors.len() {
                return Err(MapDataError::BadSector {
                    sidedef: i,
                    sector: side.sector,
                });
            }
        }

        let mut linedefs = Vec::with_capacity(lump_lines.len());
        for (i, l) in lump_lines.iter().enumerate() {
            let v1 = *vertexes.get(l.start_vertex).ok_or(MapDataError::BadVertex {
                linedef: i,
                vertex: l.start_vertex,
            })?;
            let v2 = *vertexes.get(l.end_vertex).ok_or(MapDataError::BadVertex {
                linedef: i,
                vertex: l.end_vertex,
            })?;
            let front = sidedefs.get(l.front_sidedef).ok_or(MapDataError::BadSideDef {
                linedef: i,
                sidedef: l.front_sidedef,
            })?;
            let backsector = match l.back_sidedef {
                Some(b) => Some(
                    sidedefs
                        .get(b)
                        .ok_or(MapDataError::BadSideDef {
                            linedef: i,
                            sidedef: b,
                        })?
                        .sector,
                ),
                None => None,
            };

            let dx = v2.x - v1.x;
            let dy = v2.y - v1.y;
            let slopetype = if dx == Fixed::ZERO {
                SlopeType::Vertical
            } else if dy == Fixed::ZERO {
                SlopeType::Horizontal
            } else if (dy / dx) > Fixed::ZERO {
                SlopeType::Positive
            } else {
                SlopeType::Negative
            };

            let mut bbox = [Fixed::ZERO; 4];
            bbox[BOXLEFT] = v1.x.min(v2.x);
            bbox[BOXRIGHT] = v1.x.max(v2.x);
            bbox[BOXBOTTOM] = v1.y.min(v2.y);
            bbox[BOXTOP] = v1.y.max(v2.y);

            sectors[front.sector].lines.push(i);
            if let Some(back) = backsector {
                if back != front.sector {
                    sectors[back].lines.push(i);
                }
            }

            linedefs.push(LineDef {
                v1,
                v2,
                dx,
                dy,
                flags: l.flags,
                bbox,
                slopetype,
                front_sidedef: l.front_sidedef,
                back_sidedef: l.back_sidedef,
                frontsector: front.sector,
                backsector,
            });
        }

        let mut segments = Vec::with_capacity(lump_segs.len());
        for (i, s) in lump_segs.iter().enumerate() {
            let v1 = *vertexes.get(s.start_vertex).ok_or(MapDataError::BadSegVertex {
                segment: i,
                vertex: s.start_vertex,
            })?;
            let v2 = *vertexes.get(s.end_vertex).ok_or(MapDataError::BadSegVertex {
                segment: i,
                vertex: s.end_vertex,
            })?;
            let line = linedefs.get(s.linedef).ok_or(MapDataError::BadLineDef {
                segment: i,
                linedef: s.linedef,
            })?;

            let (sidedef, back_side) = if s.side == 0 {
                (line.front_sidedef, line.back_sidedef)
            } else {
                let Some(back) = line.back_sidedef else {
                    return Err(MapDataError::MissingBackSide { segment: i });
                };
                (back, Some(line.front_sidedef))
            };

            segments.push(Segment {
                v1,
                v2,
                offset: s.offset,
                angle: s.angle,
                sidedef,
                linedef: s.linedef,
                frontsector: sidedefs[sidedef].sector,
                backsector: back_side.map(|b| sidedefs[b].sector),
            });
        }

        let mut subsectors = Vec::with_capacity(lump_subs.len());
        for (i, ss) in lump_subs.iter().enumerate() {
            let end = ss.start_seg as usize + ss.seg_count as usize;
            if ss.seg_count == 0 || end > segments.len() {
                return Err(MapDataError::BadSegRange { subsector: i });
            }
            subsectors.push(SubSector {
                sector: segments[ss.start_seg as usize].frontsector,
                seg_count: ss.seg_count,
                start_seg: ss.start_seg,
            });
        }

        for (i, node) in nodes.iter().enumerate() {
            for child in node.children {
                let ok = if child & IS_SSECTOR_MASK != 0 {
                    ((child & !IS_SSECTOR_MASK) as usize) < subsectors.len()
                } else {
                    (child as usize) < nodes.len()
                };
                if !ok {
                    return Err(MapDataError::BadChild { node: i, child });
                }
            }
        }

        // With no nodes the whole map is subsector 0
        let start_node = if nodes.is_empty() {
            if subsectors.len() > 1 {
                warn!(
                    "Map has {} subsectors but no nodes, only the first is reachable",
                    subsectors.len()
                );
            }
            IS_SSECTOR_MASK
        } else {
            (nodes.len() - 1) as u32
        };

        debug!(
            "Built map: {} vertexes, {} lines, {} sectors, {} segs, {} subsectors, {} nodes",
            vertexes.len(),
            linedefs.len(),
            sectors.len(),
            segments.len(),
            subsectors.len(),
            nodes.len()
        );

        Ok(Self {
            vertexes,
            linedefs,
            sectors,
            sidedefs,
            subsectors,
            segments,
            nodes,
            start_node,
        })
    }

    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// For the simulation to move floors and change lights between frames
    pub fn sectors_mut(&mut self) -> &mut [Sector] {
        &mut self.sectors
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root of the BSP tree, the last node built
    pub fn start_node(&self) -> u32 {
        self.start_node
    }

    /// Find the subsector containing a point by walking the BSP tree
    ///
    /// Doom function name `R_PointInSubsector`
    pub fn point_in_subsector(&self, x: Fixed, y: Fixed) -> usize {
        let mut node_id = self.start_node;
        while node_id & IS_SSECTOR_MASK == 0 {
            let node = &self.nodes[node_id as usize];
            let side = node.point_on_side(x, y);
            node_id = node.children[side];
        }
        (node_id & !IS_SSECTOR_MASK) as usize
    }
}
