//! The level graph, pictures and per frame inputs that the renderer reads.
//! Building these from WAD lumps is left to the caller, `prefab` has a few
//! maps built by hand.

mod flags;
mod map_data;
mod map_defs;
mod node;
mod pic;
pub mod prefab;
pub mod thing;

#[cfg(test)]
mod tests;

pub use flags::LineDefFlags;
pub use map_data::{
    IS_SSECTOR_MASK, LumpLineDef, LumpSegment, LumpSubSector, MapData, MapDataError, MapLumps,
};
pub use map_defs::{
    BOXBOTTOM, BOXLEFT, BOXRIGHT, BOXTOP, LineDef, Node, Sector, Segment, SideDef, SlopeType,
    SubSector, Vertex,
};
pub use node::point_on_side;
pub use pic::{
    Brightmap, COLOURMAP_LEN, Colour, Colourmap, FlatPic, INVERSECOLORMAP, NUMCOLORMAPS, PicColumn,
    PicData, PicDataError, Post, SKY_TEXTURE_MID, SpriteDef, SpriteFrame, SpritePic, WallPic,
};
pub use thing::{FF_FRAMEMASK, FF_FULLBRIGHT, MF_TRANSSHIFT, MapObjFlag, MapObject, PspDef, ViewPoint};
