use math::Fixed;

pub const SIL_NONE: i32 = 0;
pub const SIL_BOTTOM: i32 = 1;
pub const SIL_TOP: i32 = 2;
pub const SIL_BOTH: i32 = 3;

/// The fixed array sizes of the classic renderer. The arenas here grow past
/// them, going over is only logged.
pub const MAXVISPLANES: usize = 128;
pub const MAXDRAWSEGS: usize = 256;
pub const MAXVISSPRITES: usize = 128;

/// Marks a `Visplane` column that has not been written, and a masked column
/// that has already been drawn.
pub const UNSET: i32 = i32::MAX;

/// Where a drawseg reads its sprite clip values from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipArray {
    /// Every column has the same value, `screenheightarray` and `negonearray`
    Constant(i32),
    /// Offset in to `openings`, adjusted so that `[x]` is the value for column x
    Openings(i32),
}

impl ClipArray {
    #[inline]
    pub fn get(&self, openings: &[i32], x: i32) -> i32 {
        match *self {
            ClipArray::Constant(v) => v,
            ClipArray::Openings(offset) => openings[(offset + x) as usize],
        }
    }
}

/// A wall range that was stored, kept for the sprite and masked texture
/// passes.
#[derive(Debug, Clone, Copy)]
pub struct DrawSeg {
    /// Index of the `Segment` in the map
    pub curline: usize,
    pub x1: i32,
    pub x2: i32,

    pub scale1: Fixed,
    pub scale2: Fixed,
    pub scalestep: Fixed,

    /// 0=none, 1=bottom, 2=top, 3=both
    pub silhouette: i32,
    /// do not clip sprites above this
    pub bsilheight: Fixed,
    /// do not clip sprites below this
    pub tsilheight: Fixed,

    pub sprtopclip: Option<ClipArray>,
    pub sprbottomclip: Option<ClipArray>,
    /// Offset in to `openings` of the texture column per screen column
    pub maskedtexturecol: Option<i32>,
}

impl DrawSeg {
    pub fn new(curline: usize) -> Self {
        DrawSeg {
            curline,
            x1: 0,
            x2: 0,
            scale1: Fixed::ZERO,
            scale2: Fixed::ZERO,
            scalestep: Fixed::ZERO,
            silhouette: SIL_NONE,
            bsilheight: Fixed::ZERO,
            tsilheight: Fixed::ZERO,
            sprtopclip: None,
            sprbottomclip: None,
            maskedtexturecol: None,
        }
    }
}

/// A range of screen columns that is solid from top to bottom
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClipRange {
    pub first: i32,
    pub last: i32,
}

/// Now what is a visplane, anyway?
///
/// A floor or ceiling area with one height, flat and light level. The column
/// arrays carry one column of padding on each side for the span builder.
#[derive(Clone)]
pub struct Visplane {
    pub height: Fixed,
    pub picnum: usize,
    pub lightlevel: i32,
    pub minx: i32,
    pub maxx: i32,
    top: Vec<i32>,
    bottom: Vec<i32>,
    /// Next plane in the same hash chain
    pub(crate) next: Option<usize>,
}

impl std::fmt::Debug for Visplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visplane")
            .field("height", &self.height)
            .field("picnum", &self.picnum)
            .field("lightlevel", &self.lightlevel)
            .field("minx", &self.minx)
            .field("maxx", &self.maxx)
            .finish_non_exhaustive()
    }
}

impl Visplane {
    pub fn new(view_width: usize) -> Self {
        Visplane {
            height: Fixed::ZERO,
            picnum: 0,
            lightlevel: 0,
            minx: view_width as i32,
            maxx: -1,
            top: vec![UNSET; view_width + 2],
            bottom: vec![0; view_width + 2],
            next: None,
        }
    }

    /// Reuse the storage for a new key and an empty range
    pub fn reset(&mut self, height: Fixed, picnum: usize, lightlevel: i32, view_width: usize) {
        self.height = height;
        self.picnum = picnum;
        self.lightlevel = lightlevel;
        self.minx = view_width as i32;
        self.maxx = -1;
        self.next = None;
        self.top.resize(view_width + 2, UNSET);
        self.bottom.resize(view_width + 2, 0);
        self.top.fill(UNSET);
    }

    /// Column `-1..=view_width`
    #[inline]
    pub fn top(&self, x: i32) -> i32 {
        self.top[(x + 1) as usize]
    }

    #[inline]
    pub fn bottom(&self, x: i32) -> i32 {
        self.bottom[(x + 1) as usize]
    }

    #[inline]
    pub fn set_column(&mut self, x: i32, top: i32, bottom: i32) {
        self.top[(x + 1) as usize] = top;
        self.bottom[(x + 1) as usize] = bottom;
    }

    #[inline]
    pub(crate) fn set_top(&mut self, x: i32, top: i32) {
        self.top[(x + 1) as usize] = top;
    }

    #[cfg(test)]
    pub fn same_key(&self, other: &Visplane) -> bool {
        self.height == other.height
            && self.picnum == other.picnum
            && self.lightlevel == other.lightlevel
    }

    #[cfg(test)]
    /// Columns that were given a top and bottom
    pub fn written_columns(&self) -> impl Iterator<Item = i32> + '_ {
        (self.minx.max(0)..=self.maxx).filter(|x| self.top(*x) != UNSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visplane_padding() {
        let mut pl = Visplane::new(320);
        assert_eq!(pl.top(-1), UNSET);
        assert_eq!(pl.top(320), UNSET);
        pl.set_column(0, 10, 20);
        pl.set_column(319, 5, 6);
        assert_eq!(pl.top(0), 10);
        assert_eq!(pl.bottom(0), 20);
        assert_eq!(pl.top(319), 5);
        assert_eq!(pl.minx, 320);
        assert_eq!(pl.maxx, -1);
    }

    #[test]
    fn reset_clears_columns() {
        let mut pl = Visplane::new(64);
        pl.set_column(3, 1, 2);
        pl.minx = 3;
        pl.maxx = 3;
        assert_eq!(pl.written_columns().collect::<Vec<_>>(), vec![3]);
        pl.reset(Fixed::from_int(8), 2, 160, 128);
        assert_eq!(pl.top(3), UNSET);
        assert_eq!(pl.top(128), UNSET);
        assert_eq!(pl.minx, 128);
        assert_eq!(pl.written_columns().count(), 0);
    }

    #[test]
    fn clip_array_lookup() {
        let openings = vec![7, 8, 9, 10];
        assert_eq!(ClipArray::Constant(-1).get(&openings, 100), -1);
        // Offset for a seg starting at column 5 with its first opening at 1
        let clip = ClipArray::Openings(1 - 5);
        assert_eq!(clip.get(&openings, 5), 8);
        assert_eq!(clip.get(&openings, 7), 10);
    }
}
