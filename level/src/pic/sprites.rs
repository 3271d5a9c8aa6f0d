/// One animation frame of a sprite. Either a single patch for every view
/// angle, or eight rotations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    /// If false use 0 for any position.
    pub rotate: bool,
    /// Lump to use for view angles 0-7.
    pub lump: [Option<usize>; 8],
    /// Flip bit (1 = flip) to use for view angles 0-7.
    pub flip: [bool; 8],
}

impl SpriteFrame {
    /// The same patch from every angle
    pub fn single(lump: usize, flip: bool) -> Self {
        Self {
            rotate: false,
            lump: [Some(lump); 8],
            flip: [flip; 8],
        }
    }

    /// A patch per rotation, rotation 0 is the front of the thing
    pub fn rotations(rotations: [(usize, bool); 8]) -> Self {
        let mut frame = Self {
            rotate: true,
            lump: [None; 8],
            flip: [false; 8],
        };
        for (i, (lump, flip)) in rotations.into_iter().enumerate() {
            frame.lump[i] = Some(lump);
            frame.flip[i] = flip;
        }
        frame
    }

    pub(super) fn lumps(&self) -> impl Iterator<Item = usize> + '_ {
        self.lump.iter().flatten().copied()
    }
}

#[derive(Debug, Clone)]
pub struct SpriteDef {
    pub name: String,
    pub frames: Vec<SpriteFrame>,
}

impl SpriteDef {
    pub fn new(name: &str, frames: Vec<SpriteFrame>) -> Self {
        Self {
            name: name.to_string(),
            frames,
        }
    }
}
