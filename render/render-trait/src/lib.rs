use level::{MapData, MapObject, PicData, ViewPoint};
use math::{FRACUNIT, Fixed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSize {
    width_usize: usize,
    height_usize: usize,
    width: i32,
    height: i32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width_usize: width,
            height_usize: height,
            width: width as i32,
            height: height as i32,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn width_usize(&self) -> usize {
        self.width_usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height_usize
    }
}

/// A buffer of palette indexes
pub trait PixelBuffer {
    fn size(&self) -> &BufferSize;
    fn clear_with_colour(&mut self, colour: u8);
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8);
    fn read_pixel(&self, x: usize, y: usize) -> u8;
    /// Get an index point for this coord
    fn get_buf_index(&self, x: usize, y: usize) -> usize;
}

/// A plain row major buffer of palette indexes
#[derive(Debug, Clone)]
pub struct IndexedBuffer {
    size: BufferSize,
    buffer: Vec<u8>,
}

impl IndexedBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            size: BufferSize::new(width, height),
            buffer: vec![0; width * height],
        }
    }

    pub fn buf(&self) -> &[u8] {
        &self.buffer
    }

    /// Expand to RGB triplets through a palette
    pub fn to_rgb(&self, palette: &[[u8; 3]]) -> Vec<u8> {
        self.buffer
            .iter()
            .flat_map(|c| palette.get(*c as usize).copied().unwrap_or([*c; 3]))
            .collect()
    }
}

impl PixelBuffer for IndexedBuffer {
    #[inline(always)]
    fn size(&self) -> &BufferSize {
        &self.size
    }

    fn clear_with_colour(&mut self, colour: u8) {
        self.buffer.fill(colour);
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        let pos = self.get_buf_index(x, y);
        self.buffer[pos] = colour;
    }

    #[inline(always)]
    fn read_pixel(&self, x: usize, y: usize) -> u8 {
        self.buffer[self.get_buf_index(x, y)]
    }

    #[inline(always)]
    fn get_buf_index(&self, x: usize, y: usize) -> usize {
        y * self.size.width_usize() + x
    }
}

/// Horizontal resolution of the 3D view
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    #[default]
    High,
    /// Half the columns, each drawn two pixels wide
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub detail: Detail,
    /// Pixel aspect correction for the vertical projection, `FRACUNIT` is
    /// square pixels
    pub aspect: Fixed,
    /// Use the finer plane light tables
    pub smooth_lighting: bool,
    /// Alternate the out of bounds fill colour every few tics
    pub flashing_hom: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            detail: Detail::High,
            aspect: Fixed::new(FRACUNIT),
            smooth_lighting: false,
            flashing_hom: false,
        }
    }
}

/// Counts from one frame for a diagnostic overlay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Wall ranges stored, one per draw segment
    pub segs: usize,
    pub visplanes: usize,
    pub vissprites: usize,
    pub bsp_nodes: usize,
    /// Sprite columns that survived clipping and were drawn
    pub sprite_columns: usize,
    pub peak_visplanes: usize,
    pub peak_drawsegs: usize,
    pub peak_vissprites: usize,
}

pub trait PlayViewRenderer {
    /// Change the resolution or detail, all view tables are rebuilt
    fn set_view_size(&mut self, config: DisplayConfig);

    /// Doom function name `R_RenderPlayerView`
    fn render_player_view(
        &mut self,
        view: &ViewPoint,
        map: &MapData,
        things: &[MapObject],
        pic_data: &PicData,
        buffer: &mut impl PixelBuffer,
    ) -> FrameStats;
}

#[cfg(test)]
mod tests {
    use super::{BufferSize, IndexedBuffer, PixelBuffer};

    #[test]
    fn pixels_are_row_major() {
        let mut buffer = IndexedBuffer::new(4, 3);
        assert_eq!(*buffer.size(), BufferSize::new(4, 3));
        assert_eq!(buffer.get_buf_index(1, 2), 9);
        buffer.set_pixel(1, 2, 7);
        assert_eq!(buffer.buf()[9], 7);
        assert_eq!(buffer.read_pixel(1, 2), 7);
        buffer.clear_with_colour(3);
        assert!(buffer.buf().iter().all(|c| *c == 3));
    }

    #[test]
    fn rgb_through_palette() {
        let mut buffer = IndexedBuffer::new(2, 1);
        buffer.set_pixel(0, 0, 1);
        buffer.set_pixel(1, 0, 5);
        // Past the end of the palette falls back to gray
        assert_eq!(buffer.to_rgb(&[[0; 3], [10, 20, 30]]), vec![10, 20, 30, 5, 5, 5]);
    }
}
