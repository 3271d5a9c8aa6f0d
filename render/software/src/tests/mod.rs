mod scene_tests;

use render_trait::{BufferSize, IndexedBuffer, PixelBuffer};

/// Counts the writes to every pixel
pub(crate) struct RecordingBuffer {
    inner: IndexedBuffer,
    pub writes: Vec<u16>,
}

impl RecordingBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            inner: IndexedBuffer::new(width, height),
            writes: vec![0; width * height],
        }
    }

    pub fn buf(&self) -> &[u8] {
        self.inner.buf()
    }
}

impl PixelBuffer for RecordingBuffer {
    fn size(&self) -> &BufferSize {
        self.inner.size()
    }

    fn clear_with_colour(&mut self, colour: u8) {
        self.inner.clear_with_colour(colour);
        self.writes.fill(0);
    }

    fn set_pixel(&mut self, x: usize, y: usize, colour: u8) {
        let index = self.inner.get_buf_index(x, y);
        self.writes[index] += 1;
        self.inner.set_pixel(x, y, colour);
    }

    fn read_pixel(&self, x: usize, y: usize) -> u8 {
        self.inner.read_pixel(x, y)
    }

    fn get_buf_index(&self, x: usize, y: usize) -> usize {
        self.inner.get_buf_index(x, y)
    }
}

/// Pixels of one picture, found by the hue bits
pub(crate) fn count_hue(buf: &[u8], hue: u8) -> usize {
    buf.iter().filter(|c| **c & 0xf0 == hue).count()
}
