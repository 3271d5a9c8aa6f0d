//! Palette lookup and saving of the finished frame.

use image::RgbImage;
use level::Colour;
use render_trait::{IndexedBuffer, PixelBuffer};
use std::error::Error;
use std::path::Path;

/// Expand the palette indexes of a frame in to an RGB image. Indexes past the
/// end of the palette are drawn as gray.
pub fn frame_image(buffer: &IndexedBuffer, palette: &[Colour]) -> Option<RgbImage> {
    let size = buffer.size();
    RgbImage::from_raw(size.width() as u32, size.height() as u32, buffer.to_rgb(palette))
}

/// The format follows the extension of `path`, `.png` or `.ppm`
pub fn save_frame(buffer: &IndexedBuffer, palette: &[Colour], path: &Path) -> Result<(), Box<dyn Error>> {
    let Some(image) = frame_image(buffer, palette) else {
        return Err(format!("Frame of {:?} does not fit an RGB image", buffer.size()).into());
    };
    image.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{frame_image, save_frame};
    use image::Rgb;
    use render_trait::{IndexedBuffer, PixelBuffer};

    #[test]
    fn palette_is_applied() {
        let mut buffer = IndexedBuffer::new(2, 1);
        buffer.set_pixel(1, 0, 1);
        let image = frame_image(&buffer, &[[1, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(*image.get_pixel(0, 0), Rgb([1, 2, 3]));
        assert_eq!(*image.get_pixel(1, 0), Rgb([4, 5, 6]));
    }

    #[test]
    fn missing_colour_is_gray() {
        let mut buffer = IndexedBuffer::new(1, 1);
        buffer.set_pixel(0, 0, 9);
        let image = frame_image(&buffer, &[]).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgb([9, 9, 9]));
    }

    #[test]
    fn saved_png_reads_back() {
        let mut buffer = IndexedBuffer::new(4, 3);
        buffer.set_pixel(3, 2, 1);
        let path = std::env::temp_dir().join(format!("r4d-frame-{}.png", std::process::id()));
        save_frame(&buffer, &[[0, 0, 0], [200, 100, 50]], &path).unwrap();

        let image = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(*image.get_pixel(3, 2), Rgb([200, 100, 50]));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }
}
