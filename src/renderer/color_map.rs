//! Rasterizes color and height samples into display textures

use crate::constants::tile::BORDER;
use crate::world::{Color, HeightField, HeightMap};

/// Texel lookup between sample points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Point,
}

/// Addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
}

/// Point-filtered, edge-clamped RGBA texture.
///
/// Pixel `(x, y)` lives at `y * width + x`, matching height-field layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTexture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ColorTexture {
    pub fn filter_mode(&self) -> FilterMode {
        FilterMode::Point
    }

    pub fn wrap_mode(&self) -> WrapMode {
        WrapMode::Clamp
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Nearest-texel lookup; coordinates outside [0, 1] clamp to the edge
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let x = texel(u, self.width);
        let y = texel(v, self.height);
        self.pixel(x, y)
    }

    /// 8-bit copy for encoding or upload
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Rgba(self.pixel(x as usize, y as usize).to_rgba8())
        })
    }
}

#[inline]
fn texel(coordinate: f32, extent: usize) -> usize {
    let scaled = (coordinate * extent as f32).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(extent - 1)
    }
}

/// Turns color and height samples into [`ColorTexture`]s
pub struct ColorMapRasterizer;

impl ColorMapRasterizer {
    /// Wrap a row-major color buffer as a texture
    ///
    /// # Panics
    /// If the buffer does not hold exactly `width * height` colors.
    pub fn from_color_map(colors: &[Color], width: usize, height: usize) -> ColorTexture {
        assert!(width > 0 && height > 0, "texture must not be empty");
        assert_eq!(
            colors.len(),
            width * height,
            "color map of {} samples cannot fill {}x{}",
            colors.len(),
            width,
            height
        );
        ColorTexture {
            width,
            height,
            pixels: colors.to_vec(),
        }
    }

    /// Grayscale texture: black at 0, white at 1 and above
    pub fn from_height_map(heights: &HeightMap) -> ColorTexture {
        let pixels = heights
            .values()
            .iter()
            .map(|&h| Color::BLACK.lerp(Color::WHITE, h))
            .collect::<Vec<_>>();
        Self::from_color_map(&pixels, heights.width(), heights.height())
    }

    /// Band colors of the field's interior; the border ring is dropped.
    ///
    /// Mesh UVs span the interior, so with point sampling the vertex at
    /// interior cell `i` reads texel `i` and shared tile edges read the
    /// same noise cell on both sides.
    ///
    /// # Panics
    /// If the field has no interior.
    pub fn from_height_field(height_field: &HeightField) -> ColorTexture {
        let (width, height) = (height_field.width(), height_field.height());
        assert!(
            width > 2 * BORDER && height > 2 * BORDER,
            "{}x{} height field has no interior",
            width,
            height
        );
        let (inner_width, inner_height) = (width - 2 * BORDER, height - 2 * BORDER);

        let pixels = (BORDER..BORDER + inner_height)
            .flat_map(|y| (BORDER..BORDER + inner_width).map(move |x| height_field.color_at(x, y)))
            .collect::<Vec<_>>();
        Self::from_color_map(&pixels, inner_width, inner_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ColorTexture {
        let colors = vec![Color::BLACK, Color::WHITE, Color::WHITE, Color::BLACK];
        ColorMapRasterizer::from_color_map(&colors, 2, 2)
    }

    #[test]
    fn test_point_sampling() {
        let texture = checker();
        assert_eq!(texture.sample(0.1, 0.1), Color::BLACK);
        assert_eq!(texture.sample(0.6, 0.1), Color::WHITE);
        assert_eq!(texture.sample(0.1, 0.6), Color::WHITE);
        assert_eq!(texture.sample(0.49, 0.51), Color::WHITE);
    }

    #[test]
    fn test_sampling_clamps_instead_of_wrapping() {
        let texture = checker();
        assert_eq!(texture.sample(-0.5, 0.0), Color::BLACK);
        assert_eq!(texture.sample(1.5, 0.0), Color::WHITE);
        assert_eq!(texture.sample(1.0, 1.0), Color::BLACK);
        assert_eq!(texture.sample(f32::NAN, 0.0), Color::BLACK);
        assert_eq!(texture.wrap_mode(), WrapMode::Clamp);
        assert_eq!(texture.filter_mode(), FilterMode::Point);
    }

    #[test]
    fn test_height_map_is_grayscale() {
        let heights = HeightMap::from_values(3, 1, vec![0.0, 0.5, 1.4]);
        let texture = ColorMapRasterizer::from_height_map(&heights);
        assert_eq!(texture.pixel(0, 0), Color::BLACK);
        assert_eq!(texture.pixel(1, 0), Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(texture.pixel(2, 0), Color::WHITE);
    }

    #[test]
    fn test_rgba_image_layout() {
        let image = checker().to_rgba_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_height_field_texture_drops_border_ring() {
        let size = 5;
        let heights = HeightMap::new(size, size);
        let colors = (0..size * size)
            .map(|i| Color::new(i as f32 / 100.0, 0.0, 0.0, 1.0))
            .collect::<Vec<_>>();
        let field = HeightField::new(heights, colors);

        let texture = ColorMapRasterizer::from_height_field(&field);
        assert_eq!((texture.width(), texture.height()), (3, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(texture.pixel(x, y), field.color_at(x + 1, y + 1));
            }
        }
    }

    #[test]
    fn test_interior_uvs_land_on_their_own_texel() {
        // uv = i / (n - 1) must read texel i for every interior cell
        for n in [3usize, 23, 95, 239] {
            let colors = (0..n).map(|i| Color::new(i as f32, 0.0, 0.0, 1.0)).collect::<Vec<_>>();
            let texture = ColorMapRasterizer::from_color_map(&colors, n, 1);
            for i in 0..n {
                let u = i as f32 / (n - 1) as f32;
                assert_eq!(texture.sample(u, 0.0), colors[i], "n {} texel {}", n, i);
            }
        }
    }

    #[test]
    #[should_panic(expected = "cannot fill")]
    fn test_mismatched_buffer_panics() {
        ColorMapRasterizer::from_color_map(&[Color::BLACK; 3], 2, 2);
    }
}
