//! Synthetic images for exercising color and shape recognition
//!
//! Three 600x400 images are available: color blocks, basic geometric shapes,
//! and a busier composition with a gradient, overlapping circles and a grid.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use phf::phf_map;
use tracing::info;

use crate::error::EncodeError;

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 400;

/// Named colors used by the generated images
pub static NAMED_COLORS: phf::Map<&'static str, [u8; 3]> = phf_map! {
    "white" => [255, 255, 255],
    "black" => [0, 0, 0],
    "lightgray" => [211, 211, 211],
    "red" => [255, 0, 0],
    "darkred" => [139, 0, 0],
    "green" => [0, 128, 0],
    "darkgreen" => [0, 100, 0],
    "blue" => [0, 0, 255],
    "darkblue" => [0, 0, 139],
    "yellow" => [255, 255, 0],
    "orange" => [255, 165, 0],
    "darkorange" => [255, 140, 0],
    "purple" => [128, 0, 128],
    "darkviolet" => [148, 0, 211],
    "cyan" => [0, 255, 255],
    "darkcyan" => [0, 139, 139],
    "pink" => [255, 192, 203],
    "deeppink" => [255, 20, 147],
};

/// Color blocks drawn on the color test image, in drawing order
pub const COLOR_BLOCKS: [(&str, [u8; 3]); 8] = [
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("cyan", [0, 255, 255]),
    ("pink", [255, 192, 203]),
];

fn named(name: &str) -> Rgb<u8> {
    Rgb(NAMED_COLORS.get(name).copied().unwrap_or([0, 0, 0]))
}

/// The kinds of generated test image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestImageKind {
    Color,
    Shape,
    Complex,
}

impl TestImageKind {
    pub const ALL: [TestImageKind; 3] = [Self::Color, Self::Shape, Self::Complex];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Color => "color_test.png",
            Self::Shape => "shape_test.png",
            Self::Complex => "complex_test.png",
        }
    }

    pub fn render(&self) -> RgbImage {
        match self {
            Self::Color => color_test_image(),
            Self::Shape => shape_test_image(),
            Self::Complex => complex_test_image(),
        }
    }
}

/// Write all test images as PNG files into `dir`
pub fn write_test_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, EncodeError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(TestImageKind::ALL.len());
    for kind in TestImageKind::ALL {
        let path = dir.join(kind.file_name());
        kind.render().save(&path)?;
        info!("Created {:?} test image: {}", kind, path.display());
        written.push(path);
    }
    Ok(written)
}

/// Eight 140px color blocks in two rows on white
pub fn color_test_image() -> RgbImage {
    let mut canvas = Canvas::new(named("white"));
    let block = 150;
    for (i, (_, color)) in COLOR_BLOCKS.iter().enumerate() {
        let x = (i as i32 % 4) * block;
        let y = (i as i32 / 4) * block;
        canvas.fill_rect(x, y, x + block - 10, y + block - 10, Rgb(*color));
    }
    canvas.into_image()
}

/// Circle, square, triangle, rectangle, pentagon, star, hexagon and diamond
pub fn shape_test_image() -> RgbImage {
    let mut canvas = Canvas::new(named("white"));

    canvas.fill_ellipse(50, 50, 150, 150, named("red"));
    canvas.outline_ellipse(50, 50, 150, 150, 2, named("darkred"));

    canvas.fill_rect(200, 50, 300, 150, named("blue"));
    canvas.outline_polygon(&rect_points(200, 50, 300, 150), 2, named("darkblue"));

    let triangle = [(350, 150), (400, 50), (450, 150)];
    canvas.fill_polygon(&triangle, named("green"));
    canvas.outline_polygon(&triangle, 2, named("darkgreen"));

    canvas.fill_rect(50, 200, 200, 280, named("yellow"));
    canvas.outline_polygon(&rect_points(50, 200, 200, 280), 2, named("orange"));

    let pentagon = [(300, 200), (350, 220), (370, 270), (330, 300), (270, 270)];
    canvas.fill_polygon(&pentagon, named("purple"));
    canvas.outline_polygon(&pentagon, 2, named("darkviolet"));

    let star = [
        (450, 200),
        (460, 230),
        (490, 240),
        (470, 260),
        (480, 290),
        (450, 270),
        (420, 290),
        (430, 260),
        (410, 240),
        (440, 230),
    ];
    canvas.fill_polygon(&star, named("orange"));
    canvas.outline_polygon(&star, 2, named("darkorange"));

    let hexagon = [(100, 320), (150, 320), (175, 350), (150, 380), (100, 380), (75, 350)];
    canvas.fill_polygon(&hexagon, named("cyan"));
    canvas.outline_polygon(&hexagon, 2, named("darkcyan"));

    // Runs off the bottom edge
    let diamond = [(300, 320), (350, 370), (300, 420), (250, 370)];
    canvas.fill_polygon(&diamond, named("pink"));
    canvas.outline_polygon(&diamond, 2, named("deeppink"));

    canvas.into_image()
}

/// Blue-white gradient bands, overlapping circles, a white grid and dark bars
pub fn complex_test_image() -> RgbImage {
    let mut canvas = Canvas::new(named("lightgray"));

    for i in 0..10 {
        let v = (255 - i * 20) as u8;
        canvas.fill_rect(i * 60, 0, (i + 1) * 60, 400, Rgb([v, v, 255]));
    }

    for i in 0..3 {
        for j in 0..2 {
            let x = 100 + i * 150;
            let y = 100 + j * 150;
            canvas.fill_ellipse(x, y, x + 80, y + 80, named("red"));
            canvas.outline_ellipse(x, y, x + 80, y + 80, 2, named("darkred"));
        }
    }

    for x in (0..600).step_by(50) {
        canvas.line((x, 0), (x, 400), 1, named("white"));
    }
    for y in (0..400).step_by(50) {
        canvas.line((0, y), (600, y), 1, named("white"));
    }

    for (x, y, w, h) in [(50, 50, 80, 20), (150, 80, 60, 15), (250, 60, 90, 18), (380, 90, 70, 22)] {
        canvas.fill_rect(x, y, x + w, y + h, named("black"));
    }

    canvas.into_image()
}

fn rect_points(x0: i32, y0: i32, x1: i32, y1: i32) -> [(i32, i32); 4] {
    [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
}

/// Minimal clipped raster drawing on a fixed-size RGB image
struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn new(background: Rgb<u8>) -> Self {
        Self {
            img: RgbImage::from_pixel(WIDTH, HEIGHT, background),
        }
    }

    fn into_image(self) -> RgbImage {
        self.img
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Inclusive bounds on both axes
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
        let (cx, cy, rx, ry) = ellipse_params(x0, y0, x1, y1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside_ellipse(x, y, cx, cy, rx, ry) {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn outline_ellipse(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: Rgb<u8>) {
        let (cx, cy, rx, ry) = ellipse_params(x0, y0, x1, y1);
        let w = f64::from(width);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside_ellipse(x, y, cx, cy, rx, ry)
                    && !inside_ellipse(x, y, cx, cy, rx - w, ry - w)
                {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Even-odd fill sampled at pixel centers
    fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgb<u8>) {
        let (min_x, max_x) = bounds(points.iter().map(|p| p.0));
        let (min_y, max_y) = bounds(points.iter().map(|p| p.1));
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if inside_polygon(f64::from(x) + 0.5, f64::from(y) + 0.5, points) {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn outline_polygon(&mut self, points: &[(i32, i32)], width: i32, color: Rgb<u8>) {
        for (i, &start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            self.line(start, end, width, color);
        }
    }

    /// Bresenham line stamped with a `width`-sized square
    fn line(&mut self, from: (i32, i32), to: (i32, i32), width: i32, color: Rgb<u8>) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = (width - 1) / 2;

        loop {
            self.fill_rect(x - half, y - half, x - half + width - 1, y - half + width - 1, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

fn bounds(values: impl Iterator<Item = i32>) -> (i32, i32) {
    values.fold((i32::MAX, i32::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn ellipse_params(x0: i32, y0: i32, x1: i32, y1: i32) -> (f64, f64, f64, f64) {
    let cx = f64::from(x0 + x1) / 2.0;
    let cy = f64::from(y0 + y1) / 2.0;
    let rx = f64::from(x1 - x0) / 2.0;
    let ry = f64::from(y1 - y0) / 2.0;
    (cx, cy, rx, ry)
}

fn inside_ellipse(x: i32, y: i32, cx: f64, cy: f64, rx: f64, ry: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (f64::from(x) - cx) / rx;
    let ny = (f64::from(y) - cy) / ry;
    nx * nx + ny * ny <= 1.0
}

fn inside_polygon(px: f64, py: f64, points: &[(i32, i32)]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (f64::from(points[i].0), f64::from(points[i].1));
        let (xj, yj) = (f64::from(points[j].0), f64::from(points[j].1));
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
