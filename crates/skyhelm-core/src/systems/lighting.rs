/// Spin-synchronized day/night terminator synthesis.
///
/// A body close enough to the observer swaps its static day texture for a
/// cylindrical image repainted every tick: a night band and a day band joined
/// by two twilight blends, rotated to match the body's spin angle. All column
/// arithmetic wraps modulo the image width; one synthesis call paints the
/// full circumference exactly once (64 + 384 + 64 + 512 = 1024 columns).
use glam::Vec3;

use crate::core::orbit::TAU;

/// Columns in a cylindrical texture.
pub const CYL_COLS: usize = 1024;
/// Rows in a cylindrical texture.
pub const CYL_ROWS: usize = 512;

const TWILIGHT_SPAN: usize = 64;
const NIGHT_SPAN: usize = 384;
const DAY_SPAN: usize = 512;

/// Column-major RGB image buffer with column-span read/write.
///
/// Columns, not rows, are the unit of access: synthesis paints whole
/// columns, and wraparound at `width` is the caller's documented contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CylImage {
    width: usize,
    height: usize,
    /// Column-major: pixel (col, row) lives at `col * height + row`.
    pixels: Vec<Vec3>,
}

impl CylImage {
    /// A black image of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Vec3::ZERO)
    }

    /// An image of the given dimensions filled with one color.
    pub fn filled(width: usize, height: usize, color: Vec3) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build from a per-pixel function of (column, row).
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> Vec3) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for col in 0..width {
            for row in 0..height {
                pixels.push(f(col, row));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, col: usize, row: usize) -> Vec3 {
        self.pixels[col * self.height + row]
    }

    /// One full column as a contiguous slice.
    pub fn column(&self, col: usize) -> &[Vec3] {
        &self.pixels[col * self.height..(col + 1) * self.height]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [Vec3] {
        &mut self.pixels[col * self.height..(col + 1) * self.height]
    }

    /// Copy `count` whole columns from `src` starting at `col` in both
    /// images. Does not wrap — callers split wrapping spans themselves.
    pub fn copy_columns(&mut self, src: &CylImage, col: usize, count: usize) {
        debug_assert_eq!(self.height, src.height);
        let start = col * self.height;
        let end = (col + count) * self.height;
        self.pixels[start..end].copy_from_slice(&src.pixels[start..end]);
    }
}

#[cfg(feature = "textures")]
impl CylImage {
    /// Import from an 8-bit RGB image, mapping channels into [0, 1].
    pub fn from_rgb_image(img: &image::RgbImage) -> Self {
        Self::from_fn(img.width() as usize, img.height() as usize, |col, row| {
            let p = img.get_pixel(col as u32, row as u32);
            Vec3::new(
                p.0[0] as f32 / 255.0,
                p.0[1] as f32 / 255.0,
                p.0[2] as f32 / 255.0,
            )
        })
    }

    /// Export to an 8-bit RGB image, clamping channels into [0, 255].
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let p = self.pixel(x as usize, y as usize);
            image::Rgb([
                (p.x.clamp(0.0, 1.0) * 255.0) as u8,
                (p.y.clamp(0.0, 1.0) * 255.0) as u8,
                (p.z.clamp(0.0, 1.0) * 255.0) as u8,
            ])
        })
    }
}

/// Which image the presentation layer should bind for the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Far away: the static day texture, lit by the scene as usual.
    StaticDay,
    /// Close in: the synthesized output, self-lit (the day/night bands are
    /// baked into the pixels).
    Synthesized,
}

/// Per-body terminator synthesizer: day and night sources, the synthesized
/// output, and the activation state machine.
#[derive(Debug, Clone)]
pub struct Terminator {
    day: CylImage,
    night: CylImage,
    output: CylImage,
    /// Observer distance at or below which synthesis engages.
    activation_distance: f32,
    /// Fixed column offset aligning texture longitude zero with spin zero.
    column_offset: i32,
    active: bool,
}

impl Terminator {
    /// `activation_distance` is absolute (the owning body pre-multiplies its
    /// simulation radius). Day and night sources must share dimensions.
    pub fn new(day: CylImage, night: CylImage, column_offset: i32, activation_distance: f32) -> Self {
        debug_assert_eq!(day.width(), night.width());
        debug_assert_eq!(day.height(), night.height());
        let output = CylImage::new(day.width(), day.height());
        Self {
            day,
            night,
            output,
            activation_distance,
            column_offset,
            active: false,
        }
    }

    pub fn binding(&self) -> Binding {
        if self.active {
            Binding::Synthesized
        } else {
            Binding::StaticDay
        }
    }

    /// The image a renderer should currently display.
    pub fn current_image(&self) -> &CylImage {
        match self.binding() {
            Binding::StaticDay => &self.day,
            Binding::Synthesized => &self.output,
        }
    }

    pub fn activation_distance(&self) -> f32 {
        self.activation_distance
    }

    /// Per-tick update: handle the activation transitions, then repaint the
    /// output for the given spin angle when active.
    ///
    /// Both transitions happen exactly once per boundary crossing: moving out
    /// of range rebinds the static day image, moving into range switches to
    /// the synthesized binding.
    pub fn update(&mut self, spin_angle: f32, observer_distance: f32) {
        // most common case: too far away to matter
        if !self.active && observer_distance > self.activation_distance {
            return;
        }
        if self.active && observer_distance > self.activation_distance {
            self.active = false;
            return;
        }
        if !self.active {
            self.active = true;
        }
        self.synthesize(spin_angle);
    }

    /// Map a spin angle to the starting column, wrapped into [0, width).
    fn start_column(&self, spin_angle: f32) -> usize {
        let base = (spin_angle / TAU * self.day.width() as f32) as i64 + self.column_offset as i64;
        base.rem_euclid(self.day.width() as i64) as usize
    }

    fn synthesize(&mut self, spin_angle: f32) {
        let width = self.day.width();
        let mut col = self.start_column(spin_angle);

        // leading twilight: day fading into night as k rises
        for k in 0..TWILIGHT_SPAN {
            self.blend_column(col, k as f32 / TWILIGHT_SPAN as f32);
            col = (col + 1) % width;
        }

        col = self.copy_band(col, NIGHT_SPAN, false);

        // trailing twilight: night fading back into day
        for k in 0..TWILIGHT_SPAN {
            self.blend_column(col, 1.0 - k as f32 / TWILIGHT_SPAN as f32);
            col = (col + 1) % width;
        }

        self.copy_band(col, DAY_SPAN, true);
    }

    /// Write `day + (night - day) * weight` for every pixel of one column.
    fn blend_column(&mut self, col: usize, weight: f32) {
        let day = self.day.column(col);
        let night = self.night.column(col);
        let out = self.output.column_mut(col);
        for ((o, d), n) in out.iter_mut().zip(day).zip(night) {
            *o = *d + (*n - *d) * weight;
        }
    }

    /// Copy `span` columns from the day or night source, splitting once at
    /// the wrap. Returns the column after the band.
    fn copy_band(&mut self, col: usize, span: usize, from_day: bool) -> usize {
        let width = self.day.width();
        let src = if from_day { &self.day } else { &self.night };
        if col + span > width {
            let remainder = col + span - width;
            self.output.copy_columns(src, col, span - remainder);
            self.output.copy_columns(src, 0, remainder);
            remainder
        } else {
            self.output.copy_columns(src, col, span);
            (col + span) % width
        }
    }
}
