//! The preview canvas: the latest clipboard image scaled into the viewport,
//! with the timer band composited on top.
//!
//! Drawing is expressed as a list of [`PaintOp`]s which the surface then
//! rasterizes into its own framebuffer. The UI only uploads that framebuffer.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::timer::TimerDisplay;

pub const BACKGROUND: Rgba<u8> = Rgba([238, 238, 238, 255]);
pub const TIMER_COLOR: Rgba<u8> = Rgba([255, 51, 204, 128]);

/// Where a scaled image lands inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Clear,
    Image(Placement),
    /// Timer rows `[top, bottom)`.
    Band { top: u32, bottom: u32 },
}

/// Largest aspect-preserving size of `image` that fits `viewport`, centered.
pub fn fit(image: (u32, u32), viewport: (u32, u32)) -> Option<Placement> {
    let (ow, oh) = (u64::from(image.0), u64::from(image.1));
    let (vw, vh) = (u64::from(viewport.0), u64::from(viewport.1));
    if ow == 0 || oh == 0 || vw == 0 || vh == 0 {
        return None;
    }
    let (width, height) = if ow * vh >= vw * oh {
        (vw, (oh * vw / ow).max(1))
    } else {
        ((ow * vh / oh).max(1), vh)
    };
    Some(Placement {
        x: ((vw - width) / 2) as u32,
        y: ((vh - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    })
}

/// Operations for a full redraw of `bitmap` into `viewport`, without the timer band.
pub fn render(bitmap: Option<&Bitmap>, viewport: (u32, u32)) -> Vec<PaintOp> {
    let mut ops = vec![PaintOp::Clear];
    if let Some(placement) = bitmap.and_then(|b| fit(b.dimensions(), viewport)) {
        ops.push(PaintOp::Image(placement));
    }
    ops
}

#[derive(Debug)]
pub struct PreviewSurface {
    frame: RgbaImage,
    bitmap: Option<Arc<Bitmap>>,
    timer: TimerDisplay,
    needs_redraw: bool,
    generation: u64,
}

impl PreviewSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND),
            bitmap: None,
            timer: TimerDisplay::new(),
            needs_redraw: true,
            generation: 0,
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Bumped every time the framebuffer changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bitmap(&self) -> Option<&Arc<Bitmap>> {
        self.bitmap.as_ref()
    }

    pub fn timer(&self) -> &TimerDisplay {
        &self.timer
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_bitmap(&mut self, bitmap: Option<Arc<Bitmap>>) {
        self.bitmap = bitmap;
        self.needs_redraw = true;
    }

    /// Returns `false` when the size did not change.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if self.frame.dimensions() == (width, height) {
            return false;
        }
        self.frame = RgbaImage::from_pixel(width, height, BACKGROUND);
        self.needs_redraw = true;
        true
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
        self.needs_redraw = true;
    }

    /// One timer second: grows the band, or redraws everything on a new minute.
    pub fn tick(&mut self) -> Vec<PaintOp> {
        if self.timer.advance() {
            self.needs_redraw = true;
        }
        self.paint()
    }

    /// Brings the framebuffer up to date and returns what was drawn.
    pub fn paint(&mut self) -> Vec<PaintOp> {
        let mut ops = Vec::new();
        if self.needs_redraw {
            ops = render(self.bitmap.as_deref(), self.viewport());
            self.timer.rewind();
            self.needs_redraw = false;
        }
        if let Some((top, bottom)) = self.timer.take_band(self.frame.height()) {
            ops.push(PaintOp::Band { top, bottom });
        }
        for op in &ops {
            self.apply(op);
        }
        if !ops.is_empty() {
            self.generation += 1;
        }
        ops
    }

    fn apply(&mut self, op: &PaintOp) {
        match *op {
            PaintOp::Clear => {
                for pixel in self.frame.pixels_mut() {
                    *pixel = BACKGROUND;
                }
            }
            PaintOp::Image(placement) => {
                if let Some(bitmap) = &self.bitmap {
                    let scaled = imageops::resize(
                        bitmap.as_image(),
                        placement.width,
                        placement.height,
                        FilterType::Triangle,
                    );
                    imageops::overlay(
                        &mut self.frame,
                        &scaled,
                        i64::from(placement.x),
                        i64::from(placement.y),
                    );
                }
            }
            PaintOp::Band { top, bottom } => {
                let width = self.frame.width();
                let bottom = bottom.min(self.frame.height());
                for y in top..bottom {
                    for x in 0..width {
                        let pixel = self.frame.get_pixel_mut(x, y);
                        *pixel = blend(*pixel, TIMER_COLOR);
                    }
                }
            }
        }
    }
}

fn blend(under: Rgba<u8>, over: Rgba<u8>) -> Rgba<u8> {
    let alpha = u16::from(over[3]);
    let mix = |a: u8, b: u8| ((u16::from(b) * alpha + u16::from(a) * (255 - alpha)) / 255) as u8;
    Rgba([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
        under[3],
    ])
}
