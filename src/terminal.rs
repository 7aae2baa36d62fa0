use crate::error::Result;
use crate::primitive::Scene;
use crate::raster::{replay, Canvas};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::size,
};
use image::RgbaImage;
use std::io::{self, stdout, Write};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// Terminal abstraction for printing a rendered tree
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
}

/// A single cell in the terminal buffer
#[derive(Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

impl Terminal {
    /// Buffer matching the current terminal, leaving one row for the prompt
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;
        Ok(Self::with_size(width, height.saturating_sub(1)))
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let buffer = vec![vec![Cell::default(); width as usize]; height as usize];
        Self {
            width,
            height,
            buffer,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Replay the scene at the largest scale that fits, two pixels per cell
    pub fn draw_scene(&mut self, scene: &Scene) -> Result<()> {
        if self.width == 0 || self.height == 0 || scene.width == 0 || scene.height == 0 {
            return Ok(());
        }

        let fit = (self.width as f64 / scene.width as f64)
            .min(self.height as f64 * 2.0 / scene.height as f64);
        let mut canvas = Canvas::for_scene(scene, fit)?;
        replay(scene, &mut canvas);
        self.blit(&canvas.into_image());
        Ok(())
    }

    fn blit(&mut self, image: &RgbaImage) {
        let (w, h) = image.dimensions();
        let left = (self.width as u32).saturating_sub(w) / 2;
        let pixel = |x: u32, y: u32| {
            let p = image.get_pixel(x, y).0;
            Color::Rgb { r: p[0], g: p[1], b: p[2] }
        };

        for row in 0..h.div_ceil(2) {
            for col in 0..w {
                let (x, y) = (left + col, row);
                if x >= self.width as u32 || y >= self.height as u32 {
                    continue;
                }
                let top = pixel(col, row * 2);
                let bottom = if row * 2 + 1 < h { Some(pixel(col, row * 2 + 1)) } else { None };
                self.buffer[y as usize][x as usize] = Cell {
                    ch: HALF_BLOCK,
                    fg: Some(top),
                    bg: bottom,
                };
            }
        }
    }

    /// Write the buffer with truecolor escapes
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.buffer {
            for cell in row {
                if let Some(fg) = cell.fg {
                    queue!(out, SetForegroundColor(fg))?;
                }
                if let Some(bg) = cell.bg {
                    queue!(out, SetBackgroundColor(bg))?;
                }
                queue!(out, Print(cell.ch), ResetColor)?;
            }
            queue!(out, Print('\n'))?;
        }
        out.flush()
    }

    /// Print buffer to stdout (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let stdout = stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)
    }
}
