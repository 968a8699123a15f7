//! Glyph and bitmap compositor, shape primitives
//!
//! Drawing methods on [`Display`], all working in logical coordinates with
//! pixel-exact clipping against the visible bounds. Partially off-screen
//! draws render their visible part; fully off-screen draws are no-ops, not
//! errors.
//!
//! With the `graphics` feature the display also implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) over
//! [`BinaryColor`](embedded_graphics_core::pixelcolor::BinaryColor), so
//! embedded-graphics primitives, text, and images compose into the same
//! framebuffer.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use embedded_hal::delay::DelayNs;
//! # use monopanel::{Display, DisplayInterface, Rotation, Ssd1306};
//! # struct NullBus;
//! # impl DisplayInterface for NullBus {
//! #     type Error = core::convert::Infallible;
//! #     fn initialize(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
//! #     fn write_command(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let mut buffer = [0u8; 128 * 64 / 8];
//! let mut display = match Display::new(NullBus, Ssd1306, Rotation::Rotate0, &mut buffer[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! // A bordered box with a filled bar inside
//! display.draw_rect(0, 0, 128, 64, 1, false);
//! display.fill_area(4, 4, 120, 12, true);
//! let _ = display.refresh();
//! ```

use crate::display::Display;
use crate::font::Font;
use crate::image::MonoImage;
use crate::interface::DisplayInterface;
use crate::model::Model;

impl<I, M, B> Display<I, M, B>
where
    I: DisplayInterface,
    M: Model,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Composite one byte-packed source into the framebuffer with clipping
    ///
    /// Walks only rows and 8-pixel groups intersecting the visible window,
    /// masking off out-of-window bits at either edge. Returns the number
    /// of horizontal pixels actually drawn.
    fn blit(&mut self, x: i32, y: i32, width: u16, height: u16, data: &[u8], reverse: bool) -> u16 {
        let display_width = i32::from(self.frame.width());
        let display_height = i32::from(self.frame.height());
        let w = i32::from(width);
        let h = i32::from(height);

        // Fully off-screen is not an error, just nothing to do
        if x >= display_width || y >= display_height || x + w <= 0 || y + h <= 0 {
            return 0;
        }

        let row_bytes = (width as usize + 7) / 8;
        if data.len() < row_bytes * height as usize {
            log::error!(
                "source data too short: {} bytes for {}x{}",
                data.len(),
                width,
                height
            );
            return 0;
        }

        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + w).min(display_width);
        let end_y = (y + h).min(display_height);
        let displayed_width = (end_x - start_x) as u16;

        for row in 0..h {
            if y + row < start_y || y + row >= end_y {
                continue;
            }
            let row_offset = row as usize * row_bytes;
            let mut left_bits = w;
            let mut x_offset = 0i32;

            for byte_index in 0..row_bytes {
                let src = data[row_offset + byte_index];
                let bits = left_bits.min(8);

                if x + x_offset + 8 > start_x && x + x_offset < end_x {
                    let visible_start = if x + x_offset < start_x {
                        start_x - (x + x_offset)
                    } else {
                        0
                    };
                    let visible_end = if x + x_offset + bits > end_x {
                        end_x - (x + x_offset)
                    } else {
                        bits
                    };
                    if visible_end > visible_start {
                        let mut masked = src;
                        if visible_start > 0 {
                            masked &= 0xFF >> visible_start;
                        }
                        if visible_end < 8 {
                            masked &= 0xFF << (8 - visible_end);
                        }
                        self.frame.set_bits(
                            (x + x_offset + visible_start) as u16,
                            (y + row) as u16,
                            masked << visible_start,
                            (visible_end - visible_start) as u8,
                            reverse,
                        );
                    }
                }

                left_bits -= bits;
                x_offset += 8;
            }
        }

        displayed_width
    }

    /// Draw one character
    ///
    /// Returns `None` when the font has no glyph for `ch` (the caller
    /// skips the character), otherwise the number of horizontal pixels
    /// actually drawn - less than the cell width when clipped, zero when
    /// fully off-screen.
    pub fn draw_char(&mut self, x: i32, y: i32, ch: char, font: &dyn Font, reverse: bool) -> Option<u16> {
        let Some(glyph) = font.glyph(ch) else {
            log::warn!("no glyph for {:#06x}", ch as u32);
            return None;
        };
        Some(self.blit(x, y, font.width(), font.height(), glyph, reverse))
    }

    /// Draw a string
    ///
    /// Code points are decoded from the UTF-8 input; ASCII characters use
    /// `ascii_font`, everything else `wide_font`, falling back to the
    /// display's default fonts. The cursor advances by the font's nominal
    /// cell width regardless of clipping, and rendering stops once the
    /// cursor passes the right edge. Characters without a glyph or a
    /// usable font are skipped.
    ///
    /// Returns the number of characters that produced visible pixels.
    pub fn draw_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        ascii_font: Option<&dyn Font>,
        wide_font: Option<&dyn Font>,
        reverse: bool,
    ) -> usize {
        if y >= i32::from(self.frame.height()) {
            return 0;
        }

        let mut count = 0;
        let mut cursor_x = x;
        for ch in text.chars() {
            let font = if ch.is_ascii() {
                ascii_font.or(self.default_ascii)
            } else {
                wide_font.or(self.default_wide)
            };
            let Some(font) = font else {
                log::warn!("no font configured for {:#06x}", ch as u32);
                continue;
            };
            match self.draw_char(cursor_x, y, ch, font, reverse) {
                Some(width) => {
                    if width > 0 {
                        count += 1;
                    }
                    // Advance by the nominal cell width even when clipped
                    cursor_x += i32::from(font.width());
                    if cursor_x >= i32::from(self.frame.width()) {
                        break;
                    }
                }
                // Missing glyph: skip without advancing
                None => {}
            }
        }
        count
    }

    /// Draw a monochrome bitmap
    ///
    /// Returns the number of horizontal pixels actually drawn; zero when
    /// fully off-screen.
    pub fn draw_image(&mut self, x: i32, y: i32, image: &MonoImage<'_>, reverse: bool) -> u16 {
        self.blit(x, y, image.width(), image.height(), image.data(), reverse)
    }

    /// Draw a horizontal line of `length` pixels and `thickness` rows
    ///
    /// `reverse` clears pixels instead of setting them. Clipped against
    /// the display bounds; degenerate or fully off-screen lines are no-ops.
    pub fn draw_hline(&mut self, x: i32, y: i32, length: u16, thickness: u16, reverse: bool) {
        self.fill_span(x, y, i32::from(length), i32::from(thickness), !reverse);
    }

    /// Draw a vertical line of `length` pixels and `thickness` columns
    ///
    /// `reverse` clears pixels instead of setting them.
    pub fn draw_vline(&mut self, x: i32, y: i32, length: u16, thickness: u16, reverse: bool) {
        self.fill_span(x, y, i32::from(thickness), i32::from(length), !reverse);
    }

    /// Draw a rectangle with a border `border` pixels wide
    ///
    /// When the doubled border reaches or exceeds either dimension there
    /// is no interior left, and the rectangle degrades to a solid fill.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u16, height: u16, border: u16, reverse: bool) {
        if width == 0 || height == 0 || border == 0 {
            return;
        }
        if u32::from(border) * 2 >= u32::from(width) || u32::from(border) * 2 >= u32::from(height) {
            self.fill_span(x, y, i32::from(width), i32::from(height), !reverse);
            return;
        }
        // Top, bottom, left, right, inset by the border thickness
        self.draw_hline(x, y, width, border, reverse);
        self.draw_hline(x, y + i32::from(height - border), width, border, reverse);
        self.draw_vline(x, y, height, border, reverse);
        self.draw_vline(x + i32::from(width - border), y, height, border, reverse);
    }

    /// Set or clear a rectangular area
    pub fn fill_area(&mut self, x: i32, y: i32, width: u16, height: u16, on: bool) {
        self.fill_span(x, y, i32::from(width), i32::from(height), on);
    }

    /// Clip a rectangle against the display and write its pixels
    fn fill_span(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        let display_width = i32::from(self.frame.width());
        let display_height = i32::from(self.frame.height());
        if w <= 0 || h <= 0 {
            return;
        }
        if x >= display_width || y >= display_height || x + w <= 0 || y + h <= 0 {
            log::debug!("span @({},{}) {}x{} outside display", x, y, w, h);
            return;
        }

        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + w).min(display_width);
        let end_y = (y + h).min(display_height);

        for cy in start_y..end_y {
            for cx in start_x..end_x {
                self.frame.set_bit(cx as u16, cy as u16, on);
            }
        }
    }
}

#[cfg(feature = "graphics")]
mod draw_target {
    use core::convert::Infallible;
    use embedded_graphics_core::{
        draw_target::DrawTarget,
        geometry::{OriginDimensions, Point, Size},
        pixelcolor::BinaryColor,
        prelude::Pixel,
    };

    use super::{Display, DisplayInterface, Model};

    impl<I, M, B> DrawTarget for Display<I, M, B>
    where
        I: DisplayInterface,
        M: Model,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
        where
            Iter: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(Point { x, y }, color) in pixels {
                if x < 0 || y < 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                if x >= u32::from(self.frame.width()) || y >= u32::from(self.frame.height()) {
                    continue;
                }
                self.frame.set_pixel(x as u16, y as u16, color.is_on());
            }
            Ok(())
        }
    }

    impl<I, M, B> OriginDimensions for Display<I, M, B>
    where
        I: DisplayInterface,
        M: Model,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        fn size(&self) -> Size {
            Size::new(u32::from(self.frame.width()), u32::from(self.frame.height()))
        }
    }
}
