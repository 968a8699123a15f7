//! Monochrome Panel Display Engine
//!
//! A framebuffer engine for monochrome (and quasi-grayscale) dot-matrix
//! OLED/LCD panels: it keeps a shadow framebuffer in MCU memory, renders
//! text, bitmaps, shapes and sprite animations into it, and streams the
//! result to the panel through its page-addressed refresh protocol.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 SPI and I2C transports
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Built-in descriptors for SSD1306, SSD1312, SH1107, SH1108, SH1122
//! - 0/90/180/270 degree rotation over both panel memory layouts
//! - Pixel-exact clipping for partially off-screen draws
//! - Tick-driven sprite animation scheduling (with `alloc` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use monopanel::{Display, DisplayInterface, Rotation, Ssd1306};
//! # use embedded_hal::delay::DelayNs;
//! # struct NullBus;
//! # impl DisplayInterface for NullBus {
//! #     type Error = core::convert::Infallible;
//! #     fn initialize(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
//! #     fn write_command(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct NullDelay;
//! # impl DelayNs for NullDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! // Framebuffer storage: static memory or a Vec, caller's choice
//! let mut buffer = [0u8; 128 * 64 / 8];
//!
//! let mut display = match Display::new(NullBus, Ssd1306, Rotation::Rotate0, &mut buffer[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! let mut delay = NullDelay;
//! let _ = display.startup(&mut delay);
//!
//! display.draw_rect(0, 0, 128, 64, 1, false);
//! display.fill_area(4, 4, 120, 12, true);
//! let _ = display.refresh();
//! ```
//!
//! Drawing happens in logical coordinates; rotation and the panel's
//! memory organization are reconciled by the transform selected at
//! creation, so the same rendering code runs on row-organized and
//! page-organized controllers in any orientation.

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Sprite animation objects and the per-display schedule (requires `alloc`)
#[cfg(feature = "alloc")]
pub mod anim;
/// Shared page-mode command definitions
pub mod command;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Glyph source trait and table-backed fonts
pub mod font;
/// Shadow framebuffer and bit addressing
pub mod frame;
/// Drawing operations: text, bitmaps, shapes
pub mod graphics;
/// Monochrome bitmap images
pub mod image;
/// Hardware interface abstraction
pub mod interface;
/// Panel model descriptor trait
pub mod model;
/// Built-in panel descriptors
pub mod models;
/// Rotation and the coordinate transform engine
pub mod transform;

#[cfg(feature = "alloc")]
pub use anim::{AnimError, Animation, InstanceHandle, Schedule, Tick};
pub use display::Display;
pub use error::Error;
pub use font::{BitmapFont, Font};
pub use frame::{Frame, FrameView};
pub use image::MonoImage;
pub use interface::{DisplayInterface, I2cInterface, Interface, InterfaceError};
pub use model::{Layout, Model, MAX_PAGE_SPAN};
pub use models::{Sh1107, Sh1108, Sh1122, Ssd1306, Ssd1312};
pub use transform::Rotation;
