//! Error types for the driver
//!
//! Configuration problems are caught synchronously when a display is
//! created and never retried; geometric edge cases (off-screen draws) are
//! not errors at all - they are clipped by the compositor. Bus failures
//! surface through [`Error::Interface`], preserving the transport's own
//! error type.
//!
//! ## Example
//!
//! ```
//! use monopanel::{Display, Error, Rotation, Ssd1306};
//! # use embedded_hal::delay::DelayNs;
//! # #[derive(Debug)]
//! # struct NullBus;
//! # impl monopanel::DisplayInterface for NullBus {
//! #     type Error = core::convert::Infallible;
//! #     fn initialize(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
//! #     fn write_command(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // A buffer too small for 128x64 pixels
//! let mut buffer = [0u8; 16];
//! let result = Display::new(NullBus, Ssd1306, Rotation::Rotate0, &mut buffer[..]);
//! assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
//! ```

use crate::interface::DisplayInterface;

/// Errors that can occur when creating or driving a display
///
/// Generic over the interface type to preserve the specific bus error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Bus error (SPI/I2C/GPIO)
    ///
    /// Wraps the underlying hardware error from the
    /// [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Panel too small to drive
    ///
    /// Both dimensions must be at least 8 pixels; smaller panels cannot
    /// hold a single packed byte.
    UnsupportedPanel {
        /// Physical width in pixels
        width: u16,
        /// Physical height in pixels
        height: u16,
    },
    /// Supplied framebuffer storage is smaller than the panel needs
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Page span exceeds the refresh scratch buffer
    ///
    /// See [`MAX_PAGE_SPAN`](crate::model::MAX_PAGE_SPAN).
    SpanTooLong {
        /// Bytes one page transfer would need
        span: usize,
        /// Scratch buffer capacity
        max: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "interface error"),
            Self::UnsupportedPanel { width, height } => {
                write!(f, "unsupported panel size: {width}x{height}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "framebuffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::SpanTooLong { span, max } => {
                write!(f, "page span {span} exceeds scratch capacity {max}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}
