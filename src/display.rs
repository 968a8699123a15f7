//! Core display operations
//!
//! [`Display`] ties the pieces together: it owns the bus interface, the
//! panel model descriptor, and the shadow framebuffer, and exposes the
//! lifecycle operations - creation with validation, startup, refresh,
//! fills, and teardown. Drawing operations (text, bitmaps, shapes) live in
//! [`graphics`](crate::graphics) as further methods on this type.
//!
//! A display is single-owner: the framebuffer and everything around it are
//! not synchronized, and refresh is a synchronous, blocking transfer. One
//! logical task drives one display.

use embedded_hal::delay::DelayNs;

use crate::error::Error;
use crate::font::Font;
use crate::frame::{self, Frame};
use crate::interface::DisplayInterface;
use crate::model::{Layout, Model, MAX_PAGE_SPAN};
use crate::transform::{self, Rotation};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Driver for one monochrome panel
///
/// ## Type Parameters
///
/// * `I` - Bus interface implementing [`DisplayInterface`]
/// * `M` - Panel descriptor implementing [`Model`]
/// * `B` - Framebuffer storage implementing `AsRef<[u8]> + AsMut<[u8]>`
///   (a `&mut [u8]` carved from static memory, or a `Vec<u8>`)
pub struct Display<I, M, B>
where
    I: DisplayInterface,
{
    /// Bus interface
    pub(crate) interface: I,
    /// Panel model descriptor
    pub(crate) model: M,
    /// Shadow framebuffer in logical orientation
    pub(crate) frame: Frame<B>,
    /// Active rotation
    rotation: Rotation,
    /// Fallback font for ASCII code points
    pub(crate) default_ascii: Option<&'static dyn Font>,
    /// Fallback font for non-ASCII code points
    pub(crate) default_wide: Option<&'static dyn Font>,
}

impl<I, M, B> Display<I, M, B>
where
    I: DisplayInterface,
    M: Model,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a display over a bus, a panel model, and framebuffer storage
    ///
    /// The logical width/height swap for 90 and 270 degree rotations; the
    /// framebuffer is zeroed; the coordinate transform matching the
    /// rotation and the panel's memory layout is selected; and the bus is
    /// initialized.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedPanel`] if either panel dimension is below 8
    /// - [`Error::SpanTooLong`] if one page transfer would exceed
    ///   [`MAX_PAGE_SPAN`] bytes
    /// - [`Error::BufferTooSmall`] if `buffer` cannot hold the framebuffer
    /// - [`Error::Interface`] if bus initialization fails
    pub fn new(mut interface: I, model: M, rotation: Rotation, buffer: B) -> Result<Self, Error<I>> {
        let physical_width = model.width();
        let physical_height = model.height();
        if physical_width < 8 || physical_height < 8 {
            log::error!(
                "panel {}x{} too small to drive",
                physical_width,
                physical_height
            );
            return Err(Error::UnsupportedPanel {
                width: physical_width,
                height: physical_height,
            });
        }

        let span = match model.layout() {
            Layout::Vertical => physical_width as usize,
            Layout::Default => (physical_width as usize + 7) / 8,
        };
        if span > MAX_PAGE_SPAN {
            return Err(Error::SpanTooLong {
                span,
                max: MAX_PAGE_SPAN,
            });
        }

        let (width, height) = if rotation.swaps_axes() {
            (physical_height, physical_width)
        } else {
            (physical_width, physical_height)
        };

        let required = frame::buffer_len(width, height);
        let provided = buffer.as_ref().len();
        if provided < required {
            log::error!(
                "framebuffer storage too small, expected {} got {}",
                required,
                provided
            );
            return Err(Error::BufferTooSmall { required, provided });
        }

        let read_fn = transform::select(rotation, model.layout());
        let mut frame = Frame::new(buffer, width, height, read_fn);
        frame.fill(0x00);

        interface.initialize().map_err(Error::Interface)?;

        log::info!(
            "display created, {}x{} rotate {:?}",
            physical_width,
            physical_height,
            rotation
        );

        Ok(Self {
            interface,
            model,
            frame,
            rotation,
            default_ascii: None,
            default_wide: None,
        })
    }

    /// Reset the panel and send the model's initialization sequence
    pub fn startup<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay);
        self.interface
            .write_command(self.model.init_sequence())
            .map_err(Error::Interface)
    }

    /// Stream the framebuffer to the panel
    ///
    /// Delegates to the model: the generic page loop for plain panels, or
    /// the model's own routine where the pixel format requires one. The
    /// call blocks for the full transfer.
    pub fn refresh(&mut self) -> DisplayResult<I> {
        log::debug!("refresh {}x{}", self.frame.width(), self.frame.height());
        let view = self.frame.view();
        self.model
            .refresh(&view, &mut self.interface)
            .map_err(Error::Interface)
    }

    /// Fill the whole framebuffer with a raw byte value
    ///
    /// `0x00` clears the screen, `0xFF` sets every pixel; other values
    /// give 8-pixel patterns.
    pub fn fill(&mut self, value: u8) {
        self.frame.fill(value);
    }

    /// Set the fonts used when a drawing call passes no font
    pub fn set_default_fonts(
        &mut self,
        ascii: Option<&'static dyn Font>,
        wide: Option<&'static dyn Font>,
    ) {
        self.default_ascii = ascii;
        self.default_wide = wide;
    }

    /// Logical width in pixels (swapped under 90/270 degree rotation)
    pub fn width(&self) -> u16 {
        self.frame.width()
    }

    /// Logical height in pixels
    pub fn height(&self) -> u16 {
        self.frame.height()
    }

    /// Active rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The panel model descriptor
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The shadow framebuffer
    pub fn frame(&self) -> &Frame<B> {
        &self.frame
    }

    /// The shadow framebuffer, mutably
    ///
    /// For direct pixel access alongside the drawing calls.
    pub fn frame_mut(&mut self) -> &mut Frame<B> {
        &mut self.frame
    }

    /// Consume the display and return the interface, model, and storage
    pub fn release(self) -> (I, M, B) {
        (self.interface, self.model, self.frame.into_inner())
    }
}
