//! Panel model descriptors
//!
//! A [`Model`] describes one panel controller wiring: physical size,
//! internal memory organization, the power-on initialization byte
//! sequence, and how to seat the controller's write cursor on a page.
//! Model values are cheap, stateless descriptors - typically unit structs
//! - shared freely between displays.
//!
//! The provided [`Model::refresh`] implements the generic page loop that
//! fits every plain 1-bit panel; controllers whose pixel format disagrees
//! with the 1-bit shadow model (grayscale panels) override it wholesale,
//! as [`Sh1122`](crate::models::Sh1122) does.

use crate::frame::FrameView;
use crate::interface::DisplayInterface;

/// Panel memory organization
///
/// Decides how the refresh loop walks the framebuffer and which transform
/// family the display selects at creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// One panel byte packs 8 horizontally adjacent pixels of one row
    #[default]
    Default,
    /// One panel byte packs 8 vertically adjacent pixels of one column
    /// within an 8-row page
    Vertical,
}

/// Longest page span the generic refresh loop can stream
///
/// `Vertical` panels write `width` bytes per page, `Default` panels
/// `width / 8` bytes per row; both are checked against this cap when the
/// display is created.
pub const MAX_PAGE_SPAN: usize = 256;

/// A panel controller descriptor
///
/// Implementations are read-only data plus command encoding; they hold no
/// runtime state. See [`models`](crate::models) for the built-in panels.
pub trait Model {
    /// Physical panel width in pixels
    fn width(&self) -> u16;

    /// Physical panel height in pixels
    fn height(&self) -> u16;

    /// Internal memory organization
    fn layout(&self) -> Layout;

    /// Power-on initialization command sequence
    fn init_sequence(&self) -> &[u8];

    /// Seat the controller's write cursor at `page`, column `column_offset`
    ///
    /// Issues the bus commands selecting the page/column window; the data
    /// bytes that follow land there and auto-increment.
    ///
    /// # Errors
    ///
    /// Returns the bus error if command transmission fails.
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error>;

    /// Stream the framebuffer to the panel
    ///
    /// The default implementation is the generic page loop: for each page,
    /// seat the write cursor, gather the page span through the coordinate
    /// transform, and issue one data write. All bus calls are synchronous
    /// and blocking.
    ///
    /// Override this for panels whose physical pixel format disagrees with
    /// the 1-bit-per-pixel shadow model.
    ///
    /// # Errors
    ///
    /// Returns the bus error of the first failed transfer.
    fn refresh<I: DisplayInterface>(
        &self,
        frame: &FrameView<'_>,
        bus: &mut I,
    ) -> Result<(), I::Error> {
        let (pages, span) = match self.layout() {
            Layout::Vertical => ((self.height() + 7) / 8, self.width() as usize),
            Layout::Default => (self.height(), (self.width() as usize + 7) / 8),
        };

        // Moving data to the panel is always page by page; rotation only
        // changes how the bytes are read out of the framebuffer.
        let mut row = [0u8; MAX_PAGE_SPAN];
        for page in 0..pages {
            self.set_page_address(bus, page, 0)?;
            for (x, slot) in row[..span].iter_mut().enumerate() {
                *slot = frame.read(x as u16, page);
            }
            bus.write_data(&row[..span])?;
        }
        Ok(())
    }
}
