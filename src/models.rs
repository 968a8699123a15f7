//! Built-in panel descriptors
//!
//! One unit struct per supported controller wiring. Init sequences follow
//! the controllers' datasheet power-on recommendations; the page-address
//! encoders implement each family's cursor-seating command format.
//!
//! | model | size | layout | notes |
//! |---|---|---|---|
//! | [`Ssd1306`] | 128x64 | vertical | the ubiquitous 0.96" module |
//! | [`Ssd1312`] | 128x64 | vertical | SSD1306-compatible addressing |
//! | [`Sh1107`] | 64x128 | vertical | column window offset by 32 |
//! | [`Sh1108`] | 128x160 | vertical | column window offset by 16 |
//! | [`Sh1122`] | 256x64 | default | 16-level grayscale, custom refresh |

use crate::command::{
    SET_COLUMN_HIGH, SET_COLUMN_HIGH_SH1108, SET_COLUMN_LOW, SET_PAGE_ADDRESS,
};
use crate::frame::FrameView;
use crate::interface::DisplayInterface;
use crate::model::{Layout, Model};

/// SSD1306-compatible cursor seating: page ORed into the command byte,
/// column split into two nibble commands.
fn page_address_ssd1306<I: DisplayInterface>(
    bus: &mut I,
    page: u16,
    offset: u16,
) -> Result<(), I::Error> {
    let cmd = [
        SET_PAGE_ADDRESS | page as u8,
        SET_COLUMN_LOW | (offset & 0x0F) as u8,
        SET_COLUMN_HIGH + (offset >> 4) as u8,
    ];
    bus.write_command(&cmd)
}

/// SH1108-compatible cursor seating: page as a parameter byte, high
/// column nibble on the `0x11` base.
fn page_address_sh1108<I: DisplayInterface>(
    bus: &mut I,
    page: u16,
    offset: u16,
) -> Result<(), I::Error> {
    let cmd = [
        SET_PAGE_ADDRESS,
        page as u8,
        SET_COLUMN_LOW | (offset & 0x0F) as u8,
        SET_COLUMN_HIGH_SH1108 + (offset >> 4) as u8,
    ];
    bus.write_command(&cmd)
}

/// SH1122 cursor seating: like SH1108 but with the `0x10` column base.
fn page_address_sh1122<I: DisplayInterface>(
    bus: &mut I,
    page: u16,
    offset: u16,
) -> Result<(), I::Error> {
    let cmd = [
        SET_PAGE_ADDRESS,
        page as u8,
        SET_COLUMN_LOW | (offset & 0x0F) as u8,
        SET_COLUMN_HIGH + (offset >> 4) as u8,
    ];
    bus.write_command(&cmd)
}

/// SSD1306 128x64 OLED
#[derive(Clone, Copy, Debug, Default)]
pub struct Ssd1306;

const SSD1306_INIT: [u8; 28] = [
    0xAE, // display off
    0x20, 0x10, // memory addressing mode: page
    0xB0, // page start address
    0xC8, // COM scan direction: remapped
    0x00, // column address low
    0x10, // column address high
    0x40, // display start line
    0x81, 0xFF, // contrast
    0xA1, // segment re-map
    0xA6, // normal display
    0xA8, 0x3F, // multiplex ratio 1/64
    0xA4, // output follows RAM
    0xD3, 0x00, // display offset
    0xD5, 0xF0, // clock divide ratio
    0xD9, 0x22, // pre-charge period
    0xDA, 0x12, // COM pins configuration
    0xDB, 0x20, // VCOMH deselect level
    0x8D, 0x14, // charge pump on
    0xAF, // display on
];

impl Model for Ssd1306 {
    fn width(&self) -> u16 {
        128
    }
    fn height(&self) -> u16 {
        64
    }
    fn layout(&self) -> Layout {
        Layout::Vertical
    }
    fn init_sequence(&self) -> &[u8] {
        &SSD1306_INIT
    }
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error> {
        page_address_ssd1306(bus, page, column_offset)
    }
}

/// SSD1312 128x64 OLED
#[derive(Clone, Copy, Debug, Default)]
pub struct Ssd1312;

const SSD1312_INIT: [u8; 27] = [
    0xAE, // display off
    0x00, 0x10, // column address
    0x20, 0x02, // memory addressing mode: page
    0xC0, // COM scan direction: normal
    0x40, // display start line
    0x81, 0x7F, // contrast
    0xA1, // segment re-map
    0xA6, // normal display
    0xA8, 0x3F, // multiplex ratio 1/64
    0xA4, // output follows RAM
    0xD3, 0x00, // display offset
    0xD5, 0xF0, // clock divide ratio
    0xD9, 0x22, // pre-charge period
    0xDA, 0x10, // COM pins configuration
    0xDB, 0x20, // VCOMH deselect level
    0x8D, 0x12, // charge pump on
    0xAF, // display on
];

impl Model for Ssd1312 {
    fn width(&self) -> u16 {
        128
    }
    fn height(&self) -> u16 {
        64
    }
    fn layout(&self) -> Layout {
        Layout::Vertical
    }
    fn init_sequence(&self) -> &[u8] {
        &SSD1312_INIT
    }
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error> {
        page_address_ssd1306(bus, page, column_offset)
    }
}

/// SH1107 64x128 OLED
///
/// The controller RAM is 128 columns wide; a 64-wide panel occupies the
/// middle window, so every column address is offset by 32.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sh1107;

const SH1107_COLUMN_OFFSET: u16 = 32;

const SH1107_INIT: [u8; 24] = [
    0xAE, // display off
    0xD5, 0x50, // clock divide ratio
    0xA8, 0x7F, // multiplex ratio
    0xD3, 0x00, // display offset
    0x40, // display start line
    0x8D, 0x14, // charge pump on
    0x20, 0x02, // memory addressing mode: page
    0xA0, // segment re-map
    0xC0, // COM scan direction
    0x12, // COM pins configuration
    0x81, 0x7F, // contrast
    0xD9, 0x22, // pre-charge period
    0xDB, 0x37, // VCOMH deselect level
    0xA4, // output follows RAM
    0xA6, // normal display
    0xAF, // display on
];

impl Model for Sh1107 {
    fn width(&self) -> u16 {
        64
    }
    fn height(&self) -> u16 {
        128
    }
    fn layout(&self) -> Layout {
        Layout::Vertical
    }
    fn init_sequence(&self) -> &[u8] {
        &SH1107_INIT
    }
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error> {
        page_address_ssd1306(bus, page, column_offset + SH1107_COLUMN_OFFSET)
    }
}

/// SH1108 128x160 OLED
///
/// 160-column controller RAM drives a 128-wide panel through the window
/// starting at column 16.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sh1108;

const SH1108_COLUMN_OFFSET: u16 = 16;

const SH1108_INIT: [u8; 22] = [
    0xAE, // display off
    0x81, 0xD0, // contrast
    0xA4, // output follows RAM
    0xA6, // normal display
    0xA9, 0x02, // display resolution: 128 COM
    0xAD, 0x80, // DC-DC on
    0xC0, // COM scan direction
    0xA0, // segment re-map
    0xD5, 0x40, // clock divide ratio
    0xD9, 0x2F, // pre-charge period
    0xDB, 0x3F, // VCOMH deselect level
    0x20, // memory addressing mode: page
    0xDC, 0x35, // VSEGM deselect level
    0x30, // discharge level
    0xAF, // display on
];

impl Model for Sh1108 {
    fn width(&self) -> u16 {
        128
    }
    fn height(&self) -> u16 {
        160
    }
    fn layout(&self) -> Layout {
        Layout::Vertical
    }
    fn init_sequence(&self) -> &[u8] {
        &SH1108_INIT
    }
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error> {
        page_address_sh1108(bus, page, column_offset + SH1108_COLUMN_OFFSET)
    }
}

/// SH1122 256x64 grayscale OLED
///
/// The panel stores 4 bits per pixel; the custom refresh widens each
/// 1-bit framebuffer pixel into a full-intensity or blank nibble, two
/// pixels per output byte.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sh1122;

const SH1122_INIT: [u8; 20] = [
    0xAE, // display off
    0x81, 0x80, // contrast
    0xA0, // segment re-map
    0xA4, // output follows RAM
    0xA6, // normal display
    0xAD, 0x80, // DC-DC on
    0xB0, 0x00, // row address
    0xD5, 0x50, // clock divide ratio
    0xD9, 0x22, // discharge/pre-charge period
    0xDB, 0x35, // VCOMH deselect level
    0xDC, 0x35, // VSEGM level
    0x30, // discharge level
    0xAF, // display on
];

impl Sh1122 {
    const WIDTH: u16 = 256;
    const HEIGHT: u16 = 64;
}

impl Model for Sh1122 {
    fn width(&self) -> u16 {
        Self::WIDTH
    }
    fn height(&self) -> u16 {
        Self::HEIGHT
    }
    fn layout(&self) -> Layout {
        Layout::Default
    }
    fn init_sequence(&self) -> &[u8] {
        &SH1122_INIT
    }
    fn set_page_address<I: DisplayInterface>(
        &self,
        bus: &mut I,
        page: u16,
        column_offset: u16,
    ) -> Result<(), I::Error> {
        page_address_sh1122(bus, page, column_offset)
    }

    fn refresh<I: DisplayInterface>(
        &self,
        frame: &FrameView<'_>,
        bus: &mut I,
    ) -> Result<(), I::Error> {
        let x_num = (Self::WIDTH as usize + 7) / 8;

        // The write pointer auto-increments across row boundaries; the
        // cursor is seated once and never re-issued per row.
        self.set_page_address(bus, 0, 0)?;

        let mut row = [0u8; Self::WIDTH as usize / 2];
        for y in 0..Self::HEIGHT {
            let mut index = 0;
            for x in 0..x_num {
                let mut data = frame.read(x as u16, y);
                for _ in 0..4 {
                    row[index] = if data & 0x01 != 0 { 0xF0 } else { 0x00 };
                    data >>= 1;
                    row[index] |= if data & 0x01 != 0 { 0x0F } else { 0x00 };
                    data >>= 1;
                    index += 1;
                }
            }
            bus.write_data(&row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::delay::DelayNs;

    #[derive(Debug, Default)]
    struct MockBus {
        commands: Vec<Vec<u8>>,
    }

    impl DisplayInterface for MockBus {
        type Error = core::convert::Infallible;

        fn initialize(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {}
        fn write_command(&mut self, command: &[u8]) -> Result<(), Self::Error> {
            self.commands.push(command.to_vec());
            Ok(())
        }
        fn write_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_ssd1306_page_address_encoding() {
        let mut bus = MockBus::default();
        Ssd1306.set_page_address(&mut bus, 3, 0x25).ok();
        assert_eq!(bus.commands, alloc::vec![alloc::vec![0xB3, 0x05, 0x12]]);
    }

    #[test]
    fn test_sh1107_applies_column_window_offset() {
        let mut bus = MockBus::default();
        Sh1107.set_page_address(&mut bus, 0, 0).ok();
        // Column 32: low nibble 0, high nibble 2
        assert_eq!(bus.commands, alloc::vec![alloc::vec![0xB0, 0x00, 0x12]]);
    }

    #[test]
    fn test_sh1108_two_byte_page_and_offset() {
        let mut bus = MockBus::default();
        Sh1108.set_page_address(&mut bus, 5, 0).ok();
        // Column 16: low nibble 0, high nibble on the 0x11 base
        assert_eq!(
            bus.commands,
            alloc::vec![alloc::vec![0xB0, 0x05, 0x00, 0x12]]
        );
    }

    #[test]
    fn test_sh1122_page_address_encoding() {
        let mut bus = MockBus::default();
        Sh1122.set_page_address(&mut bus, 0, 0).ok();
        assert_eq!(
            bus.commands,
            alloc::vec![alloc::vec![0xB0, 0x00, 0x00, 0x10]]
        );
    }

    #[test]
    fn test_init_sequences_start_off_end_on() {
        for init in [
            &SSD1306_INIT[..],
            &SSD1312_INIT[..],
            &SH1107_INIT[..],
            &SH1108_INIT[..],
            &SH1122_INIT[..],
        ] {
            assert_eq!(init.first(), Some(&0xAE));
            assert_eq!(init.last(), Some(&0xAF));
        }
    }
}
