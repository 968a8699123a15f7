//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and two concrete
//! implementations: [`Interface`] for SPI-attached panels and
//! [`I2cInterface`] for I2C-attached modules.
//!
//! ## Hardware Requirements
//!
//! SPI-attached panels require:
//! - SPI bus (MOSI + SCK, optionally hardware CS)
//! - 2 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!
//! I2C modules multiplex command and data streams over the bus with a
//! control byte, so no extra pins are needed; such modules usually tie the
//! reset line high on the board.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use monopanel::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin);
//!
//! // Pulse the reset line
//! interface.reset(&mut delay);
//!
//! // Send a command sequence (page 0, column 0)
//! let _ = interface.write_command(&[0xB0, 0x00, 0x10]);
//!
//! // Send framebuffer data
//! let _ = interface.write_data(&[0xFF, 0x00, 0xFF]);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the bus connecting the MCU to a panel controller
///
/// This trait abstracts over the wire transport, allowing the
/// [`Display`](crate::display::Display) to work with SPI, I2C, or any
/// bit-banged transport the caller implements. All four operations are
/// synchronous and blocking; the calling context suspends for the full
/// duration of every transfer.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] (SPI) or
/// [`I2cInterface`]. Implement this trait yourself for unusual wiring
/// (shared buses, extra latch pins, simulators).
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Prepare the bus for use
    ///
    /// Called once when a display is created: drive the control pins to
    /// their idle levels, claim bus resources, and so on.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport or GPIO fails.
    fn initialize(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Drive RST low
    /// 2. Wait at least 10ms
    /// 3. Drive RST high
    /// 4. Wait at least 10ms
    ///
    /// Transports without a reset line implement this as a no-op.
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Send a command byte sequence to the controller
    ///
    /// Page-mode controllers take multi-byte command sequences (page
    /// address plus column address pair), so the whole sequence is passed
    /// in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport or GPIO fails.
    fn write_command(&mut self, command: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send framebuffer data bytes to the controller
    ///
    /// # Errors
    ///
    /// Returns an error if the transport or GPIO fails.
    fn write_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over transport and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<CommErr, PinErr> {
    /// Transport (SPI/I2C) communication error
    Comm(CommErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<CommErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<CommErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Comm(e) => write!(f, "bus error: {e:?}"),
            Self::Pin(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

impl<CommErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<CommErr, PinErr> {}

/// SPI interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO
/// traits. Chip select is expected to be handled by the [`SpiDevice`]
/// implementation.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
pub struct Interface<SPI, DC, RST> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
}

impl<SPI, DC, RST> Interface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new SPI interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Consume the interface and release the bus and pins
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST, PinErr> DisplayInterface for Interface<SPI, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn initialize(&mut self) -> InterfaceResult<(), Self::Error> {
        // Idle levels: command mode, reset deasserted
        self.dc.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.rst.set_high().map_err(|e| InterfaceError::Pin(e))?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        // Reset sequence: LOW -> wait 10ms -> HIGH -> wait 10ms
        let _ = self.rst.set_low();
        delay.delay_ms(10);
        let _ = self.rst.set_high();
        delay.delay_ms(10);
    }

    fn write_command(&mut self, command: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.spi
            .write(command)
            .map_err(|e| InterfaceError::Comm(e))?;
        Ok(())
    }

    fn write_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(|e| InterfaceError::Pin(e))?;
        self.spi.write(data).map_err(|e| InterfaceError::Comm(e))?;
        Ok(())
    }
}

/// Control byte announcing a command stream (Co=0, D/C#=0)
const I2C_CONTROL_COMMAND: u8 = 0x00;
/// Control byte announcing a data stream (Co=0, D/C#=1)
const I2C_CONTROL_DATA: u8 = 0x40;
/// Payload bytes per I2C write transaction
const I2C_CHUNK: usize = 64;

/// I2C interface implementation
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 [`I2c`] buses.
/// Each write transaction is prefixed with the SSD1306-style control byte
/// (`0x00` for commands, `0x40` for data); long transfers are split into
/// chunks, each carrying its own control byte.
///
/// I2C display modules have no reset pin, so [`DisplayInterface::reset`]
/// is a no-op.
pub struct I2cInterface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit device address (typically 0x3C or 0x3D)
    address: u8,
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Create a new I2C interface for the device at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Consume the interface and release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_prefixed(&mut self, control: u8, bytes: &[u8]) -> Result<(), I2C::Error> {
        let mut buf = [0u8; 1 + I2C_CHUNK];
        for chunk in bytes.chunks(I2C_CHUNK) {
            buf[0] = control;
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.address, &buf[..=chunk.len()])?;
        }
        Ok(())
    }
}

impl<I2C> DisplayInterface for I2cInterface<I2C>
where
    I2C: I2c,
    I2C::Error: Debug,
{
    type Error = I2C::Error;

    fn initialize(&mut self) -> InterfaceResult<(), Self::Error> {
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D) {
        // No reset line on I2C modules
    }

    fn write_command(&mut self, command: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_prefixed(I2C_CONTROL_COMMAND, command)
    }

    fn write_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.write_prefixed(I2C_CONTROL_DATA, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl core::fmt::Display for MockError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "mock error")
        }
    }

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> embedded_hal::i2c::ErrorKind {
            embedded_hal::i2c::ErrorKind::Other
        }
    }

    #[derive(Debug, Default)]
    struct MockSpi {
        written: Vec<Vec<u8>>,
    }

    impl embedded_hal::spi::ErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [embedded_hal::spi::Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let embedded_hal::spi::Operation::Write(bytes) = op {
                    self.written.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    /// Records the pin level so command/data mode switching can be asserted
    #[derive(Debug, Default)]
    struct MockPin {
        level: bool,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level = true;
            Ok(())
        }
    }

    #[test]
    fn test_spi_command_sets_dc_low() {
        let mut interface =
            Interface::new(MockSpi::default(), MockPin::default(), MockPin::default());
        interface.write_command(&[0xB0, 0x00, 0x10]).ok();
        assert!(!interface.dc.level);
        assert_eq!(
            interface.spi.written,
            alloc::vec![alloc::vec![0xB0, 0x00, 0x10]]
        );
    }

    #[test]
    fn test_spi_data_sets_dc_high() {
        let mut interface =
            Interface::new(MockSpi::default(), MockPin::default(), MockPin::default());
        interface.write_data(&[0xAA, 0x55]).ok();
        assert!(interface.dc.level);
        assert_eq!(interface.spi.written, alloc::vec![alloc::vec![0xAA, 0x55]]);
    }

    #[derive(Debug, Default)]
    struct MockI2c {
        written: Vec<Vec<u8>>,
    }

    impl embedded_hal::i2c::ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [embedded_hal::i2c::Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let embedded_hal::i2c::Operation::Write(bytes) = op {
                    self.written.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_i2c_command_control_byte() {
        let mut interface = I2cInterface::new(MockI2c::default(), 0x3C);
        interface.write_command(&[0xAE]).ok();
        assert_eq!(interface.i2c.written, alloc::vec![alloc::vec![0x00, 0xAE]]);
    }

    #[test]
    fn test_i2c_data_chunked_with_control_byte() {
        let mut interface = I2cInterface::new(MockI2c::default(), 0x3C);
        let data = [0x5Au8; 100];
        interface.write_data(&data).ok();
        assert_eq!(interface.i2c.written.len(), 2);
        assert_eq!(interface.i2c.written[0][0], 0x40);
        assert_eq!(interface.i2c.written[0].len(), 1 + I2C_CHUNK);
        assert_eq!(interface.i2c.written[1][0], 0x40);
        assert_eq!(interface.i2c.written[1].len(), 1 + 100 - I2C_CHUNK);
    }
}
