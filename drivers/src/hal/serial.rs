//! Serial Port (UART) Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for serial communication.

use core::fmt;

/// Serial port configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Number of data bits per frame.
    pub data_bits: DataBits,
    /// Parity checking mode.
    pub parity: Parity,
    /// Number of stop bits.
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Create a standard 8N1 configuration at the specified baud rate.
    ///
    /// 8N1 means: 8 data bits, no parity, 1 stop bit.
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for SerialConfig {
    /// Default configuration: 115200 baud, 8N1.
    fn default() -> Self {
        Self::new_8n1(115200)
    }
}

/// Number of data bits per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Number of bits as an integer.
    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Number of stop bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Serial port errors.
///
/// Line errors (parity, framing, overrun) are not errors at this level:
/// drivers count them and still hand the byte over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// The port was used before it was initialized.
    NotReady,
    /// Invalid configuration parameter.
    InvalidConfig,
    /// Operation would block but non-blocking mode was requested.
    WouldBlock,
    /// The hardware did not reach its expected post-reset state.
    SelfTestFailed,
    /// A buffer handed to the driver earlier has not been given back yet.
    Busy,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SerialError::NotReady => "serial port not initialized",
            SerialError::InvalidConfig => "invalid serial configuration",
            SerialError::WouldBlock => "operation would block",
            SerialError::SelfTestFailed => "serial self-test failed",
            SerialError::Busy => "transfer already in progress",
        };
        f.write_str(msg)
    }
}

/// Serial port trait.
///
/// This trait provides the core interface for serial communication.
pub trait SerialPort {
    /// Error type for serial operations.
    type Error: fmt::Debug;

    /// Configure the serial port.
    ///
    /// This must be called before using the serial port.
    fn configure(&mut self, config: SerialConfig) -> Result<(), Self::Error>;

    /// Write a single byte (blocking).
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write multiple bytes (blocking).
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(bytes.len())
    }

    /// Read a single byte (blocking).
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Read multiple bytes (blocking).
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        for byte in buffer.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(buffer.len())
    }

    /// Flush the write buffer.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if the serial port is busy transmitting.
    fn is_busy(&self) -> bool;
}

/// Extension trait for non-blocking operations.
pub trait NonBlockingSerial: SerialPort {
    /// Try to write a byte without blocking.
    fn try_write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Try to read a byte without blocking.
    fn try_read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Wrapper type to implement core::fmt::Write for SerialPort types.
/// This allows using write!/writeln! macros.
pub struct SerialWriter<T: SerialPort>(pub T);

impl<T: SerialPort> fmt::Write for SerialWriter<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // Convert line endings
            if byte == b'\n' {
                self.0.write_byte(b'\r').map_err(|_| fmt::Error)?;
            }
            self.0.write_byte(byte).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct Capture {
        out: Vec<u8>,
        fail_after: Option<usize>,
    }

    impl SerialPort for Capture {
        type Error = SerialError;

        fn configure(&mut self, _config: SerialConfig) -> Result<(), SerialError> {
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
            if self.fail_after == Some(self.out.len()) {
                return Err(SerialError::WouldBlock);
            }
            self.out.push(byte);
            Ok(())
        }

        fn read_byte(&mut self) -> Result<u8, SerialError> {
            Err(SerialError::WouldBlock)
        }

        fn flush(&mut self) -> Result<(), SerialError> {
            Ok(())
        }

        fn is_busy(&self) -> bool {
            false
        }
    }

    #[test]
    fn writer_expands_newlines() {
        use core::fmt::Write;

        let mut w = SerialWriter(Capture::default());
        write!(w, "ok\nbye").unwrap();
        assert_eq!(w.0.out, b"ok\r\nbye");
    }

    #[test]
    fn writer_surfaces_port_errors() {
        use core::fmt::Write;

        let mut w = SerialWriter(Capture {
            fail_after: Some(2),
            ..Capture::default()
        });
        assert!(w.write_str("abc").is_err());
        assert_eq!(w.0.out, b"ab");
    }

    #[test]
    fn default_config_is_115200_8n1() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baud_rate, 115200);
        assert_eq!(cfg.data_bits.bits(), 8);
        assert_eq!(cfg.parity, Parity::None);
        assert_eq!(cfg.stop_bits, StopBits::One);
    }

    #[test]
    fn write_default_stops_at_first_error() {
        let mut port = Capture {
            fail_after: Some(1),
            ..Capture::default()
        };
        assert_eq!(port.write(b"xy"), Err(SerialError::WouldBlock));
        assert_eq!(port.out, b"x");
    }
}
