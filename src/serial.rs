//! Serial port setup for the Z906 console connector (57600 baud, 8O1).
use crate::client::{Config, Z906};
use crate::error::Result;
use crate::protocol as proto;
use crate::transport::SerialIo;
use std::io::{self, Read, Write};

/// The parity used for serial communication.
pub const PARITY: &tokio_serial::Parity = &tokio_serial::Parity::Odd;
/// The number of stop bits used for serial communication.
pub const STOP_BITS: &tokio_serial::StopBits = &tokio_serial::StopBits::One;
/// The number of data bits used for serial communication.
pub const DATA_BITS: &tokio_serial::DataBits = &tokio_serial::DataBits::Eight;

/// A blocking serial port as opened by [`open`].
pub type SerialPort = Box<dyn tokio_serial::SerialPort>;

/// Creates a `tokio_serial::SerialPortBuilder` with the console settings.
///
/// # Arguments
///
/// * `device` - The path to the serial port device (e.g., `/dev/ttyUSB0`).
pub fn serial_port_builder(device: &str) -> tokio_serial::SerialPortBuilder {
    tokio_serial::new(device, proto::BAUD_RATE)
        .parity(*PARITY)
        .stop_bits(*STOP_BITS)
        .data_bits(*DATA_BITS)
        .flow_control(tokio_serial::FlowControl::None)
}

/// Opens `device` and wraps it in a driver using `config`.
///
/// No bytes are exchanged; use [`Z906::check_connection`] to probe the
/// amplifier.
pub fn open(device: &str, config: Config) -> Result<Z906<SerialPort>> {
    let port = serial_port_builder(device)
        .timeout(config.timeout)
        .open()
        .map_err(io::Error::from)?;
    log::debug!("Opened {device} at {} baud", proto::BAUD_RATE);
    Ok(Z906::with_config(port, config))
}

impl SerialIo for SerialPort {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        Write::flush(self)
    }

    fn available(&mut self) -> io::Result<usize> {
        Ok(self.bytes_to_read()? as usize)
    }

    fn receive(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        Ok(self.clear(tokio_serial::ClearBuffer::Input)?)
    }
}
