use std::thread;

use bytes::BytesMut;
use log::{debug, warn};
use simple_error::SimpleError;

use super::{BulkTransport, UsbConfig};

pub fn transmit<B: BulkTransport>(
    transport: &mut B,
    config: &UsbConfig,
    command: &[u8],
) -> Result<(), SimpleError> {
    debug!("command: {}", hex::encode(command));

    let written = transport
        .write_bulk(config.out_endpoint, command, config.write_timeout)
        .map_err(|e| SimpleError::with("could not write command", e))?;

    if written != command.len() {
        return Err(SimpleError::new(format!(
            "short command write: {} of {} bytes",
            written,
            command.len()
        )));
    }

    Ok(())
}

/// Reads until the device stops answering.
///
/// The device has no end-of-response marker; a read timing out means it
/// has nothing left queued. Any other error ends the drain the same way.
pub fn drain<B: BulkTransport>(transport: &mut B, config: &UsbConfig) -> BytesMut {
    thread::sleep(config.settle_delay);

    let mut result = BytesMut::new();
    let mut buf = vec![0u8; config.chunk_size];

    loop {
        match transport.read_bulk(config.in_endpoint, &mut buf, config.read_timeout) {
            Ok(len) => {
                debug!("got {} bytes", len);
                result.extend_from_slice(&buf[..len]);
            }
            Err(rusb::Error::Timeout) => {
                debug!("read timed out, drain complete");
                break;
            }
            Err(err) => {
                warn!("drain stopped by transfer error: {}", err);
                break;
            }
        }
    }

    debug!("got total: {}", result.len());

    result
}
