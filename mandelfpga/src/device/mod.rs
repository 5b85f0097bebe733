pub mod drain;
#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use log::{debug, info};
use rusb::{Device, DeviceHandle, UsbContext};
use simple_error::SimpleError;

pub const VENDOR_ID: u16 = 0x1209;
pub const PRODUCT_ID: u16 = 0xDECA;

/// Where the device lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct UsbConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub out_endpoint: u8,
    pub in_endpoint: u8,
    pub chunk_size: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Time the gateware gets to start producing pixels after a command.
    pub settle_delay: Duration,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            interface: 0,
            out_endpoint: 0x01,
            in_endpoint: 0x81,
            chunk_size: 256,
            read_timeout: Duration::from_millis(10),
            write_timeout: Duration::from_secs(1),
            settle_delay: Duration::from_millis(50),
        }
    }
}

/// Blocking bulk transfers on a claimed interface.
pub trait BulkTransport {
    fn write_bulk(&mut self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize>;

    fn read_bulk(&mut self, endpoint: u8, buf: &mut [u8], timeout: Duration)
        -> rusb::Result<usize>;

    fn release(&mut self, _interface: u8) -> rusb::Result<()> {
        Ok(())
    }
}

impl<T: UsbContext> BulkTransport for DeviceHandle<T> {
    fn write_bulk(&mut self, endpoint: u8, buf: &[u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::write_bulk(self, endpoint, buf, timeout)
    }

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::read_bulk(self, endpoint, buf, timeout)
    }

    fn release(&mut self, interface: u8) -> rusb::Result<()> {
        self.release_interface(interface)
    }
}

pub fn open_device<T: UsbContext>(
    context: &mut T,
    vid: u16,
    pid: u16,
) -> Result<Option<(Device<T>, DeviceHandle<T>)>, SimpleError> {
    let devices = context
        .devices()
        .map_err(|e| SimpleError::with("could not list usb devices", e))?;

    for device in devices.iter() {
        let device_desc = match device.device_descriptor() {
            Ok(d) => d,
            Err(_) => continue,
        };

        if device_desc.vendor_id() == vid && device_desc.product_id() == pid {
            let handle = device
                .open()
                .map_err(|e| SimpleError::with("device found but failed to open", e))?;
            return Ok(Some((device, handle)));
        }
    }

    Ok(None)
}

/// Opens the renderer and claims its interface.
pub fn connect<T: UsbContext>(
    context: &mut T,
    config: &UsbConfig,
) -> Result<DeviceHandle<T>, SimpleError> {
    let (vid, pid) = (config.vendor_id, config.product_id);

    match open_device(context, vid, pid)? {
        Some((device, mut handle)) => {
            info!(
                "Opened {:04x}:{:04x} on bus {} address {}",
                vid,
                pid,
                device.bus_number(),
                device.address()
            );

            // Not supported everywhere, claiming will tell us if it mattered
            if let Err(err) = handle.set_auto_detach_kernel_driver(true) {
                debug!("auto detach unavailable: {}", err);
            }

            handle
                .claim_interface(config.interface)
                .map_err(|e| SimpleError::with("could not claim interface", e))?;

            Ok(handle)
        }
        None => Err(SimpleError::new(format!(
            "could not find device {:04x}:{:04x}",
            vid, pid
        ))),
    }
}
