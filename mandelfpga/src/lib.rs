//! Host side driver for the USB Mandelbrot gateware.
//!
//! A render is one blocking exchange: a command goes out on the bulk OUT
//! endpoint, pixel records stream back on the bulk IN endpoint until the
//! device goes quiet.

pub mod device;
pub mod fixed;
pub mod protocol;
pub mod view;

use std::time::Instant;

use bytes::BytesMut;
use log::{info, warn};
use rusb::{Context, DeviceHandle};
use simple_error::SimpleError;

pub use device::{BulkTransport, UsbConfig};
pub use protocol::{decode_frame, PixelRecord, RenderRequest, Status, DEFAULT_BYTE_WIDTH};
pub use view::FractalView;

fn frame_pixels(request: &RenderRequest) -> usize {
    usize::from(request.pixel_width) * usize::from(request.pixel_height)
}

pub struct MandelFpga<B: BulkTransport> {
    config: UsbConfig,
    transport: B,
}

pub type UsbSession = MandelFpga<DeviceHandle<Context>>;

impl UsbSession {
    pub fn connect(config: UsbConfig) -> Result<Self, SimpleError> {
        let mut context =
            Context::new().map_err(|e| SimpleError::with("could not initialize libusb", e))?;

        let handle = device::connect(&mut context, &config)?;

        Ok(Self::with_transport(handle, config))
    }
}

impl<B: BulkTransport> MandelFpga<B> {
    pub fn with_transport(transport: B, config: UsbConfig) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &UsbConfig {
        &self.config
    }

    /// Sends `request` and returns whatever the device produced, undecoded.
    pub fn render_raw(
        &mut self,
        request: &RenderRequest,
        byte_width: usize,
    ) -> Result<BytesMut, SimpleError> {
        let command = request.encode(byte_width);
        device::drain::transmit(&mut self.transport, &self.config, &command)?;

        Ok(device::drain::drain(&mut self.transport, &self.config))
    }

    pub fn render(
        &mut self,
        request: &RenderRequest,
        byte_width: usize,
    ) -> Result<Vec<PixelRecord>, SimpleError> {
        let start = Instant::now();

        let data = self.render_raw(request, byte_width)?;
        let received = start.elapsed();

        let pixels = decode_frame(&data);

        info!(
            "got {} bytes, {} pixels; usb transfer took {:.4}s, unpacking {:.4}s",
            data.len(),
            pixels.len(),
            received.as_secs_f64(),
            (start.elapsed() - received).as_secs_f64()
        );

        let expected = frame_pixels(request);
        if !pixels.is_empty() && pixels.len() != expected {
            warn!("got {} of {} pixels", pixels.len(), expected);
        }

        Ok(pixels)
    }

    pub fn close(mut self) {
        if let Err(err) = self.transport.release(self.config.interface) {
            warn!("could not release interface {}: {}", self.config.interface, err);
        }
    }
}
