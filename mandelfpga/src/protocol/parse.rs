use log::{debug, warn};

use super::{PREAMBLE_LEN, RECORD_LEN, SENTINEL};

// Response layout
//
// 9 byte preamble, then the sentinel, then one record per pixel:
//
// XX XX XX XX XX XX XX XX XX A5
// 0000 0000 0A000000 10 00   x=0 y=0 iterations=10 escaped
// 0100 0000 FF000000 01 00   x=1 y=0 iterations=255 maxed
// ...

/// Pixel status byte. The high nibble is the escaped flag, the low nibble
/// the maxed-out flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status(pub u8);

impl Status {
    pub fn escaped(self) -> bool {
        self.0 >> 4 != 0
    }

    pub fn maxed(self) -> bool {
        self.0 & 0x0f != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRecord {
    pub x: u16,
    pub y: u16,
    pub iterations: u32,
    pub status: Status,
}

impl PixelRecord {
    fn unpack(window: &[u8]) -> Self {
        Self {
            x: u16::from_le_bytes([window[0], window[1]]),
            y: u16::from_le_bytes([window[2], window[3]]),
            iterations: u32::from_le_bytes([window[4], window[5], window[6], window[7]]),
            status: Status(window[8]),
            // window[9] is padding
        }
    }
}

/// Decodes a drained response into pixel records in device scan order.
///
/// Everything up to and including the first sentinel is dropped. A
/// sentinel anywhere other than right after the preamble is logged before
/// resynchronising on it. A trailing partial record is dropped.
pub fn decode_frame(data: &[u8]) -> Vec<PixelRecord> {
    if data.is_empty() {
        return Vec::new();
    }

    let start = match memchr::memchr(SENTINEL, data) {
        Some(index) => index,
        None => {
            warn!("no sentinel in {} byte response, dropping it", data.len());
            return Vec::new();
        }
    };

    if start != PREAMBLE_LEN {
        warn!("sentinel at index {}, chopping until there", start);
    }

    let payload = &data[start + 1..];
    let records: Vec<PixelRecord> = payload
        .chunks_exact(RECORD_LEN)
        .map(PixelRecord::unpack)
        .collect();

    debug!(
        "decoded {} pixels, {} trailing bytes dropped",
        records.len(),
        payload.len() % RECORD_LEN
    );

    records
}
