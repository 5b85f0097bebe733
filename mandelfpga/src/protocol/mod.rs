use bytes::{BufMut, BytesMut};

pub mod parse;

pub use parse::{decode_frame, PixelRecord, Status};

/// Marks the end of a command and the start of pixel data in a response.
pub const SENTINEL: u8 = 0xA5;

/// Offset of the first sentinel in a well-formed response.
pub const PREAMBLE_LEN: usize = 9;

// x: u16, y: u16, iterations: u32, status: u8, pad: u8
pub const RECORD_LEN: usize = 10;

/// Fixed-point width the gateware is built with.
pub const DEFAULT_BYTE_WIDTH: usize = 9;

// width + height + max iterations
const HEADER_LEN: usize = 2 + 2 + 4;

/// A single render command.
///
/// Origin and step are fixed-point values with [`crate::fixed::SCALE`]
/// fractional bits. Nothing is range checked: a value that does not fit
/// the byte width chosen at encode time is silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub pixel_width: u16,
    pub pixel_height: u16,
    pub max_iterations: u32,
    pub origin_x: i128,
    pub origin_y: i128,
    pub step: i128,
}

impl RenderRequest {
    pub fn encoded_len(byte_width: usize) -> usize {
        HEADER_LEN + 3 * byte_width + 1
    }

    pub fn encode(&self, byte_width: usize) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::encoded_len(byte_width));

        buf.put_u16_le(self.pixel_width);
        buf.put_u16_le(self.pixel_height);
        buf.put_u32_le(self.max_iterations);

        for value in [self.origin_x, self.origin_y, self.step] {
            put_fixed(&mut buf, value, byte_width);
        }

        buf.put_u8(SENTINEL);

        buf
    }
}

fn put_fixed(buf: &mut BytesMut, value: i128, byte_width: usize) {
    let bytes = value.to_le_bytes();
    let sign = if value < 0 { 0xff } else { 0x00 };

    for i in 0..byte_width {
        buf.put_u8(bytes.get(i).copied().unwrap_or(sign));
    }
}

/// Two's-complement little-endian encoding of `value`, `byte_width` bytes long.
pub fn encode_fixed(value: i128, byte_width: usize) -> BytesMut {
    let mut buf = BytesMut::with_capacity(byte_width);
    put_fixed(&mut buf, value, byte_width);
    buf
}

/// Inverse of [`encode_fixed`]. Sign is taken from the top bit of the last
/// byte; anything beyond 16 bytes is dropped.
pub fn decode_fixed(bytes: &[u8]) -> i128 {
    let negative = bytes.last().map_or(false, |b| b & 0x80 != 0);
    let mut raw = if negative { [0xff; 16] } else { [0x00; 16] };

    for (dst, src) in raw.iter_mut().zip(bytes) {
        *dst = *src;
    }

    i128::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_command_layout() {
        let request = RenderRequest {
            pixel_width: 4,
            pixel_height: 2,
            max_iterations: 10,
            origin_x: -1,
            origin_y: 0,
            step: 1,
        };

        let command = request.encode(2);

        assert_eq!(command.len(), 15);
        assert_eq!(command.len(), RenderRequest::encoded_len(2));
        assert_eq!(
            &command[..],
            &[
                0x04, 0x00, // width
                0x02, 0x00, // height
                0x0a, 0x00, 0x00, 0x00, // iterations
                0xff, 0xff, // origin x
                0x00, 0x00, // origin y
                0x01, 0x00, // step
                0xa5,
            ]
        );
    }

    #[test]
    fn default_width_command_length() {
        let request = RenderRequest {
            pixel_width: 1920,
            pixel_height: 1300,
            max_iterations: 255,
            origin_x: -2 << 64,
            origin_y: -5 << 62,
            step: 1 << 55,
        };

        let command = request.encode(DEFAULT_BYTE_WIDTH);

        assert_eq!(command.len(), 8 + 27 + 1);
        assert_eq!(command[command.len() - 1], SENTINEL);
        assert_eq!(decode_fixed(&command[8..17]), -2 << 64);
        assert_eq!(decode_fixed(&command[17..26]), -5 << 62);
        assert_eq!(decode_fixed(&command[26..35]), 1 << 55);
    }

    #[test]
    fn wide_fields_sign_extend() {
        assert_eq!(&encode_fixed(-1, 18)[..], &[0xff; 18]);
        assert_eq!(&encode_fixed(1, 18)[..], &{
            let mut v = [0u8; 18];
            v[0] = 1;
            v
        });
    }

    #[test]
    fn overflow_truncates() {
        // 0x1_0000 does not fit in two bytes
        assert_eq!(&encode_fixed(0x1_0000, 2)[..], &[0x00, 0x00]);
    }

    #[test]
    fn decode_empty_is_zero() {
        assert_eq!(decode_fixed(&[]), 0);
    }

    proptest! {
        #[test]
        fn fixed_round_trips_within_range(width in 1usize..=16, raw in any::<i128>()) {
            let bits = width as u32 * 8;
            // clamp into the representable range for this width
            let value = if bits >= 128 { raw } else { (raw << (128 - bits)) >> (128 - bits) };

            let encoded = encode_fixed(value, width);
            prop_assert_eq!(encoded.len(), width);
            prop_assert_eq!(decode_fixed(&encoded), value);
        }

        #[test]
        fn command_length_tracks_byte_width(width in 1usize..=24) {
            let request = RenderRequest {
                pixel_width: 1,
                pixel_height: 1,
                max_iterations: 1,
                origin_x: 0,
                origin_y: 0,
                step: 0,
            };
            let command = request.encode(width);
            prop_assert_eq!(command.len(), 9 + 3 * width);
            prop_assert_eq!(command[command.len() - 1], SENTINEL);
        }
    }
}
