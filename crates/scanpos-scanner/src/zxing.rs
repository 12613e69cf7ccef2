//! # Image Barcode Decoder
//!
//! [`FrameDecoder`] backed by `rxing`, the Rust port of ZXing. Reads 1D and
//! 2D symbologies from grayscale frames.
//!
//! ```text
//! ┌──────────────┐  Luma8 bytes   ┌──────────────────┐  text
//! │ VideoStream  │ ─────────────► │  ZxingDecoder    │ ──────► on_decode
//! └──────────────┘                │  detect_in_luma  │
//!                                 └────────┬─────────┘
//!                                          │ NotFoundException ─► NotFound
//!                                          │ ChecksumException ─► Checksum
//!                                          │ anything else     ─► Format
//! ```
//!
//! [`render_barcode`] goes the other way. The scripted camera uses it to
//! show real barcode images to the decoder.

use rxing::{BarcodeFormat, Exceptions, MultiFormatWriter, Writer};
use tracing::trace;

use crate::backend::{DecodeError, Frame, FrameDecoder, PixelFormat};
use crate::error::{ScannerError, ScannerResult};

/// Luma value of a dark module.
const BLACK: u8 = 0;

/// Luma value of a light module.
const WHITE: u8 = u8::MAX;

// =============================================================================
// Decoder
// =============================================================================

/// Decodes grayscale frames with rxing.
#[derive(Debug, Clone, Default)]
pub struct ZxingDecoder {
    format: Option<BarcodeFormat>,
}

impl ZxingDecoder {
    /// Tries every supported symbology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts decoding to one symbology.
    pub fn only(format: BarcodeFormat) -> Self {
        ZxingDecoder {
            format: Some(format),
        }
    }
}

impl FrameDecoder for ZxingDecoder {
    fn decode(&self, frame: &Frame) -> Result<String, DecodeError> {
        if frame.format != PixelFormat::Luma8 {
            return Err(DecodeError::Format(format!(
                "expected a Luma8 frame, got {:?}",
                frame.format
            )));
        }

        let expected = frame.width as usize * frame.height as usize;
        if frame.data.len() != expected {
            return Err(DecodeError::Format(format!(
                "frame is {}x{} but carries {} bytes",
                frame.width,
                frame.height,
                frame.data.len()
            )));
        }

        let result = rxing::helpers::detect_in_luma(
            frame.data.clone(),
            frame.width,
            frame.height,
            self.format.clone(),
        )
        .map_err(decode_error)?;

        trace!(format = ?result.getBarcodeFormat(), "Frame decoded");
        Ok(result.getText().to_string())
    }
}

fn decode_error(err: Exceptions) -> DecodeError {
    match err {
        Exceptions::NotFoundException(_) => DecodeError::NotFound,
        Exceptions::ChecksumException(_) => DecodeError::Checksum,
        other => DecodeError::Format(other.to_string()),
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders `text` as a barcode image.
///
/// Valid EAN-13 codes (12 digits, or 13 with a correct check digit) render
/// as EAN-13; anything else as Code 128. The returned frame may be larger
/// than requested when the symbol needs more room.
pub fn render_barcode(text: &str, width: u32, height: u32) -> ScannerResult<Frame> {
    let writer = MultiFormatWriter::default();
    let (w, h) = (width as i32, height as i32);

    let matrix = writer
        .encode(text, &BarcodeFormat::EAN_13, w, h)
        .or_else(|_| writer.encode(text, &BarcodeFormat::CODE_128, w, h))
        .map_err(|e| ScannerError::Stream(format!("cannot render {text:?}: {e}")))?;

    let (width, height) = (matrix.getWidth(), matrix.getHeight());
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(if matrix.get(x, y) { BLACK } else { WHITE });
        }
    }
    Ok(Frame::luma(data, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_rendered_ean13() {
        let frame = render_barcode("4901234567054", 320, 120).unwrap();
        assert_eq!(frame.format, PixelFormat::Luma8);

        let decoder = ZxingDecoder::new();
        assert_eq!(decoder.decode(&frame).unwrap(), "4901234567054");

        let ean_only = ZxingDecoder::only(BarcodeFormat::EAN_13);
        assert_eq!(ean_only.decode(&frame).unwrap(), "4901234567054");
    }

    #[test]
    fn test_bad_check_digit_falls_back_to_code128() {
        // Check digit should be 4.
        let frame = render_barcode("4901234567059", 320, 120).unwrap();
        assert_eq!(ZxingDecoder::new().decode(&frame).unwrap(), "4901234567059");
        assert!(ZxingDecoder::only(BarcodeFormat::EAN_13)
            .decode(&frame)
            .is_err());
    }

    #[test]
    fn test_blank_frame_is_not_found() {
        let decoder = ZxingDecoder::new();
        assert_eq!(decoder.decode(&Frame::blank(320, 120)), Err(DecodeError::NotFound));
    }

    #[test]
    fn test_rejects_malformed_frames() {
        let decoder = ZxingDecoder::new();

        let short = Frame::luma(vec![WHITE; 10], 320, 120);
        assert!(matches!(decoder.decode(&short), Err(DecodeError::Format(_))));

        let text = Frame::from_text("4901234567054");
        assert!(matches!(decoder.decode(&text), Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_exception_mapping() {
        assert_eq!(
            decode_error(Exceptions::NotFoundException(String::new())),
            DecodeError::NotFound
        );
        assert_eq!(
            decode_error(Exceptions::ChecksumException(String::new())),
            DecodeError::Checksum
        );
        assert!(matches!(
            decode_error(Exceptions::FormatException("bad".into())),
            DecodeError::Format(_)
        ));
    }
}
