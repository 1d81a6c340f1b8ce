//! Decoding of the base64 JPEG check-in photos (biometria) produced by the
//! capture page.
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),

    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("payload is not a JPEG image")]
    NotJpeg,

    #[error("JPEG frame header is missing or truncated")]
    MissingFrameHeader,

    #[error("JPEG has invalid dimensions {0}x{1}")]
    InvalidDimensions(u16, u16),
}

/// A decoded JPEG along with the frame header values needed to embed it.
#[derive(Debug, Clone)]
pub struct Photo {
    bytes: Vec<u8>,
    width: u16,
    height: u16,
    components: u8,
}

impl Photo {
    /// Accepts `data:image/jpeg;base64,...` or bare base64.
    pub fn from_data_url(value: &str) -> Result<Self, PhotoError> {
        let payload = match value.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| PhotoError::UnsupportedMediaType(rest.to_string()))?;
                let mut parts = header.split(';');
                let media_type = parts.next().unwrap_or_default();
                let is_base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));
                if !is_base64
                    || !(media_type.eq_ignore_ascii_case("image/jpeg")
                        || media_type.eq_ignore_ascii_case("image/jpg"))
                {
                    return Err(PhotoError::UnsupportedMediaType(header.to_string()));
                }
                payload
            }
            None => value,
        };

        let bytes = STANDARD.decode(payload.trim())?;
        Self::from_jpeg_bytes(bytes)
    }

    pub fn from_jpeg_bytes(bytes: Vec<u8>) -> Result<Self, PhotoError> {
        if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
            return Err(PhotoError::NotJpeg);
        }
        let (width, height, components) = read_frame_header(&bytes)?;
        if width == 0 || height == 0 {
            return Err(PhotoError::InvalidDimensions(width, height));
        }

        Ok(Self {
            bytes,
            width,
            height,
            components,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }
}

fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Walks the marker segments up to the first SOFn and returns
/// `(width, height, components)`.
fn read_frame_header(bytes: &[u8]) -> Result<(u16, u16, u8), PhotoError> {
    let mut i = 2;
    while i + 4 <= bytes.len() {
        if bytes[i] != 0xFF {
            return Err(PhotoError::MissingFrameHeader);
        }
        let marker = bytes[i + 1];
        match marker {
            // fill byte
            0xFF => {
                i += 1;
                continue;
            }
            // standalone markers carry no length
            0x01 | 0xD0..=0xD8 => {
                i += 2;
                continue;
            }
            // scan data or end of image before any frame header
            0xD9 | 0xDA => break,
            _ => {}
        }

        let length = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if length < 2 {
            return Err(PhotoError::MissingFrameHeader);
        }
        if is_start_of_frame(marker) {
            if i + 10 > bytes.len() {
                return Err(PhotoError::MissingFrameHeader);
            }
            let height = u16::from_be_bytes([bytes[i + 5], bytes[i + 6]]);
            let width = u16::from_be_bytes([bytes[i + 7], bytes[i + 8]]);
            let components = bytes[i + 9];
            return Ok((width, height, components));
        }
        i += 2 + length;
    }

    Err(PhotoError::MissingFrameHeader)
}
