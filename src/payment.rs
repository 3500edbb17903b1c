use crate::error::BookingError;
use std::path::Path;
use tokio::fs;
use tracing::warn;

pub const MAX_PROOF_BYTES: u64 = 2 * 1024 * 1024;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            ImageKind::Png => bytes.starts_with(PNG_SIGNATURE),
            ImageKind::Jpeg => bytes.starts_with(JPEG_SIGNATURE),
        }
    }
}

/// A payment screenshot that passed the upload checks.
///
/// Only constructible through validation, so holding one means the
/// booking form may be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentProof {
    pub file_name: String,
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl PaymentProof {
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Result<Self, BookingError> {
        check_size(bytes.len() as u64)?;

        let kind = ImageKind::from_extension(file_name).ok_or_else(|| {
            warn!(file_name, "Payment proof has an unsupported extension");
            BookingError::InvalidProofType
        })?;
        if !kind.matches_signature(&bytes) {
            warn!(file_name, "Payment proof content does not match its extension");
            return Err(BookingError::InvalidProofType);
        }

        Ok(Self {
            file_name: file_name.to_string(),
            kind,
            bytes,
        })
    }

    pub async fn from_path(path: &Path) -> Result<Self, BookingError> {
        check_size(fs::metadata(path).await?.len())?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(BookingError::InvalidProofType)?;
        let bytes = fs::read(path).await?;
        Self::from_bytes(file_name, bytes)
    }
}

fn check_size(size: u64) -> Result<(), BookingError> {
    if size > MAX_PROOF_BYTES {
        warn!(size, "Payment proof exceeds upload limit");
        return Err(BookingError::ProofTooLarge(size));
    }
    Ok(())
}

pub fn check_paid_amount(paid: u32, required: u32) -> Result<(), BookingError> {
    if paid != required {
        return Err(BookingError::AmountMismatch { paid, required });
    }
    Ok(())
}
