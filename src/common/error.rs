use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Version selection
    #[error("no version in range has enough capacity")]
    VersionNotFound,
    #[error("data is too large to encode")]
    TooLargeInput,

    // Configuration
    #[error("invalid version range {min}..{max}")]
    InvalidVersionRange { min: usize, max: usize },
    #[error("invalid mask range {min}..{max}")]
    InvalidMaskRange { min: u8, max: u8 },
    #[error("invalid version {0}")]
    InvalidVersion(usize),
    #[error("invalid masking pattern {0}")]
    InvalidMaskPattern(u8),

    // Matrix construction
    #[error("encoding region does not match codeword count")]
    PlacementConsistency,

    // Rendering
    #[error("image size is too small for this qr code")]
    ImageTooSmall,
}

pub type QRResult<T> = Result<T, QRError>;
