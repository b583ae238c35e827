//! # qrcraft
//!
//! A Rust library for generating byte mode QR codes with Reed-Solomon error correction.
//! Every mask pattern is laid out in parallel and the symbol with the lowest penalty
//! score is returned.
//!
//! ## Features
//!
//! - **Version Selection**: Picks the smallest version 1-40 that holds the data, optionally within a range
//! - **Reed-Solomon Error Correction**: Error correction levels L, M, Q and H
//! - **Mask Selection**: Scores all 8 mask patterns with the 4 standard penalty rules
//! - **Rendering**: Grayscale and colored images, or plain text for the terminal
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrcraft::ECLevel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = qrcraft::encode(b"Hello, World!", ECLevel::M)?;
//!
//! let img = qr.to_image(4); // 4 pixels per module
//! img.save("simple_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrcraft::{ECLevel, Encoder, EncoderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EncoderConfig::new()
//!     .ec_level(ECLevel::H) // Defaults to ECLevel::M
//!     .versions(5..11)      // Smallest version in 5..=10 that fits the data
//!     .mask(3);             // Pins the mask, otherwise all 8 are scored
//! let encoder = Encoder::new(config)?;
//!
//! let qr = encoder.encode("Hello, World!".as_bytes())?;
//! println!("{qr}");
//!
//! let img = qr.to_image_sized(512, image::Rgb([0, 0, 128]), image::Rgb([255, 255, 255]))?;
//! img.save("configured_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! The encoder emits `tracing` spans and events at debug and trace level. Install any
//! subscriber to see them, the library never installs one itself.

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl, clippy::suspicious_op_assign_impl)]

pub mod builder;
pub(crate) mod common;
pub mod render;

pub use builder::{encode, Encoder, Module, QR};
pub use common::config::EncoderConfig;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
