use std::fmt::{Display, Formatter};

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::{
    builder::QR,
    common::error::{QRError, QRResult},
};

// Modules of light border around every rendered symbol
pub const QUIET_ZONE: usize = 4;

// Render
//------------------------------------------------------------------------------

impl QR {
    /// Grayscale image, `module_sz` pixels per module, quiet zone included.
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, Luma([255]));
        for i in qz_sz..qz_sz + qr_sz {
            for j in qz_sz..qz_sz + qr_sz {
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                if self.is_dark(r, c) {
                    canvas.put_pixel(j, i, Luma([0]));
                }
            }
        }

        canvas
    }

    /// Fits the symbol and its quiet zone into a square image of `image_px`
    /// pixels. Modules get the largest whole pixel size that fits and the
    /// leftover pixels are split evenly around the border.
    pub fn to_image_sized(&self, image_px: u32, dark: Rgb<u8>, light: Rgb<u8>) -> QRResult<RgbImage> {
        let modules = (self.width() + 2 * QUIET_ZONE) as u32;
        let module_sz = image_px / modules;
        if module_sz == 0 {
            return Err(QRError::ImageTooSmall);
        }
        let remainder = image_px - module_sz * modules;
        let border = QUIET_ZONE as u32 * module_sz + remainder / 2;

        let mut canvas = RgbImage::from_pixel(image_px, image_px, light);
        let w = self.width() as i16;
        for r in 0..w {
            for c in 0..w {
                if !self.is_dark(r, c) {
                    continue;
                }
                let (y, x) = (border + r as u32 * module_sz, border + c as u32 * module_sz);
                for i in y..y + module_sz {
                    for j in x..x + module_sz {
                        canvas.put_pixel(j, i, dark);
                    }
                }
            }
        }

        Ok(canvas)
    }

    /// Text rendering, two characters per module so the symbol stays square in
    /// a terminal. Light modules are drawn as blocks.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push_str("██");
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push_str(if self.is_dark(r, c) { "  " } else { "██" });
            }
            canvas.push('\n');
        }

        canvas
    }
}

impl Display for QR {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "size: {}", self.width())?;
        writeln!(f, "version: {}", self.version())?;
        writeln!(f, "error correction: {:?}", self.ec_level())?;
        writeln!(f, "mask pattern: {}", *self.mask())?;
        writeln!(f, "penalty: {}", self.score())?;
        write!(f, "alignments: {:?}", self.version().alignment_pattern())
    }
}
