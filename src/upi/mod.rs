//! UPI deep links and payment QR codes
//!
//! Builds `upi://pay` intent URIs and renders them as scannable QR bitmaps.
//! UPI is INR-only; the currency field is fixed and not configurable.

use base64::{engine::general_purpose, Engine as _};
use bigdecimal::BigDecimal;
use image::{DynamicImage, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

use crate::money::round_display;
use crate::types::{DocumentError, DocumentResult};

/// A UPI collect request addressed to a payee VPA
#[derive(Debug, Clone, PartialEq)]
pub struct UpiPayment {
    /// Payee virtual payment address (user@handle)
    pub payee_vpa: String,
    /// Payee display name
    pub payee_name: String,
    /// Requested amount; omitted from the URI when absent or not positive,
    /// since some UPI apps reject a zero amount field
    pub amount: Option<BigDecimal>,
    /// Transaction note shown in the payer's app
    pub note: Option<String>,
}

impl UpiPayment {
    /// Create a payment request
    pub fn new(payee_vpa: String, payee_name: String) -> Self {
        Self {
            payee_vpa,
            payee_name,
            amount: None,
            note: None,
        }
    }

    /// Set the requested amount
    pub fn amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the transaction note
    pub fn note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    /// Build the `upi://pay?pa=...&pn=...&am=...&tn=...&cu=INR` intent URI
    pub fn to_uri(&self) -> String {
        let mut uri = format!(
            "upi://pay?pa={}&pn={}",
            self.payee_vpa,
            urlencoding::encode(&self.payee_name)
        );

        if let Some(amount) = &self.amount {
            if *amount > BigDecimal::from(0) {
                uri.push_str(&format!("&am={}", round_display(amount)));
            }
        }

        if let Some(note) = &self.note {
            uri.push_str(&format!("&tn={}", urlencoding::encode(note)));
        }

        uri.push_str("&cu=INR");
        uri
    }
}

/// A rendered payment QR code
///
/// Carries the PNG bytes for embedding in HTML and PDF output.
#[derive(Debug, Clone)]
pub struct UpiQr {
    /// The encoded URI payload
    pub payload: String,
    /// PNG-encoded bitmap
    pub png: Vec<u8>,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
}

/// Pixels per QR module in the rendered bitmap
const MODULE_PIXELS: u32 = 4;

impl UpiQr {
    /// Encode a payload at medium error correction and a fixed module size
    ///
    /// Encoding failures surface as a render error; callers treat a missing
    /// QR as a non-fatal degradation and render the document without it.
    pub fn generate(payload: &str) -> DocumentResult<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| DocumentError::Render(format!("QR encoding failed: {e:?}")))?;

        let bitmap = code
            .render::<Luma<u8>>()
            .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
            .build();
        let (width, height) = bitmap.dimensions();

        let dynamic_image = DynamicImage::ImageLuma8(bitmap);
        let mut buffer = Cursor::new(Vec::new());
        dynamic_image
            .write_to(&mut buffer, image::ImageOutputFormat::Png)
            .map_err(|e| DocumentError::Render(format!("QR PNG encoding failed: {e}")))?;

        Ok(Self {
            payload: payload.to_string(),
            png: buffer.into_inner(),
            width,
            height,
        })
    }

    /// Base64 data URI for inline `<img>` embedding
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_uri_includes_positive_amount() {
        let uri = UpiPayment::new("acme@okhdfcbank".to_string(), "Acme Studio".to_string())
            .amount(BigDecimal::from_str("1234.5").unwrap())
            .note("INV-001".to_string())
            .to_uri();

        assert_eq!(
            uri,
            "upi://pay?pa=acme@okhdfcbank&pn=Acme%20Studio&am=1234.50&tn=INV-001&cu=INR"
        );
    }

    #[test]
    fn test_uri_omits_zero_amount_entirely() {
        let uri = UpiPayment::new("acme@okhdfcbank".to_string(), "Acme".to_string())
            .amount(BigDecimal::from(0))
            .to_uri();

        assert!(!uri.contains("&am="));
        assert!(uri.ends_with("&cu=INR"));
    }

    #[test]
    fn test_uri_omits_absent_amount() {
        let uri = UpiPayment::new("acme@okhdfcbank".to_string(), "Acme".to_string()).to_uri();
        assert_eq!(uri, "upi://pay?pa=acme@okhdfcbank&pn=Acme&cu=INR");
    }

    #[test]
    fn test_qr_generation_produces_bitmap() {
        let qr = UpiQr::generate("upi://pay?pa=acme@okhdfcbank&pn=Acme&cu=INR").unwrap();
        assert!(!qr.png.is_empty());
        assert!(qr.width > 0 && qr.height > 0);
        assert!(qr.data_uri().starts_with("data:image/png;base64,"));
    }
}
