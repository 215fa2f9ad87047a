//! # Billing Core
//!
//! The financial document pipeline of a small-business CRM: line items flow
//! through totals computation into PDF, HTML, and spreadsheet renderers,
//! with locale-correct currency formatting, amount-in-words conversion on
//! the Indian numbering scale, UPI payment QR codes, and report aggregation
//! (receivables aging, revenue by client, GST registers).
//!
//! ## Features
//!
//! - **Totals calculation**: pure derivation of subtotal, clamped discount,
//!   tax, and grand total from line items
//! - **Money formatting**: Indian digit grouping and crore/lakh
//!   amount-in-words conversion over integer paise
//! - **UPI payments**: `upi://pay` deep links rendered as scannable QR codes
//! - **Three renderers**: paginated PDF, server-rendered HTML, and typed-cell
//!   spreadsheet export sharing one computation contract
//! - **Report aggregation**: aging buckets, per-client profit, and
//!   CGST/SGST/IGST registers over storage-provided records
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   record source
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::DocumentBuilder;
//! use bigdecimal::BigDecimal;
//!
//! // Build a document, then render it through a `DocumentPipeline`
//! // configured with your company profile:
//! let invoice = DocumentBuilder::invoice("INV-001".to_string(), "2024-04-01")
//!     .line_item("Consulting".to_string(), BigDecimal::from(2), BigDecimal::from(500))
//!     .tax_rate(BigDecimal::from(18))
//!     .build()
//!     .unwrap();
//! assert_eq!(invoice.totals().unwrap().total_amount, BigDecimal::from(1180));
//! ```

pub mod document;
pub mod money;
pub mod render;
pub mod reports;
pub mod session;
pub mod traits;
pub mod types;
pub mod upi;
pub mod utils;

// Re-export commonly used types
pub use document::*;
pub use money::*;
pub use render::*;
pub use reports::*;
pub use session::*;
pub use traits::*;
pub use types::*;
pub use upi::*;
