//! Scan-to-PDF conversion.

pub mod converter;

pub use converter::{ScanConverter, ScanImage};
