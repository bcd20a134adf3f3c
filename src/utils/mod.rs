pub mod formatting;
pub mod qr_code;
