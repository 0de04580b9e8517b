pub(crate) mod health;
pub(crate) mod ocr;

pub use health::health_check;
pub use ocr::process_ocr;
