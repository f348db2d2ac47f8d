pub mod code_detector;
pub mod format_preserver;
pub mod indentation;
pub mod ocr_cleanup;

pub use code_detector::{has_code_content, is_code_line};
pub use format_preserver::preserve_formatting;
pub use indentation::restore_indentation;
pub use ocr_cleanup::{apply_ocr_corrections, normalize_option_marker};
