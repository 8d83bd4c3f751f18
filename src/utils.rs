//! # Utility Functions Module
//!
//! Helpers for building argument lists for external processes.

use std::path::Path;

/// Converts an iterable of string-like items to `Vec<String>`.
///
/// # Example
/// ```rust
/// use pdf_fit::utils::to_string_vec;
///
/// let level = "1.4";
/// let args = to_string_vec(["-sDEVICE=pdfwrite".to_string(), format!("-dCompatibilityLevel={}", level)]);
/// assert_eq!(args.len(), 2);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// `-sOutputFile=<path>` style flag for a filesystem path
pub fn path_flag(flag: &str, path: &Path) -> String {
    format!("{}={}", flag, path.to_string_lossy())
}

/// Macro for building argument vectors from mixed displayable values.
///
/// # Example
/// ```rust
/// use pdf_fit::args;
///
/// let dpi = 72;
/// let args = args!["-dDownsampleColorImages=true", format!("-dColorImageResolution={}", dpi)];
/// assert_eq!(args[1], "-dColorImageResolution=72");
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_string_vec([$($item.to_string()),*])
    };
}
