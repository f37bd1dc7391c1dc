use crate::registry::{self, FormatId};
use std::path::Path;

/// Return the detected format if `path` is an existing file that can be converted to `target`
pub fn convertible_format(path: &Path, target: FormatId) -> Option<FormatId> {
    if !path.is_file() {
        return None;
    }
    registry::detect(path).filter(|&source| registry::is_declared(source, target))
}
