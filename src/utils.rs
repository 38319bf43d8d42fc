use crate::error::Res;
use anyhow::Context;
use std::path::Path;

/// Copy a file from `from` to `to`, replacing `to` if it exists.
pub(crate) fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Res<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::copy(from, to).with_context(|| {
        format!(
            "Unable to copy file from '{}' to '{}'",
            from.to_string_lossy(),
            to.to_string_lossy()
        )
    })?;
    Ok(())
}

/// Remove a file.
pub(crate) fn remove(path: impl AsRef<Path>) -> Res<()> {
    let path = path.as_ref();
    std::fs::remove_file(path).with_context(|| format!("Unable to remove {}", path.display()))
}
