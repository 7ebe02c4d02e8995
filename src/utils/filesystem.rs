// SPDX-License-Identifier: GPL-3.0-only

use std::{fs, io, path::Path};

/// Writes `contents` to `path` through a sibling temp file and a rename, so a
/// reader never observes a half written file. Creates the parent directory if needed.
pub fn write_atomically<P: AsRef<Path>>(path: P, contents: &[u8]) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)
}
