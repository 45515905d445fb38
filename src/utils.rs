use std::{fs, io, path::Path};

pub fn create_folder_if_not_exists(dir: impl AsRef<Path>) -> io::Result<()> {
    let dir = dir.as_ref();
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)
}

/// Relative percent change from `from` to `to`
pub fn percent_change(from: f64, to: f64) -> f64 {
    (to / from - 1.) * 100.
}

/// Whether two money amounts agree, relative to their size
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.)
}
