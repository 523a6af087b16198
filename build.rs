// Copies the demo page in `static/` to `dist/` so it can be served as-is.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    if let Err(e) = fs::create_dir_all(out_dir) {
        println!("cargo:warning=could not create dist/: {e}");
        return;
    }

    let mut options = CopyOptions::new();
    options.content_only = true;
    if let Err(e) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=could not copy static/ to dist/: {e}");
    }
}
