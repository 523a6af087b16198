//! Host-side helper: `cargo run [port]` builds the WASM package into
//! `static/pkg` and serves the demo page from `static/`.

use std::env;
use std::process::{exit, Command};

const DEFAULT_PORT: &str = "8000";

fn main() {
    let port = env::args().nth(1).unwrap_or_else(|| DEFAULT_PORT.to_owned());

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors");
            exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH; serving existing pkg");
        }
    }

    println!("Serving demo at http://127.0.0.1:{port} …");
    let status = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .status();
    match status {
        Ok(st) if st.success() => {}
        Ok(st) => exit(st.code().unwrap_or(1)),
        Err(e) => {
            eprintln!("could not start http server: {e}");
            exit(1);
        }
    }
}
