//! Build script for tempclock-simulator
//!
//! With the `window` feature on Windows, points the linker at a vendored SDL2
//! and copies SDL2.dll next to the binary.

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_WINDOW");

    // Headless builds never link SDL2
    if env::var_os("CARGO_FEATURE_WINDOW").is_none() {
        return;
    }
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from) else {
        return;
    };
    let Some(root) = manifest_dir.parent() else {
        return;
    };
    let vendor_sdl2 = root.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!("cargo:warning=SDL2 vendor directory not found at {}", vendor_sdl2.display());
        println!("cargo:warning=Place SDL2.lib and SDL2.dll in vendor/sdl2/ or install SDL2 system-wide");
        return;
    }
    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    // OUT_DIR is target/<profile>/build/tempclock-simulator-xxx/out
    let Ok(out_dir) = env::var("OUT_DIR") else {
        return;
    };
    let out_path = PathBuf::from(out_dir);
    if let Some(target_dir) = out_path
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
    {
        let dll_src = vendor_sdl2.join("SDL2.dll");
        let dll_dst = target_dir.join("SDL2.dll");
        if dll_src.exists()
            && !dll_dst.exists()
            && let Err(e) = fs::copy(&dll_src, &dll_dst)
        {
            println!("cargo:warning=Failed to copy SDL2.dll: {}", e);
        }
    }
}
