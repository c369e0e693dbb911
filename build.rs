//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and records the build time as the initial
//! wall clock.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // create rs file with current UTC time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_EPOCH: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    // The host-testable library needs neither the memory layout nor the linker scripts
    if env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }

    // Put memory layout in the output directory and ensure it's on the linker search path.
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
}
