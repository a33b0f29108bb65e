// Link directives for the native backends.
//
// The engine and host-runtime shared libraries exist only where the real
// backends are compiled in. The default build selects the stub backends and
// must stay link-clean so `cargo test` runs on any host.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if std::env::var_os("CARGO_FEATURE_NATIVE_ENGINE").is_some() {
        // Engine C API: thread hooks, event system, blocking main loop
        println!("cargo:rustc-link-lib=dylib=engine");
        // Managed runtime C API: per-thread register/unregister
        println!("cargo:rustc-link-lib=dylib=runtime");
    }
}
