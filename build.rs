// Build script for flutter_rust_bridge code generation
//
// flutter_rust_bridge v2 code generation is run via the CLI tool:
//   flutter_rust_bridge_codegen generate
//
// The generated files are:
// - lib/bridge/equalizer_api.dart (Dart bindings)
// - rust/src/frb_generated.rs (Rust FFI glue code)

fn main() {
    // Rerun when the FFI surface changes
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=src/jni_exports.rs");
}
