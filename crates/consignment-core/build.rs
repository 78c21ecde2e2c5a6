/// Builds the gRPC client and server code for `consignment.proto` using
/// `tonic-prost-build`.
///
/// # Files and Paths
///
/// - Proto file: `proto/consignment.proto`
/// - Includes: `proto/`
/// - Descriptor set: `$OUT_DIR/consignment_descriptor.bin`, consumed by the
///   reflection service in `consignment-server`.
///
/// # Panics
///
/// Panics if code generation fails (for example when `protoc` is missing).
///
/// # Output
///
/// Generated code is pulled in with:
///
/// ```rust
/// pub mod proto {
///     tonic::include_proto!("consignment");
/// }
/// ```
use std::env;
use std::path::PathBuf;
fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("consignment_descriptor.bin");

    let mut config = tonic_prost_build::Config::new();
    config.file_descriptor_set_path(&descriptor_path);

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/consignment.proto"], &["proto"])
        .unwrap();
}
