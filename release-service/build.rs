fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Point prost/tonic at a vendored protoc so the build does not depend on a
    // system-installed protobuf compiler.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/release.proto"], &["proto"])?;
    Ok(())
}
