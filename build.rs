// The gRPC stubs are only needed by the server feature; library-only builds
// do not require protoc.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/delivopt.proto");

    if std::env::var_os("CARGO_FEATURE_SERVER").is_some() {
        tonic_build::compile_protos("proto/delivopt.proto")?;
    }

    Ok(())
}
