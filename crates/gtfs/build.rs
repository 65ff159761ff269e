fn main() -> std::io::Result<()> {
    if std::env::var_os("PROTOC").is_none() {
        if let Ok(protoc_path) = protoc_bin_vendored::protoc_bin_path() {
            std::env::set_var("PROTOC", protoc_path);
        }
    }
    let mut protobuf_out = std::path::PathBuf::new();
    protobuf_out.push(&std::env::var("OUT_DIR").unwrap());
    protobuf_out.push("protobuf");
    std::fs::create_dir(&protobuf_out).ok();
    prost_build::Config::new()
        .out_dir(&protobuf_out)
        .compile_protos(&["protobuf/gtfs-realtime.proto"], &["protobuf/"])?;
    Ok(())
}
