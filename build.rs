// `src/transport/proto.rs` holds the message types as hand-written prost
// structs and is the source of truth; `proto/intent.proto` documents the same
// wire schema for non-Rust clients. Only the service stubs are generated here,
// without invoking protoc.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let intent_service = tonic_build::manual::Service::builder()
        .name("IntentService")
        .package("intent")
        .method(
            tonic_build::manual::Method::builder()
                .name("parse_intent")
                .route_name("ParseIntent")
                .input_type("crate::transport::proto::ParseIntentRequest")
                .output_type("crate::transport::proto::ParseIntentResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[intent_service]);
}
