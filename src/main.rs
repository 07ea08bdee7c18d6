use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    aseprite_build_lib::run().await
}
