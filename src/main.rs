#[tokio::main]
async fn main() {
    if let Err(err) = oci_mcp::mcp::server::run_stdio().await {
        eprintln!("oci-mcp: {}", err);
        std::process::exit(1);
    }
}
