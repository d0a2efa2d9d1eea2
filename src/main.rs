#[tokio::main]
async fn main() {
    if let Err(e) = passcard::cli::run().await {
        eprintln!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}
