// DraftScope server entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().skip(1).any(|a| a == "--write-default-config") {
        let path = draftscope_lib::write_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    draftscope_lib::run().await
}
