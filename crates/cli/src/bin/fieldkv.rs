use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fieldkv_cli::main_entry().await
}
