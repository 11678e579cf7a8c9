#![forbid(unsafe_code)]

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cpf_registry_http::run_from_env().await?;
    Ok(())
}
