use std::net::TcpListener;

use env_logger::Env;
use estaterank::{configuration::get_configuration, services::GeminiClient, startup::run};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    if configuration.gemini.api_key.is_empty() {
        log::warn!("No Gemini API key configured, searches will fail to authenticate");
    }

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;
    let gemini_client = GeminiClient::new(configuration.gemini).map_err(std::io::Error::other)?;

    log::info!("Listening on {}", listener.local_addr()?);

    run(listener, gemini_client)?.await
}
