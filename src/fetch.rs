use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;

use crate::config::ScrapeConfig;

pub fn build_client(cfg: &ScrapeConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(cfg.http_timeout)
        .user_agent(cfg.user_agent.clone())
        .build()
        .context("building http client")?;
    Ok(client)
}

pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let text = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(text)
}

pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Bytes> {
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    Ok(bytes)
}
