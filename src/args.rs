use std::time::Duration;

use clap::Parser;

use crate::client::ClientConfig;

#[derive(Parser, Debug)]
pub struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen: String,
    #[arg(long, env = "apikey", hide_env_values = true)]
    pub api_key: String,
    #[arg(long, default_value = "https://www.haloapi.com")]
    pub base_url: String,
    #[arg(long)]
    pub proxy: Option<String>,
    /// seconds allowed for a whole upstream request
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            proxy: self.proxy.clone(),
            timeout: Duration::from_secs(self.timeout),
            connect_timeout: Duration::from_secs(self.connect_timeout),
        }
    }
}
