use crate::core::{AddressInfo, ConfigProvider, ViaCepResponse};
use crate::utils::error::{EnrollmentError, Result};
use reqwest::Client;

pub const CEP_LENGTH: usize = 8;

/// ViaCEP lookup client. The base URL is fixed at construction.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    client: Client,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(config.via_cep_api(), builder.build()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 查詢 CEP 並轉換成內部地址格式
    pub async fn get_address_from_cep(&self, cep: &str) -> Result<AddressInfo> {
        if cep.chars().count() != CEP_LENGTH {
            tracing::warn!("Rejected CEP with invalid length: {:?}", cep);
            return Err(EnrollmentError::BadRequest);
        }

        let url = format!("{}/{}/json/", self.base_url, cep);
        tracing::debug!("Making ViaCEP request to: {}", url);
        let response = self.client.get(&url).send().await?;

        tracing::debug!("ViaCEP response status: {}", response.status());

        let payload: ViaCepResponse = response.error_for_status()?.json().await?;

        if payload.erro {
            tracing::warn!("ViaCEP reports unknown CEP {}", cep);
            return Err(EnrollmentError::BadRequest);
        }

        Ok(AddressInfo::from(payload))
    }
}
