use leadline_core::chat::SubmitFailure;
use leadline_core::intake::{IntakeProfile, IntakeRequest};
use leadline_core::time::now_utc;
use leadline_server::API_KEY_HEADER;
use leadline_store::Store;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Where the chat driver delivers a finished conversation.
pub trait LeadSink {
    fn sink_name(&self) -> &'static str;
    fn submit(&self, request: &IntakeRequest) -> Result<(), SubmitFailure>;
}

/// Posts to a running ingestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpLeadSink {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpLeadSink {
    pub fn new(endpoint: &str, api_key: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .user_agent("leadline")
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }
}

impl LeadSink for HttpLeadSink {
    fn sink_name(&self) -> &'static str {
        "http"
    }

    fn submit(&self, request: &IntakeRequest) -> Result<(), SubmitFailure> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .map_err(|err| SubmitFailure::new(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = response
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(SubmitFailure::new(format!("{status}: {detail}")))
    }
}

/// Writes straight into the local store with the widget intake profile.
pub struct StoreLeadSink<'a> {
    store: &'a Store,
}

impl<'a> StoreLeadSink<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl LeadSink for StoreLeadSink<'_> {
    fn sink_name(&self) -> &'static str {
        "local"
    }

    fn submit(&self, request: &IntakeRequest) -> Result<(), SubmitFailure> {
        self.store
            .leads()
            .ingest(now_utc(), request.clone(), &IntakeProfile::WIDGET)
            .map(|_| ())
            .map_err(|err| SubmitFailure::new(err.to_string()))
    }
}
