use std::collections::BTreeMap;

use async_trait::async_trait;
use eyre::{eyre, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{VerificationRequest, Verifier};

/// Verifies contracts on a Sourcify server by uploading the compiler metadata
/// together with the sources it references.
pub struct SourcifyVerifier {
    server_url: String,
    chain_id: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SourcifyRequest {
    address: String,
    chain: String,
    files: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct SourcifyResponse {
    #[serde(default)]
    result: Vec<SourcifyMatch>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourcifyMatch {
    status: String,
}

impl SourcifyVerifier {
    pub fn new(server_url: String, chain_id: u64) -> Self {
        Self {
            server_url,
            chain_id,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Verifier for SourcifyVerifier {
    fn name(&self) -> &str {
        "sourcify"
    }

    async fn verify(&self, request: &VerificationRequest) -> Result<()> {
        let body = sourcify_request(request, self.chain_id)?;
        let response = self
            .client
            .post(format!("{}/verify", self.server_url.trim_end_matches('/')))
            .json(&body)
            .send()
            .await?
            .json::<SourcifyResponse>()
            .await?;
        let status = interpret_response(response)?;
        info!(address = ?request.address, %status, "contract verified");
        Ok(())
    }
}

fn sourcify_request(request: &VerificationRequest, chain_id: u64) -> Result<SourcifyRequest> {
    let build_info = request
        .build_info
        .as_ref()
        .ok_or_else(|| eyre!("no build info for {}", request.artifact.contract_name))?;
    let source_name = request
        .artifact
        .source_name
        .as_deref()
        .ok_or_else(|| {
            eyre!(
                "artifact of {} has no source name",
                request.artifact.contract_name
            )
        })?;
    let metadata = build_info
        .metadata(source_name, &request.artifact.contract_name)
        .ok_or_else(|| {
            eyre!(
                "build info has no metadata for {}",
                request.artifact.qualified_name()
            )
        })?;

    let mut files = build_info.sources().into_iter().collect::<BTreeMap<_, _>>();
    files.insert("metadata.json".to_string(), metadata);

    Ok(SourcifyRequest {
        address: format!("{:?}", request.address),
        chain: chain_id.to_string(),
        files,
    })
}

/// Returns the match status (`perfect` or `partial`) of a verification.
fn interpret_response(response: SourcifyResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(eyre!("sourcify rejected the contract: {}", error));
    }
    match response.result.into_iter().next() {
        Some(m) if m.status == "perfect" || m.status == "partial" => Ok(m.status),
        Some(m) => Err(eyre!("sourcify returned status {}", m.status)),
        None => Err(eyre!("sourcify returned no result")),
    }
}
