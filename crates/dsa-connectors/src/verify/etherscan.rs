use async_trait::async_trait;
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info};

use super::{VerificationRequest, Verifier, RETRIES, RETRY_TIME};

/// Verifies contracts through an Etherscan-compatible API (Etherscan,
/// Polygonscan, Arbiscan, ...).
pub struct EtherscanVerifier {
    api_url: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Submission {
    /// The source was accepted and is identified by a GUID.
    Queued(String),
    AlreadyVerified,
    /// The explorer hasn't indexed the deployment yet.
    NotIndexed,
}

#[derive(Debug, PartialEq, Eq)]
enum Status {
    Pending,
    Verified,
}

impl EtherscanVerifier {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            api_url,
            api_key,
            client: Client::new(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| eyre!("no API key configured for {}", self.api_url))
    }

    async fn submit(&self, form: &[(&str, String)]) -> Result<Submission> {
        let response = self
            .client
            .post(&self.api_url)
            .form(form)
            .send()
            .await?
            .error_for_status()?
            .json::<EtherscanResponse>()
            .await?;
        interpret_submission(response)
    }

    async fn status(&self, guid: &str) -> Result<Status> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("apikey", self.api_key()?),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<EtherscanResponse>()
            .await?;
        interpret_status(response)
    }
}

#[async_trait]
impl Verifier for EtherscanVerifier {
    fn name(&self) -> &str {
        "etherscan"
    }

    async fn verify(&self, request: &VerificationRequest) -> Result<()> {
        let form = submission_form(request, self.api_key()?)?;

        // Submit the source. The explorer may need a few blocks before it
        // knows about the deployment.
        let mut guid = None;
        for _ in 0..RETRIES {
            match self.submit(&form).await? {
                Submission::Queued(id) => {
                    guid = Some(id);
                    break;
                }
                Submission::AlreadyVerified => {
                    info!(address = ?request.address, "contract is already verified");
                    return Ok(());
                }
                Submission::NotIndexed => {
                    debug!("deployment isn't indexed yet, retrying");
                    sleep(RETRY_TIME).await;
                }
            }
        }
        let guid = guid.ok_or(eyre!(
            "explorer didn't index the deployment after {} retries",
            RETRIES
        ))?;

        // Poll until the explorer has compiled and matched the source.
        for _ in 0..RETRIES {
            sleep(RETRY_TIME).await;
            if self.status(&guid).await? == Status::Verified {
                info!(address = ?request.address, "contract verified");
                return Ok(());
            }
        }
        Err(eyre!(
            "verification {} still pending after {} retries",
            guid,
            RETRIES
        ))
    }
}

/// The `verifysourcecode` form for a standard JSON input submission.
fn submission_form(
    request: &VerificationRequest,
    api_key: &str,
) -> Result<Vec<(&'static str, String)>> {
    let build_info = request
        .build_info
        .as_ref()
        .ok_or_else(|| eyre!("no build info for {}", request.artifact.contract_name))?;
    Ok(vec![
        ("apikey", api_key.to_string()),
        ("module", "contract".to_string()),
        ("action", "verifysourcecode".to_string()),
        ("contractaddress", format!("{:?}", request.address)),
        ("sourceCode", serde_json::to_string(&build_info.input)?),
        ("codeformat", "solidity-standard-json-input".to_string()),
        ("contractname", request.artifact.qualified_name()),
        (
            "compilerversion",
            format!("v{}", build_info.solc_long_version),
        ),
        // NOTE: The misspelling is part of the API.
        (
            "constructorArguements",
            ethers::utils::hex::encode(&request.constructor_args),
        ),
    ])
}

fn interpret_submission(response: EtherscanResponse) -> Result<Submission> {
    if response.status == "1" {
        return Ok(Submission::Queued(response.result));
    }
    let result = response.result.to_lowercase();
    if result.contains("already verified") {
        Ok(Submission::AlreadyVerified)
    } else if result.contains("unable to locate contractcode") {
        Ok(Submission::NotIndexed)
    } else {
        Err(eyre!(
            "verification rejected: {}: {}",
            response.message,
            response.result
        ))
    }
}

fn interpret_status(response: EtherscanResponse) -> Result<Status> {
    let result = response.result.to_lowercase();
    if result.contains("pending") {
        Ok(Status::Pending)
    } else if response.status == "1" || result.contains("already verified") {
        Ok(Status::Verified)
    } else {
        Err(eyre!("verification failed: {}", response.result))
    }
}
