use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use ethers::{
    middleware::{
        nonce_manager::NonceManagerError, MiddlewareError, NonceManagerMiddleware,
        SignerMiddleware,
    },
    providers::{
        Http, HttpClientError, HttpRateLimitRetryPolicy, Middleware, PendingTransaction, Provider,
        RetryClient, RetryClientBuilder, RetryPolicy,
    },
    signers::Signer,
    types::{transaction::eip2718::TypedTransaction, Address, BlockId},
};
use eyre::Result;
use tracing::debug;

/// A retry policy that only retries rate limit and timeout errors. Anything
/// the node rejects is surfaced to the caller.
#[derive(Debug, Default)]
struct ChainRetryPolicy(HttpRateLimitRetryPolicy);

impl RetryPolicy<HttpClientError> for ChainRetryPolicy {
    fn should_retry(&self, error: &HttpClientError) -> bool {
        self.0.should_retry(error)
    }

    fn backoff_hint(&self, error: &HttpClientError) -> Option<Duration> {
        self.0.backoff_hint(error)
    }
}

type ChainClientProvider = Arc<RetryClient<Http>>;

type ChainClientInner<S> =
    NonceManagerMiddleware<SignerMiddleware<Provider<ChainClientProvider>, S>>;

#[derive(Debug)]
pub struct ChainClient<S: Signer + 'static> {
    inner: ChainClientInner<S>,
    address: Address,
}

/// A client with a provider stack that includes a retry policy, a signer and
/// a nonce manager.
impl<S: Signer + 'static> ChainClient<S> {
    pub async fn new(provider: Provider<Http>, signer: S) -> Result<Self> {
        // Build a provider with a retry policy that will retry on rate limit
        // and timeout errors.
        let provider = RetryClientBuilder::default()
            .rate_limit_retries(10)
            .timeout_retries(3)
            .initial_backoff(Duration::from_millis(100))
            .build(
                provider.as_ref().clone(),
                Box::<ChainRetryPolicy>::default(),
            );
        let provider = Provider::new(Arc::new(provider)).interval(Duration::from_millis(500));

        // Build a client with signer and nonce management middleware. The
        // signer picks up the chain id from the provider.
        let inner = SignerMiddleware::new_with_provider_chain(provider, signer).await?;
        let address = inner.address();
        let inner = NonceManagerMiddleware::new(inner, address);

        Ok(Self { inner, address })
    }

    /// Gets the client's address.
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl<S: Signer + 'static> Middleware for ChainClient<S> {
    // NOTE: This is a pass-through middleware implementation, so we just use
    // the error from the top of the middleware stack.
    type Error = NonceManagerError<Self::Inner>;

    type Provider = ChainClientProvider;
    type Inner = ChainClientInner<S>;

    fn inner(&self) -> &Self::Inner {
        &self.inner
    }

    async fn send_transaction<T: Into<TypedTransaction> + Send + Sync>(
        &self,
        tx: T,
        block: Option<BlockId>,
    ) -> Result<PendingTransaction<'_, Self::Provider>, Self::Error> {
        Ok(self
            .inner
            .send_transaction(tx, block)
            .await
            .map_err(MiddlewareError::from_err)?)
    }
}

/// A connection to an Ethereum node that hands out signing clients.
#[derive(Clone, Debug)]
pub struct Chain {
    provider: Provider<Http>,
    client_version: String,
}

impl Chain {
    /// Connects to the node at `rpc_url`.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?.interval(Duration::from_millis(500));
        Self::from_provider(provider).await
    }

    /// Wraps an existing provider.
    pub async fn from_provider(provider: Provider<Http>) -> Result<Self> {
        let client_version = provider.client_version().await?;
        debug!(%client_version, "connected to node");
        Ok(Self {
            provider,
            client_version,
        })
    }

    /// A provider that can access the chain.
    pub fn provider(&self) -> Provider<Http> {
        self.provider.clone()
    }

    /// A client that can access the chain.
    pub async fn client<S: Signer + 'static>(&self, signer: S) -> Result<Arc<ChainClient<S>>> {
        Ok(Arc::new(ChainClient::new(self.provider(), signer).await?))
    }

    /// A provider whose transactions are sent from `address` unsigned. The
    /// node has to manage the account, which is the case for impersonated
    /// accounts on anvil.
    pub fn unlocked(&self, address: Address) -> Arc<Provider<Http>> {
        Arc::new(self.provider().with_sender(address))
    }

    /// The version string the node reported.
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    /// Checks to see if the underlying chain is an anvil chain.
    pub fn is_anvil(&self) -> bool {
        self.client_version.contains("anvil")
    }
}
