use std::future::Future;
use std::time::Duration;

use tracing::debug;


/// Delay the simulated backend waits before answering
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

// Gateway error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    Rejected(String),
    ServiceUnavailable,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::Rejected(reason) => write!(f, "{reason}"),
            GatewayError::ServiceUnavailable => {
                write!(f, "Authentication service is temporarily unavailable.")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Credentials sent when signing in
#[derive(Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl std::fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AvatarPayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Account details sent when signing up
#[derive(Clone)]
pub struct SignupPayload {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub avatar: Option<AvatarPayload>,
}

impl std::fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupPayload")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field(
                "avatar",
                &self.avatar.as_ref().map(|avatar| avatar.file_name.as_str()),
            )
            .finish()
    }
}

// Authentication backend trait
pub trait AuthGateway: Send + Sync + 'static {
    fn login(
        &self,
        payload: LoginPayload,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn register(
        &self,
        payload: SignupPayload,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Stand-in backend: waits for a fixed delay, then accepts every request
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

impl AuthGateway for SimulatedGateway {
    async fn login(&self, payload: LoginPayload) -> Result<(), GatewayError> {
        debug!("Simulating sign-in for {}", payload.email);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn register(&self, payload: SignupPayload) -> Result<(), GatewayError> {
        debug!(
            "Simulating account creation for {} as {}",
            payload.email, payload.role
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
