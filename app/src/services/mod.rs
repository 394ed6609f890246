use std::fmt;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use axum::extract::multipart::{Field, MultipartError};
use domain::SimulatedGateway;
use domain::avatar::AvatarFile;
use domain::controller::{FormSnapshot, LoginController, SignupController, SubmitOutcome};
use domain::core::Portal;
use domain::form::{FormKind, StateError};
use domain::login::{LoginEdit, LoginField};
use domain::redirect::Navigator;
use domain::signup::{SignupEdit, SignupField};
use domain::validation::{FieldError, MAX_AVATAR_BYTES};
use in_memory_adapter::InMemoryRepo;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

#[cfg(test)]
mod tests;

pub type SessionId = Uuid;
pub type AppPortal = Portal<SimulatedGateway>;
pub type LoginForm = LoginController<SimulatedGateway, SessionNavigator>;
pub type SignupForm = SignupController<SimulatedGateway, SessionNavigator>;

/// Hard cap on request bodies. Avatars over 5MB are streamed, not buffered,
/// so anything below this cap gets the inline size error.
pub const FORM_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Reads a file part. Browsers send an empty part when nothing was picked.
///
/// Only the first 5MB are buffered; past that the rest is drained and the
/// file is kept by length alone.
pub async fn read_avatar(mut field: Field<'_>) -> Result<Option<AvatarFile>, MultipartError> {
    let name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut bytes = Vec::new();
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        if size <= MAX_AVATAR_BYTES {
            bytes.extend_from_slice(&chunk);
        } else if !bytes.is_empty() {
            bytes = Vec::new();
        }
    }

    if name.is_empty() && size == 0 {
        return Ok(None);
    }
    if size > MAX_AVATAR_BYTES {
        debug!("Avatar {name} is {size} bytes, contents dropped");
        return Ok(Some(AvatarFile::oversized(name, content_type, size)));
    }
    Ok(Some(AvatarFile::new(name, content_type, bytes)))
}

/// Remembers the route a form asked to navigate to, for clients to pick up
#[derive(Debug, Default)]
pub struct SessionNavigator {
    route: StdMutex<Option<String>>,
}

impl Navigator for SessionNavigator {
    fn navigate(&self, route: &str) {
        info!("Form session navigating to {route}");
        *self.route.lock().unwrap_or_else(PoisonError::into_inner) = Some(route.to_string());
    }
}

impl SessionNavigator {
    pub fn requested_route(&self) -> Option<String> {
        self.route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A UI event that could not be applied to a form
#[derive(Debug, PartialEq, Eq)]
pub enum FormEventError {
    Malformed(String),
    Unsupported(&'static str),
    Rejected(StateError),
    InvalidFile(FieldError),
}

impl fmt::Display for FormEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormEventError::Malformed(reason) => write!(f, "Malformed form event: {reason}"),
            FormEventError::Unsupported(event) => {
                write!(f, "This form does not support {event}")
            }
            FormEventError::Rejected(error) => write!(f, "{error}"),
            FormEventError::InvalidFile(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for FormEventError {}

impl From<StateError> for FormEventError {
    fn from(error: StateError) -> Self {
        FormEventError::Rejected(error)
    }
}

fn parse_event<T: DeserializeOwned>(event: serde_json::Value) -> Result<T, FormEventError> {
    serde_json::from_value(event).map_err(|e| FormEventError::Malformed(e.to_string()))
}

pub enum FormSession {
    Login(LoginForm),
    Signup(SignupForm),
}

impl FormSession {
    pub fn kind(&self) -> FormKind {
        match self {
            FormSession::Login(form) => form.kind(),
            FormSession::Signup(form) => form.kind(),
        }
    }

    /// Applies `{"field": ..., "value": ...}`
    pub async fn edit(&self, event: serde_json::Value) -> Result<(), FormEventError> {
        match self {
            FormSession::Login(form) => {
                form.edit(parse_event::<LoginEdit>(event)?).await?;
            }
            FormSession::Signup(form) => {
                form.edit(parse_event::<SignupEdit>(event)?).await?;
            }
        }
        Ok(())
    }

    /// Applies `{"field": ...}`
    pub async fn blur(&self, event: serde_json::Value) -> Result<(), FormEventError> {
        #[derive(serde::Deserialize)]
        struct Blur<F> {
            field: F,
        }

        match self {
            FormSession::Login(form) => {
                let Blur { field } = parse_event::<Blur<LoginField>>(event)?;
                form.blur(field).await;
            }
            FormSession::Signup(form) => {
                let Blur { field } = parse_event::<Blur<SignupField>>(event)?;
                form.blur(field).await;
            }
        }
        Ok(())
    }

    pub async fn toggle_password(&self) -> bool {
        match self {
            FormSession::Login(form) => form.toggle_password().await,
            FormSession::Signup(form) => form.toggle_password().await,
        }
    }

    pub async fn select_avatar(
        &self,
        file: AvatarFile,
        portal: &AppPortal,
    ) -> Result<(), FormEventError> {
        match self {
            FormSession::Login(_) => Err(FormEventError::Unsupported("avatar uploads")),
            FormSession::Signup(form) => form
                .select_avatar(file, portal.previews())
                .await
                .map_err(FormEventError::InvalidFile),
        }
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, StateError> {
        match self {
            FormSession::Login(form) => form.submit().await,
            FormSession::Signup(form) => form.submit().await,
        }
    }

    #[cfg(test)]
    pub async fn settled(&self) -> domain::form::FormPhase {
        match self {
            FormSession::Login(form) => form.settled().await,
            FormSession::Signup(form) => form.settled().await,
        }
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        match self {
            FormSession::Login(form) => form.snapshot().await,
            FormSession::Signup(form) => form.snapshot().await,
        }
    }

    pub async fn unmount(self) {
        match self {
            FormSession::Login(form) => form.unmount().await,
            FormSession::Signup(form) => form.unmount().await,
        }
    }
}

/// One mounted form, addressed by its session id
pub struct MountedForm {
    pub id: SessionId,
    pub session: FormSession,
    pub navigator: Arc<SessionNavigator>,
    mounted_at: Instant,
}

impl MountedForm {
    pub fn age(&self) -> Duration {
        self.mounted_at.elapsed()
    }
}

async fn retire(form: Arc<MountedForm>) {
    match Arc::try_unwrap(form) {
        Ok(form) => {
            let id = form.id;
            form.session.unmount().await;
            debug!("Session {id} unmounted");
        }
        // the last request holding it drops the controller, which unmounts it
        Err(form) => debug!("Session {} still in use, released later", form.id),
    }
}

/// Live form sessions
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<InMemoryRepo<Arc<MountedForm>, SessionId>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(InMemoryRepo::new())),
            ttl,
        }
    }

    async fn insert(&self, session: FormSession, navigator: Arc<SessionNavigator>) -> Arc<MountedForm> {
        let form = Arc::new(MountedForm {
            id: Uuid::new_v4(),
            session,
            navigator,
            mounted_at: Instant::now(),
        });
        self.sessions
            .lock()
            .await
            .insert(form.id, Arc::clone(&form));
        info!("Opened {} session {}", form.session.kind(), form.id);
        form
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<MountedForm>> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Unmounts and forgets a session; false when it did not exist
    pub async fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.lock().await.remove(id);
        match removed {
            Some(form) => {
                retire(form).await;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Unmounts every session older than the TTL
    pub async fn sweep_expired(&self) -> usize {
        let ttl = self.ttl;
        let expired = self
            .sessions
            .lock()
            .await
            .drain_where(|_, form| form.age() >= ttl);
        let count = expired.len();
        for (_, form) in expired {
            retire(form).await;
        }
        if count > 0 {
            info!("Expired {count} form sessions");
        }
        count
    }

    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                registry.sweep_expired().await;
            }
        })
    }
}

/// Cheaply cloneable handle on the portal and its sessions, shared by every handler
#[derive(Clone)]
pub struct PortalHandle {
    inner: Arc<AppPortal>,
    sessions: SessionRegistry,
}

impl PortalHandle {
    pub fn new(portal: AppPortal, session_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(portal),
            sessions: SessionRegistry::new(session_ttl),
        }
    }

    pub fn portal(&self) -> &AppPortal {
        &self.inner
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub async fn mount(&self, kind: FormKind) -> Arc<MountedForm> {
        let navigator = Arc::new(SessionNavigator::default());
        let session = match kind {
            FormKind::Login => FormSession::Login(self.inner.mount_login(Arc::clone(&navigator))),
            FormKind::Signup => {
                FormSession::Signup(self.inner.mount_signup(Arc::clone(&navigator)))
            }
        };
        self.sessions.insert(session, navigator).await
    }
}
