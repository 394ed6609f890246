use std::sync::Arc;
use std::time::Duration;

use auth_adapter::{AuthGateway, SimulatedGateway};
use tracing::info;

use crate::avatar::PreviewStore;
use crate::controller::{FormController, LoginController, SignupController};
use crate::form::FormFields;
use crate::landing::{LandingPage, Viewer, landing_page};
use crate::redirect::{DEFAULT_REDIRECT_DELAY, Navigator, RedirectScheduler};

/// Entry point of the front-end: owns the gateway and the preview store,
/// and mounts form controllers on demand
#[derive(Debug)]
pub struct Portal<G: AuthGateway = SimulatedGateway> {
    gateway: Arc<G>,
    previews: PreviewStore,
    redirect_delay: Duration,
}

impl Portal<SimulatedGateway> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_gateway(SimulatedGateway::default(), DEFAULT_REDIRECT_DELAY)
    }
}

impl Default for Portal<SimulatedGateway> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: AuthGateway> Portal<G> {
    #[must_use]
    pub fn with_gateway(gateway: G, redirect_delay: Duration) -> Self {
        Portal {
            gateway: Arc::new(gateway),
            previews: PreviewStore::new(),
            redirect_delay,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    pub fn landing(&self, viewer: Viewer) -> LandingPage {
        landing_page(viewer)
    }

    pub fn mount_login<N: Navigator>(&self, navigator: Arc<N>) -> LoginController<G, N> {
        self.mount(navigator)
    }

    pub fn mount_signup<N: Navigator>(&self, navigator: Arc<N>) -> SignupController<G, N> {
        self.mount(navigator)
    }

    fn mount<I: FormFields, N: Navigator>(&self, navigator: Arc<N>) -> FormController<I, G, N> {
        info!("Mounting {} form", I::KIND);
        let redirects = RedirectScheduler::new(navigator, self.redirect_delay);
        FormController::new(Arc::clone(&self.gateway), redirects)
    }
}
