//! Library Admin Client
//!
//! Client-side core of the library administration app: a session guard over
//! a persisted bearer token, a single gateway for every backend call, typed
//! services for books, members, loans, users and the dashboard, and the
//! screen routing of the app shell.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod session;
pub mod shell;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use http::{ApiClient, Transport};
use session::{SessionEvents, SessionGuard};
use shell::{Navigator, RouteState, Screen};
use storage::TokenStore;

/// Application state shared by every screen
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: SessionGuard,
    pub services: Arc<services::Services>,
    pub route: Arc<RouteState>,
}

impl AppState {
    /// Wire everything over the configured store and the reqwest transport
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let store = TokenStore::open(&config.storage);
        let route = Arc::new(RouteState::new(config.shell.start_path.clone()));
        let api = ApiClient::with_reqwest(
            config.api.clone(),
            store,
            route.clone(),
            SessionEvents::default(),
        )?;
        Ok(Self::assemble(config, api, route))
    }

    /// Wire everything over an explicit transport and store
    pub fn new(config: AppConfig, transport: Arc<dyn Transport>, store: TokenStore) -> Self {
        let route = Arc::new(RouteState::new(config.shell.start_path.clone()));
        let api = ApiClient::new(
            config.api.clone(),
            transport,
            store,
            route.clone(),
            SessionEvents::default(),
        );
        Self::assemble(config, api, route)
    }

    fn assemble(config: AppConfig, api: ApiClient, route: Arc<RouteState>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(api.clone())),
            session: SessionGuard::new(api),
            route,
        }
    }

    /// Screen for the current path and session
    pub fn current_screen(&self) -> Screen {
        shell::resolve(&self.route.current_path(), &self.session.state())
    }

    /// Route of `screen`, with the login route taken from config
    pub fn screen_path(&self, screen: Screen) -> &str {
        screen.path(&self.config.api.login_path)
    }

    /// Move to `path` and return the screen actually shown there
    pub fn navigate(&self, path: &str) -> Screen {
        self.route.redirect_to(path);
        let screen = self.current_screen();
        let target = self.screen_path(screen);
        if target != path {
            self.route.redirect_to(target);
        }
        screen
    }
}
