//! App shell: screen routing and navigation

use std::sync::Mutex;

use crate::models::{Role, SessionState};

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Current location of the shell and the means to move it
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn redirect_to(&self, path: &str);
}

/// Screens reachable from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Books,
    Members,
    Loans,
    Users,
}

impl Screen {
    /// Route of the screen; the login route is configurable
    pub fn path<'a>(&self, login_path: &'a str) -> &'a str {
        match self {
            Screen::Login => login_path,
            Screen::Dashboard => DASHBOARD_PATH,
            Screen::Books => "/books",
            Screen::Members => "/members",
            Screen::Loans => "/loans",
            Screen::Users => "/users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Dashboard => "Dashboard",
            Screen::Books => "Books",
            Screen::Members => "Members",
            Screen::Loans => "Loans",
            Screen::Users => "User Management",
        }
    }

    /// Screens offered in the navigation bar for `role`
    pub fn menu(role: Role) -> Vec<Screen> {
        let mut screens = vec![Screen::Dashboard, Screen::Books, Screen::Members, Screen::Loans];
        if role == Role::Admin {
            screens.push(Screen::Users);
        }
        screens
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Screen to show for `path` given the session
pub fn resolve(path: &str, state: &SessionState) -> Screen {
    let Some(user) = state.user() else {
        return Screen::Login;
    };

    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    match path {
        "/books" => Screen::Books,
        "/members" => Screen::Members,
        "/loans" => Screen::Loans,
        "/users" if user.is_admin() => Screen::Users,
        _ => Screen::Dashboard,
    }
}

/// In-process navigator holding the current path
#[derive(Debug)]
pub struct RouteState {
    path: Mutex<String>,
}

impl RouteState {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new(DASHBOARD_PATH)
    }
}

impl Navigator for RouteState {
    fn current_path(&self) -> String {
        match self.path.lock() {
            Ok(path) => path.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn redirect_to(&self, path: &str) {
        tracing::debug!("Navigating to {}", path);
        match self.path.lock() {
            Ok(mut current) => *current = path.to_string(),
            Err(poisoned) => *poisoned.into_inner() = path.to_string(),
        }
    }
}
