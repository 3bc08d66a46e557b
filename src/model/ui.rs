//! UI state - presentation state separate from domain data

/// Tab selection in the browse screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Submissions,
    Favorites,
}

impl Tab {
    pub fn all() -> Vec<Tab> {
        vec![Tab::Submissions, Tab::Favorites]
    }

    pub fn name(&self) -> &str {
        match self {
            Tab::Submissions => "My Submissions",
            Tab::Favorites => "Favorites",
        }
    }
}

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Splash,
    Setup,
    Running,
}

/// Which screen the running app is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Compose,
    Detail,
}
