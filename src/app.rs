//! Application state management for the MiniJira terminal client.
//!
//! This module contains the core `App` struct that owns the session, the
//! API client, per-screen UI state, loaded data, and background task
//! coordination. Every screen change goes through `App::navigate`, which
//! applies the navigation guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ChannelNotifier};
use crate::config::Config;
use crate::guard::{NavigationGuard, Route, RouteDecision};
use crate::models::{DashboardStats, Issue, IssuePriority, Project};
use crate::session::{SessionStore, SharedSession, Storage};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 covers a full refresh (projects + per-project issue lists) with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum concurrent issue-list requests during prefetch.
/// 4 keeps the backend comfortable while still filling the cache quickly.
const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Maximum length for text input fields.
/// 128 chars accommodates password managers and long issue titles.
pub const MAX_FIELD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state: the normal screen or a modal overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    CreatingProject,
    CreatingIssue,
    ConfirmingDelete,
    ShowingHelp,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    Email,
    Password,
    Confirm,
    Button,
}

impl RegisterFocus {
    pub fn next(&self) -> Self {
        match self {
            RegisterFocus::Email => RegisterFocus::Password,
            RegisterFocus::Password => RegisterFocus::Confirm,
            RegisterFocus::Confirm => RegisterFocus::Button,
            RegisterFocus::Button => RegisterFocus::Email,
        }
    }
}

/// Project form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFocus {
    Name,
    Description,
}

impl ProjectFocus {
    pub fn next(&self) -> Self {
        match self {
            ProjectFocus::Name => ProjectFocus::Description,
            ProjectFocus::Description => ProjectFocus::Name,
        }
    }
}

/// Issue form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFocus {
    Title,
    Description,
    Priority,
}

impl IssueFocus {
    pub fn next(&self) -> Self {
        match self {
            IssueFocus::Title => IssueFocus::Description,
            IssueFocus::Description => IssueFocus::Priority,
            IssueFocus::Priority => IssueFocus::Title,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background request tasks back to the main loop
enum TaskResult {
    /// Login accepted; the token still has to be written into the session
    LoggedIn { token: String, email: String },
    /// Account created; back to the login screen with the email prefilled
    Registered { email: String },
    Projects(Vec<Project>),
    ProjectCreated(Project),
    Issues { project_id: i64, issues: Vec<Issue> },
    IssueCreated { project_id: i64, issue: Issue },
    IssueUpdated { project_id: i64, issue: Issue },
    IssueDeleted { project_id: i64, issue_id: i64 },
    Stats(DashboardStats),
    /// The request failed; the pipeline already pushed the error message
    TaskFailed,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SharedSession,
    pub api: ApiClient,
    guard: NavigationGuard,

    // UI state
    pub state: AppState,
    pub route: Route,
    pub status_message: Option<String>,
    pub loading: bool,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,

    // Register form
    pub register_email: String,
    pub register_password: String,
    pub register_confirm: String,
    pub register_focus: RegisterFocus,

    // Project create form
    pub project_name: String,
    pub project_description: String,
    pub project_focus: ProjectFocus,

    // Issue create form
    pub issue_title: String,
    pub issue_description: String,
    pub issue_priority: IssuePriority,
    pub issue_focus: IssueFocus,

    // Loaded data
    pub projects: Vec<Project>,
    pub issues: HashMap<i64, Vec<Issue>>,
    pub stats: Option<DashboardStats>,

    // Selection indices
    pub project_selection: usize,
    pub issue_selection: usize,

    // Background task channels
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
    notify_rx: mpsc::Receiver<String>,
    auth_failure_rx: mpsc::Receiver<()>,
}

impl App {
    /// Create the application, wiring the session, client, and guard
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let storage_dir = config.storage_dir()?;
        debug!(?storage_dir, "Session storage directory");
        let store = SessionStore::load(Storage::new(storage_dir))?;
        let session: SharedSession = Arc::new(Mutex::new(store));

        let (notifier, notify_rx) = ChannelNotifier::channel();
        let (auth_failure_tx, auth_failure_rx) = mpsc::channel(4);

        // The client reports rejected sessions over this channel; the main
        // loop answers by signing out and returning to the login screen.
        let api = ApiClient::new(config.base_url(), session.clone(), Arc::new(notifier))?
            .on_auth_failure(Arc::new(move || {
                let _ = auth_failure_tx.try_send(());
            }));

        let guard = NavigationGuard::new(session.clone());
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_email = config.last_email.clone().unwrap_or_default();

        let mut app = Self {
            config,
            session,
            api,
            guard,

            state: AppState::Normal,
            route: Route::Login,
            status_message: None,
            loading: false,

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,

            register_email: String::new(),
            register_password: String::new(),
            register_confirm: String::new(),
            register_focus: RegisterFocus::Email,

            project_name: String::new(),
            project_description: String::new(),
            project_focus: ProjectFocus::Name,

            issue_title: String::new(),
            issue_description: String::new(),
            issue_priority: IssuePriority::Medium,
            issue_focus: IssueFocus::Title,

            projects: Vec::new(),
            issues: HashMap::new(),
            stats: None,

            project_selection: 0,
            issue_selection: 0,

            task_rx,
            task_tx,
            notify_rx,
            auth_failure_rx,
        };

        // A session persisted by a previous run lands on the dashboard;
        // otherwise the guard redirects to login
        app.navigate(Route::Dashboard);
        if app.route == Route::Dashboard {
            app.load_dashboard();
            app.load_projects();
        }

        Ok(app)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Change screens. Every transition runs the guard; on redirect the
    /// requested destination is dropped.
    pub fn navigate(&mut self, dest: Route) {
        let target = match self.guard.check(dest) {
            RouteDecision::Allow => dest,
            RouteDecision::Redirect(target) => target,
        };
        debug!(?dest, ?target, "Navigating");
        self.route = target;
        self.state = AppState::Normal;
    }

    /// Open the issues screen for the selected project
    pub fn open_selected_project(&mut self) {
        if let Some(project) = self.projects.get(self.project_selection) {
            let project_id = project.id;
            self.issue_selection = 0;
            self.navigate(Route::Issues(project_id));
            if self.route == Route::Issues(project_id) && !self.issues.contains_key(&project_id) {
                self.load_issues(project_id);
            }
        }
    }

    /// Name of the project the issues screen is showing
    pub fn current_project_name(&self) -> Option<&str> {
        match self.route {
            Route::Issues(project_id) => self
                .projects
                .iter()
                .find(|p| p.id == project_id)
                .map(|p| p.name.as_str()),
            _ => None,
        }
    }

    /// Issues for the project the issues screen is showing
    pub fn current_issues(&self) -> &[Issue] {
        match self.route {
            Route::Issues(project_id) => self
                .issues
                .get(&project_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    // =========================================================================
    // Authentication flows
    // =========================================================================

    /// Submit the login form
    pub fn submit_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();
        if email.is_empty() || password.is_empty() {
            self.status_message = Some("Email and password are required".to_string());
            return;
        }

        self.loading = true;
        self.status_message = Some("Signing in...".to_string());

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.login(&email, &password).await {
                Ok(auth) => {
                    Self::send_result(
                        &tx,
                        TaskResult::LoggedIn {
                            token: auth.token,
                            email,
                        },
                    )
                    .await
                }
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Submit the register form
    pub fn submit_register(&mut self) {
        let email = self.register_email.trim().to_string();
        let password = self.register_password.clone();
        if email.is_empty() || password.is_empty() {
            self.status_message = Some("Email and password are required".to_string());
            return;
        }
        if password != self.register_confirm {
            self.status_message = Some("Passwords do not match".to_string());
            return;
        }

        self.loading = true;
        self.status_message = Some("Creating account...".to_string());

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.register(&email, &password).await {
                Ok(()) => Self::send_result(&tx, TaskResult::Registered { email }).await,
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Sign out: clear the session and return to the login screen
    pub fn logout(&mut self) {
        if let Ok(mut session) = self.session.lock() {
            if let Err(e) = session.logout() {
                warn!(error = %e, "Failed to clear session");
            }
        }
        self.projects.clear();
        self.issues.clear();
        self.stats = None;
        self.navigate(Route::Login);
        self.status_message = Some("Signed out".to_string());
    }

    fn handle_session_rejected(&mut self) {
        info!("Session rejected by the server, signing out");
        if let Ok(mut session) = self.session.lock() {
            if let Err(e) = session.logout() {
                warn!(error = %e, "Failed to clear session");
            }
        }
        self.loading = false;
        self.navigate(Route::Login);
    }

    /// Persist a fresh login: the token plus a profile derived from the email
    fn store_login(&mut self, token: &str, email: &str) -> Result<()> {
        let username = email.split('@').next().unwrap_or(email);
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        session.set_token(token)?;
        session.set_user_info(username, email)?;
        Ok(())
    }

    /// Identity shown in the status bar
    pub fn session_identity(&self) -> Option<String> {
        let session = self.session.lock().ok()?;
        if session.is_authenticated() {
            let username = session.username();
            if username.is_empty() {
                Some(session.email().to_string())
            } else {
                Some(username.to_string())
            }
        } else {
            None
        }
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    pub fn load_dashboard(&mut self) {
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.fetch_dashboard_stats().await {
                Ok(stats) => Self::send_result(&tx, TaskResult::Stats(stats)).await,
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    pub fn load_projects(&mut self) {
        self.loading = true;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.fetch_projects().await {
                Ok(projects) => Self::send_result(&tx, TaskResult::Projects(projects)).await,
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    pub fn load_issues(&mut self, project_id: i64) {
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.fetch_issues(project_id).await {
                Ok(issues) => {
                    Self::send_result(&tx, TaskResult::Issues { project_id, issues }).await
                }
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Prefetch issue lists for every loaded project with bounded concurrency
    fn prefetch_issues(&mut self) {
        let project_ids: Vec<i64> = self.projects.iter().map(|p| p.id).collect();
        if project_ids.is_empty() {
            return;
        }
        debug!(
            count = project_ids.len(),
            "Prefetching issue lists with max {} concurrent requests", MAX_CONCURRENT_REQUESTS
        );

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            stream::iter(project_ids)
                .map(|project_id| {
                    let api = api.clone();
                    async move { (project_id, api.fetch_issues(project_id).await) }
                })
                .buffer_unordered(MAX_CONCURRENT_REQUESTS)
                .for_each(|(project_id, result)| {
                    let tx = tx.clone();
                    async move {
                        if let Ok(issues) = result {
                            debug!(project_id, count = issues.len(), "Issues prefetched");
                            Self::send_result(&tx, TaskResult::Issues { project_id, issues })
                                .await;
                        }
                    }
                })
                .await;
        });
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Submit the project create form
    pub fn submit_project_form(&mut self) {
        let name = self.project_name.trim().to_string();
        if name.is_empty() {
            self.status_message = Some("Project name is required".to_string());
            return;
        }
        let description = self.project_description.trim().to_string();
        self.project_name.clear();
        self.project_description.clear();
        self.project_focus = ProjectFocus::Name;
        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.create_project(&name, &description).await {
                Ok(project) => Self::send_result(&tx, TaskResult::ProjectCreated(project)).await,
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Submit the issue create form for the current project
    pub fn submit_issue_form(&mut self) {
        let Route::Issues(project_id) = self.route else {
            return;
        };
        let title = self.issue_title.trim().to_string();
        if title.is_empty() {
            self.status_message = Some("Issue title is required".to_string());
            return;
        }
        let description = self.issue_description.trim().to_string();
        let priority = self.issue_priority;
        self.issue_title.clear();
        self.issue_description.clear();
        self.issue_priority = IssuePriority::Medium;
        self.issue_focus = IssueFocus::Title;
        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api
                .create_issue(project_id, &title, &description, priority)
                .await
            {
                Ok(issue) => {
                    Self::send_result(&tx, TaskResult::IssueCreated { project_id, issue }).await
                }
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Move the selected issue to the next workflow state
    pub fn advance_selected_issue(&mut self) {
        let Route::Issues(project_id) = self.route else {
            return;
        };
        let Some(issue) = self
            .issues
            .get(&project_id)
            .and_then(|list| list.get(self.issue_selection))
        else {
            return;
        };

        let issue_id = issue.id;
        let mut update = issue.to_update();
        update.status = update.status.next();

        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.update_issue(issue_id, &update).await {
                Ok(issue) => {
                    Self::send_result(&tx, TaskResult::IssueUpdated { project_id, issue }).await
                }
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    /// Delete the selected issue (called after the confirmation overlay)
    pub fn delete_selected_issue(&mut self) {
        self.state = AppState::Normal;
        let Route::Issues(project_id) = self.route else {
            return;
        };
        let Some(issue) = self
            .issues
            .get(&project_id)
            .and_then(|list| list.get(self.issue_selection))
        else {
            return;
        };

        let issue_id = issue.id;
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            match api.delete_issue(issue_id).await {
                Ok(()) => {
                    Self::send_result(&tx, TaskResult::IssueDeleted { project_id, issue_id }).await
                }
                Err(_) => Self::send_result(&tx, TaskResult::TaskFailed).await,
            }
        });
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            warn!("Result channel closed, dropping task result");
        }
    }

    /// Drain background channels: task results, error notifications from
    /// the request pipeline, and rejected-session signals
    pub fn tick(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }

        while let Ok(message) = self.notify_rx.try_recv() {
            self.status_message = Some(message);
        }

        let mut session_rejected = false;
        while self.auth_failure_rx.try_recv().is_ok() {
            session_rejected = true;
        }
        if session_rejected {
            self.handle_session_rejected();
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::LoggedIn { token, email } => {
                self.loading = false;
                if let Err(e) = self.store_login(&token, &email) {
                    warn!(error = %e, "Failed to persist session");
                    self.status_message = Some("Failed to persist session".to_string());
                    return;
                }
                self.login_password.clear();
                self.status_message = None;
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.navigate(Route::Dashboard);
                self.load_dashboard();
                self.load_projects();
            }
            TaskResult::Registered { email } => {
                self.loading = false;
                self.login_email = email;
                self.login_password.clear();
                self.register_email.clear();
                self.register_password.clear();
                self.register_confirm.clear();
                self.register_focus = RegisterFocus::Email;
                self.navigate(Route::Login);
                self.status_message = Some("Account created, sign in to continue".to_string());
            }
            TaskResult::Projects(projects) => {
                self.loading = false;
                self.project_selection = self
                    .project_selection
                    .min(projects.len().saturating_sub(1));
                self.projects = projects;
                self.prefetch_issues();
            }
            TaskResult::ProjectCreated(project) => {
                info!(project = %project.name, "Project created");
                self.issues.insert(project.id, Vec::new());
                self.projects.push(project);
                self.status_message = Some("Project created".to_string());
            }
            TaskResult::Issues { project_id, issues } => {
                if self.route == Route::Issues(project_id) {
                    self.issue_selection =
                        self.issue_selection.min(issues.len().saturating_sub(1));
                }
                self.issues.insert(project_id, issues);
            }
            TaskResult::IssueCreated { project_id, issue } => {
                self.issues.entry(project_id).or_default().push(issue);
                self.status_message = Some("Issue created".to_string());
            }
            TaskResult::IssueUpdated { project_id, issue } => {
                if let Some(list) = self.issues.get_mut(&project_id) {
                    if let Some(slot) = list.iter_mut().find(|i| i.id == issue.id) {
                        *slot = issue;
                    }
                }
            }
            TaskResult::IssueDeleted {
                project_id,
                issue_id,
            } => {
                if let Some(list) = self.issues.get_mut(&project_id) {
                    list.retain(|i| i.id != issue_id);
                    self.issue_selection =
                        self.issue_selection.min(list.len().saturating_sub(1));
                }
                self.status_message = Some("Issue deleted".to_string());
            }
            TaskResult::Stats(stats) => {
                self.stats = Some(stats);
            }
            TaskResult::TaskFailed => {
                // The pipeline already pushed the message to the status line
                self.loading = false;
            }
        }
    }

    // =========================================================================
    // Selection movement
    // =========================================================================

    pub fn move_selection_up(&mut self) {
        match self.route {
            Route::Projects | Route::Dashboard => {
                self.project_selection = self.project_selection.saturating_sub(1);
            }
            Route::Issues(_) => {
                self.issue_selection = self.issue_selection.saturating_sub(1);
            }
            _ => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.route {
            Route::Projects | Route::Dashboard => {
                let max = self.projects.len().saturating_sub(1);
                self.project_selection = (self.project_selection + 1).min(max);
            }
            Route::Issues(_) => {
                let max = self.current_issues().len().saturating_sub(1);
                self.issue_selection = (self.issue_selection + 1).min(max);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_wrap() {
        assert_eq!(LoginFocus::Button.next(), LoginFocus::Email);
        assert_eq!(RegisterFocus::Button.next(), RegisterFocus::Email);
        assert_eq!(ProjectFocus::Description.next(), ProjectFocus::Name);
        assert_eq!(IssueFocus::Priority.next(), IssueFocus::Title);
    }
}
