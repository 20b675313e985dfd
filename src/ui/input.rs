//! Keyboard input handling for the TUI.
//!
//! Modal overlays take the keys first; otherwise dispatch goes by the
//! current screen. Text fields share a single length cap.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    App, AppState, IssueFocus, LoginFocus, ProjectFocus, RegisterFocus, MAX_FIELD_LENGTH,
};
use crate::guard::Route;
use crate::models::IssuePriority;

/// Handle a keyboard event. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::CreatingProject => {
            handle_project_form(app, key);
            return false;
        }
        AppState::CreatingIssue => {
            handle_issue_form(app, key);
            return false;
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.delete_selected_issue();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Normal => {}
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Register => handle_register_input(app, key),
        _ => handle_main_input(app, key),
    }
}

fn push_char(field: &mut String, c: char) {
    if field.chars().count() < MAX_FIELD_LENGTH {
        field.push(c);
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        app.navigate(Route::Register);
        return false;
    }

    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.login_focus = LoginFocus::Button,
            LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => push_char(&mut app.login_email, c),
            LoginFocus::Password => push_char(&mut app.login_password, c),
            LoginFocus::Button => {}
        },
        _ => {}
    }
    false
}

fn handle_register_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Down | KeyCode::Tab => {
            app.register_focus = app.register_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.register_focus = match app.register_focus {
                RegisterFocus::Email => RegisterFocus::Button,
                RegisterFocus::Password => RegisterFocus::Email,
                RegisterFocus::Confirm => RegisterFocus::Password,
                RegisterFocus::Button => RegisterFocus::Confirm,
            };
        }
        KeyCode::Enter => match app.register_focus {
            RegisterFocus::Button => app.submit_register(),
            _ => app.register_focus = app.register_focus.next(),
        },
        KeyCode::Backspace => match app.register_focus {
            RegisterFocus::Email => {
                app.register_email.pop();
            }
            RegisterFocus::Password => {
                app.register_password.pop();
            }
            RegisterFocus::Confirm => {
                app.register_confirm.pop();
            }
            RegisterFocus::Button => {}
        },
        KeyCode::Char(c) => match app.register_focus {
            RegisterFocus::Email => push_char(&mut app.register_email, c),
            RegisterFocus::Password => push_char(&mut app.register_password, c),
            RegisterFocus::Confirm => push_char(&mut app.register_confirm, c),
            RegisterFocus::Button => {}
        },
        _ => {}
    }
    false
}

fn handle_main_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.navigate(Route::Dashboard),
        KeyCode::Char('2') => app.navigate(Route::Projects),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('r') => refresh_current(app),
        KeyCode::Char('j') | KeyCode::Down => app.move_selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection_up(),
        KeyCode::Enter => {
            if matches!(app.route, Route::Dashboard | Route::Projects) {
                app.open_selected_project();
            }
        }
        KeyCode::Esc => match app.route {
            Route::Issues(_) => app.navigate(Route::Projects),
            Route::Projects => app.navigate(Route::Dashboard),
            _ => {}
        },
        KeyCode::Char('n') => match app.route {
            Route::Issues(_) => {
                app.state = AppState::CreatingIssue;
            }
            Route::Dashboard | Route::Projects => {
                app.state = AppState::CreatingProject;
            }
            _ => {}
        },
        KeyCode::Char('t') | KeyCode::Char(' ') => {
            if matches!(app.route, Route::Issues(_)) {
                app.advance_selected_issue();
            }
        }
        KeyCode::Char('d') => {
            if matches!(app.route, Route::Issues(_)) && !app.current_issues().is_empty() {
                app.state = AppState::ConfirmingDelete;
            }
        }
        _ => {}
    }
    false
}

fn refresh_current(app: &mut App) {
    match app.route {
        Route::Dashboard => {
            app.load_dashboard();
            app.load_projects();
        }
        Route::Projects => app.load_projects(),
        Route::Issues(project_id) => app.load_issues(project_id),
        _ => {}
    }
}

fn handle_project_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.project_name.clear();
            app.project_description.clear();
            app.project_focus = ProjectFocus::Name;
            app.state = AppState::Normal;
        }
        // With two fields, next and previous coincide
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
            app.project_focus = app.project_focus.next();
        }
        KeyCode::Enter => app.submit_project_form(),
        KeyCode::Backspace => match app.project_focus {
            ProjectFocus::Name => {
                app.project_name.pop();
            }
            ProjectFocus::Description => {
                app.project_description.pop();
            }
        },
        KeyCode::Char(c) => match app.project_focus {
            ProjectFocus::Name => push_char(&mut app.project_name, c),
            ProjectFocus::Description => push_char(&mut app.project_description, c),
        },
        _ => {}
    }
}

fn handle_issue_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.issue_title.clear();
            app.issue_description.clear();
            app.issue_priority = IssuePriority::Medium;
            app.issue_focus = IssueFocus::Title;
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.issue_focus = app.issue_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.issue_focus = match app.issue_focus {
                IssueFocus::Title => IssueFocus::Priority,
                IssueFocus::Description => IssueFocus::Title,
                IssueFocus::Priority => IssueFocus::Description,
            };
        }
        KeyCode::Enter => app.submit_issue_form(),
        KeyCode::Left if app.issue_focus == IssueFocus::Priority => {
            app.issue_priority = app.issue_priority.prev();
        }
        KeyCode::Right if app.issue_focus == IssueFocus::Priority => {
            app.issue_priority = app.issue_priority.next();
        }
        KeyCode::Backspace => match app.issue_focus {
            IssueFocus::Title => {
                app.issue_title.pop();
            }
            IssueFocus::Description => {
                app.issue_description.pop();
            }
            IssueFocus::Priority => {}
        },
        KeyCode::Char(c) => match app.issue_focus {
            IssueFocus::Title => push_char(&mut app.issue_title, c),
            IssueFocus::Description => push_char(&mut app.issue_description, c),
            IssueFocus::Priority => {}
        },
        _ => {}
    }
}
