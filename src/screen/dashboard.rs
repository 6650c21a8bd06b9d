// SPDX-License-Identifier: GPL-3.0-only

use crate::core::auth::{Auth, UserIdentity};
use crate::core::client::StoreClient;
use crate::core::models::StudySet;

/// Dashboard state machine: verify the session, load the user's study sets,
/// then serve create/delete from the ready state. `update` is pure; returned
/// [`Command`] values are executed through [`perform`] and their results fed
/// back in as messages.
pub struct DashboardScreen {
    state: State,
    new_set: NewStudySetState,
}

#[derive(Debug)]
pub enum State {
    CheckingAuth,
    LoadingSets {
        user: UserIdentity,
    },
    Ready {
        user: UserIdentity,
        sets: Vec<StudySet>,
    },
    Error {
        user: Option<UserIdentity>,
        reason: String,
    },
}

#[derive(Debug, Default)]
pub struct NewStudySetState {
    title: String,
    description: String,
}

#[derive(Debug, Clone)]
pub enum Message {
    SessionChecked(Option<UserIdentity>),

    LoadStudySets,
    StudySetsLoaded(Result<Vec<StudySet>, anywho::Error>),

    NewSetTitleInput(String),
    NewSetDescriptionInput(String),
    CreateStudySet,
    StudySetCreated(Result<StudySet, anywho::Error>),

    DeleteStudySet(i64),
    StudySetDeleted(Result<bool, anywho::Error>),

    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CheckSession,
    LoadStudySets {
        user_id: String,
    },
    CreateStudySet {
        user_id: String,
        title: String,
        description: Option<String>,
    },
    DeleteStudySet(i64),
    /// Terminal: no session, the shell must leave for the login page
    RedirectToLogin,
}

impl DashboardScreen {
    pub fn new() -> (Self, Vec<Command>) {
        (
            Self {
                state: State::CheckingAuth,
                new_set: NewStudySetState::default(),
            },
            vec![Command::CheckSession],
        )
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn new_set_title(&self) -> &str {
        &self.new_set.title
    }

    pub fn update(&mut self, message: Message) -> Vec<Command> {
        let mut commands = Vec::new();

        match message {
            Message::SessionChecked(Some(user)) => {
                commands.push(Command::LoadStudySets {
                    user_id: user.id.clone(),
                });
                self.state = State::LoadingSets { user };
            }
            Message::SessionChecked(None) => commands.push(Command::RedirectToLogin),

            Message::LoadStudySets => {
                if let Some(user) = self.user() {
                    commands.push(Command::LoadStudySets {
                        user_id: user.id.clone(),
                    });
                }
            }
            Message::StudySetsLoaded(res) => match res {
                Ok(sets) => {
                    if let Some(user) = self.user().cloned() {
                        self.state = State::Ready { user, sets };
                    }
                }
                Err(e) => {
                    tracing::warn!("loading study sets failed: {e}");
                    self.state = State::Error {
                        user: self.user().cloned(),
                        reason: e.to_string(),
                    };
                }
            },

            Message::NewSetTitleInput(value) => self.new_set.title = value,
            Message::NewSetDescriptionInput(value) => self.new_set.description = value,
            Message::CreateStudySet => {
                // Nothing to submit until the title has content
                if let Some(user) = self.user() {
                    if !self.new_set.title.trim().is_empty() {
                        let description = self.new_set.description.trim();
                        commands.push(Command::CreateStudySet {
                            user_id: user.id.clone(),
                            title: self.new_set.title.clone(),
                            description: (!description.is_empty()).then(|| description.to_string()),
                        });
                    }
                }
            }
            Message::StudySetCreated(res) => match res {
                Ok(_) => {
                    self.new_set = NewStudySetState::default();
                    commands.extend(self.update(Message::LoadStudySets));
                }
                Err(e) => {
                    tracing::warn!("creating study set failed: {e}");
                    self.state = State::Error {
                        user: self.user().cloned(),
                        reason: e.to_string(),
                    };
                }
            },

            Message::DeleteStudySet(set_id) => commands.push(Command::DeleteStudySet(set_id)),
            Message::StudySetDeleted(res) => match res {
                Ok(_) => commands.extend(self.update(Message::LoadStudySets)),
                Err(e) => {
                    tracing::warn!("deleting study set failed: {e}");
                    self.state = State::Error {
                        user: self.user().cloned(),
                        reason: e.to_string(),
                    };
                }
            },

            Message::Retry => match self.user().cloned() {
                Some(user) => {
                    commands.push(Command::LoadStudySets {
                        user_id: user.id.clone(),
                    });
                    self.state = State::LoadingSets { user };
                }
                None => {
                    self.state = State::CheckingAuth;
                    commands.push(Command::CheckSession);
                }
            },
        }

        commands
    }

    fn user(&self) -> Option<&UserIdentity> {
        match &self.state {
            State::CheckingAuth => None,
            State::LoadingSets { user } => Some(user),
            State::Ready { user, .. } => Some(user),
            State::Error { user, .. } => user.as_ref(),
        }
    }
}

/// Execute a dashboard [`Command`] and return the follow-up [`Message`], if
/// any. The shell decides whether a late message still gets fed back in; a
/// screen that went away simply drops it.
pub async fn perform(command: Command, client: &StoreClient, auth: &Auth) -> Option<Message> {
    match command {
        Command::CheckSession => match auth.current_user(client).await {
            Ok(user) => Some(Message::SessionChecked(user)),
            Err(e) => {
                tracing::warn!("session check failed: {e}");
                Some(Message::SessionChecked(None))
            }
        },
        Command::LoadStudySets { user_id } => Some(Message::StudySetsLoaded(
            StudySet::get_all(client, &user_id).await,
        )),
        Command::CreateStudySet {
            user_id,
            title,
            description,
        } => Some(Message::StudySetCreated(
            StudySet::add(client, &user_id, &title, description.as_deref()).await,
        )),
        Command::DeleteStudySet(set_id) => {
            Some(Message::StudySetDeleted(StudySet::delete(client, set_id).await))
        }
        Command::RedirectToLogin => {
            tracing::debug!("no valid session, redirecting to login");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserIdentity {
        UserIdentity {
            id: String::from("user-1"),
            email: String::from("user@example.com"),
        }
    }

    #[test]
    fn missing_session_redirects_to_login() {
        let (mut screen, commands) = DashboardScreen::new();
        assert_eq!(commands, vec![Command::CheckSession]);

        let commands = screen.update(Message::SessionChecked(None));
        assert_eq!(commands, vec![Command::RedirectToLogin]);
    }

    #[test]
    fn session_triggers_set_loading() {
        let (mut screen, _) = DashboardScreen::new();

        let commands = screen.update(Message::SessionChecked(Some(user())));
        assert_eq!(
            commands,
            vec![Command::LoadStudySets {
                user_id: String::from("user-1")
            }]
        );
        assert!(matches!(screen.state(), State::LoadingSets { .. }));
    }

    #[test]
    fn load_failure_reaches_error_state_and_retry_reloads() {
        let (mut screen, _) = DashboardScreen::new();
        screen.update(Message::SessionChecked(Some(user())));

        screen.update(Message::StudySetsLoaded(Err(anywho::anywho!(
            "connection reset"
        ))));
        assert!(matches!(screen.state(), State::Error { .. }));

        let commands = screen.update(Message::Retry);
        assert_eq!(
            commands,
            vec![Command::LoadStudySets {
                user_id: String::from("user-1")
            }]
        );
        assert!(matches!(screen.state(), State::LoadingSets { .. }));
    }

    #[test]
    fn create_is_ignored_while_title_is_empty() {
        let (mut screen, _) = DashboardScreen::new();
        screen.update(Message::SessionChecked(Some(user())));
        screen.update(Message::StudySetsLoaded(Ok(Vec::new())));

        screen.update(Message::NewSetTitleInput(String::from("   ")));
        assert!(screen.update(Message::CreateStudySet).is_empty());

        screen.update(Message::NewSetTitleInput(String::from("Kanji")));
        let commands = screen.update(Message::CreateStudySet);
        assert_eq!(
            commands,
            vec![Command::CreateStudySet {
                user_id: String::from("user-1"),
                title: String::from("Kanji"),
                description: None,
            }]
        );
    }

    #[test]
    fn created_clears_the_form_and_reloads() {
        let (mut screen, _) = DashboardScreen::new();
        screen.update(Message::SessionChecked(Some(user())));
        screen.update(Message::NewSetTitleInput(String::from("Kanji")));

        let set = StudySet {
            id: Some(1),
            user_id: String::from("user-1"),
            title: String::from("Kanji"),
            description: None,
            created_at: 0,
            updated_at: 0,
            card_count: 0,
        };
        let commands = screen.update(Message::StudySetCreated(Ok(set)));
        assert!(screen.new_set_title().is_empty());
        assert_eq!(
            commands,
            vec![Command::LoadStudySets {
                user_id: String::from("user-1")
            }]
        );
    }
}
