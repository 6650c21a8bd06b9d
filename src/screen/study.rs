// SPDX-License-Identifier: GPL-3.0-only

use crate::core::auth::{Auth, UserIdentity};
use crate::core::client::StoreClient;
use crate::core::models::{Flashcard, StarredFlashcard, StudySet};

/// Study-session state machine for a single set: verify the session, load
/// the set and its cards, then flip/step through them and toggle stars.
pub struct StudyScreen {
    set_id: i64,
    state: State,
}

#[derive(Debug)]
pub enum State {
    CheckingAuth,
    Loading {
        viewer: UserIdentity,
    },
    NotFound,
    Empty {
        set: StudySet,
    },
    Browsing {
        viewer: UserIdentity,
        set: StudySet,
        flashcards: Vec<Flashcard>,
        current_index: usize,
        is_flipped: bool,
        /// Card id of the one toggle allowed in flight at a time
        star_in_flight: Option<i64>,
    },
    Error {
        viewer: Option<UserIdentity>,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub enum Message {
    SessionChecked(Option<UserIdentity>),

    Loaded(Result<Option<(StudySet, Vec<Flashcard>)>, anywho::Error>),

    Flip,
    Next,
    Previous,

    ToggleStar,
    StarToggled(Result<bool, anywho::Error>),
    FlashcardsReloaded(Result<Vec<Flashcard>, anywho::Error>),

    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CheckSession,
    LoadStudySession {
        set_id: i64,
        viewer_id: String,
    },
    ToggleStar {
        user_id: String,
        flashcard_id: i64,
    },
    ReloadFlashcards {
        set_id: i64,
        viewer_id: String,
    },
    /// Terminal: no session, the shell must leave for the login page
    RedirectToLogin,
}

impl StudyScreen {
    pub fn new(set_id: i64) -> (Self, Vec<Command>) {
        (
            Self {
                set_id,
                state: State::CheckingAuth,
            },
            vec![Command::CheckSession],
        )
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The card currently shown, if any
    pub fn current_card(&self) -> Option<&Flashcard> {
        let State::Browsing {
            flashcards,
            current_index,
            ..
        } = &self.state
        else {
            return None;
        };

        flashcards.get(*current_index)
    }

    pub fn update(&mut self, message: Message) -> Vec<Command> {
        let mut commands = Vec::new();

        match message {
            Message::SessionChecked(Some(viewer)) => {
                commands.push(Command::LoadStudySession {
                    set_id: self.set_id,
                    viewer_id: viewer.id.clone(),
                });
                self.state = State::Loading { viewer };
            }
            Message::SessionChecked(None) => commands.push(Command::RedirectToLogin),

            Message::Loaded(res) => {
                let State::Loading { viewer } = &self.state else {
                    return commands;
                };
                let viewer = viewer.clone();

                match res {
                    Ok(None) => self.state = State::NotFound,
                    Ok(Some((set, flashcards))) => {
                        if flashcards.is_empty() {
                            self.state = State::Empty { set };
                        } else {
                            self.state = State::Browsing {
                                viewer,
                                set,
                                flashcards,
                                current_index: 0,
                                is_flipped: false,
                                star_in_flight: None,
                            };
                        }
                    }
                    Err(e) => {
                        tracing::warn!("loading study session failed: {e}");
                        self.state = State::Error {
                            viewer: Some(viewer),
                            reason: e.to_string(),
                        };
                    }
                }
            }

            Message::Flip => {
                if let State::Browsing { is_flipped, .. } = &mut self.state {
                    *is_flipped = !*is_flipped;
                }
            }
            Message::Next => {
                if let State::Browsing {
                    flashcards,
                    current_index,
                    is_flipped,
                    ..
                } = &mut self.state
                {
                    *is_flipped = false;
                    *current_index = (*current_index + 1) % flashcards.len();
                }
            }
            Message::Previous => {
                if let State::Browsing {
                    flashcards,
                    current_index,
                    is_flipped,
                    ..
                } = &mut self.state
                {
                    *is_flipped = false;
                    *current_index = (*current_index + flashcards.len() - 1) % flashcards.len();
                }
            }

            Message::ToggleStar => {
                if let State::Browsing {
                    viewer,
                    flashcards,
                    current_index,
                    star_in_flight,
                    ..
                } = &mut self.state
                {
                    // One toggle at a time, later presses are dropped
                    if star_in_flight.is_none() {
                        if let Some(card_id) = flashcards.get(*current_index).and_then(|c| c.id) {
                            *star_in_flight = Some(card_id);
                            commands.push(Command::ToggleStar {
                                user_id: viewer.id.clone(),
                                flashcard_id: card_id,
                            });
                        }
                    }
                }
            }
            Message::StarToggled(res) => {
                if let State::Browsing {
                    viewer,
                    star_in_flight,
                    ..
                } = &mut self.state
                {
                    *star_in_flight = None;

                    match res {
                        Ok(_) => commands.push(Command::ReloadFlashcards {
                            set_id: self.set_id,
                            viewer_id: viewer.id.clone(),
                        }),
                        Err(e) => tracing::warn!("star toggle failed: {e}"),
                    }
                }
            }
            Message::FlashcardsReloaded(res) => {
                if let State::Browsing {
                    set,
                    flashcards,
                    current_index,
                    ..
                } = &mut self.state
                {
                    match res {
                        Ok(cards) if cards.is_empty() => {
                            let set = set.clone();
                            self.state = State::Empty { set };
                        }
                        Ok(cards) => {
                            *current_index = (*current_index).min(cards.len() - 1);
                            *flashcards = cards;
                        }
                        // Keep showing the cards we have, star state is stale at worst
                        Err(e) => tracing::warn!("reloading flashcards failed: {e}"),
                    }
                }
            }

            Message::Retry => match &self.state {
                State::Error {
                    viewer: Some(viewer),
                    ..
                } => {
                    let viewer = viewer.clone();
                    commands.push(Command::LoadStudySession {
                        set_id: self.set_id,
                        viewer_id: viewer.id.clone(),
                    });
                    self.state = State::Loading { viewer };
                }
                _ => {
                    self.state = State::CheckingAuth;
                    commands.push(Command::CheckSession);
                }
            },
        }

        commands
    }
}

/// Execute a study [`Command`] and return the follow-up [`Message`], if any
pub async fn perform(command: Command, client: &StoreClient, auth: &Auth) -> Option<Message> {
    match command {
        Command::CheckSession => match auth.current_user(client).await {
            Ok(user) => Some(Message::SessionChecked(user)),
            Err(e) => {
                tracing::warn!("session check failed: {e}");
                Some(Message::SessionChecked(None))
            }
        },
        Command::LoadStudySession { set_id, viewer_id } => {
            Some(Message::Loaded(load_session(client, set_id, &viewer_id).await))
        }
        Command::ToggleStar {
            user_id,
            flashcard_id,
        } => Some(Message::StarToggled(
            StarredFlashcard::toggle(client, &user_id, flashcard_id).await,
        )),
        Command::ReloadFlashcards { set_id, viewer_id } => Some(Message::FlashcardsReloaded(
            Flashcard::get_all(client, set_id, Some(&viewer_id)).await,
        )),
        Command::RedirectToLogin => {
            tracing::debug!("no valid session, redirecting to login");
            None
        }
    }
}

async fn load_session(
    client: &StoreClient,
    set_id: i64,
    viewer_id: &str,
) -> Result<Option<(StudySet, Vec<Flashcard>)>, anywho::Error> {
    let Some(set) = StudySet::get(client, set_id).await? else {
        return Ok(None);
    };
    let flashcards = Flashcard::get_all(client, set_id, Some(viewer_id)).await?;

    Ok(Some((set, flashcards)))
}
