// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use crate::screen::study;

/// Study-screen operations reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyAction {
    Flip,
    Next,
    Previous,
    ToggleStar,
}

impl StudyAction {
    pub fn message(self) -> study::Message {
        match self {
            StudyAction::Flip => study::Message::Flip,
            StudyAction::Next => study::Message::Next,
            StudyAction::Previous => study::Message::Previous,
            StudyAction::ToggleStar => study::Message::ToggleStar,
        }
    }
}

/// Key identity (as reported by the shell's keyboard events) to study action
pub fn key_binds() -> HashMap<String, StudyAction> {
    let mut key_binds = HashMap::new();

    macro_rules! bind {
        ($key:expr, $action:ident) => {{
            key_binds.insert(String::from($key), StudyAction::$action);
        }};
    }

    bind!(" ", Flip);
    bind!("Enter", Flip);
    bind!("ArrowRight", Next);
    bind!("ArrowLeft", Previous);
    bind!("s", ToggleStar);

    key_binds
}
