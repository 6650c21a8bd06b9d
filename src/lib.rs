// SPDX-License-Identifier: GPL-3.0-only

//! Headless core of a flashcard study application: a SQLite-backed
//! data-access layer plus the view-state machines of the dashboard and
//! study screens. Rendering is left to whatever shell drives the
//! [`screen`] controllers.

pub mod core;
pub mod key_binds;
pub mod screen;
