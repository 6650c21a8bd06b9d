// SPDX-License-Identifier: GPL-3.0-only

pub mod flashcard;
pub mod starred;
pub mod study_set;

pub use flashcard::Flashcard;
pub use starred::StarredFlashcard;
pub use study_set::StudySet;
