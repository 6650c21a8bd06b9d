// SPDX-License-Identifier: GPL-3.0-only

pub mod dashboard;
pub mod study;

pub use dashboard::DashboardScreen;
pub use study::StudyScreen;

#[allow(clippy::large_enum_variant)]
pub enum Screen {
    Dashboard(DashboardScreen),
    Study(StudyScreen),
}
