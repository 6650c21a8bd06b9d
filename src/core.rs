// SPDX-License-Identifier: GPL-3.0-only

pub mod auth;
pub mod client;
pub mod models;
pub mod utils;
