// SPDX-License-Identifier: GPL-3.0-only

pub mod api;
pub mod favorites;
pub mod normalizer;
pub mod sample;
pub mod view_scope;
