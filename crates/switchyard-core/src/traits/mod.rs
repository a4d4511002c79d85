// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for the two network hops the router makes.
//!
//! Both adapters extend [`PluginAdapter`] and use `#[async_trait]` so the
//! router can hold them as trait objects.

pub mod adapter;
pub mod backend;
pub mod classifier;

pub use adapter::PluginAdapter;
pub use backend::BackendAdapter;
pub use classifier::ClassifierAdapter;
