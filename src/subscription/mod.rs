// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscriptions to fan state changes.
//!
//! The fan pushes a notification after every committed transition, whichever
//! path triggered it (an accessory write or an inbound toggle message).
//! Consumers register callbacks through the [`CallbackRegistry`] and receive
//! a [`SubscriptionId`] for later removal.

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
