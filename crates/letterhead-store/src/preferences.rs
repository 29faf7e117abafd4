// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// UI preferences: dark mode and preview zoom, each under its own key.

use std::sync::Arc;

use letterhead_core::PreviewZoom;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::keys;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn dark_mode(&self) -> bool {
        self.read(keys::DARK_MODE).unwrap_or(false)
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.write(keys::DARK_MODE, &enabled);
    }

    /// Stored zoom, clamped into range; 1.0 when unset.
    pub fn preview_zoom(&self) -> PreviewZoom {
        self.read(keys::PREVIEW_ZOOM).unwrap_or_default()
    }

    pub fn set_preview_zoom(&self, zoom: PreviewZoom) {
        self.write(keys::PREVIEW_ZOOM, &zoom);
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self
            .store
            .get(key)
            .inspect_err(|e| warn!(key, error = %e, "preference read failed"))
            .ok()??;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(key, error = %e, "stored preference is unreadable"))
            .ok()
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(Into::into)
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            warn!(key, error = %e, "preference write failed");
        }
    }
}
