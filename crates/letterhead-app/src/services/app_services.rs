// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: opens the data directory, loads configuration, and
// hands out the stores and the export pipeline.
//
// Everything persistent lives in one SQLite key/value database in the data
// directory. When that cannot be opened the session still runs on an
// in-memory store; only persistence across runs is lost.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use letterhead_core::AppConfig;
use letterhead_core::error::Result;
use letterhead_document::{BitmapRasterizer, ExportEngine, FontSet, TemplateAssets};
use letterhead_store::{
    DraftAutosaver, DraftStore, KeyValueStore, MemoryStore, Preferences, RosterStore, SqliteStore,
};
use tracing::{debug, info, warn};

use super::data_dir;
use super::export::{AppRasterizer, ExportService};
use super::ports::DirectorySink;
use crate::session::LetterSession;

/// Configuration file inside the data directory.
const CONFIG_FILE: &str = "config.json";
/// Database file inside the data directory.
const DATABASE_FILE: &str = "letterhead.db";
/// Fonts picked up from the assets directory when none are configured.
const DEFAULT_BODY_FONT: &str = "body.ttf";
const DEFAULT_BOLD_FONT: &str = "bold.ttf";

#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn KeyValueStore>,
    data_dir: PathBuf,
    config: AppConfig,
}

impl AppServices {
    /// Initialise all services. Call once at startup.
    pub fn init(data_dir_override: Option<&Path>) -> Result<Self> {
        let dir = data_dir::data_dir(data_dir_override);
        info!(path = %dir.display(), "initialising app services");

        let store = SqliteStore::open(dir.join(DATABASE_FILE))?;
        let config = load_config(&dir).unwrap_or_default();

        info!("app services initialised");
        Ok(Self {
            store: Arc::new(store),
            data_dir: dir,
            config,
        })
    }

    /// Services backed by an in-memory store, for when the database is
    /// unavailable.
    pub fn fallback(data_dir_override: Option<&Path>) -> Self {
        let dir = data_dir::data_dir(data_dir_override);
        let config = load_config(&dir).unwrap_or_default();
        Self {
            store: Arc::new(MemoryStore::new()),
            data_dir: dir,
            config,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable access for command line overrides. Not persisted unless
    /// `save_config` is called.
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn save_config(&self) -> Result<()> {
        persist_config(&self.data_dir, &self.config)
    }

    // -- Stores ---------------------------------------------------------------

    pub fn drafts(&self) -> DraftStore {
        DraftStore::new(self.store.clone())
    }

    pub fn autosaver(&self) -> DraftAutosaver {
        DraftAutosaver::new(self.drafts(), self.config.autosave_debounce())
    }

    pub fn roster(&self) -> RosterStore {
        RosterStore::new(self.store.clone())
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.store.clone())
    }

    /// A fresh editing session: persisted roster and preferences, with any
    /// saved draft offered for restore.
    pub fn session(&self) -> LetterSession {
        LetterSession::new(
            &self.config,
            self.roster(),
            self.preferences(),
            self.autosaver(),
        )
    }

    // -- Export ---------------------------------------------------------------

    pub fn assets_dir(&self) -> PathBuf {
        match &self.config.assets_dir {
            Some(dir) => dir.clone(),
            None => data_dir::data_subdir(&self.data_dir, "assets"),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.config.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Set up the page rasterizer from the configured assets and fonts.
    pub fn rasterizer(&self) -> AppRasterizer {
        let assets_dir = self.assets_dir();
        let assets = match TemplateAssets::load(&assets_dir) {
            Ok(assets) => assets,
            Err(e) => {
                warn!(error = %e, "letterhead artwork unavailable; PDF export disabled");
                return AppRasterizer::Unavailable(e.to_string());
            }
        };
        AppRasterizer::Ready(BitmapRasterizer::new(assets, self.load_fonts(&assets_dir)))
    }

    fn load_fonts(&self, assets_dir: &Path) -> Option<FontSet> {
        let body = self
            .config
            .body_font
            .clone()
            .or_else(|| existing(assets_dir.join(DEFAULT_BODY_FONT)))?;
        let bold = self
            .config
            .bold_font
            .clone()
            .or_else(|| existing(assets_dir.join(DEFAULT_BOLD_FONT)));

        match FontSet::load(&body, bold.as_deref()) {
            Ok(fonts) => {
                debug!(body = %body.display(), bold = bold.is_some(), "fonts loaded");
                Some(fonts)
            }
            Err(e) => {
                warn!(path = %body.display(), error = %e, "font could not be loaded");
                None
            }
        }
    }

    pub fn export_service(&self) -> ExportService<AppRasterizer, DirectorySink> {
        let engine = ExportEngine::new(self.rasterizer(), self.config.filename_prefix.clone());
        ExportService::new(engine, DirectorySink::new(self.export_dir()))
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "config unreadable; using defaults"))
        .ok()
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
