// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: wires the command line front end to the backend crates.
//
// Environment collaborators (clipboard, file download) sit behind the port
// traits in `ports`, so the session and export flow can be driven in tests
// without touching the terminal or the filesystem.

pub mod app_services;
pub mod data_dir;
pub mod export;
pub mod ports;
