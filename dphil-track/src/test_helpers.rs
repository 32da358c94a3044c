// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

//! Trackers for tests.

use std::ffi::OsStr;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use crate::Tracker;
use crate::tracker::{EntityLevels, TextTracker};

/// Folder the event logs of tests are written to.
pub const TRACE_DIR: &str = "traces";

/// A tracker which writes the debug log of a test to `traces/<name>.log`,
/// named after the test's source file, so that a failing run can be read
/// afterwards.
///
/// Call it with `file!()`.
///
/// # Panics
///
/// If the log file cannot be created.
#[must_use]
pub fn create_tracker(source_file: &str) -> Tracker {
    let name = Path::new(source_file)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("test");
    let path = Path::new(TRACE_DIR).join(format!("{name}.log"));
    let file = match fs::create_dir_all(TRACE_DIR).and_then(|()| fs::File::create(&path)) {
        Ok(file) => file,
        Err(e) => panic!("Unable to create {}: {e}", path.display()),
    };
    Arc::new(TextTracker::new(
        EntityLevels::new(log::Level::Debug),
        Box::new(BufWriter::new(file)),
    ))
}
