// Copyright (c) 2020 Graphcore Ltd. All rights reserved.

use std::fmt;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::tracker::{EntityLevels, Track};
use crate::{Id, Writer};

/// Writes one line per event.
///
/// A line is written while holding the writer so the lines of actors on
/// different threads never interleave. Write errors are ignored.
pub struct TextTracker {
    levels: EntityLevels,
    writer: Mutex<Writer>,
}

impl TextTracker {
    /// Create a tracker which writes the events enabled by `levels`.
    #[must_use]
    pub fn new(levels: EntityLevels, writer: Writer) -> Self {
        Self {
            levels,
            writer: Mutex::new(writer),
        }
    }

    fn line(&self, line: fmt::Arguments) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "{line}");
    }
}

impl Track for TextTracker {
    fn unique_id(&self) -> Id {
        self.levels.unique_id()
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        self.levels.is_enabled(id, level)
    }

    fn register(&self, id: Id, path: &str) {
        self.levels.register(id, path);
    }

    fn created(&self, parent: Id, id: Id, path: &str) {
        self.line(format_args!("{parent}: created {id}, {path}"));
    }

    fn destroyed(&self, parent: Id, id: Id) {
        self.line(format_args!("{parent}: destroyed {id}"));
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.line(format_args!("{id}:{level}: {msg}"));
    }

    fn shutdown(&self) {
        let _ = self
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush();
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn one_line_per_event() {
        let capture = Capture::default();
        let tracker = TextTracker::new(
            EntityLevels::new(log::Level::Trace),
            Box::new(capture.clone()),
        );

        let id = tracker.unique_id();
        tracker.register(id, "dphil::actor2");
        tracker.log(id, log::Level::Info, format_args!("Actor 2 is eating for 3s"));
        tracker.destroyed(Id::FIRST, id);
        tracker.shutdown();

        let text = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                format!("{id}:INFO: Actor 2 is eating for 3s"),
                format!("1: destroyed {id}"),
            ]
        );
    }
}
