// tests/common/mod.rs - shared helpers for integration tests
#![allow(dead_code)]

use hierlog::{ConsoleAppender, ConsoleStreams, TerminalEnv};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// In-memory stream whose contents can be read back after writing
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn xterm_env() -> TerminalEnv {
    TerminalEnv {
        xcode_colors: None,
        term: Some("xterm-256color".to_string()),
    }
}

pub fn debugger_env() -> TerminalEnv {
    TerminalEnv {
        xcode_colors: Some("YES".to_string()),
        term: None,
    }
}

/// Console appender writing into two captured buffers (stdout, stderr)
pub fn captured_console(
    identifier: &str,
    env: &TerminalEnv,
) -> (Arc<ConsoleAppender>, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let streams = ConsoleStreams::new(Box::new(out.clone()), Box::new(err.clone()));
    let appender = Arc::new(ConsoleAppender::with_streams(identifier, env, streams));
    (appender, out, err)
}
