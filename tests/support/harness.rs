use std::fs;
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use stockroom::cmd::input::ReaderInput;
use stockroom::cmd::session::Session;
use stockroom::cmd::ui::{Output, OutputMode};
use stockroom::codec;
use stockroom::config::Config;
use stockroom::store::FileStore;
use tempfile::TempDir;

/// Captures everything a session prints.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session over a collection file in a temporary directory.
pub struct SessionHarness {
    pub dir: TempDir,
    pub store_path: PathBuf,
    pub session: Session,
    pub buffer: SharedBuffer,
}

impl SessionHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_contents(config, None)
    }

    /// Start from a collection file that already holds `contents`.
    pub fn with_contents(mut config: Config, contents: Option<&str>) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = dir.path().join("products.json");
        if let Some(contents) = contents {
            fs::write(&store_path, contents).expect("Failed to write store");
        }
        config.store.path = store_path.clone();

        let store = FileStore::new(&store_path);
        let loaded = codec::load(&store, config.store.skip_invalid).expect("Failed to load store");
        let buffer = SharedBuffer::default();
        let output = Output::with_writer(OutputMode::Quiet, Box::new(buffer.clone()));
        let session = Session::new(loaded.collection, Box::new(store), config, output);

        SessionHarness {
            dir,
            store_path,
            session,
            buffer,
        }
    }

    /// Feed `input` as piped stdin: rejected fields fail the command.
    pub fn run(&mut self, input: &str) -> String {
        self.feed(input, false)
    }

    /// Feed `input` as if typed: rejected fields are asked again.
    pub fn run_interactive(&mut self, input: &str) -> String {
        self.feed(input, true)
    }

    fn feed(&mut self, input: &str, interactive: bool) -> String {
        self.buffer.clear();
        let source = ReaderInput::new(Cursor::new(input.to_string()), interactive);
        self.session
            .run(Box::new(source))
            .expect("command loop failed");
        self.buffer.text()
    }

    pub fn write_script(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write script");
        path
    }

    pub fn ids(&self) -> Vec<i64> {
        self.session
            .collection()
            .ascending()
            .map(|p| p.id())
            .collect()
    }

    pub fn stored(&self) -> Value {
        let bytes = fs::read(&self.store_path).expect("Failed to read store");
        serde_json::from_slice(&bytes).expect("Store is not JSON")
    }
}
