// crates/muse-cli/src/gate.rs
//
// Interactive checkpoint used when debug pausing is enabled: shows the
// fetched item and waits for Enter before any paid request is made.
//
// The line is read on a detached OS thread that reports back over a oneshot
// channel. Dropping the wait (Ctrl-C wins the select in main) abandons that
// thread, so runtime shutdown never blocks on the terminal.

use std::io::{self, BufRead};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use muse_core::ArchiveItem;
use muse_pipeline::DebugGate;

type LineReader = dyn Fn() -> io::Result<String> + Send + Sync;

pub struct StdinGate {
    read_line: Arc<LineReader>,
}

impl StdinGate {
    pub fn new() -> Self {
        Self::with_reader(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
    }

    fn with_reader<F>(reader: F) -> Self
    where
        F: Fn() -> io::Result<String> + Send + Sync + 'static,
    {
        Self {
            read_line: Arc::new(reader),
        }
    }
}

impl Default for StdinGate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DebugGate for StdinGate {
    async fn wait(&self, item: &ArchiveItem) {
        println!("\nFetched item: {}", item.title());
        for (key, value) in item.get_prompt_elements().iter() {
            println!("  {}: {}", key, value.render());
        }
        println!("\nPress Enter to continue with generation...");

        let (tx, rx) = oneshot::channel();
        let read_line = Arc::clone(&self.read_line);
        std::thread::spawn(move || {
            let _ = tx.send(read_line());
        });

        match rx.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::warn!("Could not read from stdin, continuing: {}", e),
            Err(_) => tracing::warn!("Stdin reader exited without a line, continuing"),
        }
    }
}
