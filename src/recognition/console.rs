//! Typed input standing in for speech
//!
//! Every non-empty line becomes a final fragment. An empty line (or EOF)
//! ends the utterance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, warn};

use super::backend::{RecognitionBackend, RecognitionEvent, RecognitionSettings};
use crate::error::RecognitionError;

pub type LineSource = Box<dyn AsyncBufRead + Send + Unpin>;

/// Line reader shared between the recognizer and the CLI prompt loop
pub type SharedLines = Arc<Mutex<Lines<LineSource>>>;

pub fn shared_lines(reader: impl AsyncBufRead + Send + Unpin + 'static) -> SharedLines {
    let reader: LineSource = Box::new(reader);
    Arc::new(Mutex::new(reader.lines()))
}

pub fn stdin_lines() -> SharedLines {
    shared_lines(BufReader::new(stdin()))
}

pub struct ConsoleRecognizer {
    lines: SharedLines,
    capturing: Arc<AtomicBool>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl ConsoleRecognizer {
    pub fn new(lines: SharedLines) -> Self {
        Self {
            lines,
            capturing: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
        }
    }

    async fn listen(
        lines: SharedLines,
        tx: &mpsc::Sender<RecognitionEvent>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> RecognitionEvent {
        let mut lines = lines.lock().await;

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = stop_rx.changed() => return RecognitionEvent::End,
            };

            match line {
                Ok(Some(line)) if !line.trim().is_empty() => {
                    if tx.send(RecognitionEvent::final_text(line.trim())).await.is_err() {
                        return RecognitionEvent::End;
                    }
                }
                Ok(_) => return RecognitionEvent::End,
                Err(e) => {
                    warn!("Failed to read console input: {}", e);
                    return RecognitionEvent::Error(RecognitionError::Capture(e.to_string()));
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl RecognitionBackend for ConsoleRecognizer {
    async fn start(
        &mut self,
        settings: &RecognitionSettings,
    ) -> Result<mpsc::Receiver<RecognitionEvent>, RecognitionError> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(RecognitionError::AlreadyActive);
        }

        debug!("Console recognizer listening (locale {})", settings.locale);

        let (tx, rx) = mpsc::channel(32);
        let (stop_tx, stop_rx) = watch::channel(false);
        let lines = Arc::clone(&self.lines);
        let capturing = Arc::clone(&self.capturing);

        capturing.store(true, Ordering::SeqCst);
        tokio::spawn(async move {
            let terminal = Self::listen(lines, &tx, stop_rx).await;
            capturing.store(false, Ordering::SeqCst);
            let _ = tx.send(terminal).await;
        });

        self.stop_tx = Some(stop_tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), RecognitionError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "console"
    }
}
