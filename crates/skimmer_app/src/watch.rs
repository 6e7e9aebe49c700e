use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use skimmer_core::Msg;

/// Reads URLs from stdin, one per line, and feeds them to the message pump.
/// The returned flag flips once stdin reaches end of file.
pub fn spawn(msg_tx: mpsc::Sender<Msg>) -> Arc<AtomicBool> {
    let eof = Arc::new(AtomicBool::new(false));
    let eof_flag = Arc::clone(&eof);

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let url = line.trim();
            if url.is_empty() {
                continue;
            }
            if msg_tx.send(Msg::UrlChanged(url.to_string())).is_err() {
                return;
            }
        }
        eof_flag.store(true, Ordering::SeqCst);
        // Wake the pump so it can observe the flag.
        let _ = msg_tx.send(Msg::Tick);
    });

    eof
}
