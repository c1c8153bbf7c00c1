use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) => return Ok(Some(key)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}

pub fn is_quit(key: &KeyEvent) -> bool {
    matches!(
        (key.code, key.modifiers),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL)
    )
}

/// Forwards key presses from a blocking reader thread. The thread exits once
/// the receiver is gone or the terminal stops answering.
pub fn spawn_key_reader() -> UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || loop {
        match next_key_event(Duration::from_millis(100)) {
            Ok(Some(key)) => {
                if tx.send(key).is_err() {
                    break;
                }
            }
            Ok(None) if tx.is_closed() => break,
            Ok(None) => {}
            Err(err) => {
                log::error!("terminal input failed: {:#}", err);
                break;
            }
        }
    });
    rx
}
