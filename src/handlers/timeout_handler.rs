use futures_channel::mpsc::UnboundedSender;
use futures_timer::Delay;
use log::debug;
use std::time::Duration;

use crate::models::communication::GameEvent;

/// Sends a `Tick` every `interval` until the game stops listening.
pub async fn handle_ticks(tx: UnboundedSender<GameEvent>, interval: Duration) {
    loop {
        Delay::new(interval).await;
        if tx.unbounded_send(GameEvent::Tick).is_err() {
            debug!("Game closed, ticker stopping");
            return;
        }
    }
}

/// Sends `Advance` once the feedback pause is over.
pub async fn handle_feedback_pause(tx: UnboundedSender<GameEvent>, pause: Duration) {
    Delay::new(pause).await;
    if tx.unbounded_send(GameEvent::Advance).is_err() {
        debug!("Game closed before the feedback pause ended");
    }
}
