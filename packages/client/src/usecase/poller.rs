//! Remote state poller.
//!
//! A fixed-period timer running on a spawned tokio task. Ticks run one at a
//! time inside that task, so a slow request delays the next tick instead of
//! overlapping it. Results reach the controller over an mpsc channel and are
//! tagged with the room they were fetched for.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::{ApiError, AuthToken, GameApi, Room, RoomId, Round};

pub const GAME_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const ADMIN_POLL_INTERVAL: Duration = Duration::from_millis(30000);

/// Fixed-period timer with idempotent stop
pub struct Poller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Starts ticking after one period. Any running timer is stopped first.
    pub fn start<F, Fut>(&mut self, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        }));
        tracing::debug!("Poller started ({} ms)", period.as_millis());
    }

    /// No-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// What the game poller fetches on each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTarget {
    pub room_id: RoomId,
    /// Only the `Playing` phase fetches the current round
    pub include_round: bool,
}

/// Outcome of one game poll tick
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Snapshot {
        room_id: RoomId,
        room: Room,
        round: Option<Round>,
    },
    Failed {
        room_id: RoomId,
        error: ApiError,
    },
}

impl PollEvent {
    pub fn room_id(&self) -> RoomId {
        match self {
            PollEvent::Snapshot { room_id, .. } | PollEvent::Failed { room_id, .. } => *room_id,
        }
    }
}

/// One game tick: activity ping (best-effort), room, then round if requested.
pub async fn poll_game_state(api: &dyn GameApi, token: &AuthToken, target: PollTarget) -> PollEvent {
    let room_id = target.room_id;

    if let Err(e) = api.ping_activity(token, room_id).await {
        tracing::debug!("Activity ping failed: {}", e);
    }

    let room = match api.get_room(token, room_id).await {
        Ok(room) => room,
        Err(error) => return PollEvent::Failed { room_id, error },
    };

    let round = if target.include_round {
        match api.current_round(token, room_id).await {
            Ok(round) => round,
            Err(error) => return PollEvent::Failed { room_id, error },
        }
    } else {
        None
    };

    PollEvent::Snapshot {
        room_id,
        room,
        round,
    }
}

/// Starts `poller` on the game tick. The target is read on every tick, so
/// the controller can switch the round fetch on and off without a restart.
pub fn start_game_polling(
    poller: &mut Poller,
    api: Arc<dyn GameApi>,
    token: AuthToken,
    target: watch::Receiver<Option<PollTarget>>,
    events: mpsc::UnboundedSender<PollEvent>,
) {
    poller.start(move || {
        let api = Arc::clone(&api);
        let token = token.clone();
        let target = *target.borrow();
        let events = events.clone();
        async move {
            let Some(target) = target else {
                return;
            };
            let event = poll_game_state(api.as_ref(), &token, target).await;
            if events.send(event).is_err() {
                tracing::debug!("Poll receiver dropped");
            }
        }
    });
}
