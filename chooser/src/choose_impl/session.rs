// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, PoisonError,
                atomic::{AtomicBool, Ordering}};

use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard, mpsc, mpsc::error::TrySendError,
                  watch};

use crate::{ChooseError, InputEvent, Size, StdMutex};

/// What a session receives from the [`crate::InputDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Input(InputEvent),
    /// No more input will ever arrive.
    InputClosed,
}

/// Held for the length of a session by whichever widget owns the render surface. Every
/// route registered with one [`crate::InputDispatcher`] shares the dispatcher's lock, so
/// at most one of those widgets is in a session at any time.
pub type SessionLock = Arc<Mutex<()>>;

#[derive(Debug, Default)]
struct SessionShared {
    /// Mirrors "a [`SessionGuard`] is alive", for the dispatcher's benefit.
    is_active: AtomicBool,
    /// Sticky: once input has ended, every later session ends right away.
    is_input_closed: AtomicBool,
    /// Starts out private to one channel, replaced by [`SessionRoute::share_lock`].
    session_lock: StdMutex<SessionLock>,
}

impl SessionShared {
    fn session_lock(&self) -> SessionLock {
        self.session_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug)]
struct SessionQueue {
    events: mpsc::Receiver<SessionEvent>,
    /// Resizes are coalesced here instead of queued, so a full queue can't lose one. Also
    /// nudged when the input closes.
    latest_size: watch::Receiver<Option<Size>>,
}

/// The event queue of one selector, plus the lock that makes its sessions exclusive.
///
/// Concurrent [`SessionChannel::begin`] calls queue up on the [`SessionLock`] and are let
/// in one at a time, in FIFO order. Until the route is registered with a dispatcher that
/// lock belongs to this channel alone; afterwards it is shared with every other widget
/// on the same dispatcher.
#[derive(Debug)]
pub struct SessionChannel {
    sender: mpsc::Sender<SessionEvent>,
    size_sender: watch::Sender<Option<Size>>,
    queue: Mutex<SessionQueue>,
    shared: Arc<SessionShared>,
}

impl SessionChannel {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, events) = mpsc::channel(capacity.max(1));
        let (size_sender, latest_size) = watch::channel(None);
        Self {
            sender,
            size_sender,
            queue: Mutex::new(SessionQueue {
                events,
                latest_size,
            }),
            shared: Arc::new(SessionShared::default()),
        }
    }

    /// A handle for the dispatcher to deliver events with.
    #[must_use]
    pub fn route(&self) -> SessionRoute {
        SessionRoute {
            sender: self.sender.clone(),
            size_sender: self.size_sender.clone(),
            shared: self.shared.clone(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool { self.shared.is_active.load(Ordering::SeqCst) }

    /// Wait for any running session (of this widget, or of another widget sharing the
    /// [`SessionLock`]) to end, then start a new one. Events left over from the previous
    /// session are discarded.
    ///
    /// # Errors
    ///
    /// [`ChooseError::InputClosed`] if the input source has already ended.
    pub async fn begin(&self) -> Result<SessionGuard<'_>, ChooseError> {
        let session_permit = self.shared.session_lock().lock_owned().await;
        let mut queue = self.queue.lock().await;
        while queue.events.try_recv().is_ok() {}
        queue.latest_size.mark_unchanged();

        self.shared.is_active.store(true, Ordering::SeqCst);
        let guard = SessionGuard {
            queue,
            shared: &self.shared,
            _session_permit: session_permit,
        };

        // Checked after `mark_unchanged`, so a racing `SessionRoute::close` still wakes
        // `next_event`.
        if self.shared.is_input_closed.load(Ordering::SeqCst) {
            return Err(ChooseError::InputClosed);
        }

        Ok(guard)
    }
}

/// Exclusive access to the render surface and to a selector's event queue for the length
/// of one session. Dropping it (on commit, cancel, error, or when the session future
/// itself is dropped) ends the session.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    queue: MutexGuard<'a, SessionQueue>,
    shared: &'a SessionShared,
    _session_permit: OwnedMutexGuard<()>,
}

impl SessionGuard<'_> {
    /// Queued events come first. Once the queue is empty, the end of input is reported,
    /// or else a pending resize carrying only the latest size.
    ///
    /// `None` only if every sender is gone, which can't happen while the owning
    /// [`SessionChannel`] is alive.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let shared = self.shared;
        let SessionQueue {
            events,
            latest_size,
        } = &mut *self.queue;
        loop {
            tokio::select! {
                biased;

                // This branch is cancel safe because recv is cancel safe.
                maybe_event = events.recv() => return maybe_event,

                // This branch is cancel safe because changed is cancel safe.
                Ok(()) = latest_size.changed() => {
                    if shared.is_input_closed.load(Ordering::SeqCst) {
                        return Some(SessionEvent::InputClosed);
                    }
                    if let Some(size) = *latest_size.borrow_and_update() {
                        return Some(SessionEvent::Input(InputEvent::Resize(size)));
                    }
                }
            }
        }
    }
}

impl Drop for SessionGuard<'_> {
    /// Runs before the session permit is released, so the next session never sees this
    /// one still active.
    fn drop(&mut self) { self.shared.is_active.store(false, Ordering::SeqCst); }
}

/// The dispatcher's side of a [`SessionChannel`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionRoute {
    sender: mpsc::Sender<SessionEvent>,
    size_sender: watch::Sender<Option<Size>>,
    shared: Arc<SessionShared>,
}

impl SessionRoute {
    #[must_use]
    pub fn is_active(&self) -> bool { self.shared.is_active.load(Ordering::SeqCst) }

    /// Make this widget's sessions exclusive with every other widget holding `lock`.
    /// Takes effect for sessions that begin afterwards.
    pub fn share_lock(&self, lock: &SessionLock) {
        *self
            .shared
            .session_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = lock.clone();
    }

    /// Deliver `event` if a session is running. Never waits: when no session is running,
    /// or the queue is full, the event is dropped. A resize is never dropped during a
    /// session; it replaces any resize the session hasn't seen yet. Returns whether the
    /// event was delivered.
    pub fn try_deliver(&self, event: InputEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        if let InputEvent::Resize(size) = event {
            self.size_sender.send_replace(Some(size));
            return true;
        }
        match self.sender.try_send(SessionEvent::Input(event)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(message = "Session event queue full, dropping event", event = ?event);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Mark the input as ended. A running session is told once it has drained its queue,
    /// even a full one; later sessions fail as soon as they begin.
    pub fn close(&self) {
        self.shared.is_input_closed.store(true, Ordering::SeqCst);
        self.size_sender.send_modify(|_| {});
    }
}
