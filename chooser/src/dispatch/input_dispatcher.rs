// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, MutexGuard, PoisonError};

use miette::IntoDiagnostic;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{Dispatch, instrument::WithSubscriber};

use crate::{DEVELOPMENT_MODE, InputDevice, InputEvent, SafeRenderSurface, SessionLock,
            SessionRoute, Size, StatusLine, StdMutex, lock_surface};

#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct DispatchOptions {
    /// Forward `SIGINT` ([`tokio::signal::ctrl_c`]) to the running session as
    /// [`InputEvent::Interrupt`]. Off by default, since it replaces the default handler
    /// that kills the process.
    pub bridge_interrupt_signal: bool,
    pub log_dispatch: Dispatch,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            bridge_interrupt_signal: false,
            log_dispatch: Dispatch::none(),
        }
    }
}

#[derive(Default)]
struct Routes {
    routes: Vec<SessionRoute>,
    is_input_closed: bool,
}

type SafeRoutes = Arc<StdMutex<Routes>>;

/// Polls one [`InputDevice`] on a tokio task and routes what it reads:
///
/// - Every registered route shares one [`SessionLock`], so at most one widget on the
///   surface is in a session. Key presses and interrupts go to that session only. With no
///   session running they are dropped.
/// - A resize first resizes the render surface and repaints the [`StatusLine`], then is
///   routed like a key press so the session can redraw.
/// - When the input ends, every route is closed: a running session returns
///   [`crate::ChooseError::InputClosed`], and so does every later one.
///
/// Dropping the dispatcher stops the task too, without waiting for it.
#[allow(missing_debug_implementations)]
pub struct InputDispatcher {
    routes: SafeRoutes,
    session_lock: SessionLock,
    shutdown_sender: broadcast::Sender<()>,
    join_handle: JoinHandle<()>,
}

impl InputDispatcher {
    /// # Panics
    ///
    /// This spawns a tokio task, which panics outside of a tokio runtime.
    #[must_use]
    pub fn spawn(
        input_device: InputDevice,
        surface: SafeRenderSurface,
        status_line: StatusLine,
        options: DispatchOptions,
    ) -> Self {
        let routes = SafeRoutes::default();
        let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);

        let dispatch_loop = run_dispatch_loop(
            input_device,
            surface,
            status_line,
            routes.clone(),
            shutdown_receiver,
            options.bridge_interrupt_signal,
        );
        let join_handle = tokio::spawn(dispatch_loop.with_subscriber(options.log_dispatch));

        Self {
            routes,
            session_lock: SessionLock::default(),
            shutdown_sender,
            join_handle,
        }
    }

    /// Start routing events to `route`, and make its sessions exclusive with those of
    /// every other registered route. Register before the widget's first session. If the
    /// input has already ended, the route is closed right away.
    pub fn register(&self, route: SessionRoute) {
        route.share_lock(&self.session_lock);
        let mut routes = lock_routes(&self.routes);
        if routes.is_input_closed {
            route.close();
        }
        routes.routes.push(route);
    }

    /// `true` once the input has ended or [`Self::shutdown`] was requested.
    #[must_use]
    pub fn is_finished(&self) -> bool { self.join_handle.is_finished() }

    /// Stop polling and wait for the task to exit. Routes are left open, so a session
    /// that is still running keeps waiting; end it before calling this.
    ///
    /// # Errors
    ///
    /// Returns an error if the dispatcher task panicked.
    pub async fn shutdown(self) -> miette::Result<()> {
        // Fails only if the task already exited, which is fine.
        self.shutdown_sender.send(()).ok();
        self.join_handle.await.into_diagnostic()
    }
}

async fn run_dispatch_loop(
    mut input_device: InputDevice,
    surface: SafeRenderSurface,
    status_line: StatusLine,
    routes: SafeRoutes,
    mut shutdown_receiver: broadcast::Receiver<()>,
    mut bridge_interrupt_signal: bool,
) {
    loop {
        tokio::select! {
            // This branch is cancel safe because recv is cancel safe.
            _ = shutdown_receiver.recv() => {
                tracing::debug!(message = "Input dispatcher shutting down");
                break;
            }

            // This branch is cancel safe because ctrl_c is cancel safe.
            result = wait_for_interrupt(bridge_interrupt_signal) => {
                match result {
                    Ok(()) => route_event(&routes, InputEvent::Interrupt),
                    Err(error) => {
                        tracing::warn!(
                            message = "Can't listen for the interrupt signal",
                            error = ?error
                        );
                        bridge_interrupt_signal = false;
                    }
                }
            }

            // This branch is cancel safe because next_input_event is cancel safe.
            maybe_input_event = input_device.next_input_event() => {
                match maybe_input_event {
                    Some(InputEvent::Resize(size)) => {
                        apply_resize(&surface, &status_line, size);
                        route_event(&routes, InputEvent::Resize(size));
                    }
                    Some(input_event) => route_event(&routes, input_event),
                    None => {
                        tracing::debug!(message = "Input ended, closing routes");
                        close_routes(&routes);
                        break;
                    }
                }
            }
        }
    }
}

async fn wait_for_interrupt(is_enabled: bool) -> std::io::Result<()> {
    if is_enabled {
        tokio::signal::ctrl_c().await
    } else {
        std::future::pending().await
    }
}

fn apply_resize(surface: &SafeRenderSurface, status_line: &StatusLine, size: Size) {
    lock_surface(surface).resize(size);
    if let Err(error) = status_line.on_resize() {
        tracing::warn!(message = "Failed to repaint status line", error = ?error);
    }
}

fn route_event(routes: &SafeRoutes, input_event: InputEvent) {
    let routes = lock_routes(routes);
    let is_delivered = routes
        .routes
        .iter()
        .find(|route| route.is_active())
        .is_some_and(|route| route.try_deliver(input_event));

    DEVELOPMENT_MODE.then(|| {
        // % is Display, ? is Debug.
        tracing::debug!(
            message = "route_event()",
            input_event = ?input_event,
            is_delivered = is_delivered
        );
    });
}

fn close_routes(routes: &SafeRoutes) {
    let mut routes = lock_routes(routes);
    routes.is_input_closed = true;
    routes.routes.iter().for_each(SessionRoute::close);
}

fn lock_routes(routes: &SafeRoutes) -> MutexGuard<'_, Routes> {
    routes.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{Event, KeyCode};
    use smallvec::smallvec;

    use super::*;
    use crate::{ChooseError, InputDeviceExtMock, OffscreenBuffer, OutputDevice,
                OutputDeviceExt, RenderSurface, Selector, key_press};

    const DELAY: Duration = Duration::from_millis(10);

    struct Fixture {
        buffer: Arc<StdMutex<OffscreenBuffer>>,
        surface: SafeRenderSurface,
        status_line: StatusLine,
        selector: Selector,
    }

    /// Header row, status row, and 2 rows for items.
    fn new_fixture() -> Fixture {
        let (output_device, _) = OutputDevice::new_mock();
        let buffer = Arc::new(StdMutex::new(OffscreenBuffer::new(
            Size::new(30, 4),
            output_device,
        )));
        let surface: SafeRenderSurface = buffer.clone();
        let status_line = StatusLine::new(1, surface.clone());
        let selector = Selector::new(2, surface.clone(), status_line.clone());
        Fixture {
            buffer,
            surface,
            status_line,
            selector,
        }
    }

    fn spawn_dispatcher(fixture: &Fixture, input_device: InputDevice) -> InputDispatcher {
        let dispatcher = InputDispatcher::spawn(
            input_device,
            fixture.surface.clone(),
            fixture.status_line.clone(),
            DispatchOptions::default(),
        );
        dispatcher.register(fixture.selector.route());
        dispatcher
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_routes_keys_to_running_session() {
        let fixture = new_fixture();
        let input_device = InputDevice::new_mock_with_delay(
            smallvec![key_press(KeyCode::Down), key_press(KeyCode::Enter)],
            DELAY,
        );
        let dispatcher = spawn_dispatcher(&fixture, input_device);

        let result = fixture.selector.choose(&["apple", "banana", "cherry"]).await;
        pretty_assertions::assert_eq!(result.unwrap(), 1);

        dispatcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_two_selectors_take_turns_on_one_surface() {
        let fixture = new_fixture();
        let other_selector =
            Selector::new(2, fixture.surface.clone(), fixture.status_line.clone());
        let input_device = InputDevice::new_mock_with_delay(
            smallvec![
                key_press(KeyCode::Down),
                key_press(KeyCode::Enter),
                key_press(KeyCode::Enter)
            ],
            DELAY,
        );
        let dispatcher = spawn_dispatcher(&fixture, input_device);
        dispatcher.register(other_selector.route());

        let (first, second) = tokio::join!(
            fixture.selector.choose(&["x", "y"]),
            other_selector.choose(&["p", "q"])
        );
        pretty_assertions::assert_eq!(first.unwrap(), 1);
        pretty_assertions::assert_eq!(second.unwrap(), 0);
        pretty_assertions::assert_eq!(
            fixture.buffer.lock().unwrap().row_text(2).trim_end(),
            "p"
        );

        dispatcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_resize_resizes_surface_then_session_redraws() {
        let fixture = new_fixture();
        let input_device = InputDevice::new_mock_with_delay(
            smallvec![Ok(Event::Resize(30, 10)), key_press(KeyCode::Enter)],
            DELAY,
        );
        let dispatcher = spawn_dispatcher(&fixture, input_device);

        let items = ["a0", "a1", "a2", "a3", "a4"];
        let result = fixture.selector.choose(&items).await;
        pretty_assertions::assert_eq!(result.unwrap(), 0);

        {
            let buffer = fixture.buffer.lock().unwrap();
            pretty_assertions::assert_eq!(buffer.size(), Size::new(30, 10));
            pretty_assertions::assert_eq!(buffer.row_text(6).trim_end(), "a4");
        }

        dispatcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_input_end_closes_running_and_later_sessions() {
        let fixture = new_fixture();
        let input_device = InputDevice::new_mock_with_delay(smallvec![], DELAY);
        let dispatcher = spawn_dispatcher(&fixture, input_device);

        let result = fixture.selector.choose(&["apple"]).await;
        assert!(matches!(result, Err(ChooseError::InputClosed)));

        let result = fixture.selector.choose(&["apple"]).await;
        assert!(matches!(result, Err(ChooseError::InputClosed)));

        assert!(dispatcher.is_finished());
        dispatcher.shutdown().await.unwrap();
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_register_after_input_ended_closes_route() {
        let fixture = new_fixture();
        let dispatcher = InputDispatcher::spawn(
            InputDevice::new_mock(smallvec![]),
            fixture.surface.clone(),
            fixture.status_line.clone(),
            DispatchOptions::default(),
        );
        while !dispatcher.is_finished() {
            tokio::task::yield_now().await;
        }

        dispatcher.register(fixture.selector.route());
        let result = fixture.selector.choose(&["apple"]).await;
        assert!(matches!(result, Err(ChooseError::InputClosed)));
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_shutdown_stops_waiting_dispatcher() {
        let fixture = new_fixture();
        let input_device = InputDevice::new_mock_with_delay(
            smallvec![key_press(KeyCode::Enter)],
            Duration::from_secs(60),
        );
        let dispatcher = spawn_dispatcher(&fixture, input_device);

        let shutdown = tokio::time::timeout(Duration::from_secs(1), dispatcher.shutdown());
        assert!(matches!(shutdown.await, Ok(Ok(()))));
    }
}
