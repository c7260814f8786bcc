use std::sync::Arc;

use haven_core::{Route, SessionGate};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{Frame, Liveness};
use crate::navigator::Navigator;
use crate::session_store::{SessionEvents, SessionStore};

/// Renders its content only while a session exists.
///
/// On mount it asks the store once for the current session and subscribes
/// to changes. Until the first answer arrives it renders
/// [`Frame::Loading`]. No session, now or later, moves it to
/// [`SessionGate::Unauthorized`] and redirects to [`Route::Login`]; the
/// state is published before the redirect, so protected content is never
/// rendered once the session is gone.
pub struct SessionGuard {
    state: watch::Receiver<SessionGate>,
    liveness: Liveness,
    task: JoinHandle<()>,
}

impl SessionGuard {
    /// Mount the guard. Must be called inside a tokio runtime.
    pub fn mount(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (tx, state) = watch::channel(SessionGate::Unknown);
        let liveness = Liveness::new();
        // Subscribe before the first fetch so a change racing it is not lost.
        let events = store.subscribe();
        let task = tokio::spawn(observe(store, navigator, tx, events, liveness.clone()));

        Self {
            state,
            liveness,
            task,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionGate {
        *self.state.borrow()
    }

    /// Wait until the initial check has resolved.
    pub async fn settled(&mut self) -> SessionGate {
        let settled = self
            .state
            .wait_for(|gate| gate.is_settled())
            .await
            .map(|gate| *gate);
        settled.unwrap_or_else(|_| *self.state.borrow())
    }

    /// Wait for the next state change. Returns the current state if the
    /// guard has stopped observing (terminal state reached).
    pub async fn changed(&mut self) -> SessionGate {
        let _ = self.state.changed().await;
        *self.state.borrow_and_update()
    }

    /// Render for the current state. `children` runs only when authorized.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> Frame<T> {
        match self.state() {
            SessionGate::Unknown => Frame::Loading,
            SessionGate::Unauthorized => Frame::Empty,
            SessionGate::Authorized => Frame::Content(children()),
        }
    }

    /// Tear the guard down. Equivalent to dropping it.
    pub fn unmount(self) {}
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.liveness.revoke();
        self.task.abort();
    }
}

async fn observe(
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    tx: watch::Sender<SessionGate>,
    mut events: SessionEvents,
    liveness: Liveness,
) {
    let initial = store.get_session().await;
    if !apply(&tx, navigator.as_ref(), &liveness, initial.is_some()) {
        return;
    }

    while let Some(session) = events.changed().await {
        if !apply(&tx, navigator.as_ref(), &liveness, session.is_some()) {
            return;
        }
    }
}

/// Apply one observation. Returns whether to keep observing.
fn apply(
    tx: &watch::Sender<SessionGate>,
    navigator: &dyn Navigator,
    liveness: &Liveness,
    has_session: bool,
) -> bool {
    if !liveness.is_alive() {
        tracing::debug!("session guard unmounted; dropping result");
        return false;
    }

    let current = *tx.borrow();
    let next = if has_session {
        SessionGate::Authorized
    } else {
        SessionGate::Unauthorized
    };
    if !current.can_transition_to(next) {
        return false;
    }

    tx.send_replace(next);
    if current != next {
        tracing::debug!(from = %current, to = %next, "session gate");
    }

    if next == SessionGate::Unauthorized {
        navigator.redirect(Route::Login);
        return false;
    }
    true
}
