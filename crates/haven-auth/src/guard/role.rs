use std::sync::Arc;

use haven_core::{Role, RoleGate, Route};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{Frame, Liveness};
use crate::navigator::Navigator;
use crate::profile::{ProfileReader, current_profile};
use crate::session_store::SessionStore;

/// Renders its content only for users holding the required role.
///
/// This is a convenience for the UI, not an access control: anything it
/// hides is still reachable by calling the backend directly. Row-level
/// security and the admin API's own checks are what actually enforce roles.
///
/// Mount it inside a [`super::SessionGuard`]; it does not check for a
/// session itself. The profile is read once per mount, so a role change is
/// only noticed on the next mount. A missing profile, or any other role,
/// redirects to [`Route::DEFAULT_LANDING`]: the user is signed in, just not
/// allowed here.
pub struct RoleGuard {
    state: watch::Receiver<RoleGate>,
    liveness: Liveness,
    task: JoinHandle<()>,
}

impl RoleGuard {
    /// Mount the guard. Must be called inside a tokio runtime.
    pub fn mount(
        sessions: Arc<dyn SessionStore>,
        profiles: Arc<dyn ProfileReader>,
        navigator: Arc<dyn Navigator>,
        required: Role,
    ) -> Self {
        let (tx, state) = watch::channel(RoleGate::Unknown);
        let liveness = Liveness::new();
        let task = tokio::spawn(resolve(
            sessions,
            profiles,
            navigator,
            tx,
            liveness.clone(),
            required,
        ));

        Self {
            state,
            liveness,
            task,
        }
    }

    /// Guard for admin-only views.
    pub fn admin(
        sessions: Arc<dyn SessionStore>,
        profiles: Arc<dyn ProfileReader>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::mount(sessions, profiles, navigator, Role::Admin)
    }

    #[must_use]
    pub fn state(&self) -> RoleGate {
        *self.state.borrow()
    }

    /// Wait until the role check has resolved.
    pub async fn settled(&mut self) -> RoleGate {
        let settled = self
            .state
            .wait_for(|gate| gate.is_settled())
            .await
            .map(|gate| *gate);
        settled.unwrap_or_else(|_| *self.state.borrow())
    }

    /// Render for the current state. `children` runs only when allowed.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> Frame<T> {
        match self.state() {
            RoleGate::Unknown => Frame::Loading,
            RoleGate::Denied => Frame::Empty,
            RoleGate::Allowed => Frame::Content(children()),
        }
    }

    /// Tear the guard down. Equivalent to dropping it.
    pub fn unmount(self) {}
}

impl Drop for RoleGuard {
    fn drop(&mut self) {
        self.liveness.revoke();
        self.task.abort();
    }
}

async fn resolve(
    sessions: Arc<dyn SessionStore>,
    profiles: Arc<dyn ProfileReader>,
    navigator: Arc<dyn Navigator>,
    tx: watch::Sender<RoleGate>,
    liveness: Liveness,
    required: Role,
) {
    let profile = current_profile(sessions.as_ref(), profiles.as_ref()).await;
    if !liveness.is_alive() {
        tracing::debug!("role guard unmounted; dropping result");
        return;
    }

    let next = match &profile {
        None => {
            tracing::warn!("signed-in user has no profile; denying");
            RoleGate::Denied
        }
        Some(profile) if profile.role == Some(required) => RoleGate::Allowed,
        Some(profile) => {
            tracing::debug!(role = ?profile.role, %required, "role guard denied");
            RoleGate::Denied
        }
    };

    tx.send_replace(next);
    if next == RoleGate::Denied {
        navigator.redirect(Route::DEFAULT_LANDING);
    }
}
