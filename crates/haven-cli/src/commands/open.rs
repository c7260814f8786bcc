//! `haven open`: walk a protected view through the same guards the client
//! mounts, and report what would be on screen.

use std::sync::Arc;

use haven_auth::{Navigator, ProfileReader, RoleGuard, SessionGuard, SessionStore};
use haven_config::HavenConfig;
use haven_core::Route;
use serde::Serialize;

use crate::bootstrap::Services;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::{OpenArgs, View};
use crate::output::output;

#[derive(Serialize)]
struct OpenResponse {
    view: Route,
    path: String,
    rendered: bool,
    redirect: Option<String>,
    user: Option<String>,
}

const fn route_for(view: View) -> Route {
    match view {
        View::Dashboard => Route::VolunteerLanding,
        View::Admin => Route::AdminLanding,
    }
}

pub async fn handle(
    args: &OpenArgs,
    flags: &GlobalFlags,
    config: &HavenConfig,
) -> anyhow::Result<()> {
    let services = Services::init(config)?;
    let rendered = open_view(
        args.view,
        services.sessions.clone(),
        services.profiles.clone(),
        services.navigator.clone(),
    )
    .await;

    let user = if rendered {
        services
            .sessions
            .get_session()
            .await
            .map(|session| session.identity.email.unwrap_or(session.identity.user_id))
    } else {
        None
    };

    let view = route_for(args.view);
    output(
        &OpenResponse {
            view,
            path: config.routes.path(view).to_string(),
            rendered,
            redirect: services
                .navigator
                .last()
                .map(|route| config.routes.path(route).to_string()),
            user,
        },
        flags.format,
    )
}

/// Mount the session guard and, for admin views, the role guard inside it.
/// Returns whether the view's content rendered.
pub(crate) async fn open_view(
    view: View,
    sessions: Arc<dyn SessionStore>,
    profiles: Arc<dyn ProfileReader>,
    navigator: Arc<dyn Navigator>,
) -> bool {
    let mut session_guard = SessionGuard::mount(sessions.clone(), navigator.clone());
    session_guard.settled().await;

    match view {
        View::Dashboard => session_guard.render(|| ()).is_content(),
        View::Admin => {
            let inner = session_guard
                .render(|| RoleGuard::admin(sessions.clone(), profiles.clone(), navigator.clone()))
                .into_content();
            match inner {
                Some(mut role_guard) => {
                    role_guard.settled().await;
                    role_guard.render(|| ()).is_content()
                }
                None => false,
            }
        }
    }
}
