mod support;

use std::sync::Arc;

use haven_auth::{
    AuthError, FileHandoffStore, HandoffStore, MemoryHandoffStore, Outcome, PostAuthRouter,
    RecordingNavigator,
};
use haven_core::{Handoff, Role, Route};
use pretty_assertions::assert_eq;
use rstest::rstest;

use support::{FakeProfiles, FakeSessionStore, profile};

const FALLBACK: &str = "Your Organization";

struct Harness {
    store: Arc<FakeSessionStore>,
    handoff: Arc<MemoryHandoffStore>,
    nav: Arc<RecordingNavigator>,
    router: PostAuthRouter,
}

fn harness(store: FakeSessionStore, profiles: FakeProfiles, handoff: Handoff) -> Harness {
    let store = Arc::new(store);
    let handoff = Arc::new(MemoryHandoffStore::with(handoff));
    let nav = Arc::new(RecordingNavigator::default());
    let router = PostAuthRouter::new(
        store.clone(),
        Arc::new(profiles),
        handoff.clone(),
        nav.clone(),
        FALLBACK,
    );
    Harness {
        store,
        handoff,
        nav,
        router,
    }
}

fn selected(org_id: &str, org_name: &str) -> Handoff {
    let mut handoff = Handoff::default();
    handoff.remember_tenant(org_id, org_name);
    handoff
}

#[tokio::test]
async fn admin_without_selection_adopts_org_and_lands_on_admin() {
    let h = harness(
        FakeSessionStore::signed_in("u1"),
        FakeProfiles::default()
            .with_profile(profile("u1", Some("org-1"), Some(Role::Admin)))
            .with_organization("org-1", "Northside Shelter"),
        Handoff::default(),
    );

    let result = h.router.reconcile().await;

    assert_eq!(result.destination, Route::AdminLanding);
    assert_eq!(
        result.outcome,
        Outcome::Adopted {
            org_id: "org-1".into(),
            org_name: "Northside Shelter".into()
        }
    );
    let tenant = h.handoff.snapshot().tenant().expect("tenant adopted");
    assert_eq!(tenant.org_id, "org-1");
    assert_eq!(tenant.org_name, "Northside Shelter");
    assert_eq!(h.nav.history(), vec![Route::AdminLanding]);
    assert_eq!(h.store.sign_outs(), 0);
}

#[tokio::test]
async fn volunteer_without_selection_lands_on_volunteer_route() {
    let h = harness(
        FakeSessionStore::signed_in("u2"),
        FakeProfiles::default()
            .with_profile(profile("u2", Some("org-2"), Some(Role::Volunteer)))
            .with_organization("org-2", "Food Bank"),
        Handoff::default(),
    );

    let result = h.router.reconcile().await;

    assert_eq!(result.destination, Route::VolunteerLanding);
    assert_eq!(result.role, Some(Role::Volunteer));
    assert_eq!(h.handoff.snapshot().tenant().map(|t| t.org_id).as_deref(), Some("org-2"));
}

#[rstest]
#[case::organization_row_missing(None)]
#[case::blank_name(Some("   "))]
#[tokio::test]
async fn adopted_name_falls_back_when_unavailable(#[case] name: Option<&str>) {
    let mut profiles =
        FakeProfiles::default().with_profile(profile("u1", Some("org-1"), Some(Role::Volunteer)));
    if let Some(name) = name {
        profiles = profiles.with_organization("org-1", name);
    }
    let h = harness(FakeSessionStore::signed_in("u1"), profiles, Handoff::default());

    h.router.reconcile().await;

    let tenant = h.handoff.snapshot().tenant().expect("tenant adopted");
    assert_eq!(tenant.org_id, "org-1");
    assert_eq!(tenant.org_name, FALLBACK);
}

#[tokio::test]
async fn matching_selection_is_confirmed() {
    let h = harness(
        FakeSessionStore::signed_in("u1"),
        FakeProfiles::default().with_profile(profile("u1", Some("org-1"), Some(Role::Admin))),
        selected("org-1", "Northside Shelter"),
    );

    let result = h.router.reconcile().await;

    assert_eq!(
        result.outcome,
        Outcome::Confirmed {
            org_id: "org-1".into()
        }
    );
    assert_eq!(result.destination, Route::AdminLanding);
    assert_eq!(
        h.handoff.snapshot().tenant().map(|t| t.org_name).as_deref(),
        Some("Northside Shelter")
    );
}

#[tokio::test]
async fn tenant_mismatch_signs_out_and_never_lands() {
    let h = harness(
        FakeSessionStore::signed_in("u1"),
        FakeProfiles::default().with_profile(profile("u1", Some("org-b"), Some(Role::Admin))),
        selected("org-a", "Northside Shelter"),
    );

    let result = h.router.reconcile().await;

    assert_eq!(result.destination, Route::SelectOrganization);
    assert_eq!(
        result.outcome,
        Outcome::TenantMismatch {
            selected: "org-a".into(),
            actual: "org-b".into()
        }
    );
    assert_eq!(h.store.sign_outs(), 1);
    assert_eq!(h.store.current(), None);
    assert_eq!(h.nav.history(), vec![Route::SelectOrganization]);
    assert!(h.nav.history().iter().all(|route| !route.is_landing()));

    let handoff = h.handoff.snapshot();
    assert_eq!(handoff.tenant(), None);
    assert!(handoff.auth_error().is_some_and(|m| m.contains("Northside Shelter")));
}

#[rstest]
#[case::no_profile(None)]
#[case::no_organization(Some(profile("u1", None, Some(Role::Admin))))]
#[case::no_role(Some(profile("u1", Some("org-1"), None)))]
#[case::blank_organization(Some(profile("u1", Some(""), Some(Role::Volunteer))))]
#[tokio::test]
async fn unprovisioned_account_is_signed_out_with_diagnostic(
    #[case] row: Option<haven_core::Profile>,
) {
    let mut profiles = FakeProfiles::default();
    if let Some(row) = row {
        profiles = profiles.with_profile(row);
    }
    let h = harness(FakeSessionStore::signed_in("u1"), profiles, Handoff::default());

    let result = h.router.reconcile().await;

    assert_eq!(result.destination, Route::SelectOrganization);
    assert_eq!(result.outcome, Outcome::Unprovisioned);
    assert_eq!(h.store.sign_outs(), 1);
    assert_eq!(
        h.handoff.snapshot().auth_error(),
        Some(haven_auth::router::UNPROVISIONED_MESSAGE)
    );
}

#[tokio::test]
async fn no_identity_goes_to_login_without_side_effects() {
    let h = harness(
        FakeSessionStore::signed_out(),
        FakeProfiles::default(),
        selected("org-1", "Northside Shelter"),
    );

    let result = h.router.reconcile().await;

    assert_eq!(result.destination, Route::Login);
    assert_eq!(result.outcome, Outcome::NoIdentity);
    assert_eq!(h.store.sign_outs(), 0);
    assert_eq!(h.handoff.snapshot(), selected("org-1", "Northside Shelter"));
}

#[tokio::test]
async fn pending_invite_state_is_cleared_on_success() {
    let mut handoff = Handoff::default();
    handoff.set_invite_code("JOIN-42");
    handoff.set_invite_error("expired");
    let h = harness(
        FakeSessionStore::signed_in("u1"),
        FakeProfiles::default()
            .with_profile(profile("u1", Some("org-1"), Some(Role::Volunteer)))
            .with_organization("org-1", "Food Bank"),
        handoff,
    );

    h.router.reconcile().await;

    let handoff = h.handoff.snapshot();
    assert_eq!(handoff.invite_code(), None);
    assert_eq!(handoff.invite_error(), None);
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let h = harness(
        FakeSessionStore::signed_in("u1"),
        FakeProfiles::default()
            .with_profile(profile("u1", Some("org-1"), Some(Role::Admin)))
            .with_organization("org-1", "Northside Shelter"),
        Handoff::default(),
    );

    let first = h.router.reconcile().await;
    let after_first = h.handoff.snapshot();
    let second = h.router.reconcile().await;

    assert_eq!(first.destination, second.destination);
    assert_eq!(
        second.outcome,
        Outcome::Confirmed {
            org_id: "org-1".into()
        }
    );
    assert_eq!(h.handoff.snapshot(), after_first);
    assert_eq!(h.store.sign_outs(), 0);
}

struct BrokenHandoffStore;

impl HandoffStore for BrokenHandoffStore {
    fn load(&self) -> Result<Handoff, AuthError> {
        Err(AuthError::HandoffStore("disk on fire".into()))
    }

    fn save(&self, _handoff: &Handoff) -> Result<(), AuthError> {
        Err(AuthError::HandoffStore("disk on fire".into()))
    }
}

#[tokio::test]
async fn unreadable_handoff_still_routes() {
    let store = Arc::new(FakeSessionStore::signed_in("u1"));
    let nav = Arc::new(RecordingNavigator::default());
    let router = PostAuthRouter::new(
        store.clone(),
        Arc::new(
            FakeProfiles::default().with_profile(profile("u1", Some("org-1"), Some(Role::Admin))),
        ),
        Arc::new(BrokenHandoffStore),
        nav.clone(),
        FALLBACK,
    );

    let result = router.reconcile().await;

    assert_eq!(result.destination, Route::AdminLanding);
    assert!(matches!(result.outcome, Outcome::Adopted { .. }));
    assert_eq!(store.sign_outs(), 0);
}

#[tokio::test]
async fn file_store_persists_selection_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeSessionStore::signed_in("u1"));
    let nav = Arc::new(RecordingNavigator::default());
    let profiles = Arc::new(
        FakeProfiles::default()
            .with_profile(profile("u1", Some("org-1"), Some(Role::Volunteer)))
            .with_organization("org-1", "Food Bank"),
    );

    let router = PostAuthRouter::new(
        store.clone(),
        profiles,
        Arc::new(FileHandoffStore::new(dir.path())),
        nav.clone(),
        FALLBACK,
    );
    router.reconcile().await;

    let reloaded = FileHandoffStore::new(dir.path()).load().unwrap();
    assert_eq!(reloaded.tenant().map(|t| t.org_name).as_deref(), Some("Food Bank"));
}
