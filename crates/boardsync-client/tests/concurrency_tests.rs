//! Interleaving behavior on the single UI thread: last refetch to resolve
//! wins the remote partition, and late resolutions after teardown are
//! discarded rather than applied.

use boardsync_client::{ReconciliationStore, Session};
use boardsync_model::RemoteId;
use boardsync_test_utils::{init_tracing, remote_project, ScriptedGateway};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;

async fn logged_in_store(
    gateway: Arc<ScriptedGateway>,
) -> ReconciliationStore<Arc<ScriptedGateway>> {
    init_tracing();
    let session = Session::new();
    session
        .login(&gateway, "dev@example.com", "hunter42")
        .await
        .unwrap();
    let store = ReconciliationStore::new(gateway, session);
    store.refresh_projects().await.unwrap();
    store
}

#[tokio::test(flavor = "current_thread")]
async fn rapid_double_toggle_shows_whichever_refetch_resolves_last() {
    let gateway = Arc::new(ScriptedGateway::seeded(
        vec![remote_project(1, "alpha", false)],
        HashMap::new(),
    ));
    let store = logged_in_store(Arc::clone(&gateway)).await;

    // The first toggle's refetch reports completed, the second's reports
    // pending; both are gated so the test controls resolution order.
    let gate_first = gateway.push_projects_reply(vec![remote_project(1, "alpha", true)]);
    let gate_second = gateway.push_projects_reply(vec![remote_project(1, "alpha", false)]);

    let toggle_on = store.set_project_status(RemoteId(1), true);
    let toggle_off = store.set_project_status(RemoteId(1), false);
    let release = async {
        // Let the second-issued refetch resolve first, then the first-issued
        // one. The first call's view of the world lands last and wins.
        let _ = gate_second.send(());
        tokio::task::yield_now().await;
        let _ = gate_first.send(());
    };

    let (first, second, ()) = tokio::join!(toggle_on, toggle_off, release);
    first.unwrap();
    second.unwrap();

    let projects = store.projects().await.unwrap();
    assert!(projects[0].completed, "first-issued refetch resolved last");
}

#[tokio::test(flavor = "current_thread")]
async fn refetches_resolving_out_of_order_are_last_writer_wins() {
    let gateway = Arc::new(ScriptedGateway::seeded(
        vec![remote_project(1, "original", false)],
        HashMap::new(),
    ));
    let store = logged_in_store(Arc::clone(&gateway)).await;

    let gate_stale = gateway.push_projects_reply(vec![remote_project(1, "stale name", false)]);
    let gate_fresh = gateway.push_projects_reply(vec![remote_project(1, "fresh name", false)]);

    let refresh_a = store.refresh_projects();
    let refresh_b = store.refresh_projects();
    let release = async {
        let _ = gate_fresh.send(());
        tokio::task::yield_now().await;
        let _ = gate_stale.send(());
    };

    let (a, b, ()) = tokio::join!(refresh_a, refresh_b, release);
    a.unwrap();
    b.unwrap();

    // The stale reply resolved last and transiently owns the view.
    let projects = store.projects().await.unwrap();
    assert_eq!(projects[0].name, "stale name");
}

#[tokio::test(flavor = "current_thread")]
async fn refetch_resolving_after_teardown_is_discarded() {
    let gateway = Arc::new(ScriptedGateway::seeded(
        vec![remote_project(1, "alpha", false)],
        HashMap::new(),
    ));
    let store = logged_in_store(Arc::clone(&gateway)).await;

    let gate = gateway.push_projects_reply(vec![remote_project(9, "ghost", false)]);

    let refresh = store.refresh_projects();
    let teardown = async {
        store.session().logout();
        let _ = gate.send(());
    };

    // The in-flight refetch must resolve without panicking or applying.
    let (result, ()) = tokio::join!(refresh, teardown);
    result.unwrap();

    // Log back in: the partition still holds the pre-teardown state.
    store
        .session()
        .login(&gateway, "dev@example.com", "hunter42")
        .await
        .unwrap();
    let projects = store.projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "alpha");
}
