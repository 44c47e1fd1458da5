//! Route aggregation (§6), organized one file per resource the way the
//! teacher's `infrastructure/http/mod.rs` lays out its session/rule
//! routes — each submodule owns its handlers, `create_routes` just
//! chains them onto one `Router`.

mod computes;
mod drawings;
mod links;
mod nodes;
mod notifications;
mod projects;
mod rpc;
mod snapshots;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use gns3_controller_composition::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v2/computes", get(computes::list).post(computes::register))
        .route("/v2/computes/{compute_id}", delete(computes::deregister))
        .route("/v2/projects", get(projects::list).post(projects::create))
        .route("/v2/projects/{project_id}", get(projects::get).delete(projects::delete))
        .route("/v2/projects/{project_id}/open", post(projects::open))
        .route("/v2/projects/{project_id}/close", post(projects::close))
        .route("/v2/projects/{project_id}/duplicate", post(projects::duplicate))
        .route("/v2/projects/{project_id}/commit", post(projects::commit))
        .route("/v2/projects/{project_id}/export", get(projects::export))
        .route("/v2/projects/import", post(projects::import))
        .route("/v2/projects/{project_id}/nodes", get(nodes::list).post(nodes::create))
        .route(
            "/v2/projects/{project_id}/nodes/{node_id}",
            get(nodes::get).put(nodes::update).delete(nodes::delete_node),
        )
        .route("/v2/projects/{project_id}/nodes/{node_id}/start", post(nodes::start))
        .route("/v2/projects/{project_id}/nodes/{node_id}/stop", post(nodes::stop))
        .route("/v2/projects/{project_id}/nodes/{node_id}/suspend", post(nodes::suspend))
        .route("/v2/projects/{project_id}/nodes/{node_id}/resume", post(nodes::resume))
        .route("/v2/projects/{project_id}/nodes/{node_id}/reload", post(nodes::reload))
        .route("/v2/projects/{project_id}/nodes/{node_id}/duplicate", post(nodes::duplicate))
        .route("/v2/projects/{project_id}/nodes/start", post(nodes::start_all))
        .route("/v2/projects/{project_id}/nodes/stop", post(nodes::stop_all))
        .route("/v2/projects/{project_id}/nodes/suspend", post(nodes::suspend_all))
        .route("/v2/projects/{project_id}/links", get(links::list).post(links::create))
        .route("/v2/projects/{project_id}/links/{link_id}", delete(links::delete_link))
        .route("/v2/projects/{project_id}/links/{link_id}/capture/start", post(links::start_capture))
        .route("/v2/projects/{project_id}/links/{link_id}/capture/stop", post(links::stop_capture))
        .route("/v2/projects/{project_id}/links/{link_id}/capture/stream", get(links::stream_capture))
        .route("/v2/projects/{project_id}/drawings", get(drawings::list).post(drawings::create))
        .route(
            "/v2/projects/{project_id}/drawings/{drawing_id}",
            put(drawings::update).delete(drawings::delete_drawing),
        )
        .route(
            "/v2/projects/{project_id}/snapshots",
            get(snapshots::list).post(snapshots::create),
        )
        .route("/v2/projects/{project_id}/snapshots/{snapshot_id}/restore", post(snapshots::restore))
        .route("/v2/projects/{project_id}/notifications", get(notifications::sse))
        .route("/v2/projects/{project_id}/notifications/ws", get(notifications::ws))
        .route("/v2/computes/{compute_id}/{*rest}", axum::routing::any(rpc::forward))
}
