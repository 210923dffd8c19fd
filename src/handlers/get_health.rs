use ::warp::Reply;

pub(crate) async fn handler() -> ::warp::reply::Response {
    ::warp::reply::json(&::serde_json::json!({ "status": "ok" })).into_response()
}

pub(crate) async fn api_handler() -> ::warp::reply::Response {
    ::warp::reply::json(&::serde_json::json!({
        "status": "ok",
        "message": "API is running",
    }))
    .into_response()
}
