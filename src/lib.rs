use ::warp::Filter;

pub mod config;
pub mod import;
pub mod model;
pub mod postgres;
pub mod progress;
pub mod session;
pub mod tally;
pub mod vote;

mod handlers;

pub struct State {
    pub pool: ::sqlx::PgPool,
    pub cooldowns: config::Cooldowns,
    pub sessions: Box<dyn session::SessionStore>,
}

/// Unwraps a result inside a handler, answering 500 with a generic body
/// on error. The error itself is only logged.
#[macro_export]
macro_rules! warp_try_err_500 {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => {
                ::log::error!("{}:{} {:?}", file!(), line!(), err);
                return Ok(Box::new(::warp::reply::with_status(
                    ::warp::reply::json(&::serde_json::json!({
                        "detail": "Internal server error",
                    })),
                    ::warp::http::StatusCode::INTERNAL_SERVER_ERROR,
                )));
            }
        }
    };
}

#[macro_export]
macro_rules! warp_try_err_400 {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => {
                ::log::debug!("{}:{} {:?}", file!(), line!(), err);
                return Ok(Box::new(::warp::reply::with_status(
                    ::warp::reply::json(&::serde_json::json!({
                        "detail": err.to_string(),
                    })),
                    ::warp::http::StatusCode::BAD_REQUEST,
                )));
            }
        }
    };
}

pub async fn handle_rejection(
    err: ::warp::Rejection,
) -> Result<impl ::warp::Reply, ::std::convert::Infallible> {
    let (status, detail) = if err.is_not_found() {
        (::warp::http::StatusCode::NOT_FOUND, "Not found")
    } else if err
        .find::<::warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (::warp::http::StatusCode::BAD_REQUEST, "Invalid request body")
    } else if err.find::<::warp::reject::InvalidQuery>().is_some() {
        (::warp::http::StatusCode::BAD_REQUEST, "Invalid query")
    } else if err.find::<::warp::filters::cors::CorsForbidden>().is_some() {
        (::warp::http::StatusCode::FORBIDDEN, "Forbidden")
    } else if err.find::<::warp::reject::MethodNotAllowed>().is_some() {
        (::warp::http::StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        ::log::warn!("rejection {:?}", err);
        (
            ::warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
        )
    };

    Ok(::warp::reply::with_status(
        ::warp::reply::json(&::serde_json::json!({ "detail": detail })),
        status,
    ))
}

fn boxed_reply<T: ::warp::Reply + 'static>(reply: T) -> Box<dyn ::warp::Reply> {
    Box::new(reply)
}

type ReplyFilter = ::warp::filters::BoxedFilter<(Box<dyn ::warp::Reply>,)>;

fn api_routes(state: ::std::sync::Arc<State>) -> ReplyFilter {
    let state_filter = ::warp::any().map(move || state.clone());

    let categories_route = ::warp::path!("api" / "categories")
        .and(::warp::get())
        .and(state_filter.clone())
        .and_then(handlers::get_categories::handler);

    let questions_route = ::warp::path!("api" / "questions")
        .and(::warp::get())
        .and(state_filter.clone())
        .and(::warp::query::<handlers::get_questions::Query>())
        .and_then(handlers::get_questions::handler);

    let start_question_route = ::warp::path!("api" / "start-question" / String)
        .and(::warp::get())
        .and(state_filter.clone())
        .and_then(handlers::get_start_question::handler);

    let next_question_route =
        ::warp::path!("api" / "next-question" / String / String)
            .and(::warp::get())
            .and(state_filter.clone())
            .and_then(handlers::get_next_question::handler);

    let vote_route = ::warp::path!("api" / "vote")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::body::json())
        .and_then(handlers::post_vote::handler);

    let checkbox_vote_route = ::warp::path!("api" / "checkbox-vote")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::body::json())
        .and_then(handlers::post_checkbox_vote::handler);

    let other_response_route = ::warp::path!("api" / "other-response")
        .and(::warp::post())
        .and(state_filter.clone())
        .and(::warp::body::json())
        .and_then(handlers::post_other_response::handler);

    let results_route = ::warp::path!("api" / "questions" / String / "results")
        .and(::warp::get())
        .and(state_filter.clone())
        .and_then(handlers::get_results::handler);

    let blocks_route = ::warp::path!("api" / "blocks" / i32)
        .and(::warp::get())
        .and(state_filter.clone())
        .and_then(handlers::get_blocks::handler);

    let next_block_route = ::warp::path!("api" / "next-block" / i32)
        .and(::warp::get())
        .and(state_filter.clone())
        .and(::warp::query::<handlers::util::UserQuery>())
        .and_then(handlers::get_next_block::handler);

    let block_complete_route =
        ::warp::path!("api" / "block-complete" / i32 / i32)
            .and(::warp::get())
            .and(state_filter.clone())
            .and(::warp::query::<handlers::util::UserQuery>())
            .and_then(handlers::get_block_complete::handler);

    let health_route = ::warp::path!("health")
        .and(::warp::get())
        .then(handlers::get_health::handler);

    let api_health_route = ::warp::path!("api" / "health")
        .and(::warp::get())
        .then(handlers::get_health::api_handler);

    let db_status_route = ::warp::path!("api" / "db-status")
        .and(::warp::get())
        .and(state_filter)
        .and_then(handlers::get_db_status::handler);

    categories_route
        .map(boxed_reply)
        .or(questions_route.map(boxed_reply))
        .unify()
        .or(start_question_route.map(boxed_reply))
        .unify()
        .or(next_question_route.map(boxed_reply))
        .unify()
        .or(vote_route.map(boxed_reply))
        .unify()
        .or(checkbox_vote_route.map(boxed_reply))
        .unify()
        .or(other_response_route.map(boxed_reply))
        .unify()
        .or(results_route.map(boxed_reply))
        .unify()
        .or(blocks_route.map(boxed_reply))
        .unify()
        .or(next_block_route.map(boxed_reply))
        .unify()
        .or(block_complete_route.map(boxed_reply))
        .unify()
        .or(health_route.map(boxed_reply))
        .unify()
        .or(api_health_route.map(boxed_reply))
        .unify()
        .or(db_status_route.map(boxed_reply))
        .unify()
        .boxed()
}

/// Serves the built frontend for every GET outside `/api`, falling back
/// to `index.html` so client-side routes resolve.
fn frontend_routes(directory: ::std::path::PathBuf) -> ReplyFilter {
    let outside_api = ::warp::path::full()
        .and_then(|path: ::warp::path::FullPath| async move {
            if path.as_str().starts_with("/api") {
                Err(::warp::reject::not_found())
            } else {
                Ok(())
            }
        })
        .untuple_one();

    let index = directory.join("index.html");

    ::warp::get()
        .and(outside_api)
        .and(
            ::warp::fs::dir(directory)
                .map(boxed_reply)
                .or(::warp::fs::file(index).map(boxed_reply))
                .unify(),
        )
        .boxed()
}

fn cors(allowed_origins: Option<Vec<String>>) -> ::warp::filters::cors::Builder {
    let cors = ::warp::cors()
        .allow_headers(vec!["content-type"])
        .allow_methods(&[::warp::http::Method::POST, ::warp::http::Method::GET]);

    match allowed_origins {
        Some(origins) => {
            cors.allow_origins(origins.iter().map(String::as_str))
        }
        None => cors.allow_any_origin(),
    }
}

pub fn make_routes(
    state: ::std::sync::Arc<State>,
    allowed_origins: Option<Vec<String>>,
    frontend_dir: Option<::std::path::PathBuf>,
) -> impl Filter<Extract = (impl ::warp::Reply,), Error = ::std::convert::Infallible>
       + Clone {
    let routes = match frontend_dir {
        Some(directory) => {
            ::log::info!("serving frontend from {}", directory.display());
            api_routes(state)
                .or(frontend_routes(directory))
                .unify()
                .boxed()
        }
        None => api_routes(state),
    };

    routes
        .with(cors(allowed_origins))
        .recover(handle_rejection)
        .with(::warp::log("poll_server"))
}
