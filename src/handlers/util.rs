pub(crate) fn json_with_status<T: ::serde::Serialize>(
    value: &T,
    status: ::warp::http::StatusCode,
) -> Box<dyn ::warp::Reply> {
    Box::new(::warp::reply::with_status(::warp::reply::json(value), status))
}

pub(crate) fn ok_json<T: ::serde::Serialize>(
    value: &T,
) -> Box<dyn ::warp::Reply> {
    json_with_status(value, ::warp::http::StatusCode::OK)
}

pub(crate) fn not_found(detail: &str) -> Box<dyn ::warp::Reply> {
    json_with_status(
        &::serde_json::json!({ "detail": detail }),
        ::warp::http::StatusCode::NOT_FOUND,
    )
}

fn describe_duration(duration: ::std::time::Duration) -> String {
    let seconds = duration.as_secs();

    let (amount, unit) = if seconds >= 86400 && seconds % 86400 == 0 {
        (seconds / 86400, "day")
    } else if seconds >= 3600 && seconds % 3600 == 0 {
        (seconds / 3600, "hour")
    } else if seconds >= 60 && seconds % 60 == 0 {
        (seconds / 60, "minute")
    } else {
        (seconds, "second")
    };

    if amount == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", amount, unit)
    }
}

pub(crate) fn already_voted_message(cooldowns: &crate::config::Cooldowns) -> String {
    format!(
        "You have already voted on this question. Please come back after {} \
         if you want to vote again for this question.",
        describe_duration(cooldowns.question)
    )
}

/// `all` selects every category.
pub(crate) fn parse_category_filter(
    category_id: &str,
) -> ::anyhow::Result<Option<i32>> {
    if category_id.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    category_id
        .trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ::anyhow::anyhow!("invalid category_id: {}", category_id))
}

#[derive(::serde::Deserialize)]
pub(crate) struct UserQuery {
    pub uuid: String,
}
