use hyper::HeaderMap;

/// Extracts the session token from the `sid` cookie, if any.
pub fn extract_session(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(hyper::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|section| section.trim().split_once('='))
        .find_map(|(key, session)| (key == "sid").then_some(session))
}
