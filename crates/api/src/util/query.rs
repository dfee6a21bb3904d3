/// Picks the `name` and optional `id` parameters out of a subscription query string.
pub fn parse_name_and_id(query: &str) -> Option<(&str, Option<&str>)> {
    let mut name = None;
    let mut id = None;

    for chunk in query.split('&') {
        let Some((key, value)) = chunk.split_once('=') else {
            continue;
        };
        let target = match key {
            "name" => &mut name,
            "id" => &mut id,
            _ => continue,
        };
        *target = Some(value);
    }

    Some((name?, id))
}

#[cfg(test)]
mod tests {
    use super::parse_name_and_id;

    #[test]
    fn extracts_known_keys() {
        assert_eq!(parse_name_and_id("name=myAnswers"), Some(("myAnswers", None)));
        assert_eq!(parse_name_and_id("id=abc&x=1&name=groupQuestions"), Some(("groupQuestions", Some("abc"))));
        assert_eq!(parse_name_and_id("id=abc"), None);
        assert_eq!(parse_name_and_id(""), None);
    }
}
