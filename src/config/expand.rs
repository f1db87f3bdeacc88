use regex::Regex;
use std::sync::OnceLock;

fn var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"))
}

/// Expand `${VAR_NAME}` using `lookup`. Unknown variables are left as written.
pub fn expand_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    var_regex()
        .replace_all(value, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_known_and_unknown_vars() {
        let lookup = |name: &str| (name == "DATA").then(|| "/srv/chat".to_string());
        assert_eq!(
            expand_vars_with("${DATA}/sessions.json", lookup),
            "/srv/chat/sessions.json"
        );
        assert_eq!(expand_vars_with("${MISSING}/x", lookup), "${MISSING}/x");
    }
}
