use std::sync::OnceLock;

use regex::{Captures, Regex};

/// `{{ env.NAME }}` with an optional `| default("value")`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute environment placeholders in raw config text
///
/// Comment lines are left untouched so commented-out secrets never have to
/// be set.
pub(crate) fn expand_env(input: &str) -> anyhow::Result<String> {
    let mut lines = Vec::new();

    for line in input.split('\n') {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    Ok(lines.join("\n"))
}

fn expand_line(line: &str) -> anyhow::Result<String> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |captures: &Captures<'_>| {
        match resolve(&captures[1], captures.get(2).map(|m| m.as_str())) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

fn resolve(key: &str, default: Option<&str>) -> anyhow::Result<String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        anyhow::bail!("only `env.` placeholders are supported, found `{key}`");
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable `{name}` is not set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[client]\nbase_url = \"http://localhost:3210\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_variables() {
        let vars = [("PROXIMA_TEST_URL", Some("http://gateway:3210")), ("PROXIMA_TEST_MODEL", Some("claude"))];
        temp_env::with_vars(vars, || {
            let result =
                expand_env("base_url = \"{{ env.PROXIMA_TEST_URL }}\"\nmodel = \"{{env.PROXIMA_TEST_MODEL}}\"").unwrap();
            assert_eq!(result, "base_url = \"http://gateway:3210\"\nmodel = \"claude\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("PROXIMA_TEST_KEY", || {
            let err = expand_env("api_key = \"{{ env.PROXIMA_TEST_KEY }}\"").unwrap_err();
            assert!(err.to_string().contains("PROXIMA_TEST_KEY"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        let input = "api_key = \"{{ env.PROXIMA_TEST_KEY | default(\"none\") }}\"";

        temp_env::with_var_unset("PROXIMA_TEST_KEY", || {
            assert_eq!(expand_env(input).unwrap(), "api_key = \"none\"");
        });

        temp_env::with_var("PROXIMA_TEST_KEY", Some("sk-1"), || {
            assert_eq!(expand_env(input).unwrap(), "api_key = \"sk-1\"");
        });
    }

    #[test]
    fn other_scopes_are_rejected() {
        let err = expand_env("key = \"{{ vault.SECRET }}\"").unwrap_err();
        assert!(err.to_string().contains("only `env.` placeholders"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("PROXIMA_TEST_KEY", || {
            let input = "  # api_key = \"{{ env.PROXIMA_TEST_KEY }}\"\nmodel = \"auto\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
