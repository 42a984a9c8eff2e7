//! Placeholder substitution for template bodies.
//!
//! A placeholder is `{{token}}`, optionally padded with whitespace inside the
//! braces. Token names are matched case-insensitively; unknown tokens are
//! copied through untouched.

use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::entities::users::{self, Gender};

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("Invalid regex pattern defined in code")
    })
}

/// Value for a recognized token, or `None` when the token is unknown.
fn resolve<'a>(token: &str, user: &'a users::Model) -> Option<Cow<'a, str>> {
    let is_male = user.gender == Some(Gender::Male);

    let value = match token.to_ascii_lowercase().as_str() {
        "name" | "user_name" => Cow::Borrowed(user.user_name.as_str()),
        "city" => Cow::Borrowed(user.city.as_deref().unwrap_or_default()),
        "state" => Cow::Borrowed(user.state.as_deref().unwrap_or_default()),
        "pronoun" => Cow::Borrowed(if is_male { "He" } else { "She" }),
        "pronoun_lower" => Cow::Borrowed(if is_male { "he" } else { "she" }),
        _ => return None,
    };

    Some(value)
}

fn substitute<F>(body: &str, user: &users::Model, encode: F) -> String
where
    F: Fn(&str) -> Cow<'_, str>,
{
    placeholder_regex()
        .replace_all(body, |caps: &Captures| match resolve(&caps[1], user) {
            Some(value) => encode(&*value).into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Replace every recognized placeholder with the user's value, verbatim.
#[must_use]
pub fn personalize(body: &str, user: &users::Model) -> String {
    substitute(body, user, |value| Cow::Borrowed(value))
}

/// Like [`personalize`], but interpolated values are HTML-escaped. The
/// surrounding body is left as written.
#[must_use]
pub fn personalize_html(body: &str, user: &users::Model) -> String {
    substitute(body, user, |value| html_escape::encode_safe(value))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub token: String,
    pub recognized: bool,
}

/// Distinct placeholder names in order of first appearance. Names that differ
/// only in case count once, reported with their first spelling.
#[must_use]
pub fn tokens_in(body: &str) -> Vec<TokenUsage> {
    let mut seen: Vec<TokenUsage> = Vec::new();

    for caps in placeholder_regex().captures_iter(body) {
        let token = &caps[1];
        if seen.iter().any(|t| t.token.eq_ignore_ascii_case(token)) {
            continue;
        }
        seen.push(TokenUsage {
            token: token.to_string(),
            recognized: is_recognized(token),
        });
    }

    seen
}

fn is_recognized(token: &str) -> bool {
    matches!(
        token.to_ascii_lowercase().as_str(),
        "name" | "user_name" | "city" | "state" | "pronoun" | "pronoun_lower"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> users::Model {
        users::Model {
            user_id: 1,
            user_name: name.to_string(),
            user_email: "someone@example.com".to_string(),
            city: None,
            state: None,
            gender: None,
        }
    }

    #[test]
    fn test_name_and_city() {
        let mut u = user("Sahil");
        u.city = Some("Delhi".to_string());

        assert_eq!(
            personalize("Hello {{name}}, from {{city}}", &u),
            "Hello Sahil, from Delhi"
        );
        assert_eq!(personalize("{{user_name}}", &u), "Sahil");
    }

    #[test]
    fn test_pronoun_follows_gender() {
        let mut u = user("Sam");
        u.gender = Some(Gender::Male);
        u.state = Some("Texas".to_string());
        assert_eq!(
            personalize("{{pronoun}} lives in {{state}}", &u),
            "He lives in Texas"
        );
        assert_eq!(personalize("{{pronoun_lower}}", &u), "he");

        u.gender = Some(Gender::Female);
        assert_eq!(personalize("{{pronoun}}/{{pronoun_lower}}", &u), "She/she");

        u.gender = None;
        assert_eq!(personalize("{{pronoun}}", &u), "She");
    }

    #[test]
    fn test_unknown_tokens_left_alone() {
        let u = user("Sahil");
        assert_eq!(personalize("{{unknown}}", &u), "{{unknown}}");
        assert_eq!(personalize("{{ unknown }} {{name}}", &u), "{{ unknown }} Sahil");
        assert_eq!(personalize("{{}} {name} {{na-me}}", &u), "{{}} {name} {{na-me}}");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let u = user("Sahil");
        assert_eq!(personalize("[{{city}}][{{state}}]", &u), "[][]");
    }

    #[test]
    fn test_whitespace_and_case_insensitive() {
        let u = user("Sahil");
        assert_eq!(personalize("Hi {{  NAME }}!", &u), "Hi Sahil!");
        assert_eq!(personalize("Hi {{\tUser_Name\t}}", &u), "Hi Sahil");
    }

    #[test]
    fn test_html_variant_escapes_values_only() {
        let mut u = user("<b>Tom & \"Jerry\"");
        u.city = Some("O'Fallon".to_string());

        let out = personalize_html("<p>Hi {{name}} of {{city}}</p>", &u);
        assert!(out.starts_with("<p>Hi &lt;b&gt;Tom &amp; &quot;Jerry&quot; of O"));
        assert!(out.ends_with("Fallon</p>"));
        assert!(!out.contains("O'Fallon"));

        assert_eq!(
            personalize("<p>{{name}}</p>", &u),
            "<p><b>Tom & \"Jerry\"</p>"
        );
    }

    #[test]
    fn test_tokens_in_reports_distinct_tokens() {
        let tokens = tokens_in("{{name}} {{ city }} {{name}} {{favourite_color}}");
        assert_eq!(
            tokens,
            vec![
                TokenUsage {
                    token: "name".to_string(),
                    recognized: true
                },
                TokenUsage {
                    token: "city".to_string(),
                    recognized: true
                },
                TokenUsage {
                    token: "favourite_color".to_string(),
                    recognized: false
                },
            ]
        );
        assert!(tokens_in("no placeholders").is_empty());
    }

    #[test]
    fn test_tokens_in_ignores_case_differences() {
        let tokens = tokens_in("{{Name}} {{name}} {{ NAME }} {{Mystery}} {{mystery}}");
        let names: Vec<&str> = tokens.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(names, vec!["Name", "Mystery"]);
        assert!(tokens[0].recognized);
        assert!(!tokens[1].recognized);
    }
}
