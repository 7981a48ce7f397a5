/*
 * Responsibility
 * - Find the bearer credential in a request (query / Authorization header / cookie)
 * - Sources are tried in the configured order; the first non-empty value wins
 * - "Not found" is `None`, it only becomes an error in the verifier
 */
use axum::http::{header, request::Parts};

/// Name used for both the query parameter and the cookie unless configured otherwise.
pub const DEFAULT_TOKEN_NAME: &str = "jwt";

/// Custom extraction strategy. Must not have side effects.
pub type ExtractFn = fn(&Parts) -> Option<String>;

/// One place a credential may be carried in.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// `?<name>=<token>`
    Query(String),
    /// `Authorization: Bearer <token>` (scheme is case-insensitive)
    Header,
    /// `Cookie: <name>=<token>`
    Cookie(String),
    Custom(ExtractFn),
}

impl TokenSource {
    pub fn extract(&self, parts: &Parts) -> Option<String> {
        let found = match self {
            Self::Query(name) => from_query(parts, name),
            Self::Header => from_authorization(parts),
            Self::Cookie(name) => from_cookie(parts, name),
            Self::Custom(extract) => extract(parts),
        };
        found.filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct Locator {
    sources: Vec<TokenSource>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::with_name(DEFAULT_TOKEN_NAME)
    }
}

impl Locator {
    pub fn new(sources: Vec<TokenSource>) -> Self {
        Self { sources }
    }

    /// Query parameter, then `Authorization` header, then cookie, all using `name`.
    pub fn with_name(name: &str) -> Self {
        Self::new(vec![
            TokenSource::Query(name.to_string()),
            TokenSource::Header,
            TokenSource::Cookie(name.to_string()),
        ])
    }

    pub fn sources(&self) -> &[TokenSource] {
        &self.sources
    }

    pub fn locate(&self, parts: &Parts) -> Option<String> {
        self.sources.iter().find_map(|source| source.extract(parts))
    }
}

fn from_query(parts: &Parts, name: &str) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn from_authorization(parts: &Parts) -> Option<String> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
}

fn from_cookie(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.trim_matches('"').to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri(uri);
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn query_wins_over_header_and_cookie() {
        let p = parts(
            "/x?jwt=from-query",
            &[
                ("authorization", "Bearer from-header"),
                ("cookie", "jwt=from-cookie"),
            ],
        );
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("from-query"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let p = parts(
            "/x",
            &[
                ("authorization", "Bearer from-header"),
                ("cookie", "jwt=from-cookie"),
            ],
        );
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_is_last_resort() {
        let p = parts("/x", &[("cookie", "theme=dark; jwt=from-cookie")]);
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn empty_query_value_falls_through() {
        let p = parts("/x?jwt=", &[("authorization", "Bearer from-header")]);
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("from-header"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let p = parts("/x", &[("authorization", "BEARER abc")]);
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("abc"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let p = parts("/x", &[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(Locator::default().locate(&p), None);
    }

    #[test]
    fn nothing_found_is_none() {
        let p = parts("/x?other=1", &[("cookie", "session=1")]);
        assert_eq!(Locator::default().locate(&p), None);
    }

    #[test]
    fn no_sources_never_finds_anything() {
        let p = parts("/x?jwt=abc", &[("authorization", "Bearer abc")]);
        assert_eq!(Locator::new(Vec::new()).locate(&p), None);
    }

    #[test]
    fn custom_name_and_order() {
        let locator = Locator::new(vec![
            TokenSource::Cookie("access".into()),
            TokenSource::Query("access".into()),
        ]);
        let p = parts("/x?access=q", &[("cookie", "access=c")]);
        assert_eq!(locator.locate(&p).as_deref(), Some("c"));
    }

    #[test]
    fn custom_strategy_is_consulted_in_order() {
        fn api_key(parts: &Parts) -> Option<String> {
            parts
                .headers
                .get("x-api-token")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        }

        let locator = Locator::new(vec![TokenSource::Custom(api_key), TokenSource::Header]);
        let p = parts(
            "/x",
            &[("x-api-token", "custom"), ("authorization", "Bearer header")],
        );
        assert_eq!(locator.locate(&p).as_deref(), Some("custom"));
    }

    #[test]
    fn query_value_is_percent_decoded() {
        let p = parts("/x?jwt=a%2Eb%2Ec", &[]);
        assert_eq!(Locator::default().locate(&p).as_deref(), Some("a.b.c"));
    }
}
