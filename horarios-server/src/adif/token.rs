//! `p_p_auth` token extraction from station landing pages.
//!
//! The portal embeds a short-lived token in its HTML and requires it on the
//! schedule POST. Where exactly it appears depends on the markup of the day,
//! so extraction is a chain of [`TokenLocator`]s tried in order. Supporting a
//! new markup variant means adding a locator, not touching the adapter.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Name of the token parameter in the portal's URLs and forms.
pub const TOKEN_PARAM: &str = "p_p_auth";

/// Maximum accepted token length.
const MAX_LEN: usize = 64;

static QUERY_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"p_p_auth=([A-Za-z0-9_-]+)").expect("token pattern is a valid regex")
});

static TOKEN_INPUT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"input[name="p_p_auth"]"#).expect("input selector is valid")
});

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// An ephemeral `p_p_auth` authorization token.
///
/// Only valid for the POST that immediately follows the page load that
/// produced it. `Debug` redacts the value so tokens don't end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Accept 1-64 characters of ASCII alphanumerics, `-` and `_`.
    pub fn parse(s: &str) -> Option<Self> {
        let valid = !s.is_empty()
            && s.len() <= MAX_LEN
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| AuthToken(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(<{} chars>)", self.0.len())
    }
}

/// A strategy for finding the token in a landing page.
pub trait TokenLocator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return the first token this strategy finds, if any.
    fn locate(&self, html: &str) -> Option<AuthToken>;
}

/// Scans the raw body for a `p_p_auth=<token>` query-string fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFragmentLocator;

impl TokenLocator for QueryFragmentLocator {
    fn name(&self) -> &'static str {
        "query-fragment"
    }

    fn locate(&self, html: &str) -> Option<AuthToken> {
        QUERY_FRAGMENT
            .captures_iter(html)
            .find_map(|caps| AuthToken::parse(&caps[1]))
    }
}

/// Reads the value of a hidden `<input name="p_p_auth">`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenInputLocator;

impl TokenLocator for HiddenInputLocator {
    fn name(&self) -> &'static str {
        "hidden-input"
    }

    fn locate(&self, html: &str) -> Option<AuthToken> {
        let document = Html::parse_document(html);
        document
            .select(&TOKEN_INPUT)
            .filter(|input| {
                input
                    .value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
            })
            .find_map(|input| input.value().attr("value").and_then(AuthToken::parse))
    }
}

/// Looks for a `p_p_auth` query parameter in anchor `href`s.
///
/// Unlike [`QueryFragmentLocator`] this decodes the query string, so it also
/// catches percent-encoded parameter names.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorHrefLocator;

impl TokenLocator for AnchorHrefLocator {
    fn name(&self) -> &'static str {
        "anchor-href"
    }

    fn locate(&self, html: &str) -> Option<AuthToken> {
        let document = Html::parse_document(html);
        document
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .find_map(token_from_href)
    }
}

/// Pull `p_p_auth` out of an href's query string.
fn token_from_href(href: &str) -> Option<AuthToken> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TOKEN_PARAM)
        .and_then(|(_, value)| AuthToken::parse(&value))
}

/// Ordered set of locators; the first match wins.
pub struct TokenChain {
    locators: Vec<Box<dyn TokenLocator>>,
}

impl TokenChain {
    /// Create a chain from explicit locators.
    pub fn new(locators: Vec<Box<dyn TokenLocator>>) -> Self {
        Self { locators }
    }

    /// Query-fragment scan, then hidden input, then anchor hrefs.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(QueryFragmentLocator),
            Box::new(HiddenInputLocator),
            Box::new(AnchorHrefLocator),
        ])
    }

    /// Append a locator to the end of the chain.
    pub fn with_locator(mut self, locator: impl TokenLocator + 'static) -> Self {
        self.locators.push(Box::new(locator));
        self
    }

    /// Run each locator in order, returning the token and the name of the
    /// locator that found it.
    pub fn locate(&self, html: &str) -> Option<(AuthToken, &'static str)> {
        self.locators
            .iter()
            .find_map(|locator| locator.locate(html).map(|token| (token, locator.name())))
    }

    /// Names of the locators, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.locators.iter().map(|l| l.name()).collect()
    }
}

impl Default for TokenChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for TokenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenChain")
            .field("locators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK_PAGE: &str = r#"<html><body>
        <a href="/w/13200-bilbao-abando?p_p_id=servicios_estacion_ServiciosEstacionPortlet&amp;p_p_auth=Xy7_ab-9">Horarios</a>
        </body></html>"#;

    const HIDDEN_INPUT_PAGE: &str = r#"<html><body>
        <form action="/w/13200">
          <input type="hidden" name="p_p_auth" value="hIdd3n">
          <input type="text" name="q" value="">
        </form>
        </body></html>"#;

    const ENCODED_HREF_PAGE: &str = r#"<html><body>
        <a href="/w/13200?p_p%5Fauth=enc0ded#top">Salidas</a>
        </body></html>"#;

    const NO_TOKEN_PAGE: &str = r#"<html><body><p>Estación Bilbao-Abando</p></body></html>"#;

    #[test]
    fn auth_token_validation() {
        assert!(AuthToken::parse("aB3_-x").is_some());
        assert!(AuthToken::parse("").is_none());
        assert!(AuthToken::parse("a b").is_none());
        assert!(AuthToken::parse("a&b").is_none());
        assert!(AuthToken::parse(&"a".repeat(MAX_LEN + 1)).is_none());
    }

    #[test]
    fn auth_token_debug_is_redacted() {
        let token = AuthToken::parse("secret123").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret123"));
        assert_eq!(debug, "AuthToken(<9 chars>)");
    }

    #[test]
    fn query_fragment_finds_token_in_link() {
        let token = QueryFragmentLocator.locate(LINK_PAGE).unwrap();
        assert_eq!(token.as_str(), "Xy7_ab-9");
    }

    #[test]
    fn query_fragment_finds_token_in_script() {
        let html = r#"<script>var url = "/w/13200?p_p_auth=scr1pt&p_p_lifecycle=2";</script>"#;
        let token = QueryFragmentLocator.locate(html).unwrap();
        assert_eq!(token.as_str(), "scr1pt");
    }

    #[test]
    fn query_fragment_misses_hidden_input() {
        assert!(QueryFragmentLocator.locate(HIDDEN_INPUT_PAGE).is_none());
    }

    #[test]
    fn hidden_input_reads_value() {
        let token = HiddenInputLocator.locate(HIDDEN_INPUT_PAGE).unwrap();
        assert_eq!(token.as_str(), "hIdd3n");
    }

    #[test]
    fn hidden_input_type_is_case_insensitive() {
        let html = r#"<input TYPE="Hidden" name="p_p_auth" value="upper">"#;
        let token = HiddenInputLocator.locate(html).unwrap();
        assert_eq!(token.as_str(), "upper");
    }

    #[test]
    fn hidden_input_ignores_visible_fields() {
        let html = r#"<input type="text" name="p_p_auth" value="visible">"#;
        assert!(HiddenInputLocator.locate(html).is_none());
    }

    #[test]
    fn anchor_href_reads_query_parameter() {
        let token = AnchorHrefLocator.locate(LINK_PAGE).unwrap();
        assert_eq!(token.as_str(), "Xy7_ab-9");
    }

    #[test]
    fn anchor_href_decodes_parameter_name() {
        assert!(QueryFragmentLocator.locate(ENCODED_HREF_PAGE).is_none());
        let token = AnchorHrefLocator.locate(ENCODED_HREF_PAGE).unwrap();
        assert_eq!(token.as_str(), "enc0ded");
    }

    #[test]
    fn token_from_href_without_query() {
        assert!(token_from_href("/w/13200").is_none());
        assert!(token_from_href("/w/13200?p_p_id=x").is_none());
    }

    #[test]
    fn chain_reports_matching_locator() {
        let chain = TokenChain::standard();

        let (token, name) = chain.locate(LINK_PAGE).unwrap();
        assert_eq!(token.as_str(), "Xy7_ab-9");
        assert_eq!(name, "query-fragment");

        let (token, name) = chain.locate(HIDDEN_INPUT_PAGE).unwrap();
        assert_eq!(token.as_str(), "hIdd3n");
        assert_eq!(name, "hidden-input");

        let (token, name) = chain.locate(ENCODED_HREF_PAGE).unwrap();
        assert_eq!(token.as_str(), "enc0ded");
        assert_eq!(name, "anchor-href");
    }

    #[test]
    fn chain_first_match_wins() {
        let html = r#"<html><body>
            <script>var u = "?p_p_auth=fromScript";</script>
            <input type="hidden" name="p_p_auth" value="fromInput">
            </body></html>"#;
        let (token, name) = TokenChain::standard().locate(html).unwrap();
        assert_eq!(token.as_str(), "fromScript");
        assert_eq!(name, "query-fragment");
    }

    #[test]
    fn chain_without_token() {
        assert!(TokenChain::standard().locate(NO_TOKEN_PAGE).is_none());
        assert!(TokenChain::standard().locate("").is_none());
    }

    #[test]
    fn chain_accepts_custom_locators() {
        struct MetaLocator;

        impl TokenLocator for MetaLocator {
            fn name(&self) -> &'static str {
                "meta"
            }

            fn locate(&self, html: &str) -> Option<AuthToken> {
                let start = html.find("data-auth=\"")? + "data-auth=\"".len();
                let end = html[start..].find('"')? + start;
                AuthToken::parse(&html[start..end])
            }
        }

        let chain = TokenChain::standard().with_locator(MetaLocator);
        assert_eq!(
            chain.names(),
            vec!["query-fragment", "hidden-input", "anchor-href", "meta"]
        );

        let (token, name) = chain.locate(r#"<div data-auth="m3ta"></div>"#).unwrap();
        assert_eq!(token.as_str(), "m3ta");
        assert_eq!(name, "meta");
    }
}
