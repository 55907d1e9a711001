//! Request URL rewriting for navigation, sort and export links.
//!
//! Links keep every unrelated query parameter exactly as the request sent
//! it. [`RequestUrl`] therefore stores the raw `name=value` segments and
//! only decodes parameter names to match them; new values are
//! form-urlencoded.

use std::fmt;

use ::url::form_urlencoded;

/// Path and query of the current request.
///
/// ```
/// use folio::RequestUrl;
///
/// let url = RequestUrl::parse("/products?foo=1&page=2");
/// assert_eq!(url.with_param("page", "5").to_string(), "/products?foo=1&page=5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestUrl {
    path: String,
    segments: Vec<String>,
}

impl RequestUrl {
    /// Builds a URL from a path and an optional raw query string.
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        RequestUrl {
            path: path.into(),
            segments: query
                .unwrap_or_default()
                .split('&')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Splits `raw` at the first `?`. A fragment, if any, is dropped.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or_default();
        match raw.split_once('?') {
            Some((path, query)) => RequestUrl::new(path, Some(query)),
            None => RequestUrl::new(raw, None),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> String {
        self.segments.join("&")
    }

    /// First decoded value of parameter `name`.
    pub fn param(&self, name: &str) -> Option<String> {
        self.segments.iter().find_map(|segment| {
            form_urlencoded::parse(segment.as_bytes())
                .next()
                .filter(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        })
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.segments.iter().any(|segment| segment_name(segment) == name)
    }

    /// Sets `name` to `value`, replacing the first occurrence in place and
    /// dropping any other; appends it when absent.
    pub fn with_param(&self, name: &str, value: &str) -> RequestUrl {
        let replacement = encode_pair(name, value);
        let mut replaced = false;
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        for segment in &self.segments {
            if segment_name(segment) != name {
                segments.push(segment.clone());
            } else if !replaced {
                segments.push(replacement.clone());
                replaced = true;
            }
        }
        if !replaced {
            segments.push(replacement);
        }
        RequestUrl {
            path: self.path.clone(),
            segments,
        }
    }

    /// Appends `name=value` without touching existing parameters.
    pub fn with_appended(&self, name: &str, value: &str) -> RequestUrl {
        let mut url = self.clone();
        url.segments.push(encode_pair(name, value));
        url
    }

    /// Removes every occurrence of the given parameters.
    pub fn without_params(&self, names: &[&str]) -> RequestUrl {
        RequestUrl {
            path: self.path.clone(),
            segments: self
                .segments
                .iter()
                .filter(|segment| !names.contains(&segment_name(segment).as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.segments.is_empty() {
            write!(f, "?{}", self.query())?;
        }
        Ok(())
    }
}

fn segment_name(segment: &str) -> String {
    let raw = segment.split('=').next().unwrap_or_default();
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

fn encode_pair(name: &str, value: &str) -> String {
    format!("{}={}", encode(name), encode(value))
}

fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_query() {
        let url = RequestUrl::parse("/list?a=1&&b=two%20words#top");
        assert_eq!(url.path(), "/list");
        assert_eq!(url.query(), "a=1&b=two%20words");
        assert_eq!(url.param("b").as_deref(), Some("two words"));
        assert_eq!(url.param("c"), None);
        assert!(url.has_param("a"));
    }

    #[test]
    fn replaces_page_in_place() {
        let url = RequestUrl::parse("/p?page=2&foo=1");
        assert_eq!(url.with_param("page", "5").to_string(), "/p?page=5&foo=1");
    }

    #[test]
    fn appends_missing_param() {
        let url = RequestUrl::parse("/p");
        assert_eq!(url.with_param("page", "0").to_string(), "/p?page=0");

        let url = RequestUrl::parse("/p?foo=1");
        assert_eq!(url.with_param("page", "3").to_string(), "/p?foo=1&page=3");
    }

    #[test]
    fn drops_duplicate_occurrences() {
        let url = RequestUrl::parse("/p?page=1&x=y&page=7");
        assert_eq!(url.with_param("page", "2").to_string(), "/p?page=2&x=y");
    }

    #[test]
    fn preserves_unrelated_raw_segments() {
        let url = RequestUrl::parse("/p?q=caf%C3%A9+cr%C3%A8me&flag&page=1");
        assert_eq!(
            url.with_param("page", "4").query(),
            "q=caf%C3%A9+cr%C3%A8me&flag&page=4"
        );
    }

    #[test]
    fn similar_names_are_not_confused() {
        let url = RequestUrl::parse("/p?subpage=3&page=1");
        assert_eq!(url.with_param("page", "2").query(), "subpage=3&page=2");
        assert_eq!(
            url.without_params(&["page"]).query(),
            "subpage=3"
        );
    }

    #[test]
    fn encodes_new_values() {
        let url = RequestUrl::parse("/p");
        assert_eq!(
            url.with_appended("sort", "a b&c").query(),
            "sort=a+b%26c"
        );
    }
}
