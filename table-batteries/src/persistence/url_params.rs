//! URL query parameter store standing in for the browser location

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use url::Url;
use url::form_urlencoded;

use crate::error::TableError;

const DEFAULT_BASE: &str = "http://localhost/";

#[derive(Debug, Clone)]
struct Location {
    base: String,
    pairs: Vec<(String, String)>,
    fragment: Option<String>,
}

impl Location {
    fn parse(href: &str) -> Result<Self, TableError> {
        let mut url = Url::parse(href).map_err(|e| TableError::invalid_url(href, e))?;
        let pairs = url.query_pairs().into_owned().collect();
        let fragment = url.fragment().map(str::to_owned);
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            base: url.to_string(),
            pairs,
            fragment,
        })
    }

    fn href(&self) -> String {
        let mut href = self.base.clone();
        if !self.pairs.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.pairs)
                .finish();
            href.push('?');
            href.push_str(&query);
        }
        if let Some(fragment) = &self.fragment {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }

    fn set(&mut self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                let mut seen = false;
                self.pairs.retain_mut(|(k, v)| {
                    if k.as_str() != key {
                        return true;
                    }
                    if seen {
                        return false;
                    }
                    seen = true;
                    *v = value.to_string();
                    true
                });
                if !seen {
                    self.pairs.push((key.to_string(), value.to_string()));
                }
            }
            None => self.pairs.retain(|(k, _)| k.as_str() != key),
        }
    }
}

/// Shared handle onto the current location's query parameters.
///
/// Clones point at the same location, so every table built from one
/// [`super::PersistenceContext`] sees the others' writes. Writes merge into
/// the existing query and leave unrelated parameters untouched.
///
/// # Example
///
/// ```
/// use table_batteries::persistence::UrlParams;
///
/// let params = UrlParams::new("https://example.com/things?tab=2").unwrap();
/// params.set_many([("pageNumber", Some("3".to_string()))]);
/// assert_eq!(params.href(), "https://example.com/things?tab=2&pageNumber=3");
/// ```
#[derive(Debug, Clone)]
pub struct UrlParams {
    location: Arc<RwLock<Location>>,
}

impl UrlParams {
    /// Creates a store positioned at `href`.
    pub fn new(href: &str) -> Result<Self, TableError> {
        Ok(Self {
            location: Arc::new(RwLock::new(Location::parse(href)?)),
        })
    }

    /// Returns the first value of `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        let location = self.location.read().unwrap_or_else(PoisonError::into_inner);
        location
            .pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Sets or removes several parameters in one navigation.
    ///
    /// `None` removes the parameter.
    pub fn set_many<K, I>(&self, params: I)
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Option<String>)>,
    {
        let mut location = self.location.write().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in params {
            location.set(key.as_ref(), value.as_deref());
        }
        log::trace!("url params: navigated to {}", location.href());
    }

    /// Returns the full current URL.
    pub fn href(&self) -> String {
        self.location
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .href()
    }

    /// Replaces the location, as browser navigation or history traversal does.
    pub fn navigate(&self, href: &str) -> Result<(), TableError> {
        let next = Location::parse(href)?;
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = next;
        log::debug!("url params: navigated to {href}");
        Ok(())
    }
}

impl Default for UrlParams {
    fn default() -> Self {
        Self {
            location: Arc::new(RwLock::new(Location {
                base: DEFAULT_BASE.to_string(),
                pairs: Vec::new(),
                fragment: None,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_many_merges_with_existing_query() {
        let params = UrlParams::new("https://example.com/list?tab=users#top").unwrap();
        params.set_many([
            ("sortColumn", Some("name".to_string())),
            ("sortDirection", Some("asc".to_string())),
        ]);
        assert_eq!(params.get("tab").as_deref(), Some("users"));
        assert_eq!(params.get("sortColumn").as_deref(), Some("name"));
        assert_eq!(
            params.href(),
            "https://example.com/list?tab=users&sortColumn=name&sortDirection=asc#top"
        );
    }

    #[test]
    fn test_none_removes_param() {
        let params = UrlParams::new("https://example.com/?filters=x&tab=1").unwrap();
        params.set_many([("filters", None::<String>)]);
        assert!(params.get("filters").is_none());
        assert_eq!(params.href(), "https://example.com/?tab=1");
    }

    #[test]
    fn test_set_replaces_duplicates() {
        let params = UrlParams::new("https://example.com/?a=1&b=2&a=3").unwrap();
        params.set_many([("a", Some("9".to_string()))]);
        assert_eq!(params.href(), "https://example.com/?a=9&b=2");
    }

    #[test]
    fn test_values_are_encoded() {
        let params = UrlParams::default();
        params.set_many([("filters", Some(r#"{"name":["a b"]}"#.to_string()))]);
        let reparsed = UrlParams::new(&params.href()).unwrap();
        assert_eq!(reparsed.get("filters").as_deref(), Some(r#"{"name":["a b"]}"#));
    }

    #[test]
    fn test_navigate_rejects_invalid_href() {
        let params = UrlParams::default();
        assert!(matches!(
            params.navigate("::not a url"),
            Err(TableError::InvalidUrl { .. })
        ));
        assert_eq!(params.href(), "http://localhost/");
    }

    #[test]
    fn test_clones_share_location() {
        let params = UrlParams::default();
        let other = params.clone();
        other.navigate("http://localhost/?pageNumber=2").unwrap();
        assert_eq!(params.get("pageNumber").as_deref(), Some("2"));
    }
}
