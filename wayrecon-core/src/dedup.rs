use indexmap::IndexSet;

/// URLs already seen during one domain's harvest, in first-seen order.
///
/// Membership is exact string equality; nothing is normalized.
#[derive(Debug, Default)]
pub struct SeenSet {
    urls: IndexSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `url` if it is new. Returns false for repeats and for the empty string.
    pub fn try_add(&mut self, url: &str) -> bool {
        if url.is_empty() || self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// URLs in the order they were first added
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
