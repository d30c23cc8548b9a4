//! Document-level embedding context of the hub.

/// Where the hub's document lives relative to its parent.
///
/// Incorporation can be observed from the hub page itself or from a
/// proxy frame of the hub embedded in a medium. Only a frame whose
/// embedding document is the medium may acknowledge a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingContext {
    /// `window.location` of the hub document.
    pub location: String,
    /// `window.parent.location`; equal to `location` at top level.
    pub parent_location: String,
    /// `document.referrer` of the hub document.
    pub referrer: String,
}

impl EmbeddingContext {
    /// A hub document that is not framed.
    pub fn top_level(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            parent_location: location.clone(),
            referrer: String::new(),
            location,
        }
    }

    /// A hub document framed by `parent`, which is also the referrer.
    pub fn framed(location: impl Into<String>, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        Self {
            location: location.into(),
            referrer: parent.clone(),
            parent_location: parent,
        }
    }

    pub fn is_framed(&self) -> bool {
        self.location != self.parent_location
    }

    /// The referrer when framed, the hub's own location otherwise.
    pub fn document_url(&self) -> &str {
        if self.is_framed() {
            &self.referrer
        } else {
            &self.location
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_context_uses_referrer() {
        let ctx = EmbeddingContext::framed("http://hub", "http://a");
        assert!(ctx.is_framed());
        assert_eq!(ctx.document_url(), "http://a");
    }

    #[test]
    fn top_level_context_uses_own_location() {
        let ctx = EmbeddingContext::top_level("http://localhost/");
        assert!(!ctx.is_framed());
        assert_eq!(ctx.document_url(), "http://localhost/");
    }
}
