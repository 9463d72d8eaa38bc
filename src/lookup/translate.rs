use anyhow::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Language the service detected, when it reports one.
    pub detected_source: Option<String>,
}

/// Online translation used when the local dictionary has no entry.
///
/// `None` languages let the implementation pick (auto-detect / its default target).
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Translation>;
}
