use regex_lite::Regex;
use roster_protocol::RemoteModelDescriptor;

/// Patterns for catalog entries that cannot hold a chat conversation
/// (speech-to-text and text-to-speech models).
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["whisper", "tts"];

/// Decides which remote descriptors never reach the picker.
pub trait ExclusionRule: Send + Sync {
    fn excludes(&self, descriptor: &RemoteModelDescriptor) -> bool;
}

impl<F> ExclusionRule for F
where
    F: Fn(&RemoteModelDescriptor) -> bool + Send + Sync,
{
    fn excludes(&self, descriptor: &RemoteModelDescriptor) -> bool {
        self(descriptor)
    }
}

/// Excludes descriptors whose id matches any of a set of regular expressions.
#[derive(Debug, Clone, Default)]
pub struct PatternExclusion {
    patterns: Vec<Regex>,
}

impl PatternExclusion {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex_lite::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A rule that keeps everything.
    pub fn none() -> Self {
        Self::default()
    }
}

impl ExclusionRule for PatternExclusion {
    fn excludes(&self, descriptor: &RemoteModelDescriptor) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.is_match(&descriptor.id))
    }
}
