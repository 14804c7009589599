//! Error types for markup reading.

/// Error while reading a rendered page.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarkupError {
    /// The page could not be tokenized.
    #[error("markup parse error at byte {position}")]
    Parse {
        /// Byte offset where reading stopped.
        position: u64,
        /// Underlying tokenizer error.
        #[source]
        source: quick_xml::Error,
    },
}
