use explorer_core::ExplorerConfig;

use crate::cache::FileNameCache;
use crate::decoder::{ContentDecoder, PdfTextExtractor};

/// Shared state injected into every tool: configuration, the filename cache,
/// and the content decoder. Owned behind an `Arc` by the executor; nothing
/// here is ambient or global.
pub struct ExplorerContext {
    pub config: ExplorerConfig,
    pub cache: FileNameCache,
    pub decoder: ContentDecoder,
}

impl ExplorerContext {
    pub fn new(config: ExplorerConfig) -> Self {
        let decoder = ContentDecoder::new(&config);
        Self {
            config,
            cache: FileNameCache::new(),
            decoder,
        }
    }

    /// Swap in a real PDF extractor (the default reports extraction as
    /// unavailable).
    pub fn with_pdf_extractor(
        config: ExplorerConfig,
        extractor: Box<dyn PdfTextExtractor>,
    ) -> Self {
        let decoder = ContentDecoder::with_pdf_extractor(&config, extractor);
        Self {
            config,
            cache: FileNameCache::new(),
            decoder,
        }
    }
}
