//! Shared application state for handlers.

use crate::error::Result;
use crate::templates::Page;
use std::sync::Arc;
use vidtrend_history::Repository;
use vidtrend_source::{Category, Credential, Region, SourceHandle};

/// Cheap to clone; every handler gets its own copy.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    repo: Repository,
    source: SourceHandle,
    credential: Option<Credential>,
    region: Region,
    category: Category,
    page: Page,
}

impl AppState {
    /// Compiles the page template, so fails if it is broken.
    ///
    /// `credential` is used when a refresh request doesn't carry its own.
    pub fn new(
        repo: Repository,
        source: SourceHandle,
        credential: Option<Credential>,
        region: Region,
        category: Category,
    ) -> Result<Self> {
        let inner = Inner { repo, source, credential, region, category, page: Page::load()? };
        Ok(Self { inner: Arc::new(inner) })
    }

    pub fn repo(&self) -> &Repository {
        &self.inner.repo
    }

    pub fn source(&self) -> &SourceHandle {
        &self.inner.source
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.inner.credential.as_ref()
    }

    pub fn default_region(&self) -> Region {
        self.inner.region
    }

    pub fn default_category(&self) -> Category {
        self.inner.category
    }

    pub fn page(&self) -> &Page {
        &self.inner.page
    }
}
