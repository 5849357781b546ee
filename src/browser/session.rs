use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detect::field_classifier::FieldAssignment;
use crate::error::HarnessError;
use crate::page::page_model::PageElementInventory;

/// Handle for one isolated page (own cookies and storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u64);

/// Rendering engine seen from the core: pages are opened, driven with
/// declarative commands and closed again.
pub trait BrowsingProvider {
    /// Open a fresh page in its own browser context.
    fn open_page(&mut self) -> Result<PageId, HarnessError>;

    /// Load `url`, wait for network idle (bounded by `timeout`) and report the page.
    fn navigate(
        &mut self,
        page: PageId,
        url: &str,
        timeout: Duration,
    ) -> Result<PageElementInventory, HarnessError>;

    /// Re-scan the live DOM of an already loaded page.
    fn inventory(&mut self, page: PageId) -> Result<PageElementInventory, HarnessError>;

    /// Write each value and raise an `input` event on the element.
    fn set_values(&mut self, page: PageId, values: &[FieldAssignment]) -> Result<(), HarnessError>;

    /// Click the action at `index` of the latest inventory.
    fn click(&mut self, page: PageId, index: usize) -> Result<(), HarnessError>;

    /// Let the page run for `duration`.
    fn wait(&mut self, page: PageId, duration: Duration) -> Result<(), HarnessError>;

    /// Best-effort; never fails.
    fn close_page(&mut self, page: PageId);

    /// Release the whole provider. Best-effort; never fails.
    fn shutdown(&mut self);
}

/// Starts a provider for one Analyze or Create call.
pub trait ProviderLauncher {
    fn launch(&self) -> Result<Box<dyn BrowsingProvider>, HarnessError>;
}

/// Closes its page when dropped, whatever path the attempt took.
pub struct PageGuard<'a, P: BrowsingProvider + ?Sized> {
    provider: &'a mut P,
    page: PageId,
}

impl<'a, P: BrowsingProvider + ?Sized> PageGuard<'a, P> {
    pub fn open(provider: &'a mut P) -> Result<Self, HarnessError> {
        let page = provider.open_page()?;
        Ok(Self { provider, page })
    }

    pub fn id(&self) -> PageId {
        self.page
    }

    pub fn navigate(&mut self, url: &str, timeout: Duration) -> Result<PageElementInventory, HarnessError> {
        self.provider.navigate(self.page, url, timeout)
    }

    pub fn inventory(&mut self) -> Result<PageElementInventory, HarnessError> {
        self.provider.inventory(self.page)
    }

    pub fn set_values(&mut self, values: &[FieldAssignment]) -> Result<(), HarnessError> {
        self.provider.set_values(self.page, values)
    }

    pub fn click(&mut self, index: usize) -> Result<(), HarnessError> {
        self.provider.click(self.page, index)
    }

    pub fn wait(&mut self, duration: Duration) -> Result<(), HarnessError> {
        self.provider.wait(self.page, duration)
    }
}

impl<P: BrowsingProvider + ?Sized> Drop for PageGuard<'_, P> {
    fn drop(&mut self) {
        self.provider.close_page(self.page);
    }
}

/// Shuts the provider down when dropped.
pub struct ProviderGuard {
    provider: Box<dyn BrowsingProvider>,
}

impl ProviderGuard {
    pub fn new(provider: Box<dyn BrowsingProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&mut self) -> &mut dyn BrowsingProvider {
        self.provider.as_mut()
    }
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        self.provider.shutdown();
    }
}
