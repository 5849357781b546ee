use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use signup_harness::browser::session::{BrowsingProvider, PageId, ProviderLauncher};
use signup_harness::detect::field_classifier::FieldAssignment;
use signup_harness::error::HarnessError;
use signup_harness::page::page_model::PageElementInventory;

/// Everything the scripted browser was asked to do.
#[derive(Debug, Default)]
pub struct BrowserLog {
    pub launches: usize,
    pub opened: Vec<PageId>,
    pub closed: Vec<PageId>,
    pub navigations: Vec<(PageId, String, Duration)>,
    pub fills: Vec<(PageId, Vec<FieldAssignment>)>,
    pub clicks: Vec<(PageId, usize)>,
    pub waits: Vec<(PageId, Duration)>,
    pub shutdowns: usize,
}

pub type SharedLog = Rc<RefCell<BrowserLog>>;

/// Script for the in-memory browser. Page ids start at 1 and count opens.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub page: PageElementInventory,
    /// Page ids whose navigation fails.
    pub failing_navigations: Vec<u64>,
    /// Page ids whose set-values call fails.
    pub failing_fills: Vec<u64>,
    /// Opening this page id fails.
    pub fail_open_at: Option<u64>,
}

impl Script {
    pub fn serving(page: PageElementInventory) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }
}

pub struct ScriptedBrowser {
    log: SharedLog,
    script: Script,
    next_page: u64,
}

impl ScriptedBrowser {
    pub fn new(script: Script) -> (Self, SharedLog) {
        let log: SharedLog = Rc::new(RefCell::new(BrowserLog::default()));
        let browser = Self {
            log: log.clone(),
            script,
            next_page: 1,
        };
        (browser, log)
    }
}

impl BrowsingProvider for ScriptedBrowser {
    fn open_page(&mut self) -> Result<PageId, HarnessError> {
        let id = self.next_page;
        self.next_page += 1;
        if self.script.fail_open_at == Some(id) {
            return Err(HarnessError::SessionProtocol {
                command: "open_page".into(),
                error: "browser has disconnected".into(),
            });
        }
        self.log.borrow_mut().opened.push(PageId(id));
        Ok(PageId(id))
    }

    fn navigate(
        &mut self,
        page: PageId,
        url: &str,
        timeout: Duration,
    ) -> Result<PageElementInventory, HarnessError> {
        self.log
            .borrow_mut()
            .navigations
            .push((page, url.to_string(), timeout));
        if self.script.failing_navigations.contains(&page.0) {
            return Err(HarnessError::Navigation(format!(
                "Timeout {}ms exceeded",
                timeout.as_millis()
            )));
        }
        Ok(self.script.page.clone())
    }

    fn inventory(&mut self, _page: PageId) -> Result<PageElementInventory, HarnessError> {
        Ok(self.script.page.clone())
    }

    fn set_values(&mut self, page: PageId, values: &[FieldAssignment]) -> Result<(), HarnessError> {
        if self.script.failing_fills.contains(&page.0) {
            return Err(HarnessError::SessionProtocol {
                command: "set_values".into(),
                error: "Execution context was destroyed".into(),
            });
        }
        self.log.borrow_mut().fills.push((page, values.to_vec()));
        Ok(())
    }

    fn click(&mut self, page: PageId, index: usize) -> Result<(), HarnessError> {
        self.log.borrow_mut().clicks.push((page, index));
        Ok(())
    }

    fn wait(&mut self, page: PageId, duration: Duration) -> Result<(), HarnessError> {
        self.log.borrow_mut().waits.push((page, duration));
        Ok(())
    }

    fn close_page(&mut self, page: PageId) {
        self.log.borrow_mut().closed.push(page);
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shutdowns += 1;
    }
}

/// Launcher handing out `ScriptedBrowser`s that all write to one log.
pub struct ScriptedLauncher {
    log: SharedLog,
    script: Script,
    fail_launch: bool,
}

impl ScriptedLauncher {
    pub fn new(script: Script) -> (Self, SharedLog) {
        let log: SharedLog = Rc::new(RefCell::new(BrowserLog::default()));
        let launcher = Self {
            log: log.clone(),
            script,
            fail_launch: false,
        };
        (launcher, log)
    }

    pub fn failing() -> (Self, SharedLog) {
        let (mut launcher, log) = Self::new(Script::default());
        launcher.fail_launch = true;
        (launcher, log)
    }
}

impl ProviderLauncher for ScriptedLauncher {
    fn launch(&self) -> Result<Box<dyn BrowsingProvider>, HarnessError> {
        self.log.borrow_mut().launches += 1;
        if self.fail_launch {
            return Err(HarnessError::SubprocessSpawn {
                script: "browser_bridge.js".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "node not found"),
            });
        }
        Ok(Box::new(ScriptedBrowser {
            log: self.log.clone(),
            script: self.script.clone(),
            next_page: 1,
        }))
    }
}
