use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::browser::session::{BrowsingProvider, PageId, ProviderLauncher};
use crate::detect::field_classifier::FieldAssignment;
use crate::error::HarnessError;
use crate::page::page_model::PageElementInventory;

/// Event dispatched after each value write so page-side validation sees it.
pub const VALUE_CHANGED_EVENT: &str = "input";

/// Request sent to the bridge script over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BridgeRequest<'a> {
    OpenPage {
        cmd: &'static str,
        #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
        user_agent: Option<&'a str>,
    },
    Navigate {
        cmd: &'static str,
        page: u64,
        url: &'a str,
        #[serde(rename = "timeoutMs")]
        timeout_ms: u64,
    },
    Inventory {
        cmd: &'static str,
        page: u64,
    },
    SetValues {
        cmd: &'static str,
        page: u64,
        values: &'a [FieldAssignment],
        event: &'static str,
    },
    Click {
        cmd: &'static str,
        page: u64,
        index: usize,
    },
    Wait {
        cmd: &'static str,
        page: u64,
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    ClosePage {
        cmd: &'static str,
        page: u64,
    },
    Quit {
        cmd: &'static str,
    },
}

impl<'a> BridgeRequest<'a> {
    pub fn open_page(user_agent: Option<&'a str>) -> Self {
        BridgeRequest::OpenPage { cmd: "open_page", user_agent }
    }

    pub fn navigate(page: PageId, url: &'a str, timeout: Duration) -> Self {
        BridgeRequest::Navigate {
            cmd: "navigate",
            page: page.0,
            url,
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    pub fn inventory(page: PageId) -> Self {
        BridgeRequest::Inventory { cmd: "inventory", page: page.0 }
    }

    pub fn set_values(page: PageId, values: &'a [FieldAssignment]) -> Self {
        BridgeRequest::SetValues {
            cmd: "set_values",
            page: page.0,
            values,
            event: VALUE_CHANGED_EVENT,
        }
    }

    pub fn click(page: PageId, index: usize) -> Self {
        BridgeRequest::Click { cmd: "click", page: page.0, index }
    }

    pub fn wait(page: PageId, duration: Duration) -> Self {
        BridgeRequest::Wait {
            cmd: "wait",
            page: page.0,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn close_page(page: PageId) -> Self {
        BridgeRequest::ClosePage { cmd: "close_page", page: page.0 }
    }

    pub fn quit() -> Self {
        BridgeRequest::Quit { cmd: "quit" }
    }
}

/// Response read from the bridge's stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BridgeResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub ready: Option<bool>,
}

impl BridgeResponse {
    /// Decode the `data` payload as a page inventory.
    pub fn into_inventory(self, command: &str) -> Result<PageElementInventory, HarnessError> {
        let data = self.data.ok_or_else(|| HarnessError::SessionProtocol {
            command: command.into(),
            error: "No inventory in response".into(),
        })?;
        serde_json::from_value(data).map_err(|e| HarnessError::JsonParse {
            context: format!("{} inventory", command),
            source: e,
        })
    }
}

/// Launches `node <script>` per Analyze/Create call.
#[derive(Debug, Clone)]
pub struct NodeBridgeLauncher {
    pub script: String,
    pub user_agent: Option<String>,
}

impl ProviderLauncher for NodeBridgeLauncher {
    fn launch(&self) -> Result<Box<dyn BrowsingProvider>, HarnessError> {
        let bridge = NodeBridge::launch(&self.script, self.user_agent.clone())?;
        Ok(Box::new(bridge))
    }
}

/// A long-lived Node.js process that keeps one headless browser open.
///
/// Commands go out as NDJSON on stdin; responses come back one line each on stdout.
pub struct NodeBridge {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    user_agent: Option<String>,
    closed: bool,
}

impl NodeBridge {
    pub fn launch(script: &str, user_agent: Option<String>) -> Result<Self, HarnessError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| HarnessError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| HarnessError::BridgeIo(format!("Failed to capture stdin of {}", script)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::BridgeIo(format!("Failed to capture stdout of {}", script)))?;

        let mut bridge = NodeBridge {
            child,
            stdin,
            reader: BufReader::new(stdout),
            user_agent,
            closed: false,
        };

        let ready = bridge.read_response("ready signal")?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(HarnessError::SessionProtocol {
                command: "launch".into(),
                error: ready
                    .error
                    .unwrap_or_else(|| format!("Did not receive ready signal from {}", script)),
            });
        }

        Ok(bridge)
    }

    fn read_response(&mut self, context: &str) -> Result<BridgeResponse, HarnessError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| HarnessError::BridgeIo(format!("Failed to read {}: {}", context, e)))?;

        if line.trim().is_empty() {
            return Err(HarnessError::BridgeIo(
                "Empty response from bridge (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| HarnessError::JsonParse {
            context: context.into(),
            source: e,
        })
    }

    fn send(&mut self, request: &BridgeRequest<'_>) -> Result<BridgeResponse, HarnessError> {
        let json = serde_json::to_string(request).map_err(|e| HarnessError::JsonSerialize {
            context: "BridgeRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| HarnessError::BridgeIo(format!("Failed to write to bridge stdin: {}", e)))?;

        self.read_response("bridge response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BridgeRequest<'_>, command: &str) -> Result<BridgeResponse, HarnessError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(HarnessError::SessionProtocol {
                command: command.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }
}

impl BrowsingProvider for NodeBridge {
    fn open_page(&mut self) -> Result<PageId, HarnessError> {
        let user_agent = self.user_agent.clone();
        let response = self.send_ok(&BridgeRequest::open_page(user_agent.as_deref()), "open_page")?;
        let page = response.page.ok_or_else(|| HarnessError::SessionProtocol {
            command: "open_page".into(),
            error: "No page id in response".into(),
        })?;
        debug!(page, "opened page");
        Ok(PageId(page))
    }

    fn navigate(
        &mut self,
        page: PageId,
        url: &str,
        timeout: Duration,
    ) -> Result<PageElementInventory, HarnessError> {
        let response = self.send(&BridgeRequest::navigate(page, url, timeout))?;
        if !response.ok {
            return Err(HarnessError::Navigation(
                response.error.unwrap_or_else(|| "Unknown error".into()),
            ));
        }
        response.into_inventory("navigate")
    }

    fn inventory(&mut self, page: PageId) -> Result<PageElementInventory, HarnessError> {
        self.send_ok(&BridgeRequest::inventory(page), "inventory")?
            .into_inventory("inventory")
    }

    fn set_values(&mut self, page: PageId, values: &[FieldAssignment]) -> Result<(), HarnessError> {
        self.send_ok(&BridgeRequest::set_values(page, values), "set_values")?;
        Ok(())
    }

    fn click(&mut self, page: PageId, index: usize) -> Result<(), HarnessError> {
        self.send_ok(&BridgeRequest::click(page, index), "click")?;
        Ok(())
    }

    fn wait(&mut self, page: PageId, duration: Duration) -> Result<(), HarnessError> {
        self.send_ok(&BridgeRequest::wait(page, duration), "wait")?;
        Ok(())
    }

    fn close_page(&mut self, page: PageId) {
        if let Err(e) = self.send_ok(&BridgeRequest::close_page(page), "close_page") {
            warn!(page = page.0, error = %e, "failed to close page");
        }
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // Process may already be gone
        let _ = self.send(&BridgeRequest::quit());
        let _ = self.child.wait();
    }
}

impl Drop for NodeBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}
