use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use alloy::primitives::{address, Address};
use serde_json::Value;
use tracing::{debug, warn};

use bridge_ui_core::{parse_chain_id, PortError, ProviderEvent, ProviderPort};

#[cfg(not(target_arch = "wasm32"))]
use crate::BridgeAdapterConfig;

/// Floor for the proxy poll interval so a zero setting cannot spin the poller.
#[cfg(not(target_arch = "wasm32"))]
const MIN_PROXY_POLL_MS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Eip1193Provider {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
pub(crate) enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

impl ProviderMode {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ProviderMode::Disabled(_) => "disabled",
            ProviderMode::Deterministic => "deterministic",
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => "proxy",
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => "injected",
        }
    }
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) struct ProxyRuntime {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    poll_interval: Duration,
}

#[cfg(not(target_arch = "wasm32"))]
impl ProxyRuntime {
    pub(crate) fn new(base_url: &str, config: &BridgeAdapterConfig) -> Result<Self, PortError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.proxy_timeout_ms))
            .build()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy client init failed: {e}")))?;
        Ok(Self {
            base_url: base_url.to_owned(),
            api_key: config.relay_api_key.clone(),
            client,
            poll_interval: Duration::from_millis(config.proxy_poll_interval_ms.max(MIN_PROXY_POLL_MS)),
        })
    }
}

#[derive(Debug)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: Option<u64>,
    network_id: Option<u64>,
    expose_chain_id_field: bool,
    listening: bool,
    closed: bool,
    events: VecDeque<ProviderEvent>,
    #[cfg(not(target_arch = "wasm32"))]
    poller_running: bool,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec![address!("1000000000000000000000000000000000000001")],
            chain_id: Some(5),
            network_id: Some(5),
            expose_chain_id_field: true,
            listening: false,
            closed: false,
            events: VecDeque::new(),
            #[cfg(not(target_arch = "wasm32"))]
            poller_running: false,
        }
    }
}

impl ProviderState {
    /// Live runtimes start blank and learn everything from the wallet.
    fn blank() -> Self {
        Self {
            accounts: Vec::new(),
            chain_id: None,
            network_id: None,
            ..Self::default()
        }
    }

    fn record(&mut self, event: ProviderEvent) {
        match &event {
            ProviderEvent::AccountsChanged(accounts) => self.accounts = accounts.clone(),
            ProviderEvent::ChainChanged(raw) => {
                if let Ok(id) = parse_chain_id(raw) {
                    self.chain_id = Some(id);
                }
            }
            ProviderEvent::NetworkChanged(raw) => {
                if let Ok(id) = parse_chain_id(raw) {
                    self.network_id = Some(id);
                }
            }
            ProviderEvent::Disconnect | ProviderEvent::Close => {}
        }
        if self.listening {
            self.events.push_back(event);
        } else {
            debug!(?event, "no listeners registered; event dropped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
struct BrowserHooks {
    registered: Vec<(
        &'static str,
        wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>,
    )>,
}

#[cfg(target_arch = "wasm32")]
const BROWSER_EVENTS: [&str; 5] = [
    "accountsChanged",
    "chainChanged",
    "networkChanged",
    "disconnect",
    "close",
];

impl Default for Eip1193Provider {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl Eip1193Provider {
    /// In-memory provider with a fixed account on Goerli.
    pub fn deterministic() -> Self {
        Self::with_mode(ProviderMode::Deterministic)
    }

    pub(crate) fn with_mode(mode: ProviderMode) -> Self {
        let state = match mode {
            ProviderMode::Deterministic => ProviderState::default(),
            _ => ProviderState::blank(),
        };
        Self {
            mode,
            state: Arc::new(Mutex::new(state)),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    /// Whether the deterministic provider exposes its chain id as a field.
    pub fn with_chain_id_field(self, expose: bool) -> Self {
        if let Ok(mut g) = self.state.lock() {
            g.expose_chain_id_field = expose;
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        self.mode.name()
    }

    pub(crate) fn mode(&self) -> &ProviderMode {
        &self.mode
    }

    pub fn is_listening(&self) -> bool {
        self.state.lock().map(|g| g.listening).unwrap_or(false)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|g| g.closed).unwrap_or(false)
    }

    fn state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        if self.state()?.closed {
            return Err(PortError::Transport("provider transport closed".to_owned()));
        }
        Ok(())
    }

    pub fn debug_inject_event(&self, event: ProviderEvent) -> Result<(), PortError> {
        self.state()?.record(event);
        Ok(())
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.debug_inject_event(ProviderEvent::AccountsChanged(accounts))
    }

    /// Wallets deliver `chainChanged` as a hex string; `net_version` follows along.
    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        let mut g = self.state()?;
        g.network_id = Some(chain_id);
        g.record(ProviderEvent::ChainChanged(format!("0x{chain_id:x}")));
        Ok(())
    }

    pub fn debug_inject_network_changed(&self, network_id: u64) -> Result<(), PortError> {
        self.debug_inject_event(ProviderEvent::NetworkChanged(network_id.to_string()))
    }

    pub fn debug_inject_disconnect(&self) -> Result<(), PortError> {
        self.debug_inject_event(ProviderEvent::Disconnect)
    }

    pub fn debug_inject_close(&self) -> Result<(), PortError> {
        self.debug_inject_event(ProviderEvent::Close)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            _ => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let mut request = proxy.client.post(&proxy.base_url).json(&payload);
        if let Some(key) = &proxy.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error") {
            // EIP-1193 code 4001: user rejected the request.
            if err.get("code").and_then(Value::as_i64) == Some(4001) {
                return Err(PortError::Cancelled(format!("{method} rejected by user")));
            }
            return Err(PortError::Transport(format!(
                "eip1193 proxy returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    /// Prompts the wallet behind the proxy with `eth_requestAccounts`, then
    /// caches the chain and network ids so session setup makes no requests.
    /// Blocks for up to three proxy round trips.
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn proxy_handshake(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        let accounts =
            parse_accounts(&self.proxy_call("eth_requestAccounts", serde_json::json!([]))?)?;
        let chain_id =
            json_chain_id_to_u64(&self.proxy_call("eth_chainId", serde_json::json!([]))?)?;
        let network_id = self.proxy_network_id();

        let mut g = self.state()?;
        g.accounts = accounts.clone();
        g.chain_id = Some(chain_id);
        g.network_id = network_id;
        Ok(accounts)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_network_id(&self) -> Option<u64> {
        match self
            .proxy_call("net_version", serde_json::json!([]))
            .and_then(|v| json_chain_id_to_u64(&v))
        {
            Ok(id) => Some(id),
            Err(e) => {
                debug!(error = %e, "net_version unavailable over proxy");
                None
            }
        }
    }

    /// Proxies cannot push events, so a background thread polls the wallet
    /// while listeners are registered and queues what changed.
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_proxy_poller(&self, interval: Duration) {
        let provider = self.clone();
        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            match provider.poll_proxy() {
                Ok(true) => {}
                Ok(false) => {
                    debug!("eip1193 proxy poller stopped");
                    break;
                }
                Err(e) => warn!(error = %e, "eip1193 proxy poll failed"),
            }
        });
    }

    /// One poll round. `Ok(false)` once listeners are gone or the transport closed.
    #[cfg(not(target_arch = "wasm32"))]
    fn poll_proxy(&self) -> Result<bool, PortError> {
        {
            let mut g = self.state()?;
            if !g.listening || g.closed {
                g.poller_running = false;
                return Ok(false);
            }
        }

        let accounts = parse_accounts(&self.proxy_call("eth_accounts", serde_json::json!([]))?)?;
        let chain_id =
            json_chain_id_to_u64(&self.proxy_call("eth_chainId", serde_json::json!([]))?)?;
        let chain_changed = self.state()?.chain_id != Some(chain_id);
        let network_id = if chain_changed {
            self.proxy_network_id()
        } else {
            None
        };

        let mut g = self.state()?;
        if g.accounts != accounts {
            g.record(ProviderEvent::AccountsChanged(accounts));
        }
        if chain_changed {
            g.network_id = network_id;
            g.record(ProviderEvent::ChainChanged(chain_id.to_string()));
        }
        Ok(true)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_request_accounts_async(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        let result = self
            .wasm_request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        let accounts = parse_accounts(&result)?;
        self.state()?.accounts = accounts.clone();
        Ok(accounts)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_chain_id_async(&self) -> Result<u64, PortError> {
        self.check_mode()?;
        let result = self
            .wasm_request("eth_chainId", serde_json::json!([]))
            .await?;
        let chain_id = json_chain_id_to_u64(&result)?;
        self.state()?.chain_id = Some(chain_id);
        Ok(chain_id)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_network_id_async(&self) -> Result<u64, PortError> {
        self.check_mode()?;
        let result = self
            .wasm_request("net_version", serde_json::json!([]))
            .await?;
        let network_id = json_chain_id_to_u64(&result)?;
        self.state()?.network_id = Some(network_id);
        Ok(network_id)
    }

    #[cfg(target_arch = "wasm32")]
    async fn wasm_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "window.ethereum.request is unavailable",
            ))?;

        let request = serde_json::json!({
            "method": method,
            "params": params,
        });
        let request_js = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        let result_js = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| {
                let code = get_prop(&e, "code").ok().and_then(|c| c.as_f64());
                if code == Some(4001.0) {
                    PortError::Cancelled(format!("{method} rejected by user"))
                } else {
                    PortError::Transport(format!("provider request rejected: {e:?}"))
                }
            })?;
        serde_wasm_bindgen::from_value(result_js)
            .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
    }

    #[cfg(target_arch = "wasm32")]
    fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .or_else(|| {
                get_prop(&provider, "addListener")
                    .ok()
                    .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            })
            .ok_or(PortError::NotImplemented(
                "provider does not expose on/addListener",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if !hooks.registered.is_empty() {
            return Ok(());
        }

        for name in BROWSER_EVENTS {
            let state = Arc::clone(&self.state);
            let cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let Some(event) = browser_event(name, &value) else {
                    debug!(event = name, "unreadable provider event payload");
                    return;
                };
                if let Ok(mut g) = state.lock() {
                    g.record(event);
                }
            });
            on_fn
                .call2(&provider, &JsValue::from_str(name), cb.as_ref().unchecked_ref())
                .map_err(|e| PortError::Transport(format!("register {name} failed: {e:?}")))?;
            hooks.registered.push((name, cb));
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn remove_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{JsCast, JsValue};

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        let registered = std::mem::take(&mut hooks.registered);
        if registered.is_empty() {
            return Ok(());
        }

        let provider = browser_provider()?;
        let remove_fn = get_prop(&provider, "removeListener")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok());
        match remove_fn {
            Some(remove_fn) => {
                for (name, cb) in &registered {
                    remove_fn
                        .call2(&provider, &JsValue::from_str(name), cb.as_ref().unchecked_ref())
                        .map_err(|e| {
                            PortError::Transport(format!("removeListener {name} failed: {e:?}"))
                        })?;
                }
            }
            None => {
                let remove_all = get_prop(&provider, "removeAllListeners")
                    .ok()
                    .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
                    .ok_or(PortError::NotImplemented(
                        "provider does not expose removeListener/removeAllListeners",
                    ))?;
                remove_all.call0(&provider).map_err(|e| {
                    PortError::Transport(format!("removeAllListeners failed: {e:?}"))
                })?;
            }
        }
        Ok(())
    }
}

impl ProviderPort for Eip1193Provider {
    fn accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            let mut g = self.state()?;
            if g.accounts.is_empty() {
                let provider = browser_provider()?;
                if let Some(raw) = get_prop(&provider, "selectedAddress")?.as_string() {
                    let parsed: Address = raw.parse().map_err(|e| {
                        PortError::Validation(format!("invalid selectedAddress: {e}"))
                    })?;
                    g.accounts = vec![parsed];
                }
            }
            return Ok(g.accounts.clone());
        }

        Ok(self.state()?.accounts.clone())
    }

    fn chain_id_field(&self) -> Result<Option<u64>, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            return Ok(None);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            let provider = browser_provider()?;
            let chain = get_prop(&provider, "chainId")?;
            if chain.is_null() || chain.is_undefined() {
                return Ok(None);
            }
            return js_chain_id_to_u64(chain).map(Some);
        }

        let g = self.state()?;
        Ok(g.chain_id.filter(|_| g.expose_chain_id_field))
    }

    fn request_chain_id(&self) -> Result<u64, PortError> {
        self.check_mode()?;

        // Browser and proxy requests run off the UI thread; this returns the
        // last answered eth_chainId.
        self.state()?
            .chain_id
            .ok_or(PortError::NotImplemented("eth_chainId not answered yet"))
    }

    fn network_id(&self) -> Result<u64, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            let provider = browser_provider()?;
            if let Some(raw) = get_prop(&provider, "networkVersion")?.as_string() {
                let network_id = parse_chain_id(&raw)?;
                self.state()?.network_id = Some(network_id);
                return Ok(network_id);
            }
        }

        self.state()?
            .network_id
            .ok_or(PortError::NotImplemented("net_version"))
    }

    fn subscribe(&self) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.register_browser_hooks()?;
        }

        self.state()?.listening = true;

        #[cfg(not(target_arch = "wasm32"))]
        if let ProviderMode::Proxy(proxy) = &self.mode {
            let already_running = std::mem::replace(&mut self.state()?.poller_running, true);
            if !already_running {
                self.spawn_proxy_poller(proxy.poll_interval);
            }
        }
        Ok(())
    }

    fn remove_all_listeners(&self) -> Result<(), PortError> {
        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.remove_browser_hooks()?;
        }

        self.state()?.listening = false;
        Ok(())
    }

    fn is_closable(&self) -> bool {
        match &self.mode {
            ProviderMode::Disabled(_) => false,
            ProviderMode::Deterministic => true,
            #[cfg(not(target_arch = "wasm32"))]
            ProviderMode::Proxy(_) => true,
            #[cfg(target_arch = "wasm32")]
            ProviderMode::Browser => browser_provider()
                .and_then(|p| get_prop(&p, "close"))
                .map(|f| f.is_function())
                .unwrap_or(false),
        }
    }

    fn close(&self) -> Result<(), PortError> {
        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            use wasm_bindgen::JsCast;

            let provider = browser_provider()?;
            let close_fn = get_prop(&provider, "close")?
                .dyn_into::<js_sys::Function>()
                .map_err(|_| PortError::NotImplemented("provider does not expose close"))?;
            let result = close_fn
                .call0(&provider)
                .map_err(|e| PortError::Transport(format!("provider close failed: {e:?}")))?;
            if let Ok(promise) = result.dyn_into::<js_sys::Promise>() {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                        warn!(error = ?e, "provider close rejected");
                    }
                });
            }
        }

        let mut g = self.state()?;
        g.closed = true;
        g.listening = false;
        Ok(())
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }

        Ok(self.state()?.events.drain(..).collect())
    }
}

fn parse_accounts(value: &Value) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport("accounts result must be array".to_owned()))?;
    arr.iter()
        .map(|item| {
            let raw = item.as_str().ok_or_else(|| {
                PortError::Transport("accounts item must be string".to_owned())
            })?;
            raw.parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))
        })
        .collect()
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    if let Some(n) = value.as_f64() {
        return integral_id(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id(s)
}

/// Numeric ids from JS or JSON must be non-negative integers that fit a `u64`.
fn integral_id(n: f64) -> Result<u64, PortError> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 {
        Ok(n as u64)
    } else {
        Err(PortError::Validation(format!("invalid numeric id: {n}")))
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn browser_provider_available() -> bool {
    browser_provider().is_ok()
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

#[cfg(target_arch = "wasm32")]
fn js_chain_id_to_u64(value: wasm_bindgen::JsValue) -> Result<u64, PortError> {
    if let Some(s) = value.as_string() {
        return parse_chain_id(&s);
    }
    if let Some(num) = value.as_f64() {
        return integral_id(num);
    }
    Err(PortError::Validation("invalid JS chain id".to_owned()))
}

#[cfg(target_arch = "wasm32")]
fn browser_event(name: &str, value: &wasm_bindgen::JsValue) -> Option<ProviderEvent> {
    match name {
        "accountsChanged" => {
            if !js_sys::Array::is_array(value) {
                return None;
            }
            let accounts = js_sys::Array::from(value)
                .iter()
                .filter_map(|item| item.as_string())
                .filter_map(|raw| raw.parse::<Address>().ok())
                .collect();
            Some(ProviderEvent::AccountsChanged(accounts))
        }
        "chainChanged" => js_raw_id(value).map(ProviderEvent::ChainChanged),
        "networkChanged" => js_raw_id(value).map(ProviderEvent::NetworkChanged),
        "disconnect" => Some(ProviderEvent::Disconnect),
        "close" => Some(ProviderEvent::Close),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
fn js_raw_id(value: &wasm_bindgen::JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().and_then(|n| integral_id(n).ok()).map(|n| n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_dropped_until_subscribed() {
        let provider = Eip1193Provider::deterministic();
        provider.debug_inject_chain_changed(4).expect("inject");
        assert!(provider.drain_events().expect("drain").is_empty());
        assert_eq!(provider.request_chain_id().expect("chain"), 4);

        provider.subscribe().expect("subscribe");
        provider.debug_inject_chain_changed(42).expect("inject");
        assert_eq!(
            provider.drain_events().expect("drain"),
            vec![ProviderEvent::ChainChanged("0x2a".to_owned())]
        );
    }

    #[test]
    fn closed_provider_refuses_requests() {
        let provider = Eip1193Provider::deterministic();
        provider.close().expect("close");
        assert!(provider.is_closed());
        assert!(matches!(
            provider.accounts(),
            Err(PortError::Transport(_))
        ));
    }

    #[test]
    fn chain_id_field_can_be_hidden() {
        let provider = Eip1193Provider::deterministic().with_chain_id_field(false);
        assert_eq!(provider.chain_id_field().expect("field"), None);
        assert_eq!(provider.request_chain_id().expect("request"), 5);
    }

    #[test]
    fn numeric_ids_must_be_integral() {
        assert_eq!(json_chain_id_to_u64(&serde_json::json!(5)).expect("int"), 5);
        assert_eq!(json_chain_id_to_u64(&serde_json::json!(42.0)).expect("float"), 42);
        assert_eq!(json_chain_id_to_u64(&serde_json::json!("0x2a")).expect("hex"), 42);
        for bad in [
            serde_json::json!(-1),
            serde_json::json!(4.5),
            serde_json::json!(1e30),
        ] {
            assert!(matches!(
                json_chain_id_to_u64(&bad),
                Err(PortError::Validation(_))
            ));
        }
        assert!(integral_id(f64::NAN).is_err());
        assert!(integral_id(f64::INFINITY).is_err());
    }

    #[test]
    fn accounts_json_is_parsed() {
        let value = serde_json::json!(["0x2000000000000000000000000000000000000002"]);
        let accounts = parse_accounts(&value).expect("accounts");
        let expected: Address = "0x2000000000000000000000000000000000000002"
            .parse()
            .expect("expected account");
        assert_eq!(accounts, vec![expected]);
        assert!(parse_accounts(&serde_json::json!("0x1")).is_err());
        assert!(parse_accounts(&serde_json::json!(["nope"])).is_err());
    }
}
