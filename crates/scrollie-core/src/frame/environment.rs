//! Host frame capabilities and the pure selection policy over them

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

/// Callback run once at a rendering opportunity, given the frame timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// A native request entry point; returns the host's raw frame id
pub type RequestFrameFn = Rc<dyn Fn(FrameCallback) -> u64>;

/// A native cancel entry point taking the raw frame id
pub type CancelFrameFn = Rc<dyn Fn(u64)>;

/// iOS 6 ships a per-frame primitive that misbehaves; any later major
/// version is fine, hence the guard against a following digit
static DEFECTIVE_PLATFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"iP(ad|hone|od).*OS 6(?:[^0-9]|$)").expect("static regex is valid")
});

/// Vendor families that shipped prefixed frame entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Webkit,
    Moz,
}

impl Vendor {
    /// Lookup order for prefixed entry points
    pub const PRECEDENCE: [Vendor; 2] = [Vendor::Webkit, Vendor::Moz];

    pub fn prefix(self) -> &'static str {
        match self {
            Vendor::Webkit => "webkit",
            Vendor::Moz => "moz",
        }
    }
}

/// Named request entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestApi {
    Standard,
    Prefixed(Vendor),
}

impl fmt::Display for RequestApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestApi::Standard => f.write_str("requestAnimationFrame"),
            RequestApi::Prefixed(v) => write!(f, "{}RequestAnimationFrame", v.prefix()),
        }
    }
}

/// Named cancel entry points, including the older `CancelRequest` spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelApi {
    Standard,
    Prefixed(Vendor),
    LegacyPrefixed(Vendor),
}

impl fmt::Display for CancelApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelApi::Standard => f.write_str("cancelAnimationFrame"),
            CancelApi::Prefixed(v) => write!(f, "{}CancelAnimationFrame", v.prefix()),
            CancelApi::LegacyPrefixed(v) => {
                write!(f, "{}CancelRequestAnimationFrame", v.prefix())
            }
        }
    }
}

/// Where a scheduler operation is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBackend<A> {
    Native(A),
    Timer,
}

/// The host's frame capabilities, captured once and handed to the scheduler
#[derive(Clone, Default)]
pub struct Environment {
    user_agent: String,
    requests: HashMap<RequestApi, RequestFrameFn>,
    cancels: HashMap<CancelApi, CancelFrameFn>,
}

impl Environment {
    /// An environment exposing no native entry points
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            requests: HashMap::new(),
            cancels: HashMap::new(),
        }
    }

    pub fn with_request(mut self, api: RequestApi, request: RequestFrameFn) -> Self {
        self.requests.insert(api, request);
        self
    }

    pub fn with_cancel(mut self, api: CancelApi, cancel: CancelFrameFn) -> Self {
        self.cancels.insert(api, cancel);
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn request(&self, api: RequestApi) -> Option<&RequestFrameFn> {
        self.requests.get(&api)
    }

    pub fn cancel(&self, api: CancelApi) -> Option<&CancelFrameFn> {
        self.cancels.get(&api)
    }

    pub fn has_request(&self, api: RequestApi) -> bool {
        self.requests.contains_key(&api)
    }

    pub fn has_cancel(&self, api: CancelApi) -> bool {
        self.cancels.contains_key(&api)
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("user_agent", &self.user_agent)
            .field("requests", &self.requests.keys().collect::<Vec<_>>())
            .field("cancels", &self.cancels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// True when the platform identifier names iOS 6 on an iPad, iPhone or iPod
pub fn is_defective_platform(user_agent: &str) -> bool {
    DEFECTIVE_PLATFORM.is_match(user_agent)
}

/// Pick the request entry point: standard, then prefixed by vendor
/// precedence, else timers. Defective platforms always get timers.
pub fn select_request(env: &Environment) -> FrameBackend<RequestApi> {
    if is_defective_platform(env.user_agent()) {
        return FrameBackend::Timer;
    }
    std::iter::once(RequestApi::Standard)
        .chain(Vendor::PRECEDENCE.into_iter().map(RequestApi::Prefixed))
        .find(|api| env.has_request(*api))
        .map_or(FrameBackend::Timer, FrameBackend::Native)
}

/// Pick the cancel entry point: standard, prefixed by vendor precedence,
/// then the legacy prefixed names, else timers
pub fn select_cancel(env: &Environment) -> FrameBackend<CancelApi> {
    if is_defective_platform(env.user_agent()) {
        return FrameBackend::Timer;
    }
    std::iter::once(CancelApi::Standard)
        .chain(Vendor::PRECEDENCE.into_iter().map(CancelApi::Prefixed))
        .chain(Vendor::PRECEDENCE.into_iter().map(CancelApi::LegacyPrefixed))
        .find(|api| env.has_cancel(*api))
        .map_or(FrameBackend::Timer, FrameBackend::Native)
}
