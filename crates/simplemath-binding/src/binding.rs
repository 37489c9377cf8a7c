//! A loaded native library with its resolved entry points.
//!
//! [`Binding::open`] performs the load and binds the constructor; anything
//! else is resolved on first use, so a library exporting only `smath_new`
//! is still a valid binding.

use std::collections::HashMap;
use std::ffi::{CStr, c_char, c_int, c_void};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::BindingConfig;
use crate::error::BindingError;
use crate::handle::{LibraryHandle, NativeHandle, SymbolAddress};
use crate::loader::{DlLoader, NativeLibraryLoader};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// Zero-argument constructor: `void* smath_new(void)`.
pub const CONSTRUCTOR_SYMBOL: &CStr = c"smath_new";
pub const ADD_EQUATION_SYMBOL: &CStr = c"smath_add_eq";
pub const EVAL_EQUATION_SYMBOL: &CStr = c"smath_eval_eq";
pub const FREE_SYMBOL: &CStr = c"smath_free";
pub const LAST_ERROR_SYMBOL: &CStr = c"smath_last_error";

pub(crate) type ConstructorFn = unsafe extern "C" fn() -> *mut c_void;
pub(crate) type AddEquationFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> c_int;
pub(crate) type EvalEquationFn =
    unsafe extern "C" fn(*mut c_void, c_int, *const f64, usize, *mut f64) -> c_int;
pub(crate) type FreeFn = unsafe extern "C" fn(*mut c_void);
pub(crate) type LastErrorFn = unsafe extern "C" fn() -> *const c_char;

pub struct Binding {
    loader: Arc<dyn NativeLibraryLoader>,
    library: LibraryHandle,
    constructor: ConstructorFn,
    symbols: Mutex<HashMap<&'static CStr, Result<SymbolAddress, BindingError>>>,
    log: EventLog,
}

impl Binding {
    /// Load the configured library and bind its constructor.
    ///
    /// A log file that cannot be opened disables logging; it never fails
    /// the load.
    pub fn open(
        loader: Arc<dyn NativeLibraryLoader>,
        config: &BindingConfig,
    ) -> Result<Self, BindingError> {
        let log = config
            .log_path()
            .and_then(|path| LogEmitter::to_file(path, "binding", &run_id()).ok());
        Self::open_with_log(loader, config.library_path(), log)
    }

    /// Load `path` with an explicit (optional) log emitter.
    pub fn open_with_log(
        loader: Arc<dyn NativeLibraryLoader>,
        path: &Path,
        log: Option<LogEmitter>,
    ) -> Result<Self, BindingError> {
        let log = EventLog(log.map(Mutex::new));
        let library_name = path.display().to_string();

        let started = Instant::now();
        let loaded = loader.load(path);
        log.outcome("library_load", started, &loaded, |e| {
            e.with_library(library_name.as_str())
        });
        let library = loaded?;

        let started = Instant::now();
        let resolved = loader.resolve(&library, CONSTRUCTOR_SYMBOL);
        log.outcome("symbol_resolve", started, &resolved, |e| {
            e.with_library(library_name.as_str())
                .with_symbol(CONSTRUCTOR_SYMBOL.to_string_lossy())
        });
        let address = resolved?;

        // SAFETY: the export is declared by the ABI as `void* smath_new(void)`.
        let constructor =
            unsafe { std::mem::transmute::<*mut c_void, ConstructorFn>(address.as_ptr()) };

        Ok(Self {
            loader,
            library,
            constructor,
            symbols: Mutex::new(HashMap::new()),
            log,
        })
    }

    #[must_use]
    pub fn library(&self) -> &LibraryHandle {
        &self.library
    }

    /// Call the native constructor. The returned value is not inspected.
    pub fn construct(&self) -> NativeHandle {
        let started = Instant::now();
        // SAFETY: constructor resolved from the library and takes no arguments.
        let handle = NativeHandle::new(unsafe { (self.constructor)() });
        self.log.record(LogLevel::Info, "construct", |e| {
            e.with_symbol(CONSTRUCTOR_SYMBOL.to_string_lossy())
                .with_outcome(Outcome::Pass)
                .with_latency_ns(elapsed_ns(started))
                .with_details(serde_json::json!({ "handle": format!("{:#x}", handle.addr()) }))
        });
        handle
    }

    /// Resolve an export, caching the answer (found or not).
    pub fn symbol(&self, name: &'static CStr) -> Result<SymbolAddress, BindingError> {
        let mut symbols = self.symbols.lock();
        if let Some(cached) = symbols.get(name) {
            return cached.clone();
        }
        let started = Instant::now();
        let resolved = self.loader.resolve(&self.library, name);
        self.log.outcome("symbol_resolve", started, &resolved, |e| {
            e.with_library(self.library.path().display().to_string())
                .with_symbol(name.to_string_lossy())
        });
        symbols.insert(name, resolved.clone());
        resolved
    }

    pub(crate) fn add_equation_fn(&self) -> Result<AddEquationFn, BindingError> {
        let address = self.symbol(ADD_EQUATION_SYMBOL)?;
        // SAFETY: signature fixed by the SimpleMath ABI.
        Ok(unsafe { std::mem::transmute::<*mut c_void, AddEquationFn>(address.as_ptr()) })
    }

    pub(crate) fn eval_equation_fn(&self) -> Result<EvalEquationFn, BindingError> {
        let address = self.symbol(EVAL_EQUATION_SYMBOL)?;
        // SAFETY: signature fixed by the SimpleMath ABI.
        Ok(unsafe { std::mem::transmute::<*mut c_void, EvalEquationFn>(address.as_ptr()) })
    }

    pub(crate) fn free_fn(&self) -> Option<FreeFn> {
        let address = self.symbol(FREE_SYMBOL).ok()?;
        // SAFETY: signature fixed by the SimpleMath ABI.
        Some(unsafe { std::mem::transmute::<*mut c_void, FreeFn>(address.as_ptr()) })
    }

    /// The library's message for the calling thread's last failure.
    pub(crate) fn last_native_error(&self) -> String {
        let fallback = || "native call failed without a message".to_string();
        let Ok(address) = self.symbol(LAST_ERROR_SYMBOL) else {
            return fallback();
        };
        // SAFETY: signature fixed by the SimpleMath ABI.
        let last_error =
            unsafe { std::mem::transmute::<*mut c_void, LastErrorFn>(address.as_ptr()) };
        // SAFETY: returns null or a NUL-terminated thread-local string.
        let msg = unsafe { last_error() };
        if msg.is_null() {
            fallback()
        } else {
            // SAFETY: non-null and NUL-terminated per the ABI.
            unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
        }
    }

    pub(crate) fn log_release(&self, handle: &NativeHandle, released: bool) {
        self.log.record(LogLevel::Debug, "release", |e| {
            e.with_symbol(FREE_SYMBOL.to_string_lossy())
                .with_details(serde_json::json!({
                    "handle": format!("{:#x}", handle.addr()),
                    "released": released,
                }))
        });
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("library", &self.library)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Process-wide default binding
// ---------------------------------------------------------------------------

/// Holds at most one successfully opened binding. Failed opens are not
/// stored, so the next caller retries.
pub struct BindingCache {
    slot: Mutex<Option<Arc<Binding>>>,
}

impl BindingCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn get_or_open(
        &self,
        open: impl FnOnce() -> Result<Binding, BindingError>,
    ) -> Result<Arc<Binding>, BindingError> {
        let mut slot = self.slot.lock();
        if let Some(binding) = slot.as_ref() {
            return Ok(Arc::clone(binding));
        }
        let binding = Arc::new(open()?);
        *slot = Some(Arc::clone(&binding));
        Ok(binding)
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<Binding>> {
        self.slot.lock().clone()
    }
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_BINDING: BindingCache = BindingCache::new();

/// The process-wide binding: `DlLoader` + [`BindingConfig::from_env`],
/// loaded on first success and reused afterwards.
pub fn default_binding() -> Result<Arc<Binding>, BindingError> {
    DEFAULT_BINDING.get_or_open(|| Binding::open(Arc::new(DlLoader), &BindingConfig::from_env()))
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

struct EventLog(Option<Mutex<LogEmitter>>);

impl EventLog {
    fn record(&self, level: LogLevel, event: &str, build: impl FnOnce(LogEntry) -> LogEntry) {
        if let Some(emitter) = &self.0 {
            let mut emitter = emitter.lock();
            let entry = build(emitter.entry(level, event));
            // Logging is best effort; a full disk must not fail a load.
            let _ = emitter.emit_entry(entry);
        }
    }

    fn outcome<T>(
        &self,
        event: &str,
        started: Instant,
        result: &Result<T, BindingError>,
        build: impl FnOnce(LogEntry) -> LogEntry,
    ) {
        let latency = elapsed_ns(started);
        self.record(LogLevel::Info, event, |e| {
            let e = build(e).with_latency_ns(latency);
            match result {
                Ok(_) => e.with_outcome(Outcome::Pass),
                Err(err) => e
                    .with_failure(err.kind())
                    .with_details(serde_json::json!({ "reason": err.to_string() })),
            }
        });
    }
}

fn elapsed_ns(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

fn run_id() -> String {
    format!("pid{}", std::process::id())
}
