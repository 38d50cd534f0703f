//! WASM bindings for the planning board
//!
//! The page keeps one [`WasmBoard`] alive and talks to it in JSON strings:
//! - feeds go in as the JSON arrays the sheet endpoints return
//! - commands go in as tagged objects, e.g. `{"command": "toggle_highlight"}`
//! - board views, allocation reports and pending sheet updates come out
//!
//! Scenarios persist in `window.localStorage` under the configured key.

use std::cell::RefCell;
use std::rc::Rc;

use lotboard_core::feed::{parse_project_json, parse_requirement_json};
use lotboard_core::{
    Board, BoardCommand, BoardConfig, BoardError, BoardResult, FeedDiagnostics, KeyValueStore,
    MemoryStore, Project, ProjectUpdate, WriteBack,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    fn local_storage_get(key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    fn local_storage_set(key: &str, value: &str) -> Result<(), JsValue>;
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Where scenarios are kept: the page's `localStorage`, or memory.
enum BrowserStore {
    Local,
    Memory(MemoryStore),
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> BoardResult<Option<String>> {
        match self {
            BrowserStore::Local => local_storage_get(key).map_err(|e| {
                BoardError::Storage(format!("localStorage.getItem failed: {}", describe(&e)))
            }),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> BoardResult<()> {
        match self {
            BrowserStore::Local => local_storage_set(key, value).map_err(|e| {
                BoardError::Storage(format!("localStorage.setItem failed: {}", describe(&e)))
            }),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }
}

/// Sheet updates waiting for the host to transmit.
#[derive(Clone, Default)]
struct UpdateQueue(Rc<RefCell<Vec<ProjectUpdate>>>);

impl WriteBack for UpdateQueue {
    fn send(&mut self, update: &ProjectUpdate) {
        self.0.borrow_mut().push(update.clone());
    }
}

#[wasm_bindgen]
pub struct WasmBoard {
    board: Board<BrowserStore>,
    updates: UpdateQueue,
    diagnostics: FeedDiagnostics,
}

#[wasm_bindgen]
impl WasmBoard {
    /// Board backed by `window.localStorage`. `config_json` is an optional
    /// JSON rendering of the board configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        projects_json: &str,
        requirements_json: &str,
        config_json: Option<String>,
    ) -> Result<WasmBoard, JsValue> {
        Self::open(
            projects_json,
            requirements_json,
            config_json.as_deref(),
            BrowserStore::Local,
        )
    }

    /// Board whose scenarios live only as long as the object.
    pub fn in_memory(
        projects_json: &str,
        requirements_json: &str,
        config_json: Option<String>,
    ) -> Result<WasmBoard, JsValue> {
        Self::open(
            projects_json,
            requirements_json,
            config_json.as_deref(),
            BrowserStore::Memory(MemoryStore::new()),
        )
    }

    pub fn view(&mut self) -> Result<String, JsValue> {
        let view = self.board.view().map_err(js_error)?;
        to_json(&view)
    }

    /// Apply one command and return the refreshed view.
    pub fn dispatch(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: BoardCommand = serde_json::from_str(command_json)
            .map_err(|e| js_error(format!("invalid command: {e}")))?;
        let view = self.board.dispatch(command).map_err(js_error)?;
        to_json(&view)
    }

    /// Per-group outcomes of the latest allocation run.
    pub fn report(&self) -> Result<String, JsValue> {
        to_json(self.board.report())
    }

    /// Issues found while reading the project feed.
    pub fn diagnostics(&self) -> Result<String, JsValue> {
        to_json(&self.diagnostics)
    }

    /// Drain the sheet updates produced since the last call.
    pub fn take_updates(&mut self) -> Result<String, JsValue> {
        let updates: Vec<ProjectUpdate> = self.updates.0.borrow_mut().drain(..).collect();
        to_json(&updates)
    }
}

impl WasmBoard {
    fn open(
        projects_json: &str,
        requirements_json: &str,
        config_json: Option<&str>,
        store: BrowserStore,
    ) -> Result<WasmBoard, JsValue> {
        let config = match config_json {
            Some(text) if !text.trim().is_empty() => serde_json::from_str::<BoardConfig>(text)
                .map_err(|e| js_error(format!("invalid config: {e}")))?,
            _ => BoardConfig::default(),
        };

        let ranking = config.board.ranking();
        let projects = parse_project_json(projects_json, &ranking);
        let diagnostics = projects
            .as_ref()
            .map(|feed| feed.diagnostics.clone())
            .unwrap_or_default();
        let requirements = parse_requirement_json(requirements_json).map(|feed| feed.requirements);

        let updates = UpdateQueue::default();
        let board = Board::from_feeds(
            config,
            projects.map(|feed| feed.projects),
            requirements,
            store,
        )
        .map_err(js_error)?
        .with_write_back(updates.clone());

        Ok(WasmBoard {
            board,
            updates,
            diagnostics,
        })
    }
}

/// One-shot allocation with the default configuration. Returns every project
/// with its bidder status and display order.
#[wasm_bindgen]
pub fn allocate_feeds(projects_json: &str, requirements_json: &str) -> Result<String, JsValue> {
    let board = WasmBoard::in_memory(projects_json, requirements_json, None)?;
    let projects: Vec<&Project> = board.board.catalog().iter().collect();
    to_json(&projects)
}
