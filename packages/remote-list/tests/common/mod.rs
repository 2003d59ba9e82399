//! Shared helpers for pipeline tests
//!
//! `StubTransport` answers from an in-memory URL table and can hold a
//! request back until a test releases it; `RecordingRenderer` keeps every
//! renderer call so tests can assert on what a user would have seen.

#![allow(dead_code)]

use async_trait::async_trait;
use remote_list::{
    BrowserConfig, DetailView, DisplayUnit, FetchError, FetchResult, PaginationControls, Renderer,
    Transport,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const POKEAPI: &str = "http://stub.test/api/v2";
pub const CHARACTERS: &str = "http://stub.test/api";

pub fn pokemon_url(id: u32) -> String {
    format!("{}/pokemon/{}", POKEAPI, id)
}

pub fn character_url(query: &str) -> String {
    format!("{}/character?{}", CHARACTERS, query)
}

pub fn test_config(catalog_size: u32) -> BrowserConfig {
    BrowserConfig {
        pokeapi_base_url: POKEAPI.to_string(),
        characters_base_url: CHARACTERS.to_string(),
        catalog_size,
        ..BrowserConfig::default()
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

#[derive(Clone)]
enum Reply {
    Json(Value),
    Fail(FetchError),
}

#[derive(Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<String, Reply>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: impl Into<String>, body: Value) {
        self.routes.lock().unwrap().insert(url.into(), Reply::Json(body));
    }

    pub fn fail(&self, url: impl Into<String>, error: FetchError) {
        self.routes.lock().unwrap().insert(url.into(), Reply::Fail(error));
    }

    /// Hold requests to `url` until the returned handle is notified.
    pub fn gate(&self, url: impl Into<String>) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(url.into(), notify.clone());
        notify
    }

    pub fn delay(&self, url: impl Into<String>, delay: Duration) {
        self.delays.lock().unwrap().insert(url.into(), delay);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve `count` Pokémon with predictable names.
    pub fn serve_pokedex(&self, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let id = i as u32 + 1;
            self.respond(pokemon_url(id), pokemon_json(id, name));
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get_json(&self, url: &Url) -> FetchResult<Value> {
        let key = url.as_str().to_string();
        self.requests.lock().unwrap().push(key.clone());

        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.routes.lock().unwrap().get(&key).cloned();
        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Fail(e)) => Err(e),
            None => Err(FetchError::http(key, 404)),
        }
    }
}

// ============================================================================
// RENDERER
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    List(Vec<DisplayUnit>),
    Detail(DetailView),
    Error(String),
    Busy(bool),
    Pagination(Option<PaginationControls>),
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_list(&self) -> Option<Vec<DisplayUnit>> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::List(units) => Some(units),
            _ => None,
        })
    }

    pub fn last_error(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Error(message) => Some(message),
            _ => None,
        })
    }

    pub fn last_detail(&self) -> Option<DetailView> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Detail(detail) => Some(detail),
            _ => None,
        })
    }

    pub fn last_pagination(&self) -> Option<Option<PaginationControls>> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Pagination(controls) => Some(controls),
            _ => None,
        })
    }

    pub fn busy_transitions(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RenderEvent::Busy(busy) => Some(busy),
                _ => None,
            })
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, RenderEvent::List(_)))
            .count()
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn render_list(&mut self, units: &[DisplayUnit]) {
        self.push(RenderEvent::List(units.to_vec()));
    }

    fn render_detail(&mut self, detail: &DetailView) {
        self.push(RenderEvent::Detail(detail.clone()));
    }

    fn render_error(&mut self, message: &str) {
        self.push(RenderEvent::Error(message.to_string()));
    }

    fn set_busy(&mut self, busy: bool) {
        self.push(RenderEvent::Busy(busy));
    }

    fn render_pagination(&mut self, controls: Option<&PaginationControls>) {
        self.push(RenderEvent::Pagination(controls.copied()));
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn sprite(id: u32) -> String {
    format!("https://img.test/pokemon/{}.png", id)
}

pub fn pokemon_json(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "base_experience": 64,
        "sprites": { "front_default": sprite(id), "back_default": null },
        "types": [ { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } } ],
        "weight": 60,
        "height": 4,
        "stats": [
            { "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 90, "effort": 2, "stat": { "name": "speed", "url": "" } }
        ]
    })
}

pub const FIRST_TEN: [&str; 10] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
    "caterpie",
];

pub fn character_json(id: u64, name: &str, status: &str, species: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "species": species,
        "type": "",
        "gender": "Male",
        "image": format!("https://img.test/character/{}.jpeg", id),
    })
}

/// `{ info, results }` with one character per page, named after the page.
pub fn character_page(page: u32, pages: u32) -> Value {
    json!({
        "info": { "count": pages * 20, "pages": pages, "next": null, "prev": null },
        "results": [
            character_json(page as u64 * 100 + 1, &format!("Rick {}", page), "Alive", "Human"),
            character_json(page as u64 * 100 + 2, &format!("Morty {}", page), "Alive", "Human"),
        ]
    })
}
