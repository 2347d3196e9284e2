use crate::{
    config::TerminalConfig,
    console,
    content::SiteContent,
    rescue::RescueMode,
    storage::BrowserStorage,
    terminal::Terminal,
};
use log::{info, warn};
use wasm_bindgen::prelude::*;

/// Page-facing handle. The page script owns rendering and only exchanges strings with this.
#[wasm_bindgen]
pub struct System {
    terminal: Terminal,
}

fn js_callback(callback: js_sys::Function, what: &'static str) -> Box<dyn FnMut(&str)> {
    Box::new(move |arg: &str| {
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(arg)) {
            warn!("{} callback failed: {:?}", what, e);
        }
    })
}

fn open_in_new_tab(url: &str) {
    let opened = web_sys::window().map(|w| w.open_with_url_and_target(url, "_blank"));
    match opened {
        Some(Ok(_)) => {}
        Some(Err(e)) => warn!("could not open {}: {:?}", url, e),
        None => warn!("could not open {}: no window", url),
    }
}

#[wasm_bindgen]
impl System {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, content_json: &str) -> System {
        let mut config = TerminalConfig::from_json(config_json);
        console::init(config.log_filter());

        let now = js_sys::Date::now();
        if config.seed.is_none() {
            config.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64 ^ now as u64);
        }
        let content = SiteContent::from_json(content_json);
        info!(
            "terminal: {} posts, {} projects",
            content.blog_posts.len(),
            content.projects.len()
        );

        let mut terminal = Terminal::new(config, content, Box::new(BrowserStorage::open()), now);
        terminal.capabilities_mut().open_url = Some(Box::new(open_in_new_tab));
        System { terminal }
    }

    #[wasm_bindgen]
    pub fn exec(&mut self, line: &str) -> String {
        self.terminal.exec(line, js_sys::Date::now()).into_wire()
    }

    #[wasm_bindgen]
    pub fn prompt(&self) -> String {
        self.terminal.prompt()
    }

    #[wasm_bindgen]
    pub fn complete(&self, partial: &str) -> Vec<JsValue> {
        self.terminal
            .complete(partial)
            .iter()
            .map(|s| JsValue::from_str(s))
            .collect()
    }

    #[wasm_bindgen]
    pub fn history_prev(&mut self) -> Option<String> {
        self.terminal.history_prev()
    }

    #[wasm_bindgen]
    pub fn history_next(&mut self) -> Option<String> {
        self.terminal.history_next()
    }

    #[wasm_bindgen]
    pub fn is_rescue_mode(&self) -> bool {
        matches!(self.terminal.rescue_mode(), RescueMode::Rescue { .. })
    }

    #[wasm_bindgen]
    pub fn rescue_started_at(&self) -> Option<f64> {
        match self.terminal.rescue_mode() {
            RescueMode::Rescue { since_ms } => Some(since_ms),
            RescueMode::Normal => None,
        }
    }

    /// `callback(active: boolean, sinceMs: number | null)` runs on every rescue transition.
    #[wasm_bindgen]
    pub fn subscribe_rescue(&mut self, callback: js_sys::Function) {
        self.terminal.subscribe_rescue(move |mode| {
            let (active, since) = match mode {
                RescueMode::Rescue { since_ms } => (true, JsValue::from_f64(since_ms)),
                RescueMode::Normal => (false, JsValue::NULL),
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from_bool(active), &since) {
                warn!("rescue subscriber failed: {:?}", e);
            }
        });
    }

    #[wasm_bindgen]
    pub fn set_blog_viewer(&mut self, callback: js_sys::Function) {
        self.terminal.capabilities_mut().on_open_blog_post =
            Some(js_callback(callback, "blog viewer"));
    }

    #[wasm_bindgen]
    pub fn set_project_viewer(&mut self, callback: js_sys::Function) {
        self.terminal.capabilities_mut().on_open_project =
            Some(js_callback(callback, "project viewer"));
    }

    #[wasm_bindgen]
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        self.terminal.set_screen_size(width, height);
    }

    #[wasm_bindgen]
    pub fn is_open(&self) -> bool {
        self.terminal.is_open()
    }

    #[wasm_bindgen]
    pub fn set_open(&mut self, open: bool) {
        self.terminal.set_open(open);
    }
}
