//! Karel compiler and stepper as a WASM module for browser environments.
//!
//! The page keeps the animation loop: it calls `heartbeat()` every few
//! milliseconds and redraws from `world()`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { compile, KarelSession } from 'karel-wasm';
//!
//! await init();
//!
//! const session = new KarelSession();
//! session.loadWorld("15x15.w");
//! const report = session.play("move(); turnLeft(); move();");
//! setInterval(() => {
//!   session.heartbeat();
//!   draw(session.world());
//! }, 8);
//! ```

mod session;

pub use session::{PlayReport, Session, SessionError, SessionStatus};

use karel_scheduler::KarelConfig;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Compile a Karel source file.
///
/// Returns a JSON string containing a `CompileOutcome`:
/// ```json
/// {
///   "success": true,
///   "procedures": ["<main>"],
///   "entry": "<main>",
///   "actions": 3,
///   "errors": { "errors": [], "warnings": [], "total_errors": 0, "total_warnings": 0 }
/// }
/// ```
#[wasm_bindgen]
pub fn compile(source: &str, filename: &str) -> String {
    let result = karel_compiler::compile_to_result(source, filename);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"procedures":[],"entry":null,"actions":0,"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"warnings":[],"total_errors":1,"total_warnings":0}}}}"#,
            e
        )
    })
}

/// Return the compiler version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

/// One editor, one world, one robot.
#[wasm_bindgen]
pub struct KarelSession {
    inner: Session,
}

#[wasm_bindgen]
impl KarelSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> KarelSession {
        KarelSession {
            inner: Session::default(),
        }
    }

    /// Session configured from a JSON `KarelConfig`; missing fields keep
    /// their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: &str) -> Result<KarelSession, JsError> {
        let config: KarelConfig = serde_json::from_str(config)?;
        Ok(KarelSession {
            inner: Session::new(config),
        })
    }

    /// Load a world from its file text, or a built-in world by name.
    #[wasm_bindgen(js_name = loadWorld)]
    pub fn load_world(&mut self, name: &str, text: Option<String>) -> Result<(), JsError> {
        Ok(self.inner.load_world(name, text.as_deref())?)
    }

    /// Compile and start; returns the `PlayReport`.
    pub fn play(&mut self, source: &str) -> Result<JsValue, JsError> {
        to_js(&self.inner.play(source))
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn heartbeat(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.heartbeat())
    }

    #[wasm_bindgen(js_name = singleStep)]
    pub fn single_step(&mut self) -> Result<JsValue, JsError> {
        let result = self.inner.single_step()?;
        to_js(&result)
    }

    pub fn resume(&mut self) -> Result<(), JsError> {
        Ok(self.inner.resume()?)
    }

    /// Apply `move`, `turnLeft`, `turnRight`, `putBeeper` or `pickBeeper`.
    #[wasm_bindgen(js_name = stepAction)]
    pub fn step_action(&mut self, action: &str) -> Result<(), JsError> {
        Ok(self.inner.step_action(action)?)
    }

    /// World snapshot, or `null` while none is loaded.
    pub fn world(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.world())
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.status())
    }
}

impl Default for KarelSession {
    fn default() -> Self {
        Self::new()
    }
}
