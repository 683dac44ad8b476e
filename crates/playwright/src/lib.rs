//! Playwright Render Session
//!
//! A [`Renderer`](prerender_common::Renderer) that serves the built bundle
//! from a local static server and loads each route in a headless browser
//! driven by Playwright.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  PlaywrightRenderer                                        │
//! │    ├── initialize() -> ServerHandle (127.0.0.1:<port>)     │
//! │    ├── render_routes() -> node render.js                   │
//! │    │     stdin:  { baseUrl, routes, rendererConfig }       │
//! │    │     stdout: [{ route, html }]                         │
//! │    └── teardown() -> stop server                           │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod harness;
pub mod server;
pub mod session;

pub use error::{PlaywrightError, PlaywrightResult};
pub use harness::default_node_path;
pub use server::{ServerConfig, ServerHandle};
pub use session::{PlaywrightConfig, PlaywrightRenderer};
