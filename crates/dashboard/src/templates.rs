//! Embedded page templates.
//!
//! Templates live in `assets/templates/` and are compiled into the binary
//! with [`rust-embed`](rust_embed), then compiled once more by [`upon`] when
//! the dashboard starts so that syntax errors surface before the first
//! request.

use crate::error::{ErrorKind, Result};
use crate::format::addons;
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use serde::Serialize;
use tracing::instrument;
use upon::{Engine, Template};

#[derive(Embed)]
#[folder = "../../assets/templates/"]
struct Assets;
impl Assets {
    fn load(name: &str) -> Result<String> {
        let file = Self::get(name).ok_or_raise(|| ErrorKind::Template)?;
        String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::Template)
    }
}

/// The compiled dashboard page.
pub struct Page {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl Page {
    pub fn load() -> Result<Self> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(Assets::load("index.html")?).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }

    #[instrument(skip_all)]
    pub fn render(&self, context: impl Serialize) -> Result<String> {
        self.template.render(&self.engine, context).to_string().or_raise(|| ErrorKind::Template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_index() {
        assert!(Assets::get("index.html").is_some());
        assert!(Page::load().is_ok());
    }

    #[test]
    fn missing_template() {
        let err = Assets::load("missing.html").unwrap_err();
        assert_eq!(*err, ErrorKind::Template);
    }
}
