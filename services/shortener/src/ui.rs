//! HTML rendering

use std::sync::Arc;

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    flash::FlashMessage,
    models::LinkView,
};

/// Compiled page templates
#[derive(Clone)]
pub struct Renderer(Arc<Handlebars<'static>>);

impl Renderer {
    pub fn new() -> AppResult<Self> {
        let mut t = Handlebars::new();

        macro_rules! register {
            ($(($name:expr, $path:expr))*) => {
                $(
                    t.register_template_string($name, include_str!($path))
                        .map_err(|e| AppError::Internal(format!("Bad template {}: {}", $name, e)))?;
                )*
            };
        }

        t.register_partial("flash", include_str!("../templates/flash.hbs"))
            .map_err(|e| AppError::Internal(format!("Bad partial flash: {}", e)))?;

        register! {
            ("login", "../templates/login.hbs")
            ("register", "../templates/register.hbs")
            ("index", "../templates/index.hbs")
            ("shortened", "../templates/shortened.hbs")
        }

        Ok(Self(Arc::new(t)))
    }

    fn render<T: Serialize>(&self, name: &str, ctx: &T) -> AppResult<Html<String>> {
        Ok(Html(self.0.render(name, ctx)?))
    }

    pub fn login(
        &self,
        messages: &[FlashMessage],
        short_url: Option<&str>,
    ) -> AppResult<Html<String>> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            messages: &'a [FlashMessage],
            short_url: Option<&'a str>,
        }

        self.render("login", &Ctx {
            messages,
            short_url,
        })
    }

    pub fn register(&self, messages: &[FlashMessage]) -> AppResult<Html<String>> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            messages: &'a [FlashMessage],
        }

        self.render("register", &Ctx { messages })
    }

    pub fn index(
        &self,
        username: &str,
        messages: &[FlashMessage],
        links: &[LinkView],
    ) -> AppResult<Html<String>> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            username: &'a str,
            messages: &'a [FlashMessage],
            links: &'a [LinkView],
        }

        self.render("index", &Ctx {
            username,
            messages,
            links,
        })
    }

    pub fn shortened(&self, original_url: &str, short_url: &str) -> AppResult<Html<String>> {
        #[derive(Serialize)]
        struct Ctx<'a> {
            original_url: &'a str,
            short_url: &'a str,
        }

        self.render("shortened", &Ctx {
            original_url,
            short_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page() {
        let renderer = Renderer::new().unwrap();

        let Html(page) = renderer.login(&[], None).unwrap();
        assert!(page.contains("name=\"username\""));
        assert!(page.contains("name=\"url_to_shorten\""));
        assert!(!page.contains("Your short link"));

        let Html(page) = renderer
            .login(
                &[FlashMessage::error("Invalid credentials")],
                Some("http://localhost/abc123"),
            )
            .unwrap();
        assert!(page.contains("Invalid credentials"));
        assert!(page.contains("http://localhost/abc123"));
    }

    #[test]
    fn test_index_escapes_user_values() {
        let renderer = Renderer::new().unwrap();
        let links = [LinkView {
            original_url: "https://example.com/?q=<script>".to_string(),
            short_url: "http://localhost/abc123".to_string(),
        }];

        let Html(page) = renderer.index("<b>alice</b>", &[], &links).unwrap();
        assert!(!page.contains("<script>"));
        assert!(!page.contains("<b>alice</b>"));
        assert!(page.contains("&lt;b&gt;alice&lt;/b&gt;"));
        assert!(page.contains("http://localhost/abc123"));
    }

    #[test]
    fn test_index_without_links() {
        let renderer = Renderer::new().unwrap();

        let Html(page) = renderer.index("alice", &[], &[]).unwrap();
        assert!(page.contains("No links yet."));
    }

    #[test]
    fn test_shortened_and_register_pages() {
        let renderer = Renderer::new().unwrap();

        let Html(page) = renderer
            .shortened("https://example.com", "http://localhost/Zz9Aa0")
            .unwrap();
        assert!(page.contains("http://localhost/Zz9Aa0"));

        let Html(page) = renderer
            .register(&[FlashMessage::error("Username already exists.")])
            .unwrap();
        assert!(page.contains("Username already exists."));
    }
}
