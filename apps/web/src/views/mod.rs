//! Page templates shared across handlers. Markup lives in `templates/`;
//! askama escapes every interpolated value unless a template marks it `safe`.

use askama::Template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn new(kind: BannerKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            BannerKind::Error => "banner banner-error",
            BannerKind::Info => "banner banner-info",
            BannerKind::Success => "banner banner-success",
        }
    }

    pub fn role(&self) -> &'static str {
        if self.kind == BannerKind::Error {
            "alert"
        } else {
            "status"
        }
    }
}

/// Error and info banners from `?error=` / `?message=` query parameters.
pub fn flash_banners(error: Option<&str>, message: Option<&str>) -> Vec<Banner> {
    let mut banners = Vec::new();
    if let Some(error) = error.filter(|e| !e.is_empty()) {
        banners.push(Banner::new(BannerKind::Error, error));
    }
    if let Some(message) = message.filter(|m| !m.is_empty()) {
        banners.push(Banner::new(BannerKind::Info, message));
    }
    banners
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'a> {
    title: &'a str,
    message: &'a str,
    href: &'a str,
    label: &'a str,
}

/// Dedicated view for identifiers that do not resolve to anything.
pub fn not_found(title: &str, message: &str, href: &str, label: &str) -> askama::Result<String> {
    NotFoundTemplate {
        title,
        message,
        href,
        label,
    }
    .render()
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate;

pub fn landing() -> askama::Result<String> {
    LandingTemplate.render()
}
