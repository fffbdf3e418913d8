use crate::theme::Mode;
use maud::{html, Markup, PreEscaped, DOCTYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Hotels,
    Trends,
    About,
}

/// Per-request page furniture.
pub struct Chrome<'a> {
    pub title: &'a str,
    pub active: Nav,
    pub mode: Mode,
    /// Theme CSS for `mode`.
    pub stylesheet: &'a str,
    /// Reload the page every few seconds while a search runs.
    pub refresh: bool,
    pub extra_head: Option<Markup>,
}

pub fn desktop_layout(chrome: &Chrome<'_>, content: Markup) -> Markup {
    let nav_link = |target: Nav, href: &str, label: &str| {
        html! {
            a href=(href) class=[(chrome.active == target).then_some("active")] { (label) }
        }
    };

    html! {
        (DOCTYPE)
        html lang="en" data-mode=(chrome.mode.to_string()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if chrome.refresh {
                    meta http-equiv="refresh" content="5";
                }
                title { (chrome.title) " · hotel scout" }
                link rel="preconnect" href="https://fonts.googleapis.com";
                link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Roboto+Mono:wght@300;400;700&display=swap";
                style { (PreEscaped(chrome.stylesheet)) }
                @if let Some(extra) = &chrome.extra_head {
                    (extra)
                }
            }
            body {
                header class="topbar" {
                    strong { "🕸️ hotel scout" }
                    nav {
                        (nav_link(Nav::Hotels, "/", "hotels info"))
                        (nav_link(Nav::Trends, "/trends", "understand the trends"))
                        (nav_link(Nav::About, "/about", "about"))
                    }
                    form method="post" action="/theme" {
                        button class="link" type="submit" {
                            @match chrome.mode {
                                Mode::Light => "dark mode",
                                Mode::Dark => "light mode",
                            }
                        }
                    }
                }
                main { (content) }
            }
        }
    }
}
