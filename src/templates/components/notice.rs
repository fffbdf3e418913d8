use maud::{html, Markup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
}

pub fn notice(tone: Tone, message: &str) -> Markup {
    let class = match tone {
        Tone::Info => "notice",
        Tone::Error => "notice error",
    };
    html! {
        div class=(class) role=[(tone == Tone::Error).then_some("alert")] { (message) }
    }
}
