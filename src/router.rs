use crate::config::AppConfig;
use crate::domain::{Metric, SearchQuery};
use crate::errors::{ResultResp, ServerError};
use crate::responses::{
    error_to_response, html_response, html_status_response, redirect, with_session_cookie,
    xlsx_response,
};
use crate::scraper::HttpFetcher;
use crate::session::{spawn_search, SearchError, SessionContext, SessionStore, SESSION_COOKIE};
use crate::spreadsheets::hotels_workbook;
use crate::templates::pages::{
    about_page, home_page, map_head, trends_page, ChartChoice, HomeVm, SearchForm, TrendsVm,
};
use crate::templates::{desktop_layout, Chrome, Nav};
use crate::theme::Theme;
use astra::{Request, Response};
use chrono::{Local, NaiveDate};
use maud::Markup;
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;
use tracing::{debug, error, warn};

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// The pages a cookieless visitor may open a session on.
const PAGES: [&str; 3] = ["/", "/trends", "/about"];

/// Everything a request handler needs, shared by all worker threads.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub theme: Theme,
}

/// Route a request, attaching a session cookie when a new session was opened.
///
/// Only a page GET opens a session. Any other request without a live
/// session is sent to the home page, or gets a 404 for an unknown path.
pub fn handle(req: Request, state: &AppState) -> Response {
    let existing = session_token(&req).filter(|t| state.sessions.contains(t));
    let (token, is_new) = match existing {
        Some(t) => (t, false),
        None if opens_session(&req) => (state.sessions.create(), true),
        None => return without_session(&req).unwrap_or_else(error_to_response),
    };

    let resp = route(req, state, &token).unwrap_or_else(error_to_response);

    if is_new {
        with_session_cookie(resp, &token)
    } else {
        resp
    }
}

fn route(req: Request, state: &AppState, token: &str) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(&req, state, token),
        ("GET", "/trends") => trends(&req, state, token),
        ("GET", "/about") => {
            let ctx = session(state, token)?;
            render(state, &ctx, "about", Nav::About, None, about_page())
        }
        ("POST", "/search") => search(req, state, token),
        ("POST", "/theme") => {
            state
                .sessions
                .with(token, |ctx| ctx.mode = ctx.mode.toggled())
                .ok_or(ServerError::InternalError)?;
            redirect("/")
        }
        ("GET", "/export.xlsx") => {
            let ctx = session(state, token)?;
            xlsx_response(hotels_workbook(&ctx.dataset)?, "hotels.xlsx")
        }
        _ => Err(ServerError::NotFound),
    }
}

fn opens_session(req: &Request) -> bool {
    req.method().as_str() == "GET" && PAGES.contains(&req.uri().path())
}

fn without_session(req: &Request) -> ResultResp {
    match (req.method().as_str(), req.uri().path()) {
        ("POST", "/search") | ("POST", "/theme") | ("GET", "/export.xlsx") => redirect("/"),
        _ => Err(ServerError::NotFound),
    }
}

fn session(state: &AppState, token: &str) -> Result<SessionContext, ServerError> {
    state
        .sessions
        .snapshot(token)
        .ok_or(ServerError::InternalError)
}

fn render(
    state: &AppState,
    ctx: &SessionContext,
    title: &str,
    active: Nav,
    extra_head: Option<Markup>,
    content: Markup,
) -> ResultResp {
    html_response(layout(state, ctx, title, active, extra_head, content))
}

fn layout(
    state: &AppState,
    ctx: &SessionContext,
    title: &str,
    active: Nav,
    extra_head: Option<Markup>,
    content: Markup,
) -> Markup {
    let stylesheet = state.theme.stylesheet(ctx.mode);
    let chrome = Chrome {
        title,
        active,
        mode: ctx.mode,
        stylesheet: &stylesheet,
        refresh: ctx.status.is_running(),
        extra_head,
    };
    desktop_layout(&chrome, content)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn home(req: &Request, state: &AppState, token: &str) -> ResultResp {
    let ctx = session(state, token)?;
    let params = query_params(req);

    let rank = params
        .get("rank")
        .and_then(|r| r.parse::<Metric>().ok())
        .unwrap_or(Metric::Distance);
    let top_only = params.get("top_only").is_some_and(|v| v == "1");

    let today = today();
    let form = ctx
        .query
        .as_ref()
        .map_or_else(|| SearchForm::defaults(today), SearchForm::from_query);

    let vm = HomeVm {
        session: &ctx,
        form,
        error: None,
        rank,
        top_only,
        today,
    };
    render(state, &ctx, "hotels info", Nav::Hotels, Some(map_head()), home_page(&vm))
}

fn trends(req: &Request, state: &AppState, token: &str) -> ResultResp {
    let ctx = session(state, token)?;
    let params = query_params(req);
    let defaults = ChartChoice::default();
    let pick = |key: &str, fallback: Metric| {
        params
            .get(key)
            .and_then(|v| v.parse::<Metric>().ok())
            .unwrap_or(fallback)
    };

    let choice = ChartChoice {
        x: pick("x", defaults.x),
        y: pick("y", defaults.y),
        x3: pick("x3", defaults.x3),
        y3: pick("y3", defaults.y3),
        z3: pick("z3", defaults.z3),
        color: Some(pick("color", defaults.color))
            .filter(|m| Metric::TREEMAP_COLORS.contains(m))
            .unwrap_or(defaults.color),
    };
    let palette = state.theme.palette(ctx.mode);

    let vm = TrendsVm {
        dataset: &ctx.dataset,
        choice,
        palette: &palette,
    };
    render(state, &ctx, "trends", Nav::Trends, None, trends_page(&vm))
}

fn search(mut req: Request, state: &AppState, token: &str) -> ResultResp {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Could not read form: {e}")))?;
    let fields: HashMap<String, String> = url::form_urlencoded::parse(&body).into_owned().collect();

    let query = match SearchQuery::from_form(&fields) {
        Ok(q) => q,
        Err(e) => return rejected_search(state, token, &fields, 400, e.to_string()),
    };

    let fetcher = HttpFetcher::new(
        &state.config.user_agent,
        Duration::from_secs(state.config.request_timeout_secs),
    )
    .map_err(|e| {
        error!(error = %e, "http client could not be built");
        ServerError::InternalError
    })?;

    match spawn_search(
        &state.sessions,
        token,
        query,
        &state.config.search_base_url,
        &state.config.data_dir,
        fetcher,
    ) {
        Ok(_) => redirect("/"),
        Err(SearchError::AlreadyRunning) => {
            rejected_search(state, token, &fields, 409, SearchError::AlreadyRunning.to_string())
        }
        Err(e) => {
            warn!(error = %e, "search not started");
            rejected_search(state, token, &fields, 400, e.to_string())
        }
    }
}

/// The home page again, with the submitted values and the reason.
fn rejected_search(
    state: &AppState,
    token: &str,
    fields: &HashMap<String, String>,
    status: u16,
    message: String,
) -> ResultResp {
    let ctx = session(state, token)?;
    let vm = HomeVm {
        session: &ctx,
        form: SearchForm::from_fields(fields),
        error: Some(message),
        rank: Metric::Distance,
        top_only: false,
        today: today(),
    };
    let page = layout(state, &ctx, "hotels info", Nav::Hotels, Some(map_head()), home_page(&vm));
    html_status_response(status, page)
}

fn query_params(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn session_token(req: &Request) -> Option<String> {
    let header = req.headers().get("cookie")?.to_str().ok()?;
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}
