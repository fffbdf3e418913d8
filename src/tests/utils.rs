use crate::config::AppConfig;
use crate::domain::{Column, HotelRecord};
use crate::router::AppState;
use crate::session::{SessionStore, SESSION_COOKIE};
use crate::table::{Capabilities, Dataset};
use crate::theme::Theme;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// App state over a data directory that is removed when the test ends.
pub struct TestApp {
    pub state: AppState,
    _data_dir: TempDir,
}

impl Deref for TestApp {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

/// Nothing listens on port 9, so a scrape started by a test fails fast.
pub fn test_config(data_dir: &Path) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: data_dir.to_path_buf(),
        theme_path: PathBuf::from("assets/theme.json"),
        log_level: "warn".into(),
        user_agent: "hotel-scout-tests".into(),
        request_timeout_secs: 1,
        search_base_url: "http://127.0.0.1:9/searchresults.html".into(),
        max_workers: 1,
    }
}

pub fn test_state() -> TestApp {
    state_with(Dataset::empty())
}

pub fn state_with(dataset: Dataset) -> TestApp {
    let data_dir = tempdir().unwrap();
    TestApp {
        state: AppState {
            config: test_config(data_dir.path()),
            sessions: SessionStore::new(dataset, None),
            theme: Theme::builtin(),
        },
        _data_dir: data_dir,
    }
}

/// Four fully enriched hotels around Kraków's old town.
pub fn sample_dataset() -> Dataset {
    let hotel = |i: u32, price: f64, stars: u32, dist: f64, kind: &str| HotelRecord {
        name: Some(format!("Hotel {i}")),
        address: Some(format!("Rynek {i}")),
        price: Some(price),
        distance: Some(dist),
        rate_review: Some(7.5 + f64::from(i) * 0.4),
        num_review: Some(100 * i),
        rating_stars: stars,
        link: format!("https://www.booking.com/hotel/pl/h{i}.html"),
        source_url: "https://www.booking.com/searchresults.html".into(),
        latitude: Some(50.06 + f64::from(i) * 0.001),
        longitude: Some(19.94 + f64::from(i) * 0.001),
        hotel_type: Some(kind.into()),
    };

    Dataset {
        records: vec![
            hotel(1, 120.0, 2, 300.0, "Hostel"),
            hotel(2, 260.0, 3, 900.0, "Hotel"),
            hotel(3, 480.0, 4, 1500.0, "Hotel"),
            hotel(4, 720.0, 5, 2400.0, "Apartment"),
        ],
        capabilities: Capabilities::new(Column::LISTING.into_iter().chain(Column::DETAIL)),
        nights: 1,
    }
}

pub fn get(path: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(path: &str, form: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn with_cookie(mut req: Request, token: &str) -> Request {
    req.headers_mut().insert(
        "cookie",
        format!("{SESSION_COOKIE}={token}").parse().unwrap(),
    );
    req
}

/// The session token a response handed out, if it set one.
pub fn issued_token(resp: &Response) -> Option<String> {
    let cookie = resp.headers().get("set-cookie")?.to_str().ok()?;
    let pair = cookie.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
}

pub fn body_string(resp: &mut Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}
