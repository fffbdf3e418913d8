use crate::router::handle;
use crate::session::RunStatus;
use crate::tests::utils::{body_string, get, issued_token, post_form, test_state, with_cookie};

#[test]
fn empty_destination_is_rejected_in_the_form() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let form = "destination=&checkin=2030-03-01&checkout=2030-03-03&adults=2";
    let mut resp = handle(with_cookie(post_form("/search", form), &token), &state);

    assert_eq!(resp.status(), 400);
    let body = body_string(&mut resp);
    assert!(body.contains("value=\"2030-03-01\""), "submitted values are kept");
    assert_eq!(state.sessions.snapshot(&token).unwrap().status, RunStatus::Idle);
}

#[test]
fn checkout_before_checkin_is_rejected() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let form = "destination=Krak%C3%B3w&checkin=2030-03-03&checkout=2030-03-01&adults=2";
    let mut resp = handle(with_cookie(post_form("/search", form), &token), &state);

    assert_eq!(resp.status(), 400);
    assert!(body_string(&mut resp).contains("value=\"Kraków\""));
    assert!(state.sessions.snapshot(&token).unwrap().query.is_none());
}

#[test]
fn zero_adults_is_rejected() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let form = "destination=Gdansk&checkin=2030-03-01&checkout=2030-03-03&adults=0";
    let resp = handle(with_cookie(post_form("/search", form), &token), &state);

    assert_eq!(resp.status(), 400);
}

#[test]
fn search_without_a_session_goes_home_and_starts_nothing() {
    let state = test_state();
    let form = "destination=Gdansk&checkin=2030-03-01&checkout=2030-03-03&adults=2";

    for _ in 0..5 {
        let resp = handle(post_form("/search", form), &state);
        assert_eq!(resp.status(), 303);
        assert_eq!(resp.headers().get("location").unwrap(), "/");
        assert!(issued_token(&resp).is_none());
    }
    let resp = handle(with_cookie(post_form("/search", form), "forged"), &state);
    assert_eq!(resp.status(), 303);

    assert_eq!(state.sessions.len(), 0);
}

#[test]
fn valid_search_starts_a_run_and_redirects() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let form = "destination=Krak%C3%B3w&checkin=2030-03-01&checkout=2030-03-03&adults=2";
    let resp = handle(with_cookie(post_form("/search", form), &token), &state);

    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("location").unwrap(), "/");

    let ctx = state.sessions.snapshot(&token).unwrap();
    assert_eq!(ctx.query.unwrap().destination, "Kraków");
    let link = ctx.search_link.unwrap();
    assert!(link.starts_with("http://127.0.0.1:9/searchresults.html?"));
    assert!(link.contains("group_adults=2"));
    assert_ne!(ctx.status, RunStatus::Idle);
}
