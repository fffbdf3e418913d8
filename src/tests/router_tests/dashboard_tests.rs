use crate::domain::HotelRecord;
use crate::router::handle;
use crate::table::Dataset;
use crate::tests::utils::{
    body_string, get, issued_token, post_form, sample_dataset, state_with, test_state, with_cookie,
};

#[test]
fn first_visit_opens_a_session_and_shows_the_form() {
    let state = test_state();
    let mut resp = handle(get("/"), &state);

    assert_eq!(resp.status(), 200);
    let token = issued_token(&resp).expect("session cookie set");
    assert!(state.sessions.contains(&token));

    let body = body_string(&mut resp);
    assert!(body.contains("name=\"destination\""));
    assert!(body.contains("fill in the form to see the results."));
}

#[test]
fn known_session_gets_no_new_cookie() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let resp = handle(with_cookie(get("/about"), &token), &state);
    assert_eq!(resp.status(), 200);
    assert!(issued_token(&resp).is_none());
}

#[test]
fn forged_cookie_is_replaced() {
    let state = test_state();
    let resp = handle(with_cookie(get("/"), "not-a-real-token"), &state);

    let token = issued_token(&resp).expect("fresh session");
    assert_ne!(token, "not-a-real-token");
}

#[test]
fn about_page_renders() {
    let state = test_state();
    let mut resp = handle(get("/about"), &state);

    assert_eq!(resp.status(), 200);
    assert!(body_string(&mut resp).contains("about this app"));
}

#[test]
fn unknown_route_is_404() {
    let state = test_state();
    let mut resp = handle(get("/admin"), &state);

    assert_eq!(resp.status(), 404);
    assert!(body_string(&mut resp).contains("Error 404"));
}

#[test]
fn cookieless_requests_off_the_pages_open_no_session() {
    let state = test_state();
    for _ in 0..20 {
        let resp = handle(get("/nope"), &state);
        assert_eq!(resp.status(), 404);
        assert!(issued_token(&resp).is_none());
    }
    handle(get("/favicon.ico"), &state);

    let resp = handle(post_form("/theme", ""), &state);
    assert_eq!(resp.status(), 303);
    let resp = handle(get("/export.xlsx"), &state);
    assert_eq!(resp.status(), 303);

    assert_eq!(state.sessions.len(), 0);
}

#[test]
fn hotel_without_coordinates_counts_but_is_not_mapped() {
    let mut data = sample_dataset();
    data.records.push(HotelRecord {
        name: Some("Hotel Nowhere".into()),
        price: None,
        distance: Some(5000.0),
        rate_review: Some(6.0),
        num_review: Some(3),
        rating_stars: 1,
        link: "https://www.booking.com/hotel/pl/nowhere.html".into(),
        ..Default::default()
    });
    let state = state_with(data);

    let token = {
        let mut resp = handle(get("/?rank=price"), &state);
        let body = body_string(&mut resp);
        assert!(body.contains(r#"no. of found spots</div><div class="value">5</div>"#));

        let markers = body
            .split(r#"id="hotel-markers">"#)
            .nth(1)
            .and_then(|rest| rest.split("</script>").next())
            .expect("marker payload");
        assert_eq!(markers.matches("\"lat\":").count(), 4);
        assert!(!markers.contains("Hotel Nowhere"));
        issued_token(&resp).unwrap()
    };

    let mut resp = handle(with_cookie(get("/trends?x=distance&y=rate_review"), &token), &state);
    assert!(body_string(&mut resp).contains("Hotel Nowhere: distance"));
}

#[test]
fn preloaded_table_shows_map_and_top_five() {
    let state = state_with(sample_dataset());
    let mut resp = handle(get("/?rank=price&top_only=1"), &state);

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("id=\"map\""));
    assert!(body.contains("hotel-markers"));
    assert!(body.contains("top 5 hotels sorted by price"));
    assert!(body.contains("Hotel 1"));
}

#[test]
fn trends_draw_charts_for_a_loaded_table() {
    let state = state_with(sample_dataset());
    let mut resp = handle(get("/trends?x=num_review&y=rate_review&color=rating_stars"), &state);

    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("<svg"));
    assert!(body.contains("price categories description:"));
    assert!(body.contains("value=\"num_review\" selected"));
}

#[test]
fn treemap_colour_outside_its_choices_falls_back() {
    let state = state_with(sample_dataset());
    let mut resp = handle(get("/trends?color=price"), &state);

    let body = body_string(&mut resp);
    assert!(body.contains("price range and num_review"));
    assert!(body.contains(r#"value="num_review" selected"#));
}

#[test]
fn trends_without_data_ask_for_a_search() {
    let state = state_with(Dataset::empty());
    let mut resp = handle(get("/trends"), &state);

    let body = body_string(&mut resp);
    assert!(body.contains("fill in the form to see the results."));
    assert!(!body.contains("<svg"));
}

#[test]
fn theme_toggle_switches_the_mode() {
    let state = test_state();
    let token = issued_token(&handle(get("/"), &state)).unwrap();

    let resp = handle(with_cookie(post_form("/theme", ""), &token), &state);
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("location").unwrap(), "/");

    let mut page = handle(with_cookie(get("/"), &token), &state);
    assert!(body_string(&mut page).contains("data-mode=\"dark\""));
}

#[test]
fn export_is_a_spreadsheet() {
    let state = state_with(sample_dataset());
    let mut resp = handle(get("/export.xlsx"), &state);

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut resp.body_mut().reader(), &mut bytes).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
