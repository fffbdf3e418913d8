mod dashboard_tests;
mod search_tests;
