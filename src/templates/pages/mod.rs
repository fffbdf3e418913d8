pub mod about;
pub mod home;
pub mod trends;

pub use about::about_page;
pub use home::{home_page, map_head, HomeVm, SearchForm};
pub use trends::{trends_page, ChartChoice, TrendsVm};
