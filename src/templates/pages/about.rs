use maud::{html, Markup};

pub fn about_page() -> Markup {
    html! {
        h1 { "about this app" }
        h2 { "welcome to hotel scout!" }
        p {
            "hotel scout collects hotel listings from booking.com for a destination and dates you pick, "
            "looks up every hotel's own page for its location and accommodation type, and lays the "
            "results out on a map and a handful of charts."
        }

        h3 { "what can you do here?" }
        ul {
            li { strong { "search hotels" } ": enter a destination, travel dates and the number of guests." }
            li { strong { "scrape data" } ": prices, reviews, stars and distance from the centre are collected across ten sort orders." }
            li { strong { "interactive map" } ": see where the hotels are, with the top 5 for your chosen criterion in gold." }
            li { strong { "analyze trends" } ": scatter plots, histograms, a treemap and a 3D view of the same table." }
            li { strong { "export" } ": download the table as a spreadsheet." }
        }

        h3 { "how to use the app?" }
        ol {
            li { "on the hotels page, fill in the form and press " strong { "find my stay" } ". the page refreshes while scraping runs." }
            li { "pick a criterion under " strong { "show me top 5" } " to highlight the best matches on the map." }
            li { "switch to " strong { "understand the trends" } " and choose the axes to compare." }
        }

        h3 { "what's under the hood?" }
        p {
            "scraping runs in two stages. the first walks the search results in every sort order and "
            "keeps one row per hotel link. the second visits each hotel page and rewrites the table "
            "after every hotel, so an interrupted run keeps what it found. both stages can also be "
            "run from the command line, on their own or back to back."
        }
        p {
            "prices are split into four per-night categories (cheap, moderate, expensive, luxury). "
            "the light and dark looks come from a material-style palette file."
        }
        p { a href="/export.xlsx" { "download the current table" } }
    }
}
