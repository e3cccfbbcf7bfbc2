// src/utils/html.rs

/// Cleans material HTML with ammonia's whitelist.
///
/// Formatting tags such as <b>, <p> and <img> survive; <script>, <iframe>
/// and event-handler attributes are removed together with script bodies.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
