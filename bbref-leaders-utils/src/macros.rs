/// Compiles the CSS selector once and hands out a `&'static Selector`.
///
/// The calling crate must depend on `once_cell` and `scraper`.
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($e).unwrap());
        &*SELECTOR
    }};
}
